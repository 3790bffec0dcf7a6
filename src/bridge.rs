//! Scripting bridge dispatch.
//!
//! Page script calls native functions by name with JSON-like arguments.
//! [`invoke`] returns `None` for names it does not own so the caller can try
//! other handlers.

use serde_json::Value;

use crate::commands::{self, ApplyOptions};
use crate::AppState;

pub const GET_EFFECT: &str = "GetEffect";
pub const APPLY_EFFECT: &str = "ApplyEffect";
pub const CLEAR_EFFECT: &str = "ClearEffect";
pub const OPEN_DEVTOOLS: &str = "OpenDevTools";

pub fn invoke(state: &AppState, function: &str, args: &[Value]) -> Option<Value> {
    let result = match function {
        GET_EFFECT => Value::String(commands::get_effect(state)),
        APPLY_EFFECT => {
            let applied = match args.first().and_then(Value::as_str) {
                Some(name) => {
                    let options = args
                        .get(1)
                        .filter(|v| v.is_object())
                        .map(ApplyOptions::from_value);
                    commands::apply_effect(state, name, options.as_ref())
                }
                None => false,
            };
            Value::Bool(applied)
        }
        CLEAR_EFFECT => Value::Bool(commands::clear_effect(state)),
        OPEN_DEVTOOLS => {
            let remote = args.first().and_then(Value::as_bool).unwrap_or(false);
            commands::open_devtools(state, remote);
            Value::Null
        }
        _ => return None,
    };

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devtools::{NoDevToolsHost, NoopShell};
    use glasspane_core::{
        AccentPolicy, AccentState, AppSettings, EffectsContext, FixedTheme, FixedVersion,
        NativeCall, OsVersion, RecordingCompositor, TintColor, WindowHandle,
    };
    use serde_json::json;
    use std::sync::Arc;

    const WINDOW: WindowHandle = WindowHandle::from_raw(0x10);

    fn state(build: u32) -> (AppState, RecordingCompositor) {
        let recorder = RecordingCompositor::new();
        let context = EffectsContext::new(
            WINDOW,
            Arc::new(recorder.clone()),
            Box::new(FixedVersion(OsVersion::windows(build))),
        );
        let state = AppState::new(
            context,
            AppSettings::default(),
            Arc::new(NoDevToolsHost),
            Arc::new(NoopShell),
            Arc::new(FixedTheme { light: true }),
        );
        (state, recorder)
    }

    #[test]
    fn test_apply_get_clear() {
        let (state, _) = state(22621);

        assert_eq!(invoke(&state, GET_EFFECT, &[]), Some(json!("")));
        assert_eq!(invoke(&state, APPLY_EFFECT, &[json!("mica")]), Some(json!(true)));
        assert_eq!(invoke(&state, GET_EFFECT, &[]), Some(json!("mica")));
        assert_eq!(invoke(&state, CLEAR_EFFECT, &[]), Some(json!(true)));
        assert_eq!(invoke(&state, GET_EFFECT, &[]), Some(json!("")));
        assert_eq!(invoke(&state, CLEAR_EFFECT, &[]), Some(json!(true)));
    }

    #[test]
    fn test_unknown_effect_keeps_current() {
        let (state, recorder) = state(22621);
        invoke(&state, APPLY_EFFECT, &[json!("acrylic")]);
        recorder.take_calls();

        assert_eq!(invoke(&state, APPLY_EFFECT, &[json!("unknown-name")]), Some(json!(false)));
        assert_eq!(invoke(&state, APPLY_EFFECT, &[json!(42)]), Some(json!(false)));
        assert_eq!(invoke(&state, APPLY_EFFECT, &[]), Some(json!(false)));
        assert_eq!(invoke(&state, GET_EFFECT, &[]), Some(json!("acrylic")));
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_color_option_reaches_accent_policy() {
        let (state, recorder) = state(19045);

        let args = [json!("unified"), json!({"color": "#00000000"})];
        let applied = invoke(&state, APPLY_EFFECT, &args);
        assert_eq!(applied, Some(json!(true)));
        // Zero tint takes the default gray, then gets the minimum alpha.
        assert_eq!(
            recorder.calls(),
            vec![NativeCall::SetAccent(
                WINDOW,
                AccentPolicy::new(
                    AccentState::EnableAcrylicBlurBehind,
                    TintColor::from_argb(0x0028_2828)
                )
            )]
        );
        recorder.take_calls();

        invoke(&state, APPLY_EFFECT, &[json!("acrylic"), json!({"color": "#10203040"})]);
        let calls = recorder.calls();
        let NativeCall::SetAccent(_, policy) = calls[1] else {
            panic!("expected accent call, got {:?}", calls);
        };
        assert_eq!(policy.gradient_color, 0x4010_2030);
    }

    #[test]
    fn test_non_string_color_is_ignored() {
        assert_eq!(ApplyOptions::from_value(&json!({"color": 12})), ApplyOptions::default());
        assert_eq!(ApplyOptions::from_value(&json!({"color": "F00"})).tint().argb(), 0xFFFF0000);
    }

    #[test]
    fn test_unsupported_platform_returns_false() {
        let (state, _) = state(19045);
        assert_eq!(invoke(&state, APPLY_EFFECT, &[json!("mica")]), Some(json!(false)));
        assert_eq!(invoke(&state, GET_EFFECT, &[]), Some(json!("")));
    }

    #[test]
    fn test_foreign_function_falls_through() {
        let (state, _) = state(22621);
        assert_eq!(invoke(&state, "ReadFile", &[]), None);
        assert_eq!(invoke(&state, OPEN_DEVTOOLS, &[json!(true)]), Some(Value::Null));
    }
}
