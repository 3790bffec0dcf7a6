//! Window effect commands (GetEffect / ApplyEffect / ClearEffect)

use glasspane_core::{EffectError, EffectKind, TintColor};
use serde_json::Value;

use crate::AppState;

/// Options object accepted by `ApplyEffect`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Hex tint; anything that is not a string is ignored.
    pub color: Option<String>,
}

impl ApplyOptions {
    pub fn from_value(value: &Value) -> Self {
        Self {
            color: value.get("color").and_then(Value::as_str).map(str::to_string),
        }
    }

    /// Parsed tint, zero when no color was given.
    pub fn tint(&self) -> TintColor {
        self.color.as_deref().map(TintColor::parse).unwrap_or_default()
    }
}

/// Current effect name, empty when none is active.
pub fn get_effect(state: &AppState) -> String {
    state.effects().current().name().to_string()
}

/// Apply a named effect. Unknown names are rejected without touching the
/// current effect.
pub fn apply_effect(state: &AppState, name: &str, options: Option<&ApplyOptions>) -> bool {
    let kind = match name.parse::<EffectKind>() {
        Ok(kind) => kind,
        Err(e) => {
            tracing::debug!(error = %e, "ApplyEffect rejected");
            return false;
        }
    };
    let tint = options.map(ApplyOptions::tint).unwrap_or_default();

    match state.effects().apply(kind, tint) {
        Ok(_) => true,
        Err(e @ (EffectError::UnsupportedPlatform(_) | EffectError::NativeApiUnavailable(_))) => {
            tracing::info!(effect = name, "{}", e);
            false
        }
        Err(e) => {
            tracing::warn!(effect = name, error = %e, "ApplyEffect failed");
            false
        }
    }
}

/// Clear the active effect, if any. Always succeeds.
pub fn clear_effect(state: &AppState) -> bool {
    state.effects().clear();
    true
}
