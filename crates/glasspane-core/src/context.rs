//! Process-wide effects state, owned explicitly.

use std::fmt;

use crate::capability::Capabilities;
use crate::color::TintColor;
use crate::compositor::{SharedCompositor, WindowHandle};
use crate::effects::{EffectEngine, EffectKind, EffectSession, Strategy};
use crate::native;
use crate::theme::ThemeController;
use crate::utils::error::EffectError;
use crate::version::{VersionOracle, VersionSource};

/// Owns the version cache, the single effect session and the compositor.
///
/// Construct one at startup and hand it by reference to every operation.
/// Mutating calls take `&mut self`; callers that share the context across
/// threads must serialize access (the host state wraps it in a mutex).
pub struct EffectsContext {
    oracle: VersionOracle,
    compositor: SharedCompositor,
    session: EffectSession,
}

impl EffectsContext {
    pub fn new(
        window: WindowHandle,
        compositor: SharedCompositor,
        version_source: Box<dyn VersionSource>,
    ) -> Self {
        Self {
            oracle: VersionOracle::new(version_source),
            compositor,
            session: EffectSession::new(window),
        }
    }

    /// Context backed by the running platform's compositor and version query.
    pub fn for_platform(window: WindowHandle) -> Self {
        Self::new(
            window,
            native::platform_compositor(),
            native::platform_version_source(),
        )
    }

    pub fn oracle(&self) -> &VersionOracle {
        &self.oracle
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::new(self.oracle.version())
    }

    pub fn compositor(&self) -> &SharedCompositor {
        &self.compositor
    }

    pub fn session(&self) -> &EffectSession {
        &self.session
    }

    pub fn window(&self) -> WindowHandle {
        self.session.target_window()
    }

    /// Retarget the session, clearing any effect on the previous window first.
    pub fn set_window(&mut self, window: WindowHandle) {
        if window != self.window() {
            self.effects().clear();
            self.session.set_target_window(window);
            tracing::debug!(window = window.as_raw(), "Effects target window changed");
        }
    }

    pub fn effects(&mut self) -> EffectEngine<'_> {
        let capabilities = self.capabilities();
        EffectEngine::new(&mut self.session, self.compositor.as_ref(), capabilities)
    }

    pub fn theme(&self) -> ThemeController<'_> {
        ThemeController::new(self.compositor.as_ref(), self.capabilities())
    }

    pub fn apply(&mut self, kind: EffectKind, tint: TintColor) -> Result<Strategy, EffectError> {
        self.effects().apply(kind, tint)
    }

    pub fn clear(&mut self) {
        self.effects().clear();
    }

    pub fn current(&self) -> EffectKind {
        self.session.active_kind()
    }
}

impl fmt::Debug for EffectsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectsContext")
            .field("oracle", &self.oracle)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{
        BackdropType, Margins, NativeCall, RecordingCompositor, WindowAttribute,
    };
    use crate::version::{FixedVersion, OsVersion};
    use std::sync::Arc;

    fn context(build: u32, window: WindowHandle) -> (EffectsContext, RecordingCompositor) {
        let recorder = RecordingCompositor::new();
        let ctx = EffectsContext::new(
            window,
            Arc::new(recorder.clone()),
            Box::new(FixedVersion(OsVersion::windows(build))),
        );
        (ctx, recorder)
    }

    #[test]
    fn test_version_is_lazy() {
        let (ctx, _) = context(22621, WindowHandle::from_raw(1));
        assert!(!ctx.oracle().is_resolved());
        assert!(ctx.capabilities().is_windows_11_22h2_plus());
        assert!(ctx.oracle().is_resolved());
    }

    #[test]
    fn test_apply_and_clear_through_context() {
        let (mut ctx, recorder) = context(22621, WindowHandle::from_raw(1));

        ctx.apply(EffectKind::Acrylic, TintColor::ZERO).unwrap();
        assert_eq!(ctx.current(), EffectKind::Acrylic);
        ctx.clear();
        ctx.clear();
        assert_eq!(ctx.current(), EffectKind::None);
        assert_eq!(recorder.calls().len(), 4);
    }

    #[test]
    fn test_set_window_clears_old_target() {
        let old = WindowHandle::from_raw(1);
        let new = WindowHandle::from_raw(2);
        let (mut ctx, recorder) = context(22621, old);

        ctx.apply(EffectKind::Mica, TintColor::ZERO).unwrap();
        recorder.take_calls();
        ctx.set_window(new);

        assert_eq!(ctx.current(), EffectKind::None);
        assert_eq!(ctx.window(), new);
        assert_eq!(
            recorder.calls(),
            vec![
                NativeCall::ExtendFrame(old, Margins::RESET),
                NativeCall::SetAttribute(
                    old,
                    WindowAttribute::SYSTEMBACKDROP_TYPE,
                    BackdropType::Disable as u32
                ),
            ]
        );
    }

    #[test]
    fn test_theme_shares_compositor() {
        let window = WindowHandle::from_raw(9);
        let (ctx, recorder) = context(19045, window);
        ctx.theme().force_dark(window);
        assert_eq!(
            recorder.calls(),
            vec![NativeCall::SetAttribute(window, WindowAttribute::USE_IMMERSIVE_DARK_MODE, 1)]
        );
    }
}
