//! Glasspane - Windows 嵌入式浏览器窗口特效
//!
//! Host-side layer on top of `glasspane-core`: logging, the scripting bridge
//! that page script calls into, and the devtools launcher.

pub mod bridge;
pub mod commands;
pub mod devtools;
pub mod logging;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glasspane_core::{
    native, AppDataPathProvider, AppResult, AppSettings, EffectsContext, SettingsManager,
    SystemThemeSource, WindowHandle,
};

use devtools::{DevTools, DevToolsHost, DevToolsPlatform, ShellOps};

/// 应用程序状态
pub struct AppState {
    effects: Mutex<EffectsContext>,
    pub devtools: DevTools,
    pub settings: AppSettings,
    pub system_theme: Arc<dyn SystemThemeSource>,
}

impl AppState {
    pub fn new(
        context: EffectsContext,
        settings: AppSettings,
        devtools_host: Arc<dyn DevToolsHost>,
        shell: Arc<dyn ShellOps>,
        system_theme: Arc<dyn SystemThemeSource>,
    ) -> Self {
        let platform = DevToolsPlatform {
            shell,
            system_theme: system_theme.clone(),
            compositor: context.compositor().clone(),
            capabilities: context.capabilities(),
        };
        let devtools = DevTools::new(
            settings.devtools.clone(),
            context.window(),
            devtools_host,
            platform,
        );

        Self {
            effects: Mutex::new(context),
            devtools,
            settings,
            system_theme,
        }
    }

    /// State wired to the running platform's native backends.
    pub fn for_platform(
        window: WindowHandle,
        settings: AppSettings,
        devtools_host: Arc<dyn DevToolsHost>,
    ) -> Self {
        Self::new(
            EffectsContext::for_platform(window),
            settings,
            devtools_host,
            devtools::platform_shell(),
            native::platform_theme_source(),
        )
    }

    /// Lock the effects context. A panic while holding the lock does not
    /// invalidate the context, so poisoning is ignored.
    pub fn effects(&self) -> MutexGuard<'_, EffectsContext> {
        self.effects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach the host window once the browser has created it.
    ///
    /// Any effect on the previous window is cleared, and the configured
    /// theme is applied to the new one.
    pub fn set_window(&self, window: WindowHandle) {
        self.effects().set_window(window);
        self.devtools.tracker().set_host_window(window);

        if !window.is_null() {
            commands::apply_theme(self, window, self.settings.theme);
        }
    }
}

/// Start Glasspane for the host window: load settings, set up logging,
/// theme the window and kick off devtools discovery.
pub fn start(window: WindowHandle, devtools_host: Arc<dyn DevToolsHost>) -> AppResult<AppState> {
    let paths = AppDataPathProvider::new();
    let settings = SettingsManager::new(&paths)?.load().unwrap_or_else(|e| {
        // tracing 尚未初始化，先写 stderr
        eprintln!("Glasspane: {}, using default settings", e);
        AppSettings::default()
    });

    if let Err(e) = logging::init_logging(&paths, &settings.logging) {
        eprintln!("Glasspane: {}", e);
    }
    tracing::info!("Glasspane starting...");

    Ok(start_with_settings(window, settings, devtools_host))
}

/// Like [`start`] with settings supplied by the caller; logging is left alone.
pub fn start_with_settings(
    window: WindowHandle,
    settings: AppSettings,
    devtools_host: Arc<dyn DevToolsHost>,
) -> AppState {
    let state = AppState::for_platform(window, settings, devtools_host);

    if !window.is_null() {
        commands::apply_theme(&state, window, state.settings.theme);
    }
    state.devtools.prepare();

    tracing::info!(
        version = %state.effects().oracle().version(),
        "Glasspane ready"
    );
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use devtools::{NoDevToolsHost, NoopShell};
    use glasspane_core::{
        EffectKind, FixedTheme, FixedVersion, NativeCall, OsVersion, RecordingCompositor,
        TintColor, WindowAttribute,
    };

    fn state(window: WindowHandle) -> (AppState, RecordingCompositor) {
        let recorder = RecordingCompositor::new();
        let context = EffectsContext::new(
            window,
            Arc::new(recorder.clone()),
            Box::new(FixedVersion(OsVersion::windows(22621))),
        );
        let state = AppState::new(
            context,
            AppSettings::default(),
            Arc::new(NoDevToolsHost),
            Arc::new(NoopShell),
            Arc::new(FixedTheme { light: false }),
        );
        (state, recorder)
    }

    #[test]
    fn test_window_attached_after_start() {
        let window = WindowHandle::from_raw(0x10);
        let (state, recorder) = state(WindowHandle::NULL);
        assert!(state.effects().apply(EffectKind::Mica, TintColor::ZERO).is_err());

        state.set_window(window);
        assert_eq!(state.effects().window(), window);
        assert_eq!(state.devtools.tracker().host_window(), window);
        // Dark system preference follows the window
        assert_eq!(
            recorder.take_calls(),
            vec![NativeCall::SetAttribute(window, WindowAttribute::USE_IMMERSIVE_DARK_MODE, 1)]
        );

        assert!(state.effects().apply(EffectKind::Mica, TintColor::ZERO).is_ok());
        assert_eq!(state.effects().current(), EffectKind::Mica);
    }

    #[test]
    fn test_detaching_window_clears_effect() {
        let window = WindowHandle::from_raw(0x10);
        let (state, recorder) = state(window);
        state.effects().apply(EffectKind::Acrylic, TintColor::ZERO).unwrap();
        recorder.take_calls();

        state.set_window(WindowHandle::NULL);
        assert_eq!(state.effects().current(), EffectKind::None);
        assert!(state.devtools.tracker().host_window().is_null());
        // Only the clear on the old window; no theme call for a null window.
        assert_eq!(recorder.calls().len(), 2);
        assert!(recorder.calls().iter().all(|call| matches!(
            call,
            NativeCall::ExtendFrame(w, _) | NativeCall::SetAttribute(w, _, _) if *w == window
        )));
    }
}
