//! Window theme commands

use glasspane_core::{ThemeMode, ThemeOutcome, WindowHandle};

use crate::AppState;

/// Force `window` into `mode`; `System` follows the user's app-theme preference.
pub fn apply_theme(state: &AppState, window: WindowHandle, mode: ThemeMode) -> ThemeOutcome {
    let effects = state.effects();
    let outcome = effects
        .theme()
        .apply_mode(window, mode, state.system_theme.as_ref());
    tracing::debug!(window = window.as_raw(), ?mode, ?outcome, "Theme applied");
    outcome
}
