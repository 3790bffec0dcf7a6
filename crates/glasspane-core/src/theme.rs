//! Immersive dark/light window chrome.

use crate::capability::Capabilities;
use crate::compositor::{Compositor, WindowAttribute, WindowHandle};
use crate::models::ThemeMode;

/// Where the user's app-theme preference comes from.
pub trait SystemThemeSource: Send + Sync {
    /// `true` when the system asks apps to use the light theme.
    fn apps_use_light_theme(&self) -> bool;
}

/// Theme source with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedTheme {
    pub light: bool,
}

impl SystemThemeSource for FixedTheme {
    fn apps_use_light_theme(&self) -> bool {
        self.light
    }
}

/// Result of a theme request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeOutcome {
    /// The attribute was written.
    Applied { attribute: WindowAttribute, dark: bool },
    /// Nothing needed to change (system mode with a light preference).
    Unchanged,
    /// The OS has no immersive dark-mode attribute.
    Unsupported,
}

/// Version-gated dark-mode attribute writer.
pub struct ThemeController<'a> {
    compositor: &'a dyn Compositor,
    capabilities: Capabilities,
}

impl<'a> ThemeController<'a> {
    pub fn new(compositor: &'a dyn Compositor, capabilities: Capabilities) -> Self {
        Self {
            compositor,
            capabilities,
        }
    }

    /// Attribute identifier for this OS, newest first.
    pub fn dark_mode_attribute(&self) -> Option<WindowAttribute> {
        let caps = &self.capabilities;
        if caps.is_windows_11() || caps.supports_dark_mode_2004() {
            Some(WindowAttribute::USE_IMMERSIVE_DARK_MODE)
        } else if caps.supports_dark_mode_1809() {
            Some(WindowAttribute::USE_IMMERSIVE_DARK_MODE_1809)
        } else {
            None
        }
    }

    pub fn force_dark(&self, window: WindowHandle) -> ThemeOutcome {
        self.set_dark(window, true)
    }

    pub fn force_light(&self, window: WindowHandle) -> ThemeOutcome {
        self.set_dark(window, false)
    }

    /// Apply a configured mode. `System` only forces dark, and only when
    /// the user prefers dark apps.
    pub fn apply_mode(
        &self,
        window: WindowHandle,
        mode: ThemeMode,
        system: &dyn SystemThemeSource,
    ) -> ThemeOutcome {
        match mode {
            ThemeMode::Dark => self.force_dark(window),
            ThemeMode::Light => self.force_light(window),
            ThemeMode::System if system.apps_use_light_theme() => ThemeOutcome::Unchanged,
            ThemeMode::System => self.force_dark(window),
        }
    }

    fn set_dark(&self, window: WindowHandle, dark: bool) -> ThemeOutcome {
        let Some(attribute) = self.dark_mode_attribute() else {
            tracing::debug!(
                version = %self.capabilities.version(),
                "Immersive dark mode unavailable on this OS"
            );
            return ThemeOutcome::Unsupported;
        };

        if let Err(err) = self
            .compositor
            .set_window_attribute(window, attribute, u32::from(dark))
        {
            tracing::warn!(error = %err, dark, "Failed to set immersive dark mode");
        }

        ThemeOutcome::Applied { attribute, dark }
    }
}
