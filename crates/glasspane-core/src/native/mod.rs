//! Platform backends for the compositor, version query and theme preference.

use std::sync::Arc;

use crate::compositor::SharedCompositor;
use crate::theme::SystemThemeSource;
use crate::version::VersionSource;

#[cfg(not(windows))]
use crate::{compositor::UnavailableCompositor, theme::FixedTheme, version::NoVersion};

#[cfg(windows)]
mod win32;

#[cfg(windows)]
pub use win32::{DwmCompositor, NtVersionSource, RegistryThemeSource};

/// Compositor for the running platform.
pub fn platform_compositor() -> SharedCompositor {
    #[cfg(windows)]
    {
        Arc::new(DwmCompositor)
    }

    #[cfg(not(windows))]
    {
        Arc::new(UnavailableCompositor)
    }
}

/// Version query for the running platform.
pub fn platform_version_source() -> Box<dyn VersionSource> {
    #[cfg(windows)]
    {
        Box::new(NtVersionSource)
    }

    #[cfg(not(windows))]
    {
        Box::new(NoVersion)
    }
}

/// System theme preference for the running platform. Defaults to light
/// where no preference can be read.
pub fn platform_theme_source() -> Arc<dyn SystemThemeSource> {
    #[cfg(windows)]
    {
        Arc::new(RegistryThemeSource)
    }

    #[cfg(not(windows))]
    {
        Arc::new(FixedTheme { light: true })
    }
}
