//! Window-manager and shell calls used by the devtools launcher.

use std::sync::Arc;

use glasspane_core::WindowHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowCommand {
    /// Un-minimize.
    Restore,
    Normal,
}

pub trait ShellOps: Send + Sync {
    /// Open `url` with the user's default handler.
    fn open_url(&self, url: &str) -> bool;

    /// Whether `window` is alive and belongs to this process.
    fn owned_by_current_process(&self, window: WindowHandle) -> bool;

    fn is_minimized(&self, window: WindowHandle) -> bool;

    fn show(&self, window: WindowHandle, command: ShowCommand);

    fn set_foreground(&self, window: WindowHandle);

    /// Copy the big window icon of `from` onto `to`.
    fn copy_icon(&self, from: WindowHandle, to: WindowHandle);

    /// Force a non-client repaint so a freshly themed title bar shows up.
    fn refresh_frame(&self, window: WindowHandle);
}

/// Shell for platforms without a window manager binding; does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopShell;

impl ShellOps for NoopShell {
    fn open_url(&self, url: &str) -> bool {
        tracing::debug!(url, "open_url is not supported on this platform");
        false
    }

    fn owned_by_current_process(&self, _window: WindowHandle) -> bool {
        false
    }

    fn is_minimized(&self, _window: WindowHandle) -> bool {
        false
    }

    fn show(&self, _window: WindowHandle, _command: ShowCommand) {}

    fn set_foreground(&self, _window: WindowHandle) {}

    fn copy_icon(&self, _from: WindowHandle, _to: WindowHandle) {}

    fn refresh_frame(&self, _window: WindowHandle) {}
}

/// Shell for the running platform.
pub fn platform_shell() -> Arc<dyn ShellOps> {
    #[cfg(windows)]
    {
        Arc::new(super::win32::Win32Shell)
    }

    #[cfg(not(windows))]
    {
        Arc::new(NoopShell)
    }
}
