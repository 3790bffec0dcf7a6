//! GlasspaneHandle - opaque handle wrapping the host application state.

use glasspane_core::{AppResult, AppSettings, WindowHandle};
use glasspane_lib::devtools::{DevToolsClient, DevToolsHost, DevToolsWindowInfo};
use glasspane_lib::AppState;
use parking_lot::RwLock;
use std::ffi::{c_void, CString};
use std::os::raw::c_char;
use std::sync::Arc;

/// Callback asking the host to create the embedded devtools window.
/// - `title`: window title (null-terminated UTF-8)
/// - `user_data`: user-provided context pointer
///
/// Return non-zero if the window is being created.
pub type ShowDevToolsCallback = extern "C" fn(title: *const c_char, user_data: *mut c_void) -> i32;

/// Stored callback with user data.
pub struct StoredCallback {
    pub callback: ShowDevToolsCallback,
    pub user_data: *mut c_void,
}

// SAFETY: user_data is managed by the caller and must be thread-safe
unsafe impl Send for StoredCallback {}
unsafe impl Sync for StoredCallback {}

/// DevTools host that forwards creation requests to a C callback.
///
/// The C side wires the new browser's handler table back into the
/// `glasspane_devtools_*` entry points, which reach the client kept here.
pub struct FfiDevToolsHost {
    callback: RwLock<Option<StoredCallback>>,
    client: RwLock<Option<Arc<DevToolsClient>>>,
}

impl FfiDevToolsHost {
    pub fn new() -> Self {
        Self {
            callback: RwLock::new(None),
            client: RwLock::new(None),
        }
    }

    pub fn set_callback(&self, callback: ShowDevToolsCallback, user_data: *mut c_void) {
        *self.callback.write() = Some(StoredCallback { callback, user_data });
    }

    pub fn clear_callback(&self) {
        *self.callback.write() = None;
    }

    /// Client of the most recently requested devtools window.
    pub fn client(&self) -> Option<Arc<DevToolsClient>> {
        self.client.read().clone()
    }
}

impl Default for FfiDevToolsHost {
    fn default() -> Self {
        Self::new()
    }
}

impl DevToolsHost for FfiDevToolsHost {
    fn show_dev_tools(&self, info: &DevToolsWindowInfo, client: Arc<DevToolsClient>) -> bool {
        let guard = self.callback.read();
        let Some(stored) = guard.as_ref() else {
            tracing::debug!("No devtools callback registered");
            return false;
        };
        let Ok(title) = CString::new(info.title.as_str()) else {
            return false;
        };

        *self.client.write() = Some(client);
        (stored.callback)(title.as_ptr(), stored.user_data) != 0
    }
}

/// Opaque handle exposed to C.
pub struct GlasspaneHandle {
    pub state: AppState,
    pub devtools_host: Arc<FfiDevToolsHost>,
}

impl GlasspaneHandle {
    /// Start with settings from disk, installing logging.
    pub fn new(window: WindowHandle) -> AppResult<Self> {
        let devtools_host = Arc::new(FfiDevToolsHost::new());
        let state = glasspane_lib::start(window, devtools_host.clone())?;
        Ok(Self {
            state,
            devtools_host,
        })
    }

    /// Start with caller-provided settings.
    pub fn with_settings(window: WindowHandle, settings: AppSettings) -> Self {
        let devtools_host = Arc::new(FfiDevToolsHost::new());
        let state = glasspane_lib::start_with_settings(window, settings, devtools_host.clone());
        Self {
            state,
            devtools_host,
        }
    }
}

impl Drop for GlasspaneHandle {
    fn drop(&mut self) {
        // Leave the host window as we found it.
        self.state.effects().clear();
        tracing::info!("GlasspaneHandle dropped");
    }
}
