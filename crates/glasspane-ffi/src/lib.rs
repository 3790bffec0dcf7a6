//! Glasspane FFI - C ABI interface for embedding hosts.
//!
//! This crate exposes the window effects, theme control and devtools
//! launcher to a native browser host written in C or C++.
//!
//! # Usage
//!
//! 1. Call `glasspane_init()` with the top-level window to create a handle
//! 2. Optionally register a devtools callback with `glasspane_set_devtools_callback()`
//! 3. Route scripting bridge calls through `glasspane_invoke()`
//! 4. Call `glasspane_shutdown()` to clean up
//!
//! # Error Handling
//!
//! Functions return `-1` on error.
//! Call `glasspane_last_error()` to get the error message.
//!
//! # Memory Management
//!
//! - Strings returned via out parameters must be freed with `glasspane_free_string()`
//! - The handle must be freed with `glasspane_shutdown()`

mod devtools;
mod effects;
mod error;
mod handle;

use error::{clear_last_error, get_last_error_ptr, set_last_error};
use glasspane_core::{AppDataPathProvider, AppSettings, WindowHandle};
use handle::GlasspaneHandle;
use std::ffi::{c_char, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};

pub use devtools::*;
pub use effects::*;
pub use handle::ShowDevToolsCallback;

pub(crate) fn string_to_cstr(s: &str) -> *mut c_char {
    CString::new(s)
        .map(|cs| cs.into_raw())
        .unwrap_or(std::ptr::null_mut())
}

unsafe fn parse_settings(settings_json: *const c_char) -> Result<AppSettings, String> {
    let json_str = CStr::from_ptr(settings_json)
        .to_str()
        .map_err(|_| "invalid UTF-8 in settings_json".to_string())?;
    serde_json::from_str(json_str).map_err(|e| format!("parse settings failed: {}", e))
}

/// Initialize Glasspane for the host window `hwnd`.
///
/// With NULL `settings_json` the settings file in the user's app data
/// directory is used; otherwise the JSON is taken as the full settings.
///
/// # Returns
/// - Valid handle pointer on success
/// - `NULL` on error (call `glasspane_last_error()` for details)
///
/// # Safety
/// The returned handle must be freed with `glasspane_shutdown()`.
#[no_mangle]
pub unsafe extern "C" fn glasspane_init(
    hwnd: isize,
    settings_json: *const c_char,
) -> *mut GlasspaneHandle {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let window = WindowHandle::from_raw(hwnd);
        let created = if settings_json.is_null() {
            GlasspaneHandle::new(window).map_err(|e| e.to_string())
        } else {
            parse_settings(settings_json).map(|settings| {
                let paths = AppDataPathProvider::new();
                if let Err(e) = glasspane_lib::logging::init_logging(&paths, &settings.logging) {
                    eprintln!("Glasspane: {}", e);
                }
                GlasspaneHandle::with_settings(window, settings)
            })
        };

        match created {
            Ok(handle) => {
                tracing::info!("Glasspane FFI initialized");
                Box::into_raw(Box::new(handle))
            }
            Err(e) => {
                set_last_error(format!("initialization failed: {}", e));
                std::ptr::null_mut()
            }
        }
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic during initialization");
        std::ptr::null_mut()
    })
}

/// Shutdown Glasspane, clear the active effect and free resources.
///
/// # Safety
/// - `handle` must be a valid pointer from `glasspane_init()`
/// - After calling this function, the handle is invalid
#[no_mangle]
pub unsafe extern "C" fn glasspane_shutdown(handle: *mut GlasspaneHandle) {
    clear_last_error();

    if handle.is_null() {
        return;
    }

    let result = catch_unwind(AssertUnwindSafe(|| {
        let _ = Box::from_raw(handle);
        tracing::info!("Glasspane FFI shutdown");
    }));

    if result.is_err() {
        set_last_error("panic during shutdown");
    }
}

/// Attach (or replace) the host window after `glasspane_init()`.
///
/// Clears any effect on the previous window and applies the configured
/// theme to the new one. Pass `0` to detach.
#[no_mangle]
pub unsafe extern "C" fn glasspane_set_window(handle: *mut GlasspaneHandle, hwnd: isize) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() {
            set_last_error("handle is null");
            return -1;
        }

        let handle = &*handle;
        handle.state.set_window(WindowHandle::from_raw(hwnd));
        0
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in glasspane_set_window");
        -1
    })
}

/// Get the last error message.
///
/// # Returns
/// - Pointer to error message (valid until next FFI call on this thread)
/// - `NULL` if no error
#[no_mangle]
pub extern "C" fn glasspane_last_error() -> *const c_char {
    get_last_error_ptr()
}

/// Free a string allocated by the library.
///
/// # Safety
/// - `s` must be a pointer returned by a glasspane function
/// - After calling this function, the pointer is invalid
#[no_mangle]
pub unsafe extern "C" fn glasspane_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

/// Get the library version.
///
/// # Returns
/// - Version string (must be freed with `glasspane_free_string()`)
#[no_mangle]
pub extern "C" fn glasspane_version() -> *mut c_char {
    string_to_cstr(env!("CARGO_PKG_VERSION"))
}
