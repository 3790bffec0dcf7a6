//! DevTools API.
//!
//! The host creates the embedded devtools browser from the callback
//! registered with [`glasspane_set_devtools_callback`], then forwards the new
//! browser's life-span and download events to the `glasspane_devtools_*`
//! functions.

use crate::error::{clear_last_error, set_last_error};
use crate::handle::{GlasspaneHandle, ShowDevToolsCallback};
use crate::string_to_cstr;
use glasspane_core::WindowHandle;
use glasspane_lib::commands;
use glasspane_lib::devtools::{ClientHandlers, DevToolsOutcome};
use std::ffi::{c_char, c_void, CStr};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Register the callback that creates the devtools window.
///
/// Pass a NULL callback to unregister.
///
/// # Safety
/// - `user_data` must remain valid until the callback is unregistered
/// - The callback may be called from any thread
#[no_mangle]
pub unsafe extern "C" fn glasspane_set_devtools_callback(
    handle: *mut GlasspaneHandle,
    callback: Option<ShowDevToolsCallback>,
    user_data: *mut c_void,
) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() {
            set_last_error("handle is null");
            return -1;
        }

        let handle = &*handle;
        match callback {
            Some(cb) => {
                handle.devtools_host.set_callback(cb, user_data);
                tracing::debug!("DevTools callback registered");
            }
            None => {
                handle.devtools_host.clear_callback();
                tracing::debug!("DevTools callback unregistered");
            }
        }
        0
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in glasspane_set_devtools_callback");
        -1
    })
}

/// Open devtools in the system browser (`remote != 0`) or embedded.
///
/// # Returns
/// - `1` if devtools were opened or raised
/// - `0` if unavailable (see `glasspane_last_error()` for the reason)
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn glasspane_open_devtools(handle: *mut GlasspaneHandle, remote: i32) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() {
            set_last_error("handle is null");
            return -1;
        }

        let handle = &*handle;
        match commands::open_devtools(&handle.state, remote != 0) {
            DevToolsOutcome::Unavailable(reason) => {
                set_last_error(reason);
                0
            }
            _ => 1,
        }
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in glasspane_open_devtools");
        -1
    })
}

/// Notify that the devtools window `hwnd` was created.
#[no_mangle]
pub unsafe extern "C" fn glasspane_devtools_after_created(
    handle: *mut GlasspaneHandle,
    hwnd: isize,
) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() {
            set_last_error("handle is null");
            return -1;
        }

        let handle = &*handle;
        let Some(handler) = handle
            .devtools_host
            .client()
            .and_then(|client| client.life_span_handler())
        else {
            set_last_error("no devtools window was requested");
            return -1;
        };
        handler.on_after_created(WindowHandle::from_raw(hwnd));
        0
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in glasspane_devtools_after_created");
        -1
    })
}

/// Notify that the devtools window is closing.
#[no_mangle]
pub unsafe extern "C" fn glasspane_devtools_before_close(handle: *mut GlasspaneHandle) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() {
            set_last_error("handle is null");
            return -1;
        }

        let handle = &*handle;
        if let Some(handler) = handle
            .devtools_host
            .client()
            .and_then(|client| client.life_span_handler())
        {
            handler.on_before_close();
        }
        0
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in glasspane_devtools_before_close");
        -1
    })
}

/// Destination for a download started from devtools.
///
/// `suggested_name` may be NULL. `out_path` must be freed with
/// `glasspane_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn glasspane_devtools_download_path(
    handle: *mut GlasspaneHandle,
    suggested_name: *const c_char,
    out_path: *mut *mut c_char,
) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() || out_path.is_null() {
            set_last_error("handle or out_path is null");
            return -1;
        }

        let handle = &*handle;
        let suggested = if suggested_name.is_null() {
            None
        } else {
            match CStr::from_ptr(suggested_name).to_str() {
                Ok(s) => Some(s),
                Err(_) => {
                    set_last_error("invalid UTF-8 in suggested_name");
                    return -1;
                }
            }
        };

        let client = handle
            .devtools_host
            .client()
            .unwrap_or_else(|| handle.state.devtools.client());
        let Some(downloads) = client.download_handler() else {
            set_last_error("devtools client has no download handler");
            return -1;
        };

        let path = downloads.on_before_download(suggested);
        *out_path = string_to_cstr(&path.to_string_lossy());
        0
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in glasspane_devtools_download_path");
        -1
    })
}
