//! Window effect and theme API.

use crate::error::{clear_last_error, set_last_error};
use crate::handle::GlasspaneHandle;
use crate::string_to_cstr;
use glasspane_core::{ThemeMode, ThemeOutcome, WindowHandle};
use glasspane_lib::bridge;
use glasspane_lib::commands::{self, ApplyOptions};
use serde_json::Value;
use std::ffi::{c_char, CStr};
use std::panic::{catch_unwind, AssertUnwindSafe};

unsafe fn str_arg<'a>(ptr: *const c_char, name: &str) -> Option<&'a str> {
    match CStr::from_ptr(ptr).to_str() {
        Ok(s) => Some(s),
        Err(_) => {
            set_last_error(format!("invalid UTF-8 in {}", name));
            None
        }
    }
}

/// Dispatch a scripting bridge call.
///
/// `args_json` is a JSON array of arguments (or NULL for none).
///
/// # Returns
/// - `1` if the function was handled; `out_json` receives the JSON result
/// - `0` if the function is not a Glasspane function
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn glasspane_invoke(
    handle: *mut GlasspaneHandle,
    function: *const c_char,
    args_json: *const c_char,
    out_json: *mut *mut c_char,
) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() || function.is_null() || out_json.is_null() {
            set_last_error("handle, function or out_json is null");
            return -1;
        }

        let handle = &*handle;
        let Some(function) = str_arg(function, "function") else {
            return -1;
        };

        let args: Vec<Value> = if args_json.is_null() {
            Vec::new()
        } else {
            let Some(json_str) = str_arg(args_json, "args_json") else {
                return -1;
            };
            match serde_json::from_str(json_str) {
                Ok(args) => args,
                Err(e) => {
                    set_last_error(format!("parse args failed: {}", e));
                    return -1;
                }
            }
        };

        match bridge::invoke(&handle.state, function, &args) {
            Some(value) => {
                *out_json = string_to_cstr(&value.to_string());
                1
            }
            None => 0,
        }
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in glasspane_invoke");
        -1
    })
}

/// Get the active effect name ("" when none).
#[no_mangle]
pub unsafe extern "C" fn glasspane_get_effect(
    handle: *mut GlasspaneHandle,
    out_name: *mut *mut c_char,
) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() || out_name.is_null() {
            set_last_error("handle or out_name is null");
            return -1;
        }

        let handle = &*handle;
        *out_name = string_to_cstr(&commands::get_effect(&handle.state));
        0
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in glasspane_get_effect");
        -1
    })
}

/// Apply a named effect.
///
/// `options_json` is an optional object such as `{"color": "#20202080"}`.
///
/// # Returns
/// - `1` if the effect was applied
/// - `0` if it was not (unknown name, unsupported system)
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn glasspane_apply_effect(
    handle: *mut GlasspaneHandle,
    name: *const c_char,
    options_json: *const c_char,
) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() || name.is_null() {
            set_last_error("handle or name is null");
            return -1;
        }

        let handle = &*handle;
        let Some(name) = str_arg(name, "name") else {
            return -1;
        };

        let options = if options_json.is_null() {
            None
        } else {
            let Some(json_str) = str_arg(options_json, "options_json") else {
                return -1;
            };
            match serde_json::from_str::<Value>(json_str) {
                Ok(value) => Some(ApplyOptions::from_value(&value)),
                Err(e) => {
                    set_last_error(format!("parse options failed: {}", e));
                    return -1;
                }
            }
        };

        i32::from(commands::apply_effect(&handle.state, name, options.as_ref()))
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in glasspane_apply_effect");
        -1
    })
}

/// Clear the active effect.
#[no_mangle]
pub unsafe extern "C" fn glasspane_clear_effect(handle: *mut GlasspaneHandle) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() {
            set_last_error("handle is null");
            return -1;
        }

        let handle = &*handle;
        commands::clear_effect(&handle.state);
        0
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in glasspane_clear_effect");
        -1
    })
}

/// Force the title bar theme of `hwnd`.
///
/// `mode`: `0` light, `1` dark, `2` follow the system setting.
///
/// # Returns
/// - `1` if the window attribute was set
/// - `0` if nothing changed (unsupported system, light already in effect)
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn glasspane_force_theme(
    handle: *mut GlasspaneHandle,
    hwnd: isize,
    mode: i32,
) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() {
            set_last_error("handle is null");
            return -1;
        }
        let mode = match mode {
            0 => ThemeMode::Light,
            1 => ThemeMode::Dark,
            2 => ThemeMode::System,
            other => {
                set_last_error(format!("invalid theme mode: {}", other));
                return -1;
            }
        };

        let handle = &*handle;
        match commands::apply_theme(&handle.state, WindowHandle::from_raw(hwnd), mode) {
            ThemeOutcome::Applied { .. } => 1,
            ThemeOutcome::Unchanged | ThemeOutcome::Unsupported => 0,
        }
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in glasspane_force_theme");
        -1
    })
}
