//! Win32 backend.
//!
//! DWM calls link through the `windows` crate. `SetWindowCompositionAttribute`
//! and `RtlGetVersion` are not in the import libraries, so they are resolved
//! at runtime with `libloading` and cached for the process lifetime.

use std::ffi::c_void;
use std::sync::OnceLock;

use ::windows::core::w;
use ::windows::Win32::Foundation::{ERROR_SUCCESS, HWND};
use ::windows::Win32::Graphics::Dwm::{
    DwmExtendFrameIntoClientArea, DwmSetWindowAttribute, DWMWINDOWATTRIBUTE,
};
use ::windows::Win32::System::Registry::{RegGetValueW, HKEY_CURRENT_USER, RRF_RT_REG_DWORD};
use ::windows::Win32::UI::Controls::MARGINS;

use crate::compositor::{AccentPolicy, Compositor, Margins, WindowAttribute, WindowHandle};
use crate::theme::SystemThemeSource;
use crate::utils::error::EffectError;
use crate::version::{OsVersion, VersionSource};

/// `WCA_ACCENT_POLICY`.
const WCA_ACCENT_POLICY: u32 = 0x13;

#[repr(C)]
struct WindowCompositionAttribData {
    attrib: u32,
    data: *mut c_void,
    size: usize,
}

#[repr(C)]
struct OsVersionInfoW {
    size: u32,
    major: u32,
    minor: u32,
    build: u32,
    platform_id: u32,
    csd_version: [u16; 128],
}

type SetWindowCompositionAttribute =
    unsafe extern "system" fn(hwnd: HWND, data: *mut WindowCompositionAttribData) -> i32;
type RtlGetVersion = unsafe extern "system" fn(info: *mut OsVersionInfoW) -> i32;

/// A resolved export together with the library that keeps it alive.
struct Export<T> {
    _lib: libloading::Library,
    func: T,
}

static SET_WINDOW_COMPOSITION_ATTRIBUTE: OnceLock<Option<Export<SetWindowCompositionAttribute>>> =
    OnceLock::new();
static RTL_GET_VERSION: OnceLock<Option<Export<RtlGetVersion>>> = OnceLock::new();

fn load_export<T: Copy>(library: &str, symbol: &[u8]) -> Option<Export<T>> {
    let result = unsafe {
        libloading::Library::new(library).and_then(|lib| {
            let func: T = *lib.get::<T>(symbol)?;
            Ok(Export { _lib: lib, func })
        })
    };

    match result {
        Ok(export) => Some(export),
        Err(e) => {
            tracing::warn!(library, error = %e, "Failed to resolve native export");
            None
        }
    }
}

fn set_window_composition_attribute() -> Option<SetWindowCompositionAttribute> {
    SET_WINDOW_COMPOSITION_ATTRIBUTE
        .get_or_init(|| load_export("user32.dll", b"SetWindowCompositionAttribute\0"))
        .as_ref()
        .map(|export| export.func)
}

fn rtl_get_version() -> Option<RtlGetVersion> {
    RTL_GET_VERSION
        .get_or_init(|| load_export("ntdll.dll", b"RtlGetVersion\0"))
        .as_ref()
        .map(|export| export.func)
}

fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.as_raw() as *mut c_void)
}

/// Compositor backed by DWM and user32.
#[derive(Debug, Clone, Copy, Default)]
pub struct DwmCompositor;

impl Compositor for DwmCompositor {
    fn extend_frame(&self, window: WindowHandle, margins: Margins) -> Result<(), EffectError> {
        let margins = MARGINS {
            cxLeftWidth: margins.left,
            cxRightWidth: margins.right,
            cyTopHeight: margins.top,
            cyBottomHeight: margins.bottom,
        };

        unsafe { DwmExtendFrameIntoClientArea(hwnd(window), &margins) }
            .map_err(|e| EffectError::Native(format!("DwmExtendFrameIntoClientArea: {}", e)))
    }

    fn set_window_attribute(
        &self,
        window: WindowHandle,
        attribute: WindowAttribute,
        value: u32,
    ) -> Result<(), EffectError> {
        unsafe {
            DwmSetWindowAttribute(
                hwnd(window),
                DWMWINDOWATTRIBUTE(attribute.0 as i32),
                &value as *const u32 as *const c_void,
                std::mem::size_of::<u32>() as u32,
            )
        }
        .map_err(|e| EffectError::Native(format!("DwmSetWindowAttribute({}): {}", attribute.0, e)))
    }

    fn set_accent_policy(
        &self,
        window: WindowHandle,
        policy: &AccentPolicy,
    ) -> Result<(), EffectError> {
        let set_attribute = set_window_composition_attribute()
            .ok_or(EffectError::NativeApiUnavailable("SetWindowCompositionAttribute"))?;

        let mut policy = *policy;
        let mut data = WindowCompositionAttribData {
            attrib: WCA_ACCENT_POLICY,
            data: &mut policy as *mut AccentPolicy as *mut c_void,
            size: std::mem::size_of::<AccentPolicy>(),
        };

        if unsafe { set_attribute(hwnd(window), &mut data) } == 0 {
            return Err(EffectError::Native("SetWindowCompositionAttribute returned FALSE".into()));
        }
        Ok(())
    }
}

/// Version query through `RtlGetVersion`, which is not subject to the
/// manifest-based lies of `GetVersionEx`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NtVersionSource;

impl VersionSource for NtVersionSource {
    fn query(&self) -> Option<OsVersion> {
        let rtl_get_version = rtl_get_version()?;

        let mut info = OsVersionInfoW {
            size: std::mem::size_of::<OsVersionInfoW>() as u32,
            major: 0,
            minor: 0,
            build: 0,
            platform_id: 0,
            csd_version: [0; 128],
        };

        // STATUS_SUCCESS
        if unsafe { rtl_get_version(&mut info) } != 0 {
            return None;
        }
        Some(OsVersion::new(info.major, info.minor, info.build))
    }
}

/// Reads `AppsUseLightTheme` from the current user's personalization key.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryThemeSource;

impl SystemThemeSource for RegistryThemeSource {
    fn apps_use_light_theme(&self) -> bool {
        let mut value: u32 = 0;
        let mut size = std::mem::size_of::<u32>() as u32;

        let status = unsafe {
            RegGetValueW(
                HKEY_CURRENT_USER,
                w!("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize"),
                w!("AppsUseLightTheme"),
                RRF_RT_REG_DWORD,
                None,
                Some(&mut value as *mut u32 as *mut c_void),
                Some(&mut size),
            )
        };

        // Missing key or value: assume light.
        if status != ERROR_SUCCESS {
            return true;
        }
        value == 1
    }
}
