//! Win32 implementation of [`ShellOps`].

use std::ffi::c_void;

use glasspane_core::WindowHandle;
use windows::core::{w, HSTRING, PCWSTR};
use windows::Win32::Foundation::{HWND, LPARAM, RECT, WPARAM};
use windows::Win32::System::Threading::GetCurrentProcessId;
use windows::Win32::UI::Shell::ShellExecuteW;
use windows::Win32::UI::WindowsAndMessaging::{
    GetClientRect, GetWindowThreadProcessId, IsIconic, SendMessageW, SetForegroundWindow,
    SetWindowPos, ShowWindow, ICON_BIG, ICON_SMALL, SWP_FRAMECHANGED, SWP_NOMOVE, SW_RESTORE,
    SW_SHOWNORMAL, WM_GETICON, WM_SETICON,
};

use super::shell::{ShellOps, ShowCommand};

fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.as_raw() as *mut c_void)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Shell;

impl ShellOps for Win32Shell {
    fn open_url(&self, url: &str) -> bool {
        let result = unsafe {
            ShellExecuteW(
                None,
                w!("open"),
                &HSTRING::from(url),
                PCWSTR::null(),
                PCWSTR::null(),
                SW_SHOWNORMAL,
            )
        };
        // Values above 32 mean success.
        result.0 as isize > 32
    }

    fn owned_by_current_process(&self, window: WindowHandle) -> bool {
        if window.is_null() {
            return false;
        }
        let mut process_id = 0u32;
        unsafe { GetWindowThreadProcessId(hwnd(window), Some(&mut process_id)) };
        process_id != 0 && process_id == unsafe { GetCurrentProcessId() }
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        unsafe { IsIconic(hwnd(window)) }.as_bool()
    }

    fn show(&self, window: WindowHandle, command: ShowCommand) {
        let command = match command {
            ShowCommand::Restore => SW_RESTORE,
            ShowCommand::Normal => SW_SHOWNORMAL,
        };
        let _ = unsafe { ShowWindow(hwnd(window), command) };
    }

    fn set_foreground(&self, window: WindowHandle) {
        let _ = unsafe { SetForegroundWindow(hwnd(window)) };
    }

    fn copy_icon(&self, from: WindowHandle, to: WindowHandle) {
        unsafe {
            let icon = SendMessageW(
                hwnd(from),
                WM_GETICON,
                Some(WPARAM(ICON_BIG as usize)),
                Some(LPARAM(0)),
            );
            for size in [ICON_SMALL, ICON_BIG] {
                SendMessageW(
                    hwnd(to),
                    WM_SETICON,
                    Some(WPARAM(size as usize)),
                    Some(LPARAM(icon.0)),
                );
            }
        }
    }

    fn refresh_frame(&self, window: WindowHandle) {
        let mut rect = RECT::default();
        unsafe {
            if GetClientRect(hwnd(window), &mut rect).is_err() {
                return;
            }
            if let Err(e) = SetWindowPos(
                hwnd(window),
                None,
                0,
                0,
                rect.right - 5,
                rect.bottom,
                SWP_NOMOVE | SWP_FRAMECHANGED,
            ) {
                tracing::debug!(error = %e, "SetWindowPos failed while refreshing frame");
            }
        }
    }
}
