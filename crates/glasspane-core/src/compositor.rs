//! Native compositor abstraction.
//!
//! The effects engine never talks to the OS directly; it issues the three
//! outbound calls below through a [`Compositor`]. The Windows implementation
//! lives in [`crate::native`].

use std::sync::{Arc, Mutex};

use crate::color::TintColor;
use crate::utils::error::EffectError;

/// Non-owning reference to a platform window (an `HWND` on Windows).
///
/// The browser engine owns the window; a handle is only assumed valid for
/// the duration of a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowHandle(isize);

impl WindowHandle {
    pub const NULL: Self = Self(0);

    pub const fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> isize {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Frame margins, same layout as the Win32 `MARGINS` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Margins {
    /// Extends the frame over the whole client area ("sheet of glass").
    pub const EXTENDED: Self = Self::uniform(-1);
    pub const RESET: Self = Self::uniform(0);

    pub const fn uniform(value: i32) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }
}

/// DWM window attribute identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowAttribute(pub u32);

impl WindowAttribute {
    pub const USE_IMMERSIVE_DARK_MODE: Self = Self(20);
    /// Undocumented identifier used by Windows 10 1809 through 1909.
    pub const USE_IMMERSIVE_DARK_MODE_1809: Self = Self(Self::USE_IMMERSIVE_DARK_MODE.0 - 1);
    pub const SYSTEMBACKDROP_TYPE: Self = Self(38);
    /// Pre-22H2 Windows 11 Mica switch.
    pub const MICA_EFFECT: Self = Self(1029);
}

/// Values for [`WindowAttribute::SYSTEMBACKDROP_TYPE`].
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackdropType {
    Disable = 1,
    /// Mica.
    MainWindow = 2,
    /// Acrylic.
    TransientWindow = 3,
}

/// Accent states understood by `SetWindowCompositionAttribute`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccentState {
    Disabled = 0,
    EnableBlurBehind = 3,
    EnableAcrylicBlurBehind = 4,
}

/// `ACCENT_POLICY` as pushed through composition attribute `0x13`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccentPolicy {
    pub accent_state: u32,
    pub accent_flags: u32,
    pub gradient_color: u32,
    pub animation_id: u32,
}

impl AccentPolicy {
    /// Build the policy for `state`.
    ///
    /// Acrylic treats a zero alpha channel as "no effect", so the acrylic
    /// state always carries alpha of at least 1.
    pub fn new(state: AccentState, color: TintColor) -> Self {
        let acrylic = state == AccentState::EnableAcrylicBlurBehind;
        let color = if acrylic { color.with_min_alpha(1) } else { color };

        Self {
            accent_state: state as u32,
            accent_flags: if acrylic { 0 } else { 2 },
            gradient_color: color.argb(),
            animation_id: 0,
        }
    }

    pub fn disabled() -> Self {
        Self::new(AccentState::Disabled, TintColor::ZERO)
    }
}

/// Outbound native calls consumed by the effects engine and theme controller.
///
/// Each method is a single opaque call; implementations must not cache or
/// batch them.
pub trait Compositor: Send + Sync {
    /// Extend (or reset) the DWM frame into the client area.
    fn extend_frame(&self, window: WindowHandle, margins: Margins) -> Result<(), EffectError>;

    /// Set a DWM window attribute to a 32-bit value.
    fn set_window_attribute(
        &self,
        window: WindowHandle,
        attribute: WindowAttribute,
        value: u32,
    ) -> Result<(), EffectError>;

    /// Push an accent policy through the legacy composition-attribute setter.
    fn set_accent_policy(
        &self,
        window: WindowHandle,
        policy: &AccentPolicy,
    ) -> Result<(), EffectError>;
}

/// Shared reference to a Compositor implementation.
pub type SharedCompositor = Arc<dyn Compositor>;

/// Compositor for platforms without DWM; every call reports the API missing.
#[derive(Debug, Clone, Default)]
pub struct UnavailableCompositor;

impl Compositor for UnavailableCompositor {
    fn extend_frame(&self, _window: WindowHandle, _margins: Margins) -> Result<(), EffectError> {
        Err(EffectError::NativeApiUnavailable("DwmExtendFrameIntoClientArea"))
    }

    fn set_window_attribute(
        &self,
        _window: WindowHandle,
        _attribute: WindowAttribute,
        _value: u32,
    ) -> Result<(), EffectError> {
        Err(EffectError::NativeApiUnavailable("DwmSetWindowAttribute"))
    }

    fn set_accent_policy(
        &self,
        _window: WindowHandle,
        _policy: &AccentPolicy,
    ) -> Result<(), EffectError> {
        Err(EffectError::NativeApiUnavailable("SetWindowCompositionAttribute"))
    }
}

/// A native call observed by [`RecordingCompositor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeCall {
    ExtendFrame(WindowHandle, Margins),
    SetAttribute(WindowHandle, WindowAttribute, u32),
    SetAccent(WindowHandle, AccentPolicy),
}

/// Compositor that records every call instead of touching the OS.
///
/// Intended for tests and for dry runs on non-Windows hosts. Clones share
/// the same call log.
#[derive(Debug, Clone)]
pub struct RecordingCompositor {
    calls: Arc<Mutex<Vec<NativeCall>>>,
    accent_available: bool,
    failing: bool,
}

impl RecordingCompositor {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            accent_available: true,
            failing: false,
        }
    }

    /// Simulate a system where `SetWindowCompositionAttribute` cannot be resolved.
    pub fn without_accent_api() -> Self {
        Self {
            accent_available: false,
            ..Self::new()
        }
    }

    /// Record every call but report it as failed, like a DWM call on a
    /// window that went away.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<NativeCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Return and forget everything recorded so far.
    pub fn take_calls(&self) -> Vec<NativeCall> {
        self.calls
            .lock()
            .map(|mut c| std::mem::take(&mut *c))
            .unwrap_or_default()
    }

    fn record(&self, call: NativeCall) -> Result<(), EffectError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.failing {
            return Err(EffectError::Native(format!("{:?} failed", call)));
        }
        Ok(())
    }
}

impl Default for RecordingCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor for RecordingCompositor {
    fn extend_frame(&self, window: WindowHandle, margins: Margins) -> Result<(), EffectError> {
        self.record(NativeCall::ExtendFrame(window, margins))
    }

    fn set_window_attribute(
        &self,
        window: WindowHandle,
        attribute: WindowAttribute,
        value: u32,
    ) -> Result<(), EffectError> {
        self.record(NativeCall::SetAttribute(window, attribute, value))
    }

    fn set_accent_policy(
        &self,
        window: WindowHandle,
        policy: &AccentPolicy,
    ) -> Result<(), EffectError> {
        if !self.accent_available {
            return Err(EffectError::NativeApiUnavailable("SetWindowCompositionAttribute"));
        }
        self.record(NativeCall::SetAccent(window, *policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acrylic_policy_forces_alpha() {
        let policy = AccentPolicy::new(AccentState::EnableAcrylicBlurBehind, TintColor::ZERO);
        assert_eq!(policy.accent_state, 4);
        assert_eq!(policy.accent_flags, 0);
        assert_eq!(policy.gradient_color, 0x01000000);
    }

    #[test]
    fn test_blur_policy_keeps_color() {
        let policy =
            AccentPolicy::new(AccentState::EnableBlurBehind, TintColor::from_argb(0x00282828));
        assert_eq!(policy.accent_state, 3);
        assert_eq!(policy.accent_flags, 2);
        assert_eq!(policy.gradient_color, 0x00282828);
    }

    #[test]
    fn test_policy_layout_matches_native() {
        assert_eq!(std::mem::size_of::<AccentPolicy>(), 16);
        assert_eq!(std::mem::size_of::<Margins>(), 16);
    }

    #[test]
    fn test_legacy_dark_mode_identifier() {
        assert_eq!(WindowAttribute::USE_IMMERSIVE_DARK_MODE_1809, WindowAttribute(19));
    }

    #[test]
    fn test_recording_clones_share_log() {
        let recorder = RecordingCompositor::new();
        let shared: SharedCompositor = Arc::new(recorder.clone());
        let window = WindowHandle::from_raw(0x42);

        shared.extend_frame(window, Margins::EXTENDED).unwrap();
        assert_eq!(recorder.calls(), vec![NativeCall::ExtendFrame(window, Margins::EXTENDED)]);
        assert_eq!(recorder.take_calls().len(), 1);
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_unavailable_compositor() {
        let err = UnavailableCompositor
            .set_accent_policy(WindowHandle::NULL, &AccentPolicy::disabled())
            .unwrap_err();
        assert_eq!(err, EffectError::NativeApiUnavailable("SetWindowCompositionAttribute"));
    }

    #[test]
    fn test_failing_compositor_still_records() {
        let compositor = RecordingCompositor::failing();
        let window = WindowHandle::from_raw(1);

        assert!(matches!(
            compositor.extend_frame(window, Margins::EXTENDED),
            Err(EffectError::Native(_))
        ));
        assert_eq!(compositor.calls(), vec![NativeCall::ExtendFrame(window, Margins::EXTENDED)]);
    }
}
