//! Window effects engine.
//!
//! Three mutually exclusive native strategies exist, each gated on the OS
//! version: the 22H2+ segmented backdrop attribute, the pre-22H2 Windows 11
//! Mica attribute, and the legacy accent policy (Windows 7+). Strategy
//! selection walks an ordered tier table per effect family; the first tier
//! whose predicate holds wins.

use std::fmt;
use std::str::FromStr;

use crate::capability::Capabilities;
use crate::color::TintColor;
use crate::compositor::{
    AccentPolicy, AccentState, BackdropType, Compositor, Margins, WindowAttribute, WindowHandle,
};
use crate::utils::error::EffectError;

/// Accent tint used when the caller supplies none: `RGB(40, 40, 40)` as a `COLORREF`.
pub const DEFAULT_ACCENT_TINT: TintColor = TintColor::from_argb(0x0028_2828);

/// Effect requested by the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EffectKind {
    #[default]
    None,
    Mica,
    Acrylic,
    Unified,
    BlurBehind,
}

impl EffectKind {
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Mica,
        EffectKind::Acrylic,
        EffectKind::Unified,
        EffectKind::BlurBehind,
    ];

    /// Script-facing name; `None` is the empty string.
    pub const fn name(self) -> &'static str {
        match self {
            EffectKind::None => "",
            EffectKind::Mica => "mica",
            EffectKind::Acrylic => "acrylic",
            EffectKind::Unified => "unified",
            EffectKind::BlurBehind => "blurbehind",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub const fn is_none(self) -> bool {
        matches!(self, EffectKind::None)
    }

    const fn requirement(self) -> &'static str {
        match self {
            EffectKind::Mica => "mica is only available on Windows 11",
            _ => "acrylic and blur are only available on Windows 7 or later",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| EffectError::UnknownEffect(s.to_string()))
    }
}

/// An effect kind resolved into the flags the strategies care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectRequest {
    pub kind: EffectKind,
    /// Skip the segmented backdrop and always use the accent policy.
    pub unified: bool,
    /// Acrylic blur rather than plain blur on the accent path.
    pub acrylic: bool,
    pub tint: TintColor,
}

impl EffectRequest {
    pub fn new(kind: EffectKind, tint: TintColor) -> Result<Self, EffectError> {
        let (unified, acrylic) = match kind {
            EffectKind::None => return Err(EffectError::UnknownEffect(String::new())),
            EffectKind::Mica => (false, false),
            EffectKind::Acrylic => (false, true),
            EffectKind::Unified => (true, true),
            EffectKind::BlurBehind => (true, false),
        };

        Ok(Self {
            kind,
            unified,
            acrylic,
            tint,
        })
    }
}

/// Native mechanism used to realize an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `DWMWA_SYSTEMBACKDROP_TYPE` (Windows 11 22H2+).
    SegmentedBackdrop(BackdropType),
    /// `DWMWA_MICA_EFFECT` (Windows 11 before 22H2).
    MicaAttribute,
    /// `SetWindowCompositionAttribute` accent policy (Windows 7+).
    AccentPolicy,
}

impl Strategy {
    fn apply(
        self,
        compositor: &dyn Compositor,
        window: WindowHandle,
        request: &EffectRequest,
    ) -> Result<(), EffectError> {
        match self {
            Strategy::SegmentedBackdrop(backdrop) => {
                best_effort(compositor.extend_frame(window, Margins::EXTENDED))?;
                best_effort(compositor.set_window_attribute(
                    window,
                    WindowAttribute::SYSTEMBACKDROP_TYPE,
                    backdrop as u32,
                ))
            }
            Strategy::MicaAttribute => {
                best_effort(compositor.extend_frame(window, Margins::EXTENDED))?;
                best_effort(compositor.set_window_attribute(
                    window,
                    WindowAttribute::MICA_EFFECT,
                    BackdropType::MainWindow as u32,
                ))
            }
            Strategy::AccentPolicy => {
                let state = if request.acrylic {
                    AccentState::EnableAcrylicBlurBehind
                } else {
                    AccentState::EnableBlurBehind
                };
                let tint = if request.tint.is_zero() {
                    DEFAULT_ACCENT_TINT
                } else {
                    request.tint
                };
                best_effort(compositor.set_accent_policy(window, &AccentPolicy::new(state, tint)))
            }
        }
    }

    fn clear(self, compositor: &dyn Compositor, window: WindowHandle) {
        let results = match self {
            Strategy::SegmentedBackdrop(_) => [
                compositor.extend_frame(window, Margins::RESET),
                compositor.set_window_attribute(
                    window,
                    WindowAttribute::SYSTEMBACKDROP_TYPE,
                    BackdropType::Disable as u32,
                ),
            ],
            Strategy::MicaAttribute => [
                compositor.extend_frame(window, Margins::RESET),
                compositor.set_window_attribute(window, WindowAttribute::MICA_EFFECT, 0),
            ],
            Strategy::AccentPolicy => [
                compositor.set_accent_policy(window, &AccentPolicy::disabled()),
                Ok(()),
            ],
        };

        for err in results.into_iter().filter_map(Result::err) {
            tracing::warn!(strategy = ?self, error = %err, "Failed to clear window effect");
        }
    }
}

/// Missing entry points fail the operation; any other native failure is
/// logged and tolerated.
fn best_effort(result: Result<(), EffectError>) -> Result<(), EffectError> {
    match result {
        Err(err @ EffectError::NativeApiUnavailable(_)) => Err(err),
        Err(err) => {
            tracing::warn!(error = %err, "Native compositor call failed");
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

/// One capability tier: the strategy applies when the predicate holds.
struct Tier {
    applies: fn(&Capabilities, &EffectRequest) -> bool,
    strategy: Strategy,
}

fn has_segmented_backdrop(caps: &Capabilities, _: &EffectRequest) -> bool {
    caps.is_windows_11_22h2_plus()
}

fn has_mica_attribute(caps: &Capabilities, _: &EffectRequest) -> bool {
    caps.is_windows_11()
}

fn has_transient_backdrop(caps: &Capabilities, request: &EffectRequest) -> bool {
    !request.unified && caps.is_windows_11_22h2_plus()
}

fn has_legacy_accent(caps: &Capabilities, _: &EffectRequest) -> bool {
    caps.supports_legacy_accent()
}

const MICA_TIERS: &[Tier] = &[
    Tier {
        applies: has_segmented_backdrop,
        strategy: Strategy::SegmentedBackdrop(BackdropType::MainWindow),
    },
    Tier {
        applies: has_mica_attribute,
        strategy: Strategy::MicaAttribute,
    },
];

const BLUR_TIERS: &[Tier] = &[
    Tier {
        applies: has_transient_backdrop,
        strategy: Strategy::SegmentedBackdrop(BackdropType::TransientWindow),
    },
    Tier {
        applies: has_legacy_accent,
        strategy: Strategy::AccentPolicy,
    },
];

/// Pick the newest strategy the OS supports for `request`, if any.
pub fn select_strategy(caps: &Capabilities, request: &EffectRequest) -> Option<Strategy> {
    let tiers = match request.kind {
        EffectKind::None => return None,
        EffectKind::Mica => MICA_TIERS,
        EffectKind::Acrylic | EffectKind::Unified | EffectKind::BlurBehind => BLUR_TIERS,
    };

    tiers
        .iter()
        .find(|tier| (tier.applies)(caps, request))
        .map(|tier| tier.strategy)
}

/// Single-slot effect state for the one supported top-level window.
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectSession {
    target_window: WindowHandle,
    active_kind: EffectKind,
    unified: bool,
    strategy: Option<Strategy>,
}

impl EffectSession {
    pub fn new(target_window: WindowHandle) -> Self {
        Self {
            target_window,
            ..Self::default()
        }
    }

    pub fn target_window(&self) -> WindowHandle {
        self.target_window
    }

    pub fn active_kind(&self) -> EffectKind {
        self.active_kind
    }

    pub fn is_unified(&self) -> bool {
        self.unified
    }

    /// Strategy that produced the active effect, used to undo it.
    pub fn strategy(&self) -> Option<Strategy> {
        self.strategy
    }

    pub(crate) fn set_target_window(&mut self, window: WindowHandle) {
        self.target_window = window;
    }

    fn activate(&mut self, request: &EffectRequest, strategy: Strategy) {
        self.active_kind = request.kind;
        self.unified = request.unified;
        self.strategy = Some(strategy);
    }

    fn reset(&mut self) {
        self.active_kind = EffectKind::None;
        self.unified = false;
        self.strategy = None;
    }
}

/// Borrowed view over the session that performs apply/clear.
pub struct EffectEngine<'a> {
    session: &'a mut EffectSession,
    compositor: &'a dyn Compositor,
    capabilities: Capabilities,
}

impl<'a> EffectEngine<'a> {
    pub fn new(
        session: &'a mut EffectSession,
        compositor: &'a dyn Compositor,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            session,
            compositor,
            capabilities,
        }
    }

    /// Clear whatever is active, then apply `kind`.
    ///
    /// On failure the session is left at [`EffectKind::None`] (or untouched
    /// when there is no window to act on).
    pub fn apply(&mut self, kind: EffectKind, tint: TintColor) -> Result<Strategy, EffectError> {
        let request = EffectRequest::new(kind, tint)?;
        let window = self.session.target_window();
        if window.is_null() {
            return Err(EffectError::NoWindow);
        }

        self.clear();

        let strategy = select_strategy(&self.capabilities, &request)
            .ok_or(EffectError::UnsupportedPlatform(kind.requirement()))?;
        tracing::debug!(
            effect = %kind,
            ?strategy,
            version = %self.capabilities.version(),
            "Selected effect strategy"
        );

        strategy.apply(self.compositor, window, &request)?;
        self.session.activate(&request, strategy);

        tracing::info!(effect = %kind, tint = %tint, "Window effect applied");
        Ok(strategy)
    }

    /// Undo the active effect. Always succeeds; a no-op when nothing is active.
    pub fn clear(&mut self) {
        if let Some(strategy) = self.session.strategy() {
            strategy.clear(self.compositor, self.session.target_window());
            tracing::info!(effect = %self.session.active_kind(), "Window effect cleared");
        }
        self.session.reset();
    }

    pub fn current(&self) -> EffectKind {
        self.session.active_kind()
    }
}
