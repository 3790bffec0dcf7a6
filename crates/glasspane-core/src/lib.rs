//! Glasspane Core Library
//!
//! Capability-graded window effects for an embedded-browser host window:
//! Mica, acrylic and blur-behind on whichever native mechanism the running
//! Windows version offers, plus immersive dark/light chrome.
//!
//! # Architecture
//!
//! - `version`: lazily cached OS version triple (`VersionOracle`)
//! - `capability`: pure predicates over the version (`Capabilities`)
//! - `color`: hex tint parsing (`TintColor`)
//! - `compositor`: the outbound native calls (`Compositor` trait)
//! - `effects`: strategy tiers and the single-slot `EffectEngine`
//! - `theme`: immersive dark-mode attribute (`ThemeController`)
//! - `context`: `EffectsContext`, the owner of all of the above
//! - `native`: Win32 implementations
//! - `models`, `paths`, `services`: settings and where they live
//! - `utils`: error types
//!
//! # Example
//!
//! ```
//! use glasspane_core::{
//!     EffectKind, EffectsContext, FixedVersion, OsVersion, RecordingCompositor, TintColor,
//!     WindowHandle,
//! };
//! use std::sync::Arc;
//!
//! let compositor = RecordingCompositor::new();
//! let mut ctx = EffectsContext::new(
//!     WindowHandle::from_raw(0x1000),
//!     Arc::new(compositor.clone()),
//!     Box::new(FixedVersion(OsVersion::windows(22621))),
//! );
//!
//! ctx.apply(EffectKind::Mica, TintColor::parse("#202020")).unwrap();
//! assert_eq!(ctx.current(), EffectKind::Mica);
//! ctx.clear();
//! assert_eq!(ctx.current(), EffectKind::None);
//! ```

pub mod capability;
pub mod color;
pub mod compositor;
pub mod context;
pub mod effects;
pub mod models;
pub mod native;
pub mod paths;
pub mod services;
pub mod theme;
pub mod utils;
pub mod version;

// Re-export commonly used types
pub use capability::Capabilities;
pub use color::{parse_color, TintColor};
pub use compositor::{
    AccentPolicy, AccentState, BackdropType, Compositor, Margins, NativeCall,
    RecordingCompositor, SharedCompositor, UnavailableCompositor, WindowAttribute, WindowHandle,
};
pub use context::EffectsContext;
pub use effects::{EffectEngine, EffectKind, EffectRequest, EffectSession, Strategy};
pub use models::{AppSettings, DevToolsSettings, LoggingSettings, ThemeMode};
pub use paths::{AppDataPathProvider, PathProvider, SharedPathProvider};
pub use services::SettingsManager;
pub use theme::{FixedTheme, SystemThemeSource, ThemeController, ThemeOutcome};
pub use utils::{AppError, AppResult, CommandError, EffectError};
pub use version::{FixedVersion, NoVersion, OsVersion, VersionOracle, VersionSource};
