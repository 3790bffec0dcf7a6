//! OS version oracle.
//!
//! Queries the `(major, minor, build)` triple once and serves every
//! capability check from the cached value.

use std::fmt;
use std::sync::OnceLock;

/// Operating-system version triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

impl OsVersion {
    pub const fn new(major: u32, minor: u32, build: u32) -> Self {
        Self { major, minor, build }
    }

    /// Windows 10/11 report major 10 and tell releases apart by build.
    pub const fn windows(build: u32) -> Self {
        Self::new(10, 0, build)
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

/// Source of the native version query.
///
/// Returns `None` when the query itself is unavailable.
pub trait VersionSource: Send + Sync {
    fn query(&self) -> Option<OsVersion>;
}

/// Version source that always reports the same triple.
///
/// Used by tests and by hosts that already know the OS version.
#[derive(Debug, Clone, Copy)]
pub struct FixedVersion(pub OsVersion);

impl VersionSource for FixedVersion {
    fn query(&self) -> Option<OsVersion> {
        Some(self.0)
    }
}

/// Version source for platforms without a query; reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVersion;

impl VersionSource for NoVersion {
    fn query(&self) -> Option<OsVersion> {
        None
    }
}

/// Lazily populated, write-once cache of the OS version.
pub struct VersionOracle {
    source: Box<dyn VersionSource>,
    cached: OnceLock<OsVersion>,
}

impl VersionOracle {
    pub fn new(source: Box<dyn VersionSource>) -> Self {
        Self {
            source,
            cached: OnceLock::new(),
        }
    }

    /// The full triple; the first call performs the native query.
    ///
    /// A failed query caches `0.0.0` so every gated feature reads as
    /// unsupported.
    pub fn version(&self) -> OsVersion {
        *self.cached.get_or_init(|| match self.source.query() {
            Some(version) => {
                tracing::info!(%version, "OS version detected");
                version
            }
            None => {
                tracing::warn!("OS version query unavailable, version-gated features disabled");
                OsVersion::default()
            }
        })
    }

    /// Component by index: 0 = major, 1 = minor, 2 = build. Other indices are 0.
    pub fn component(&self, index: usize) -> u32 {
        let version = self.version();
        match index {
            0 => version.major,
            1 => version.minor,
            2 => version.build,
            _ => 0,
        }
    }

    /// Whether the native query has already run.
    pub fn is_resolved(&self) -> bool {
        self.cached.get().is_some()
    }
}

impl fmt::Debug for VersionOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionOracle")
            .field("cached", &self.cached.get())
            .finish_non_exhaustive()
    }
}
