//! Capability predicates derived from the OS version.

use crate::version::OsVersion;

const BUILD_WIN10_1809: u32 = 17763;
const BUILD_WIN10_2004: u32 = 19041;
const BUILD_WIN11: u32 = 22000;
const BUILD_WIN11_22H2: u32 = 22621;

/// Pure, copyable view of what the running OS supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    version: OsVersion,
}

impl Capabilities {
    pub const fn new(version: OsVersion) -> Self {
        Self { version }
    }

    pub const fn version(&self) -> OsVersion {
        self.version
    }

    /// Windows 7 or later: accent-policy blur through the composition attribute.
    pub const fn supports_legacy_accent(&self) -> bool {
        let OsVersion { major, minor, .. } = self.version;
        major > 6 || (major == 6 && minor >= 1)
    }

    /// Windows 10 2004 up to (not including) Windows 11.
    pub const fn supports_dark_mode_2004(&self) -> bool {
        self.version.build >= BUILD_WIN10_2004 && self.version.build < BUILD_WIN11
    }

    /// Windows 10 1809 up to (not including) Windows 11.
    pub const fn supports_dark_mode_1809(&self) -> bool {
        self.version.build >= BUILD_WIN10_1809 && self.version.build < BUILD_WIN11
    }

    pub const fn is_windows_11(&self) -> bool {
        self.version.build >= BUILD_WIN11
    }

    /// Windows 11 22H2+, where the segmented backdrop attribute exists.
    pub const fn is_windows_11_22h2_plus(&self) -> bool {
        self.version.build >= BUILD_WIN11_22H2
    }
}

impl From<OsVersion> for Capabilities {
    fn from(version: OsVersion) -> Self {
        Self::new(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(major: u32, minor: u32, build: u32) -> Capabilities {
        Capabilities::new(OsVersion::new(major, minor, build))
    }

    #[test]
    fn test_legacy_accent_floor() {
        assert!(!caps(6, 0, 6002).supports_legacy_accent()); // Vista
        assert!(caps(6, 1, 7601).supports_legacy_accent()); // 7
        assert!(caps(6, 3, 9600).supports_legacy_accent()); // 8.1
        assert!(caps(10, 0, 19045).supports_legacy_accent());
        assert!(!caps(0, 0, 0).supports_legacy_accent());
    }

    #[test]
    fn test_dark_mode_windows() {
        assert!(!caps(10, 0, 17134).supports_dark_mode_1809());
        assert!(caps(10, 0, 17763).supports_dark_mode_1809());
        assert!(!caps(10, 0, 17763).supports_dark_mode_2004());
        assert!(caps(10, 0, 19041).supports_dark_mode_2004());
        assert!(caps(10, 0, 19045).supports_dark_mode_1809());
        assert!(!caps(10, 0, 22000).supports_dark_mode_2004());
        assert!(!caps(10, 0, 22000).supports_dark_mode_1809());
    }

    #[test]
    fn test_windows_11_tiers() {
        assert!(!caps(10, 0, 19045).is_windows_11());
        assert!(caps(10, 0, 22000).is_windows_11());
        assert!(!caps(10, 0, 22001).is_windows_11_22h2_plus());
        assert!(caps(10, 0, 22621).is_windows_11_22h2_plus());
        assert!(caps(10, 0, 26100).is_windows_11_22h2_plus());
    }
}
