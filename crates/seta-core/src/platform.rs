//! Canonical platform labels.
//!
//! The job catalog reports platforms with short build-farm names
//! (`osx10.6`, `win7`) while the coverage table is keyed by the long
//! labels used everywhere else (`osx-10-6`, `windows7-32`).

use std::fmt;

use serde::{Deserialize, Serialize};

const PLATFORM_ALIASES: &[(&str, &str)] = &[
    ("osx10.6", "osx-10-6"),
    ("osx10.8", "osx-10-8"),
    ("winxp", "windowsxp"),
    ("win7", "windows7-32"),
    ("win8", "windows8-64"),
];

/// Rows of the coverage table, in display order.
pub const ACTIVE_PLATFORMS: [&str; 15] = [
    "linux32 opt",
    "linux32 debug",
    "linux64 opt",
    "linux64 asan",
    "linux64 debug",
    "osx-10-6 opt",
    "osx-10-6 debug",
    "osx-10-8 opt",
    "osx-10-8 debug",
    "windowsxp opt",
    "windowsxp debug",
    "windows7-32 opt",
    "windows7-32 debug",
    "windows8-64 opt",
    "windows8-64 debug",
];

/// Rewrite a raw platform name to its canonical label.
///
/// Each alias replaces its first occurrence, in table order. Unknown
/// platforms pass through unchanged.
pub fn normalize_platform(raw: &str) -> String {
    PLATFORM_ALIASES
        .iter()
        .fold(raw.to_string(), |acc, (from, to)| acc.replacen(from, to, 1))
}

/// `"<platform> <buildtype>"` join key between the active and optional
/// job indices.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformKey(String);

impl PlatformKey {
    /// Build a key from a raw platform and build type.
    pub fn new(raw_platform: &str, build_type: &str) -> Self {
        Self(format!("{} {}", normalize_platform(raw_platform), build_type))
    }

    /// Wrap an already canonical key such as `"linux64 opt"`.
    pub fn from_canonical(key: &str) -> Self {
        Self(key.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed table rows as keys.
pub fn active_platform_keys() -> Vec<PlatformKey> {
    ACTIVE_PLATFORMS
        .iter()
        .map(|key| PlatformKey::from_canonical(key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_map_to_canonical_labels() {
        assert_eq!(normalize_platform("osx10.6"), "osx-10-6");
        assert_eq!(normalize_platform("osx10.8"), "osx-10-8");
        assert_eq!(normalize_platform("winxp"), "windowsxp");
        assert_eq!(normalize_platform("win7"), "windows7-32");
        assert_eq!(normalize_platform("win8"), "windows8-64");
    }

    #[test]
    fn unknown_platforms_pass_through() {
        assert_eq!(normalize_platform("linux64"), "linux64");
        assert_eq!(normalize_platform("android-4-0"), "android-4-0");
        assert_eq!(normalize_platform(""), "");
    }

    #[test]
    fn canonical_labels_are_fixed_points() {
        for (_, canonical) in PLATFORM_ALIASES {
            assert_eq!(normalize_platform(canonical), *canonical);
        }
    }

    #[test]
    fn key_joins_normalized_platform_and_build_type() {
        let key = PlatformKey::new("win7", "debug");
        assert_eq!(key.as_str(), "windows7-32 debug");
        assert_eq!(key.to_string(), "windows7-32 debug");
    }

    #[test]
    fn fixed_rows_are_unique() {
        let keys = active_platform_keys();
        let unique: std::collections::BTreeSet<_> = keys.iter().collect();
        assert_eq!(keys.len(), 15);
        assert_eq!(unique.len(), 15);
    }
}
