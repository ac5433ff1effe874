//! Version specifiers and version ordering.
//!
//! Registry versions are dot-separated numeric components with an optional
//! leading `v` and an optional semver-style pre-release suffix:
//!
//! ```
//! use std::cmp::Ordering;
//! use rainmeas_registry::version::compare_versions;
//!
//! assert_eq!(compare_versions("1.10.0", "1.9.0"), Ordering::Greater);
//! assert_eq!(compare_versions("1.2", "1.2.0"), Ordering::Less);
//! assert_eq!(compare_versions("2.0.0-beta.1", "2.0.0"), Ordering::Less);
//! ```
//!
//! Components compare numerically, so `1.10.0` ranks above `1.9.0`. When
//! the common components are equal the version with more components is
//! greater. A pre-release ranks below the same release, pre-releases compare
//! with semver precedence, and build metadata (`+...`) is ignored. Strings
//! that are not versions at all rank below every real version and compare
//! lexicographically among themselves. Remaining ties are broken on the raw
//! string so the ordering is total.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sentinel requesting the newest version.
pub const LATEST: &str = "latest";

/// Alternate spelling of [`LATEST`] accepted in manifests.
pub const LATEST_WILDCARD: &str = "*";

/// A requested version: either "whatever is newest" or an exact string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum VersionSpec {
    #[default]
    Latest,
    Exact(String),
}

impl VersionSpec {
    /// Parse a user or manifest supplied specifier.
    ///
    /// Empty strings, `latest` and `*` all mean [`VersionSpec::Latest`].
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        if spec.is_empty() || spec == LATEST || spec == LATEST_WILDCARD {
            Self::Latest
        } else {
            Self::Exact(spec.to_string())
        }
    }

    pub fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }
}

impl FromStr for VersionSpec {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str(LATEST),
            Self::Exact(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Key {
    Opaque,
    Numeric {
        core: Vec<u64>,
        pre: Option<semver::Prerelease>,
    },
}

fn key(version: &str) -> Key {
    let trimmed = version.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    let without_build = trimmed.split_once('+').map_or(trimmed, |(v, _)| v);
    let (core_str, pre_str) = match without_build.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (without_build, None),
    };

    let core: Option<Vec<u64>> = core_str
        .split('.')
        .map(|part| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                None
            } else {
                part.parse::<u64>().ok()
            }
        })
        .collect();

    let Some(core) = core else {
        return Key::Opaque;
    };

    match pre_str {
        None => Key::Numeric { core, pre: None },
        Some(pre) => match semver::Prerelease::new(pre) {
            Ok(pre) if !pre.is_empty() => Key::Numeric {
                core,
                pre: Some(pre),
            },
            _ => Key::Opaque,
        },
    }
}

fn compare_pre(a: Option<&semver::Prerelease>, b: Option<&semver::Prerelease>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

/// Compare two version strings under the registry ordering.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let ordering = match (key(a), key(b)) {
        (
            Key::Numeric {
                core: core_a,
                pre: pre_a,
            },
            Key::Numeric {
                core: core_b,
                pre: pre_b,
            },
        ) => core_a
            .cmp(&core_b)
            .then_with(|| compare_pre(pre_a.as_ref(), pre_b.as_ref())),
        (Key::Numeric { .. }, Key::Opaque) => Ordering::Greater,
        (Key::Opaque, Key::Numeric { .. }) => Ordering::Less,
        (Key::Opaque, Key::Opaque) => Ordering::Equal,
    };
    ordering.then_with(|| a.cmp(b))
}

/// Whether `version` looks like a real version rather than an arbitrary label.
pub fn is_valid_version(version: &str) -> bool {
    matches!(key(version), Key::Numeric { .. })
}

/// Sort versions ascending.
pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(a, b));
}

/// The greatest version in `versions`, if any.
pub fn max_version<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions.into_iter().max_by(|a, b| compare_versions(a, b))
}
