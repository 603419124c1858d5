//! Version schemes and the total order the resolver consumes.
//!
//! Two schemes are supported: semantic versions (SemVer 2.0.0, with an
//! optional leading `v`) and plain sequence numbers. Each project sticks to
//! one scheme; comparing versions across schemes yields `false` for both
//! equality and strict order.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A version under one of the supported schemes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Version {
    /// SemVer 2.0.0, ordered by precedence. Build metadata is kept in the
    /// rendered string but excluded from ordering.
    Semantic(semver::Version),
    /// A decimal sequence number; greater means newer.
    Sequence(u64),
}

/// Scheme-specific parser handed to [`crate::parse_constraint`].
pub type VersionParser = fn(&str) -> Result<Version, VersionError>;

impl Version {
    /// Parse a semantic version, tolerating a leading `v`.
    pub fn parse_semantic(text: &str) -> Result<Self, VersionError> {
        let digits = text.strip_prefix('v').unwrap_or(text);
        semver::Version::parse(digits)
            .map(Version::Semantic)
            .map_err(|source| VersionError::Semantic {
                text: text.to_string(),
                source,
            })
    }

    /// Parse a sequence version from decimal integer text.
    pub fn parse_sequence(text: &str) -> Result<Self, VersionError> {
        text.parse::<u64>()
            .map(Version::Sequence)
            .map_err(|source| VersionError::Sequence {
                text: text.to_string(),
                source,
            })
    }

    /// Ordering between two versions of the same scheme; `None` across
    /// schemes.
    pub fn precedence(&self, other: &Version) -> Option<Ordering> {
        match (self, other) {
            (Version::Semantic(a), Version::Semantic(b)) => Some(a.cmp_precedence(b)),
            (Version::Sequence(a), Version::Sequence(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Order-equality under the scheme's precedence rules.
    pub fn equal(&self, other: &Version) -> bool {
        self.precedence(other) == Some(Ordering::Equal)
    }

    /// Strict order under the scheme's precedence rules.
    pub fn less(&self, other: &Version) -> bool {
        self.precedence(other) == Some(Ordering::Less)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Semantic(version) => version.fmt(f),
            Version::Sequence(number) => number.fmt(f),
        }
    }
}

impl std::str::FromStr for Version {
    type Err = VersionError;

    /// Parse a rendered version string, inferring the scheme: all-digit
    /// text reads as a sequence number, anything else as semantic.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            Self::parse_sequence(text)
        } else {
            Self::parse_semantic(text)
        }
    }
}

/// Error parsing a version string.
#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("invalid semantic version {text:?}: {source}")]
    Semantic {
        text: String,
        source: semver::Error,
    },

    #[error("invalid sequence version {text:?}: {source}")]
    Sequence {
        text: String,
        source: std::num::ParseIntError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_semantic() {
        let version = Version::parse_semantic("1.2.3").unwrap();
        assert_eq!(version.to_string(), "1.2.3");

        // a leading `v` is tolerated and not part of the identifier
        let version = Version::parse_semantic("v1.2.3").unwrap();
        assert_eq!(version.to_string(), "1.2.3");

        assert!(Version::parse_semantic("xxx").is_err());
        assert!(Version::parse_semantic("").is_err());
    }

    #[test]
    fn test_parse_sequence() {
        let version = Version::parse_sequence("42").unwrap();
        assert_eq!(version.to_string(), "42");

        assert!(Version::parse_sequence("1.2").is_err());
        assert!(Version::parse_sequence("abc").is_err());
    }

    #[test]
    fn test_semantic_ordering() {
        let old = Version::parse_semantic("1.2.3").unwrap();
        let new = Version::parse_semantic("1.10.0").unwrap();

        assert!(old.less(&new));
        assert!(!new.less(&old));
        assert!(!old.less(&old));
        assert!(old.equal(&old));
        assert!(!old.equal(&new));
    }

    #[test]
    fn test_semantic_prerelease_ordering() {
        let pre = Version::parse_semantic("1.0.0-alpha.1").unwrap();
        let release = Version::parse_semantic("1.0.0").unwrap();

        assert!(pre.less(&release));
        assert!(!release.less(&pre));
    }

    #[test]
    fn test_semantic_build_metadata_ignored_for_ordering() {
        let a = Version::parse_semantic("1.0.0+linux").unwrap();
        let b = Version::parse_semantic("1.0.0+darwin").unwrap();

        assert!(a.equal(&b));
        assert!(!a.less(&b));
        assert!(!b.less(&a));
    }

    #[test]
    fn test_sequence_ordering() {
        let two = Version::parse_sequence("2").unwrap();
        let ten = Version::parse_sequence("10").unwrap();

        assert!(two.less(&ten));
        assert!(!ten.less(&two));
        assert!(two.equal(&two));
    }

    #[test]
    fn test_from_str_infers_scheme() {
        assert_eq!(
            "7".parse::<Version>().unwrap(),
            Version::parse_sequence("7").unwrap()
        );
        assert_eq!(
            "1.2.3".parse::<Version>().unwrap(),
            Version::parse_semantic("1.2.3").unwrap()
        );
        assert!("xxx".parse::<Version>().is_err());
    }

    #[test]
    fn test_cross_scheme_comparisons_are_false() {
        let semantic = Version::parse_semantic("1.0.0").unwrap();
        let sequence = Version::parse_sequence("1").unwrap();

        assert!(!semantic.equal(&sequence));
        assert!(!sequence.equal(&semantic));
        assert!(!semantic.less(&sequence));
        assert!(!sequence.less(&semantic));
        assert_eq!(semantic.precedence(&sequence), None);
    }
}
