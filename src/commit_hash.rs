use std::str::FromStr;

use derive_more::{AsRef, Deref, Display, Into};

/// A full-length Git commit hash.
///
/// This is 40 hex characters in a SHA-1 repository, or 64 in a SHA-256 one.
#[derive(
    serde::Serialize,
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    Into,
    AsRef,
    Deref,
)]
#[serde(transparent)]
pub struct CommitHash(String);

impl CommitHash {
    /// Check that `abbrev` is a non-empty prefix of this hash.
    pub fn is_abbreviated_by(&self, abbrev: &str) -> bool {
        !abbrev.is_empty() && self.0.starts_with(abbrev)
    }
}

impl FromStr for CommitHash {
    type Err = InvalidHash;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_full_hash(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(InvalidHash(s.to_owned()))
        }
    }
}

/// Is this a full-length hex object name?
pub fn is_full_hash(hash: &str) -> bool {
    matches!(hash.len(), 40 | 64) && hash.bytes().all(|byte| byte.is_ascii_hexdigit())
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("`{0}` is not a full-length Git object hash")]
pub struct InvalidHash(pub String);
