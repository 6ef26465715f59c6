use std::fmt::Display;
use std::str::FromStr;

/// The signature status of a commit, from `git log --format=%G?`.
#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerificationFlag {
    /// `N`: no signature.
    #[default]
    Unsigned,
    /// `G`: a good, valid signature.
    Good,
    /// `B`: a bad signature.
    Bad,
    /// `E`: the signature can't be checked, usually because the key is missing.
    NoPublicKey,
    /// `R`: a good signature made by a revoked key.
    Revoked,
    /// `X`: a good signature that has expired.
    Expired,
    /// `Y`: a good signature made by an expired key.
    ExpiredKey,
    /// `U`: a good signature with unknown validity.
    UnknownValidity,
}

impl VerificationFlag {
    pub fn is_signed(&self) -> bool {
        !matches!(self, Self::Unsigned)
    }
}

impl FromStr for VerificationFlag {
    type Err = UnknownVerificationFlag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Self::Unsigned),
            "G" => Ok(Self::Good),
            "B" => Ok(Self::Bad),
            "E" => Ok(Self::NoPublicKey),
            "R" => Ok(Self::Revoked),
            "X" => Ok(Self::Expired),
            "Y" => Ok(Self::ExpiredKey),
            "U" => Ok(Self::UnknownValidity),
            _ => Err(UnknownVerificationFlag(s.to_owned())),
        }
    }
}

impl Display for VerificationFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationFlag::Unsigned => write!(f, "unsigned"),
            VerificationFlag::Good => write!(f, "good signature"),
            VerificationFlag::Bad => write!(f, "bad signature"),
            VerificationFlag::NoPublicKey => write!(f, "no public key"),
            VerificationFlag::Revoked => write!(f, "revoked key"),
            VerificationFlag::Expired => write!(f, "expired signature"),
            VerificationFlag::ExpiredKey => write!(f, "expired key"),
            VerificationFlag::UnknownValidity => write!(f, "unknown validity"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown signature verification flag `{0}`")]
pub struct UnknownVerificationFlag(pub String);
