//! The structured `git log` format used to fetch commit metadata.
//!
//! Every field is printed with a fixed placeholder and the fields are joined with NUL bytes,
//! which can't appear in commit metadata. The subject and body are deliberately absent: they're
//! free text and are fetched with their own queries.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::commit_hash::is_full_hash;
use crate::commit_hash::CommitHash;
use crate::person::Person;
use crate::verification_flag::VerificationFlag;

/// Separates fields in the structured payload.
pub const FIELD_SEPARATOR: char = '\0';

/// A named field in the structured payload.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub placeholder: &'static str,
}

const fn field(name: &'static str, placeholder: &'static str) -> Field {
    Field { name, placeholder }
}

/// The fields of the structured payload, in the order `git` prints them.
pub const FIELDS: &[Field] = &[
    field("commit", "%H"),
    field("abbreviated_commit", "%h"),
    field("tree", "%T"),
    field("abbreviated_tree", "%t"),
    field("parent", "%P"),
    field("abbreviated_parent", "%p"),
    field("refs", "%D"),
    field("encoding", "%e"),
    field("sanitized_subject_line", "%f"),
    field("commit_notes", "%N"),
    field("verification_flag", "%G?"),
    field("signer", "%GS"),
    field("signer_key", "%GK"),
    field("author_name", "%aN"),
    field("author_email", "%aE"),
    field("author_date", "%aD"),
    field("committer_name", "%cN"),
    field("committer_email", "%cE"),
    field("committer_date", "%cD"),
];

/// The `--pretty` argument that makes `git log` print the structured payload.
pub fn pretty_arg() -> String {
    format!(
        "--pretty=format:{}",
        FIELDS.iter().map(|field| field.placeholder).join("%x00")
    )
}

/// Everything about a commit except its subject and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMetadata {
    pub commit_hash: CommitHash,
    pub abbreviated_commit_hash: String,
    pub tree_hash: String,
    pub abbreviated_tree_hash: String,
    pub parent_hashes: Vec<CommitHash>,
    pub abbreviated_parent_hashes: Vec<String>,
    pub refs: String,
    pub encoding: String,
    pub sanitized_subject_line: String,
    pub commit_notes: String,
    pub verification_flag: VerificationFlag,
    pub signer: String,
    pub signer_key: String,
    pub author: Person,
    pub committer: Person,
}

impl CommitMetadata {
    /// Parse the output of `git log -1` run with [`pretty_arg`].
    pub fn parse(payload: &str) -> Result<Self, PayloadError> {
        let values = payload.split(FIELD_SEPARATOR).collect::<Vec<_>>();
        if values.len() != FIELDS.len() {
            return Err(PayloadError::FieldCount {
                expected: FIELDS.len(),
                found: values.len(),
            });
        }
        let fields = Fields(FIELDS.iter().map(|field| field.name).zip(values).collect());

        let commit_hash = fields.hash("commit")?;
        let abbreviated_commit_hash = fields.abbreviation("abbreviated_commit", &commit_hash)?;

        let tree_hash = fields.get("tree")?;
        if !is_full_hash(tree_hash) {
            return Err(PayloadError::InvalidHash {
                field: "tree",
                value: tree_hash.to_owned(),
            });
        }
        let abbreviated_tree_hash = fields.get("abbreviated_tree")?;
        if abbreviated_tree_hash.is_empty() || !tree_hash.starts_with(abbreviated_tree_hash) {
            return Err(PayloadError::NotAnAbbreviation {
                field: "abbreviated_tree",
                abbreviation: abbreviated_tree_hash.to_owned(),
                hash: tree_hash.to_owned(),
            });
        }

        let parent_hashes = fields
            .get("parent")?
            .split_whitespace()
            .map(|parent| {
                parent.parse::<CommitHash>().map_err(|_| PayloadError::InvalidHash {
                    field: "parent",
                    value: parent.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let abbreviated_parent_hashes = fields
            .get("abbreviated_parent")?
            .split_whitespace()
            .map(ToOwned::to_owned)
            .collect::<Vec<_>>();
        if abbreviated_parent_hashes.len() != parent_hashes.len() {
            return Err(PayloadError::ParentCount {
                parents: parent_hashes.len(),
                abbreviated: abbreviated_parent_hashes.len(),
            });
        }
        for (parent, abbreviation) in parent_hashes.iter().zip(&abbreviated_parent_hashes) {
            if !parent.is_abbreviated_by(abbreviation) {
                return Err(PayloadError::NotAnAbbreviation {
                    field: "abbreviated_parent",
                    abbreviation: abbreviation.clone(),
                    hash: parent.to_string(),
                });
            }
        }

        let verification_flag = fields.get("verification_flag")?;
        let verification_flag = verification_flag
            .parse::<VerificationFlag>()
            .map_err(|_| PayloadError::UnknownVerificationFlag(verification_flag.to_owned()))?;

        Ok(Self {
            commit_hash,
            abbreviated_commit_hash,
            tree_hash: tree_hash.to_owned(),
            abbreviated_tree_hash: abbreviated_tree_hash.to_owned(),
            parent_hashes,
            abbreviated_parent_hashes,
            refs: fields.get("refs")?.to_owned(),
            encoding: fields.get("encoding")?.to_owned(),
            sanitized_subject_line: fields.get("sanitized_subject_line")?.to_owned(),
            commit_notes: fields.get("commit_notes")?.trim_end().to_owned(),
            verification_flag,
            signer: fields.get("signer")?.to_owned(),
            signer_key: fields.get("signer_key")?.to_owned(),
            author: Person {
                name: fields.get("author_name")?.to_owned(),
                email: fields.get("author_email")?.to_owned(),
                date: fields.get("author_date")?.to_owned(),
            },
            committer: Person {
                name: fields.get("committer_name")?.to_owned(),
                email: fields.get("committer_email")?.to_owned(),
                date: fields.get("committer_date")?.to_owned(),
            },
        })
    }
}

struct Fields<'a>(BTreeMap<&'static str, &'a str>);

impl<'a> Fields<'a> {
    fn get(&self, name: &'static str) -> Result<&'a str, PayloadError> {
        self.0
            .get(name)
            .copied()
            .ok_or(PayloadError::MissingField(name))
    }

    fn hash(&self, name: &'static str) -> Result<CommitHash, PayloadError> {
        let value = self.get(name)?;
        value.parse().map_err(|_| PayloadError::InvalidHash {
            field: name,
            value: value.to_owned(),
        })
    }

    fn abbreviation(&self, name: &'static str, hash: &CommitHash) -> Result<String, PayloadError> {
        let value = self.get(name)?;
        if hash.is_abbreviated_by(value) {
            Ok(value.to_owned())
        } else {
            Err(PayloadError::NotAnAbbreviation {
                field: name,
                abbreviation: value.to_owned(),
                hash: hash.to_string(),
            })
        }
    }
}

/// The structured payload couldn't be parsed.
#[derive(thiserror::Error, miette::Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Expected {expected} fields in commit metadata but found {found}")]
    #[diagnostic(
        code(git_validation::payload::field_count),
        help("The output of `git log` may have been truncated")
    )]
    FieldCount { expected: usize, found: usize },

    #[error("Commit metadata is missing the `{0}` field")]
    #[diagnostic(code(git_validation::payload::missing_field))]
    MissingField(&'static str),

    #[error("Field `{field}` is not a full-length hash: `{value}`")]
    #[diagnostic(code(git_validation::payload::invalid_hash))]
    InvalidHash { field: &'static str, value: String },

    #[error("Field `{field}` has `{abbreviation}`, which doesn't abbreviate `{hash}`")]
    #[diagnostic(code(git_validation::payload::not_an_abbreviation))]
    NotAnAbbreviation {
        field: &'static str,
        abbreviation: String,
        hash: String,
    },

    #[error("Commit metadata lists {parents} parents but {abbreviated} abbreviated parents")]
    #[diagnostic(code(git_validation::payload::parent_count))]
    ParentCount { parents: usize, abbreviated: usize },

    #[error("Unknown signature verification flag `{0}`")]
    #[diagnostic(code(git_validation::payload::verification_flag))]
    UnknownVerificationFlag(String),
}

/// Build a payload the way `git log` would print it, for tests.
#[cfg(test)]
pub fn fake_payload(values: &[(&str, &str)]) -> String {
    FIELDS
        .iter()
        .map(|field| {
            values
                .iter()
                .find(|(name, _)| *name == field.name)
                .map(|(_, value)| *value)
                .unwrap_or_default()
        })
        .join(&FIELD_SEPARATOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const COMMIT: &str = "1f2e3d4c5b6a79881f2e3d4c5b6a79881f2e3d4c";
    const TREE: &str = "aaaabbbbccccddddeeeeffff0000111122223333";
    const PARENT_1: &str = "0000000000000000000000000000000000000001";
    const PARENT_2: &str = "0000000000000000000000000000000000000002";

    fn payload() -> Vec<(&'static str, &'static str)> {
        vec![
            ("commit", COMMIT),
            ("abbreviated_commit", "1f2e3d4"),
            ("tree", TREE),
            ("abbreviated_tree", "aaaabbb"),
            (
                "parent",
                "0000000000000000000000000000000000000001 0000000000000000000000000000000000000002",
            ),
            ("abbreviated_parent", "0000000 0000000"),
            ("refs", "HEAD -> main, tag: v1.0.0"),
            ("encoding", ""),
            ("sanitized_subject_line", "Add-the-thing"),
            ("commit_notes", "Reviewed \"quietly\"\n"),
            ("verification_flag", "G"),
            ("signer", "Jo Example <jo@example.com>"),
            ("signer_key", "0123ABCD"),
            ("author_name", "Jo \"JJ\" Example"),
            ("author_email", "jo@example.com"),
            ("author_date", "Tue, 4 Jun 2024 10:11:12 -0700"),
            ("committer_name", "Sam Example"),
            ("committer_email", "sam@example.com"),
            ("committer_date", "Wed, 5 Jun 2024 01:02:03 +0000"),
        ]
    }

    fn with(overrides: &[(&'static str, &'static str)]) -> String {
        let mut values = payload();
        for (name, value) in overrides {
            for entry in values.iter_mut() {
                if entry.0 == *name {
                    entry.1 = *value;
                }
            }
        }
        fake_payload(&values)
    }

    #[test]
    fn test_pretty_arg() {
        let arg = pretty_arg();
        assert!(arg.starts_with("--pretty=format:%H%x00%h%x00%T"));
        assert!(arg.ends_with("%cN%x00%cE%x00%cD"));
        assert_eq!(arg.matches("%x00").count(), FIELDS.len() - 1);
    }

    #[test]
    fn test_parse_metadata() {
        let metadata = CommitMetadata::parse(&fake_payload(&payload())).unwrap();
        assert_eq!(
            metadata,
            CommitMetadata {
                commit_hash: COMMIT.parse().unwrap(),
                abbreviated_commit_hash: "1f2e3d4".to_owned(),
                tree_hash: TREE.to_owned(),
                abbreviated_tree_hash: "aaaabbb".to_owned(),
                parent_hashes: vec![PARENT_1.parse().unwrap(), PARENT_2.parse().unwrap()],
                abbreviated_parent_hashes: vec!["0000000".to_owned(), "0000000".to_owned()],
                refs: "HEAD -> main, tag: v1.0.0".to_owned(),
                encoding: "".to_owned(),
                sanitized_subject_line: "Add-the-thing".to_owned(),
                commit_notes: "Reviewed \"quietly\"".to_owned(),
                verification_flag: VerificationFlag::Good,
                signer: "Jo Example <jo@example.com>".to_owned(),
                signer_key: "0123ABCD".to_owned(),
                author: Person {
                    name: "Jo \"JJ\" Example".to_owned(),
                    email: "jo@example.com".to_owned(),
                    date: "Tue, 4 Jun 2024 10:11:12 -0700".to_owned(),
                },
                committer: Person {
                    name: "Sam Example".to_owned(),
                    email: "sam@example.com".to_owned(),
                    date: "Wed, 5 Jun 2024 01:02:03 +0000".to_owned(),
                },
            }
        );
    }

    #[test]
    fn test_parse_root_commit() {
        let metadata =
            CommitMetadata::parse(&with(&[("parent", ""), ("abbreviated_parent", "")])).unwrap();
        assert!(metadata.parent_hashes.is_empty());
        assert!(metadata.abbreviated_parent_hashes.is_empty());
    }

    #[test]
    fn test_parse_truncated() {
        let payload = fake_payload(&payload());
        let truncated = &payload[..payload.len() / 2];
        assert!(matches!(
            CommitMetadata::parse(truncated),
            Err(PayloadError::FieldCount { expected: 19, .. })
        ));
        assert_eq!(
            CommitMetadata::parse(""),
            Err(PayloadError::FieldCount {
                expected: 19,
                found: 1
            })
        );
    }

    #[test]
    fn test_parse_invalid_hashes() {
        assert_eq!(
            CommitMetadata::parse(&with(&[("commit", "1f2e3d4")])),
            Err(PayloadError::InvalidHash {
                field: "commit",
                value: "1f2e3d4".to_owned()
            })
        );
        assert_eq!(
            CommitMetadata::parse(&with(&[("abbreviated_commit", "2f2e3d4")])),
            Err(PayloadError::NotAnAbbreviation {
                field: "abbreviated_commit",
                abbreviation: "2f2e3d4".to_owned(),
                hash: COMMIT.to_owned(),
            })
        );
        assert_eq!(
            CommitMetadata::parse(&with(&[("abbreviated_parent", "0000000")])),
            Err(PayloadError::ParentCount {
                parents: 2,
                abbreviated: 1
            })
        );
    }

    #[test]
    fn test_parse_unknown_verification_flag() {
        assert_eq!(
            CommitMetadata::parse(&with(&[("verification_flag", "Q")])),
            Err(PayloadError::UnknownVerificationFlag("Q".to_owned()))
        );
    }
}
