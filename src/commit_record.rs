use std::fmt::Display;

use crate::commit_hash::CommitHash;
use crate::person::Person;
use crate::pretty_format::CommitMetadata;
use crate::verification_flag::VerificationFlag;

/// Everything we know about one commit.
#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub commit_hash: CommitHash,
    pub abbreviated_commit_hash: String,
    pub tree_hash: String,
    pub abbreviated_tree_hash: String,
    pub parent_hashes: Vec<CommitHash>,
    pub abbreviated_parent_hashes: Vec<String>,
    /// Branch and tag names pointing at this commit, like `HEAD -> main, tag: v1.0.0`.
    pub refs: String,
    pub encoding: String,
    /// The first line of the commit message.
    pub subject: String,
    /// The commit message after the subject and the blank line following it.
    pub body: String,
    pub sanitized_subject_line: String,
    pub commit_notes: String,
    pub verification_flag: VerificationFlag,
    pub signer: String,
    pub signer_key: String,
    pub author: Person,
    pub committer: Person,
}

impl CommitRecord {
    /// Merge structured metadata with a separately-fetched subject and body.
    ///
    /// The subject and body always come from their own queries; the metadata never contains
    /// them. Surrounding whitespace is trimmed from both.
    pub fn from_parts(metadata: CommitMetadata, subject: &str, body: &str) -> Self {
        let CommitMetadata {
            commit_hash,
            abbreviated_commit_hash,
            tree_hash,
            abbreviated_tree_hash,
            parent_hashes,
            abbreviated_parent_hashes,
            refs,
            encoding,
            sanitized_subject_line,
            commit_notes,
            verification_flag,
            signer,
            signer_key,
            author,
            committer,
        } = metadata;

        Self {
            commit_hash,
            abbreviated_commit_hash,
            tree_hash,
            abbreviated_tree_hash,
            parent_hashes,
            abbreviated_parent_hashes,
            refs,
            encoding,
            subject: subject.trim().to_owned(),
            body: body.trim().to_owned(),
            sanitized_subject_line,
            commit_notes,
            verification_flag,
            signer,
            signer_key,
            author,
            committer,
        }
    }

    /// Is this a merge commit?
    pub fn is_merge(&self) -> bool {
        self.parent_hashes.len() > 1
    }
}

impl Display for CommitRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.abbreviated_commit_hash, self.subject)
    }
}

/// An unsigned commit with a fake hash made by repeating `hash_char`, for tests.
#[cfg(test)]
pub fn fake_commit(hash_char: char, subject: &str, body: &str) -> CommitRecord {
    let commit_hash = hash_char.to_string().repeat(40);
    let tree_hash = "e".repeat(40);
    let author = Person {
        name: "Jo Example".to_owned(),
        email: "jo@example.com".to_owned(),
        date: "Tue, 4 Jun 2024 10:11:12 -0700".to_owned(),
    };
    CommitRecord {
        abbreviated_commit_hash: commit_hash[..7].to_owned(),
        commit_hash: commit_hash.parse().expect("Fake hashes are valid"),
        abbreviated_tree_hash: tree_hash[..7].to_owned(),
        tree_hash,
        parent_hashes: Vec::new(),
        abbreviated_parent_hashes: Vec::new(),
        refs: String::new(),
        encoding: String::new(),
        subject: subject.to_owned(),
        body: body.to_owned(),
        sanitized_subject_line: subject.replace(' ', "-"),
        commit_notes: String::new(),
        verification_flag: VerificationFlag::Unsigned,
        signer: String::new(),
        signer_key: String::new(),
        committer: author.clone(),
        author,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pretty_format::fake_payload;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_parts() {
        let metadata = CommitMetadata::parse(&fake_payload(&[
            ("commit", "1f2e3d4c5b6a79881f2e3d4c5b6a79881f2e3d4c"),
            ("abbreviated_commit", "1f2e3d4"),
            ("tree", "aaaabbbbccccddddeeeeffff0000111122223333"),
            ("abbreviated_tree", "aaaabbb"),
            ("verification_flag", "N"),
            ("author_name", "Jo Example"),
        ]))
        .unwrap();

        let record = CommitRecord::from_parts(
            metadata,
            "Fix the \"quoted\" thing\n",
            indoc!(
                "

                It was broken.

                Signed-off-by: Jo Example <jo@example.com>
                "
            ),
        );

        assert_eq!(record.subject, "Fix the \"quoted\" thing");
        assert_eq!(
            record.body,
            "It was broken.\n\nSigned-off-by: Jo Example <jo@example.com>"
        );
        assert_eq!(record.author.name, "Jo Example");
        assert!(record.parent_hashes.is_empty());
        assert!(!record.is_merge());
        assert_eq!(record.to_string(), "1f2e3d4 Fix the \"quoted\" thing");
    }
}
