use crate::commit_record::CommitRecord;
use crate::rule::Rule;

/// Commit subjects must fit on one short line.
#[derive(Debug, Clone, Copy)]
pub struct SubjectLength {
    /// The longest allowed subject, in characters.
    pub max: usize,
}

impl SubjectLength {
    pub const NAME: &'static str = "subject-length";
    pub const DEFAULT_MAX: usize = 72;
}

impl Default for SubjectLength {
    fn default() -> Self {
        Self {
            max: Self::DEFAULT_MAX,
        }
    }
}

impl Rule for SubjectLength {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(&self, commit: &CommitRecord) -> Option<String> {
        let length = commit.subject.chars().count();
        if length > self.max {
            Some(format!(
                "{} has a {length}-character subject; the limit is {}",
                commit.commit_hash, self.max
            ))
        } else {
            None
        }
    }
}
