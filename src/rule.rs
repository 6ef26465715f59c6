use std::fmt::Debug;

use crate::commit_record::CommitRecord;

/// A check that every commit must pass.
///
/// Rules are stateless: checking the same commit twice gives the same answer.
pub trait Rule: Debug {
    /// A short, kebab-case name, like `sign-off`.
    fn name(&self) -> &str;

    /// Check a commit, returning the reason it fails, if any.
    fn check(&self, commit: &CommitRecord) -> Option<String>;
}

/// An ordered set of rules, fixed for the length of a run.
#[derive(Debug, Default)]
pub struct Rules(Vec<Box<dyn Rule>>);

impl Rules {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self(rules)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.0.iter().map(|rule| rule.as_ref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check a commit against each rule in order, stopping at the first failure.
    pub fn validate(&self, commit: &CommitRecord) -> Result<(), ValidationFailure> {
        for rule in self.iter() {
            if let Some(reason) = rule.check(commit) {
                tracing::debug!(
                    rule = rule.name(),
                    commit = %commit.commit_hash,
                    %reason,
                    "Rule failed"
                );
                return Err(ValidationFailure {
                    commit: commit.clone(),
                    rule: rule.name().to_owned(),
                    reason,
                });
            }
            tracing::trace!(
                rule = rule.name(),
                commit = %commit.commit_hash,
                "Rule passed"
            );
        }
        Ok(())
    }
}

/// A commit that failed a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub commit: CommitRecord,
    /// The name of the rule that failed.
    pub rule: String,
    pub reason: String,
}
