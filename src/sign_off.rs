use std::sync::OnceLock;

use regex::Regex;

use crate::commit_record::CommitRecord;
use crate::rule::Rule;

/// Every commit must carry a `Signed-off-by: Name <email>` trailer somewhere in its body.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignOff;

impl SignOff {
    pub const NAME: &'static str = "sign-off";

    /// Does this line exactly match the sign-off shape?
    pub fn is_sign_off(line: &str) -> bool {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(
                r"(?x)
                ^
                Signed-off-by:\ (?P<name>[^<]+)
                \ <(?P<email>[^<>@]+@[^<>@]+)>
                $",
            )
            .expect("Regex parses")
        })
        .is_match(line)
    }
}

impl Rule for SignOff {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(&self, commit: &CommitRecord) -> Option<String> {
        if commit.body.lines().any(Self::is_sign_off) {
            None
        } else {
            Some(format!(
                "{} does not have a valid `Signed-off-by` trailer",
                commit.commit_hash
            ))
        }
    }
}
