use std::fmt::Display;

/// The author or committer of a commit.
#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Person {
    pub name: String,
    pub email: String,
    /// The date in RFC 2822 format, as `git log` prints it.
    ///
    /// Rules only ever match on this textually, so it isn't parsed.
    pub date: String,
}

impl Display for Person {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}
