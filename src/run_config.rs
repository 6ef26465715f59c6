/// What a run should check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunConfig {
    /// The commit range to check. With no range, nothing is checked.
    pub range: Option<String>,
}

impl RunConfig {
    /// Pick a range from the command line or the environment.
    ///
    /// An explicit `--range` wins over the environment. Blank values count as missing, so CI
    /// systems which set the variable to an empty string on some builds skip validation.
    pub fn from_sources(flag: Option<String>, env: Option<String>) -> Self {
        let range = non_blank(flag).or_else(|| non_blank(env));
        Self { range }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
