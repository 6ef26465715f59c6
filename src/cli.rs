use camino::Utf8PathBuf;
use clap::Parser;
use clap::ValueEnum;
use itertools::Itertools;

use crate::report::ReportFormat;
use crate::rule::Rule;
use crate::rule::Rules;
use crate::sign_off::SignOff;
use crate::subject_length::SubjectLength;

/// Check that every commit in a range follows a set of rules.
///
/// With no `--range` and nothing in the `--range-env` environment variable, this does nothing
/// and exits successfully, so it's safe to run unconditionally in CI.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
#[command(max_term_width = 100)]
pub struct Opts {
    /// Log filter directives, of the form `target[span{field=value}]=level`, where all components
    /// except the level are optional.
    ///
    /// Try `debug` or `trace`.
    #[arg(long, default_value = "info", env = "GIT_VALIDATION_LOG")]
    pub log: String,

    /// The commit range to check, like `main..HEAD`.
    ///
    /// Takes priority over `--range-env`.
    #[arg(long)]
    pub range: Option<String>,

    /// An environment variable to read the commit range from when `--range` isn't given.
    #[arg(long, value_name = "VAR", default_value = "TRAVIS_COMMIT_RANGE")]
    pub range_env: String,

    /// Run `git` in this directory.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<Utf8PathBuf>,

    /// A rule every commit must pass. May be given multiple times; rules are checked in order.
    #[arg(long = "rule", value_name = "RULE", value_enum, default_values_t = [RuleName::SignOff])]
    pub rules: Vec<RuleName>,

    /// The longest allowed subject for the `subject-length` rule, in characters.
    #[arg(long, default_value_t = SubjectLength::DEFAULT_MAX)]
    pub max_subject_length: usize,

    /// How to print results.
    #[arg(long, value_enum, default_value_t)]
    pub format: ReportFormat,

    /// Print the rules that would be checked, in order, and exit.
    #[arg(long)]
    pub list_rules: bool,
}

impl Opts {
    /// Build the selected rules. Duplicates are dropped.
    pub fn rules(&self) -> Rules {
        Rules::new(
            self.rules
                .iter()
                .unique()
                .map(|name| name.build(self))
                .collect(),
        )
    }
}

/// A built-in rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum RuleName {
    /// Require a `Signed-off-by: Name <email>` trailer.
    #[value(alias = "dco")]
    SignOff,
    /// Limit the length of the subject line.
    SubjectLength,
}

impl RuleName {
    fn build(self, opts: &Opts) -> Box<dyn Rule> {
        match self {
            RuleName::SignOff => Box::new(SignOff),
            RuleName::SubjectLength => Box::new(SubjectLength {
                max: opts.max_subject_length,
            }),
        }
    }
}
