use std::io::Write;
use std::process::ExitCode;

use miette::IntoDiagnostic;

use crate::commit_source::CommitSource;
use crate::report::Reporter;
use crate::rule::Rules;
use crate::rule::ValidationFailure;
use crate::run_config::RunConfig;

/// The result of a completed run.
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// How many commits were checked.
    pub checked: usize,
    /// Every commit that failed a rule, in the order they were checked.
    pub failures: Vec<ValidationFailure>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Check every commit in the configured range against `rules`.
///
/// Every commit is fetched before anything is printed, so a commit that can't be fetched aborts
/// the run without any output. Rule failures don't stop the run.
pub fn run<W: Write>(
    source: &impl CommitSource,
    rules: &Rules,
    config: &RunConfig,
    reporter: &mut Reporter<W>,
) -> miette::Result<RunOutcome> {
    let range = match &config.range {
        Some(range) => range,
        None => {
            tracing::info!("No commit range given, skipping validation");
            return Ok(RunOutcome::default());
        }
    };

    if rules.is_empty() {
        tracing::warn!("No rules selected, every commit will pass");
    }

    let commits = source.resolve_commits(range)?;
    tracing::debug!(range, commits = commits.len(), rules = rules.len(), "Checking commits");

    let mut failures = Vec::new();
    for commit in &commits {
        let outcome = rules.validate(commit);
        reporter.commit(commit, &outcome).into_diagnostic()?;
        if let Err(failure) = outcome {
            tracing::debug!(
                commit = %failure.commit.commit_hash,
                rule = %failure.rule,
                "Commit failed"
            );
            failures.push(failure);
        }
    }
    reporter.summary(failures.len()).into_diagnostic()?;

    Ok(RunOutcome {
        checked: commits.len(),
        failures,
    })
}
