use std::process::ExitCode;

mod cli;
mod commit_hash;
mod commit_record;
mod commit_source;
mod git;
mod install_tracing;
mod person;
mod pretty_format;
mod report;
mod rule;
mod run_config;
mod runner;
mod sign_off;
mod subject_length;
mod verification_flag;

use calm_io::stdoutln;
use clap::Parser;
use cli::Opts;
use git::Git;
use install_tracing::install_tracing;
use report::Reporter;
use run_config::RunConfig;
use runner::run;

fn main() -> miette::Result<ExitCode> {
    let opts = Opts::parse();
    install_tracing(&opts.log)?;

    let rules = opts.rules();

    if opts.list_rules {
        for rule in rules.iter() {
            let _ = stdoutln!("{}", rule.name());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let env_range = std::env::var(&opts.range_env).ok();
    tracing::debug!(
        var = %opts.range_env,
        value = ?env_range,
        "Read commit range from environment"
    );
    let config = RunConfig::from_sources(opts.range.clone(), env_range);

    let git = Git::new(opts.directory.clone());
    let mut reporter = Reporter::new(std::io::stdout().lock(), opts.format);
    let outcome = run(&git, &rules, &config, &mut reporter)?;
    tracing::debug!(
        checked = outcome.checked,
        failed = outcome.failures.len(),
        "Finished checking commits"
    );

    Ok(outcome.exit_code())
}
