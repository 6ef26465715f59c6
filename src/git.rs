use std::process::Command;

use camino::Utf8PathBuf;
use command_error::CommandExt;
use command_error::OutputContext;
use utf8_command::Utf8Output;

use crate::commit_hash::CommitHash;
use crate::commit_hash::InvalidHash;
use crate::commit_record::CommitRecord;
use crate::commit_source::CommitSource;
use crate::commit_source::SourceError;
use crate::pretty_format::pretty_arg;
use crate::pretty_format::CommitMetadata;

/// `git` CLI wrapper.
#[derive(Debug, Clone, Default)]
pub struct Git {
    /// Run `git` in this directory rather than the current one.
    directory: Option<Utf8PathBuf>,
}

impl Git {
    pub fn new(directory: Option<Utf8PathBuf>) -> Self {
        Self { directory }
    }

    /// Get a `git` command.
    pub fn command(&self) -> Command {
        let mut command = Command::new("git");
        if let Some(directory) = &self.directory {
            command.arg("-C").arg(directory.as_str());
        }
        command
    }

    /// A `git log` command which prints only what its `--pretty` format asks for.
    fn log(&self) -> Command {
        let mut command = self.command();
        // `log.showSignature` would print GPG output into stdout.
        command.args(["log", "--no-color", "--no-show-signature"]);
        command
    }

    /// `git log` listing the full hash of every commit in `range`.
    fn log_range(&self, range: &str) -> Command {
        let mut command = self.log();
        command.args(["--pretty=format:%H", "--end-of-options", range]);
        command
    }

    /// `git log` formatting a single commit with `pretty`.
    fn log_commit(&self, commit: &CommitHash, pretty: &str) -> Command {
        let mut command = self.log();
        command.args(["-1", pretty, "--end-of-options", commit.as_str()]);
        command
    }

    /// Get one formatted field of a single commit, like `%s`.
    fn show_one(&self, commit: &CommitHash, placeholder: &str) -> Result<String, SourceError> {
        self.log_commit(commit, &format!("--pretty=format:{placeholder}"))
            .output_checked_utf8()
            .map(|output| output.stdout)
            .map_err(|error| SourceError::RecordFetch {
                commit: commit.clone(),
                source: Box::new(error),
            })
    }
}

impl CommitSource for Git {
    #[tracing::instrument(level = "debug", skip(self))]
    fn resolve_range(&self, range: &str) -> Result<Vec<CommitHash>, SourceError> {
        // `git log` would take these as options, and many of them (`-n0`, `--output=...`)
        // print nothing and succeed.
        if range.starts_with('-') {
            return Err(SourceError::RangeResolution {
                range: range.to_owned(),
                source: format!("`{range}` looks like an option, not a commit range").into(),
            });
        }

        self.log_range(range)
            .output_checked_as(
                |context: OutputContext<Utf8Output>| -> Result<_, command_error::Error> {
                    if context.status().success() {
                        match parse_hash_list(&context.output().stdout) {
                            Ok(hashes) => Ok(hashes),
                            Err(error) => Err(context.error_msg(error)),
                        }
                    } else {
                        Err(context.error())
                    }
                },
            )
            .map_err(|error| SourceError::RangeResolution {
                range: range.to_owned(),
                source: Box::new(error),
            })
    }

    #[tracing::instrument(level = "debug", skip(self, commit), fields(%commit))]
    fn fetch_record(&self, commit: &CommitHash) -> Result<CommitRecord, SourceError> {
        let metadata = self
            .log_commit(commit, &pretty_arg())
            .output_checked_as(
                |context: OutputContext<Utf8Output>| -> Result<_, command_error::Error> {
                    if context.status().success() {
                        match CommitMetadata::parse(&context.output().stdout) {
                            Ok(metadata) => Ok(metadata),
                            Err(error) => Err(context.error_msg(error)),
                        }
                    } else {
                        Err(context.error())
                    }
                },
            )
            .map_err(|error| SourceError::RecordFetch {
                commit: commit.clone(),
                source: Box::new(error),
            })?;

        // Free text is fetched separately so it can't corrupt the structured payload.
        let subject = self.show_one(commit, "%s")?;
        let body = self.show_one(commit, "%b")?;

        let record = CommitRecord::from_parts(metadata, &subject, &body);
        tracing::trace!(
            author = %record.author,
            merge = record.is_merge(),
            signed = record.verification_flag.is_signed(),
            "Fetched commit"
        );
        Ok(record)
    }
}

/// Parse `git log --pretty=format:%H` output.
fn parse_hash_list(stdout: &str) -> Result<Vec<CommitHash>, InvalidHash> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::parse::<CommitHash>)
        .collect()
}
