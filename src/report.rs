use std::io::ErrorKind;
use std::io::Write;

use crate::commit_hash::CommitHash;
use crate::commit_record::CommitRecord;
use crate::rule::ValidationFailure;

/// How to print results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// One human-readable line per commit.
    #[default]
    Text,
    /// One JSON object per commit.
    Json,
}

/// Prints one disposition line per commit, and a summary if anything failed.
///
/// Like `calm_io::stdoutln!`, a closed output pipe (as in `git-validation | head`) isn't an
/// error: the rest of the report is dropped and the run carries on to its exit status.
#[derive(Debug)]
pub struct Reporter<W> {
    out: W,
    format: ReportFormat,
    /// The reader went away.
    closed: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: ReportFormat) -> Self {
        Self {
            out,
            format,
            closed: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Report whether `commit` passed.
    pub fn commit(
        &mut self,
        commit: &CommitRecord,
        outcome: &Result<(), ValidationFailure>,
    ) -> std::io::Result<()> {
        if self.closed {
            return Ok(());
        }
        let result = match self.format {
            ReportFormat::Text => match outcome {
                Ok(()) => writeln!(self.out, "{commit} ... PASS"),
                Err(failure) => writeln!(self.out, "{commit} ... FAIL: {}", failure.reason),
            },
            ReportFormat::Json => {
                let line = match outcome {
                    Ok(()) => CommitLine {
                        commit: &commit.commit_hash,
                        abbreviated_commit: &commit.abbreviated_commit_hash,
                        subject: &commit.subject,
                        status: Status::Pass,
                        rule: None,
                        reason: None,
                    },
                    Err(failure) => CommitLine {
                        commit: &commit.commit_hash,
                        abbreviated_commit: &commit.abbreviated_commit_hash,
                        subject: &commit.subject,
                        status: Status::Fail,
                        rule: Some(failure.rule.as_str()),
                        reason: Some(failure.reason.as_str()),
                    },
                };
                self.json_line(&line)
            }
        };
        self.tolerate_closed(result)
    }

    /// Report the number of failed commits. Nothing is printed when everything passed.
    pub fn summary(&mut self, issues: usize) -> std::io::Result<()> {
        if issues == 0 || self.closed {
            return Ok(());
        }
        let result = match self.format {
            ReportFormat::Text => writeln!(self.out, "{issues} issues to fix"),
            ReportFormat::Json => self.json_line(&Stats { issues }),
        };
        self.tolerate_closed(result)
    }

    fn tolerate_closed(&mut self, result: std::io::Result<()>) -> std::io::Result<()> {
        match result {
            Err(error) if error.kind() == ErrorKind::BrokenPipe => {
                tracing::debug!("Output closed, dropping the rest of the report");
                self.closed = true;
                Ok(())
            }
            result => result,
        }
    }

    fn json_line(&mut self, value: &impl serde::Serialize) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)
    }
}

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "lowercase")]
enum Status {
    Pass,
    Fail,
}

#[derive(serde::Serialize, Debug)]
struct CommitLine<'a> {
    commit: &'a CommitHash,
    abbreviated_commit: &'a str,
    subject: &'a str,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

#[derive(serde::Serialize, Debug)]
#[serde(tag = "type", rename = "stats")]
struct Stats {
    issues: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit_record::fake_commit;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn failure(commit: &CommitRecord) -> ValidationFailure {
        ValidationFailure {
            commit: commit.clone(),
            rule: "sign-off".to_owned(),
            reason: "no sign-off".to_owned(),
        }
    }

    fn report(format: ReportFormat, issues: usize) -> String {
        let good = fake_commit('a', "Add \"widgets\"", "");
        let bad = fake_commit('b', "Remove widgets", "");
        let mut reporter = Reporter::new(Vec::new(), format);
        reporter.commit(&good, &Ok(())).unwrap();
        reporter.commit(&bad, &Err(failure(&bad))).unwrap();
        reporter.summary(issues).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_text_report() {
        assert_eq!(
            report(ReportFormat::Text, 1),
            indoc!(
                r#"
                aaaaaaa Add "widgets" ... PASS
                bbbbbbb Remove widgets ... FAIL: no sign-off
                1 issues to fix
                "#
            )
        );
    }

    #[test]
    fn test_text_report_no_summary_without_issues() {
        assert!(!report(ReportFormat::Text, 0).contains("issues to fix"));
    }

    /// Counts writes and fails each one as if the reader hung up.
    #[derive(Debug, Default)]
    struct ClosedPipe {
        writes: usize,
    }

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            self.writes += 1;
            Err(ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_closed_output_is_not_an_error() {
        let commit = fake_commit('a', "Add widgets", "");
        for format in [ReportFormat::Text, ReportFormat::Json] {
            let mut reporter = Reporter::new(ClosedPipe::default(), format);
            reporter.commit(&commit, &Ok(())).unwrap();
            reporter.commit(&commit, &Err(failure(&commit))).unwrap();
            reporter.summary(1).unwrap();
            // Nothing is written after the first failure.
            assert_eq!(reporter.into_inner().writes, 1);
        }
    }

    #[derive(Debug)]
    struct Full;

    impl Write for Full {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_other_write_errors_are_reported() {
        let mut reporter = Reporter::new(Full, ReportFormat::Text);
        let commit = fake_commit('a', "Add widgets", "");
        assert!(reporter.commit(&commit, &Ok(())).is_err());
    }

    #[test]
    fn test_json_report() {
        assert_eq!(
            report(ReportFormat::Json, 1),
            indoc!(
                r#"
                {"commit":"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa","abbreviated_commit":"aaaaaaa","subject":"Add \"widgets\"","status":"pass"}
                {"commit":"bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb","abbreviated_commit":"bbbbbbb","subject":"Remove widgets","status":"fail","rule":"sign-off","reason":"no sign-off"}
                {"type":"stats","issues":1}
                "#
            )
        );
    }
}
