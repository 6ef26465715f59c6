use crate::commit_hash::CommitHash;
use crate::commit_record::CommitRecord;

/// Something that can list the commits in a range and tell us about them.
pub trait CommitSource {
    /// Resolve a range like `main..HEAD` into commit hashes, newest first.
    ///
    /// An empty range is not an error.
    fn resolve_range(&self, range: &str) -> Result<Vec<CommitHash>, SourceError>;

    /// Fetch everything we know about one commit.
    fn fetch_record(&self, commit: &CommitHash) -> Result<CommitRecord, SourceError>;

    /// Resolve a range and fetch a record for each commit in it, in order.
    ///
    /// Stops at the first commit that can't be fetched. The records fetched before that are kept
    /// in the returned error.
    fn resolve_commits(&self, range: &str) -> Result<Vec<CommitRecord>, ResolveCommitsError> {
        let hashes = self
            .resolve_range(range)
            .map_err(|source| ResolveCommitsError {
                fetched: Vec::new(),
                source,
            })?;
        tracing::debug!(range, commits = hashes.len(), "Resolved commit range");

        let mut fetched = Vec::with_capacity(hashes.len());
        for hash in hashes {
            match self.fetch_record(&hash) {
                Ok(record) => fetched.push(record),
                Err(source) => return Err(ResolveCommitsError { fetched, source }),
            }
        }
        Ok(fetched)
    }
}

/// An error from the underlying version control tool.
#[derive(thiserror::Error, miette::Diagnostic, Debug)]
pub enum SourceError {
    #[error("Failed to resolve commit range `{range}`")]
    #[diagnostic(
        code(git_validation::range_resolution),
        help("Ranges look like `main..HEAD` or `v1.0.0...feature`")
    )]
    RangeResolution {
        range: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to fetch commit {commit}")]
    #[diagnostic(code(git_validation::record_fetch))]
    RecordFetch {
        commit: CommitHash,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// [`CommitSource::resolve_commits`] failed partway through.
#[derive(thiserror::Error, miette::Diagnostic, Debug)]
#[error("Failed to gather commits ({} fetched before the failure)", .fetched.len())]
pub struct ResolveCommitsError {
    /// Commits fetched successfully before the failure, in order.
    pub fetched: Vec<CommitRecord>,
    #[source]
    #[diagnostic_source]
    pub source: SourceError,
}

/// A canned commit for [`FakeSource`].
#[cfg(test)]
#[derive(Debug, Clone)]
pub enum FakeCommit {
    Record(CommitRecord),
    /// A raw structured payload, parsed when the commit is fetched.
    Payload {
        payload: String,
        subject: String,
        body: String,
    },
}

/// An in-memory [`CommitSource`], for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FakeSource {
    pub commits: Vec<(CommitHash, FakeCommit)>,
    pub range_error: Option<String>,
    pub fetches: std::cell::Cell<usize>,
}

#[cfg(test)]
impl FakeSource {
    pub fn new(records: impl IntoIterator<Item = CommitRecord>) -> Self {
        Self {
            commits: records
                .into_iter()
                .map(|record| (record.commit_hash.clone(), FakeCommit::Record(record)))
                .collect(),
            ..Default::default()
        }
    }

    pub fn with_payload(mut self, hash: CommitHash, payload: String) -> Self {
        self.commits.push((
            hash,
            FakeCommit::Payload {
                payload,
                subject: "Subject".to_owned(),
                body: String::new(),
            },
        ));
        self
    }
}

#[cfg(test)]
impl CommitSource for FakeSource {
    fn resolve_range(&self, range: &str) -> Result<Vec<CommitHash>, SourceError> {
        match &self.range_error {
            Some(message) => Err(SourceError::RangeResolution {
                range: range.to_owned(),
                source: message.clone().into(),
            }),
            None => Ok(self.commits.iter().map(|(hash, _)| hash.clone()).collect()),
        }
    }

    fn fetch_record(&self, commit: &CommitHash) -> Result<CommitRecord, SourceError> {
        self.fetches.set(self.fetches.get() + 1);
        let fake = self
            .commits
            .iter()
            .find(|(hash, _)| hash == commit)
            .map(|(_, fake)| fake)
            .ok_or_else(|| SourceError::RecordFetch {
                commit: commit.clone(),
                source: "unknown revision".into(),
            })?;
        match fake {
            FakeCommit::Record(record) => Ok(record.clone()),
            FakeCommit::Payload {
                payload,
                subject,
                body,
            } => crate::pretty_format::CommitMetadata::parse(payload)
                .map(|metadata| CommitRecord::from_parts(metadata, subject, body))
                .map_err(|error| SourceError::RecordFetch {
                    commit: commit.clone(),
                    source: Box::new(error),
                }),
        }
    }
}
