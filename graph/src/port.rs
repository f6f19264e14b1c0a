use anyhow::Result;
use chrono::{DateTime, Utc};
use smallvec::SmallVec;

/// A branch ref and the full hash of the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    /// Short ref name; remote refs keep their `origin/` prefix.
    pub name: String,
    pub head: String,
}

/// A commit as read from the repository, before any normalization.
#[derive(Debug, Clone)]
pub struct RawCommit {
    /// Full hash.
    pub hash: String,
    /// Full message, subject and body.
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    pub committed_at: DateTime<Utc>,
    /// Full parent hashes, mainline parent first.
    pub parent_hashes: SmallVec<[String; 2]>,
}

/// A tag ref resolved to the commit it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    /// Bare tag name without any `refs/tags/` or remote prefix.
    pub name: String,
    /// Full hash of the targeted commit.
    pub target_hash: String,
    /// Annotation message, when the tag is annotated.
    pub message: Option<String>,
}

/// Porcelain-style working tree state.
#[derive(Debug, Clone, Default)]
pub struct WorkingTreeStatus {
    pub staged_files: Vec<String>,
    pub unstaged_files: Vec<String>,
}

impl WorkingTreeStatus {
    pub fn is_clean(&self) -> bool {
        self.staged_files.is_empty() && self.unstaged_files.is_empty()
    }
}

/// Read-only access to repository objects, consumed by the pipeline.
///
/// A handle is owned by one in-flight pipeline invocation; implementations
/// may block on disk or network I/O and are expected to be released by the
/// caller once the pipeline completes. Every method is safe to call
/// repeatedly.
pub trait RepositoryPort {
    fn list_local_branches(&self) -> Result<Vec<BranchRef>>;

    /// May fail or return an empty list when no remote is configured.
    fn list_remote_branches(&self) -> Result<Vec<BranchRef>>;

    /// All commits reachable from `refname`, newest first.
    fn iter_commits(&self, refname: &str) -> Result<Vec<RawCommit>>;

    /// Lowest common ancestor of two commits given by full hash.
    fn merge_base(&self, a: &str, b: &str) -> Result<Option<String>>;

    fn list_tags(&self) -> Result<Vec<RawTag>>;

    /// Tags known only under remote refs.
    fn list_remote_tags(&self) -> Result<Vec<RawTag>>;

    fn working_tree_status(&self) -> Result<WorkingTreeStatus>;

    fn current_branch_name(&self) -> Result<String>;
}
