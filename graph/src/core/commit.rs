use chrono::{DateTime, Utc};
use smallvec::SmallVec;

/// Length of the short display hash used as the key throughout the graph.
///
/// Truncating to 8 hex characters carries a small collision risk; downstream
/// consumers (parents, merge tracing) all key on the short form, so a
/// collision would corrupt the drawn graph rather than crash it.
pub const SHORT_HASH_LEN: usize = 8;

/// Truncate a full hash to the display form.
pub fn short_hash(hash: &str) -> String {
    hash.chars().take(SHORT_HASH_LEN).collect()
}

/// Whether a branch name currently exists locally, on the remote, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchAvailability {
    #[default]
    LocalOnly,
    RemoteOnly,
    Both,
}

/// Which head(s) a branch-head commit represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchHeadType {
    #[default]
    None,
    Local,
    Remote,
    Both,
}

/// Kind of uncommitted changes represented by the pseudo-commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UncommittedType {
    Staged,
    Working,
    Both,
}

/// A tag attached to a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub is_remote: bool,
    pub message: String,
}

/// A fully ingested commit, positioned by the layout engine.
///
/// Produced once per ingestion pass; the merge detector rewrites
/// `branch`/`branch_color`/`is_merge_branch` and the layout engine writes
/// `x`/`y`/`table_row`. No other mutation happens after construction.
#[derive(Debug, Clone)]
pub struct Commit {
    /// Short display hash (see [`SHORT_HASH_LEN`]).
    pub hash: String,
    /// Subject line of the commit message.
    pub message: String,
    /// Subject truncated for narrow columns.
    pub short_message: String,
    /// Message body after the subject line.
    pub description: String,
    /// First body line, ellipsized.
    pub description_short: String,
    pub author: String,
    /// Author reduced to "F. Last" form when too long.
    pub author_short: String,
    pub author_email: String,
    /// Authoritative sort key.
    pub date: DateTime<Utc>,
    pub date_relative: String,
    pub date_short: String,
    /// Short hashes of the parents; index 0 is the mainline parent.
    pub parents: SmallVec<[String; 2]>,
    /// Owning branch name; virtual `merge-*` name after merge styling.
    pub branch: String,
    pub branch_color: String,
    pub branch_availability: BranchAvailability,
    /// Attributed to a remote-only ref.
    pub is_remote: bool,
    pub is_branch_head: bool,
    pub branch_head_type: BranchHeadType,
    pub tags: Vec<Tag>,
    pub is_uncommitted: bool,
    pub uncommitted_type: Option<UncommittedType>,
    pub is_merge_branch: bool,
    pub x: i32,
    pub y: i32,
    pub table_row: usize,
}

impl Commit {
    /// Commit with more than one parent.
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Commit with no parents.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

impl Default for Commit {
    fn default() -> Self {
        Self {
            hash: String::new(),
            message: String::new(),
            short_message: String::new(),
            description: String::new(),
            description_short: String::new(),
            author: String::new(),
            author_short: String::new(),
            author_email: String::new(),
            date: DateTime::<Utc>::MIN_UTC,
            date_relative: String::new(),
            date_short: String::new(),
            parents: SmallVec::new(),
            branch: String::new(),
            branch_color: String::new(),
            branch_availability: BranchAvailability::default(),
            is_remote: false,
            is_branch_head: false,
            branch_head_type: BranchHeadType::default(),
            tags: Vec::new(),
            is_uncommitted: false,
            uncommitted_type: None,
            is_merge_branch: false,
            x: 0,
            y: 0,
            table_row: 0,
        }
    }
}
