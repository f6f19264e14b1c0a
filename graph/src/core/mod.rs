pub mod commit;
pub mod graph;
pub mod merge;

pub use commit::{
    short_hash, BranchAvailability, BranchHeadType, Commit, Tag, UncommittedType, SHORT_HASH_LEN,
};
pub use graph::{GraphModel, RepositoryStats};
pub use merge::MergeBranch;
