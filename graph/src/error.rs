use std::path::PathBuf;

use thiserror::Error;

/// Hard failures surfaced to the caller.
///
/// Only a repository that cannot be opened aborts the pipeline. Broken
/// refs, unreadable tags, failed merge traces and unavailable working-tree
/// status are all recovered where they occur and logged; the pipeline
/// prefers a best-effort partial graph over no graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to open repository at {path}")]
    RepositoryUnavailable {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },
}
