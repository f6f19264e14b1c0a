//! The full ingest -> detect -> style -> layout pipeline.

use tracing::info;

use crate::core::GraphModel;
use crate::ingest::CommitIngestor;
use crate::layout::{LaneLayoutEngine, LayoutConfig};
use crate::merges::{apply_merge_styling, MergeBranchDetector};
use crate::port::RepositoryPort;

/// Runs the whole graph build over one repository snapshot.
///
/// Synchronous and single-threaded; callers wanting a responsive UI run it
/// on a worker and hand the resulting [`GraphModel`] back afterwards. One
/// pipeline owns its port for the duration of a build.
pub struct GraphPipeline<'a> {
    port: &'a dyn RepositoryPort,
    config: LayoutConfig,
}

impl<'a> GraphPipeline<'a> {
    pub fn new(port: &'a dyn RepositoryPort) -> Self {
        Self::with_config(port, LayoutConfig::default())
    }

    pub fn with_config(port: &'a dyn RepositoryPort, config: LayoutConfig) -> Self {
        Self { port, config }
    }

    /// Build from local refs only.
    pub fn build_local(&self) -> GraphModel {
        self.build(false)
    }

    /// Build from local and remote refs.
    pub fn build_with_remote(&self) -> GraphModel {
        self.build(true)
    }

    fn build(&self, include_remote: bool) -> GraphModel {
        let ingestor = CommitIngestor::new(self.port);
        let ingested = if include_remote {
            ingestor.ingest_with_remote()
        } else {
            ingestor.ingest_local()
        };

        let detector = MergeBranchDetector::new(self.port, &ingested.full_hashes);
        let merge_branches = detector.detect(&ingested.commits);
        let styled = apply_merge_styling(ingested.commits, &merge_branches);

        let mut engine = LaneLayoutEngine::with_config(self.config);
        let commits = engine.layout(styled, &merge_branches);

        info!(
            commits = commits.len(),
            merge_branches = merge_branches.len(),
            lanes = engine.branch_lanes().len(),
            "graph build complete"
        );
        GraphModel {
            commits,
            merge_branches,
        }
    }
}
