//! Commit-graph engine: turns a repository's history into a positioned,
//! colored, annotated graph ready for rendering.
//!
//! The pipeline runs in four stages over one repository snapshot:
//! ingestion ([`ingest::CommitIngestor`]), virtual merge-branch detection
//! ([`merges::MergeBranchDetector`]), merge styling, and lane layout
//! ([`layout::LaneLayoutEngine`]). [`pipeline::GraphPipeline`] wires them
//! together; [`git_backend::GitRepository`] is the libgit2-backed
//! [`port::RepositoryPort`] implementation.

pub mod color;
pub mod core;
pub mod divergence;
pub mod error;
pub mod git_backend;
pub mod ingest;
pub mod layout;
pub mod merges;
pub mod pipeline;
pub mod port;

#[cfg(test)]
pub(crate) mod testutil;

pub use color::BranchColorAssigner;
pub use core::{Commit, GraphModel, MergeBranch, RepositoryStats, Tag};
pub use divergence::{BranchDivergence, BranchDivergenceAnalyzer};
pub use error::GraphError;
pub use git_backend::GitRepository;
pub use ingest::CommitIngestor;
pub use layout::{LaneLayoutEngine, LayoutConfig};
pub use merges::MergeBranchDetector;
pub use pipeline::GraphPipeline;
pub use port::RepositoryPort;
