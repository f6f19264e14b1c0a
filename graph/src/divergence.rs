//! Local/remote head comparison per branch.

use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use tracing::{debug, warn};

use crate::color::normalize_branch_name;
use crate::port::RepositoryPort;

/// How a branch's local and remote heads relate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchDivergence {
    /// Both heads exist, differ, and neither equals the merge-base.
    pub diverged: bool,
    pub local_head: Option<String>,
    pub remote_head: Option<String>,
    pub merge_base: Option<String>,
}

/// Compares local and remote branch heads over one repository snapshot.
///
/// Head maps are captured at construction; `divergence` only hits the port
/// for the merge-base lookup.
pub struct BranchDivergenceAnalyzer<'a> {
    port: &'a dyn RepositoryPort,
    local_heads: HashMap<String, String>,
    remote_heads: HashMap<String, String>,
}

impl<'a> BranchDivergenceAnalyzer<'a> {
    pub fn new(port: &'a dyn RepositoryPort) -> Self {
        let local_heads = match port.list_local_branches() {
            Ok(branches) => branches.into_iter().map(|b| (b.name, b.head)).collect(),
            Err(e) => {
                warn!(error = %e, "failed to list local branches for divergence");
                HashMap::new()
            }
        };
        let remote_heads = match port.list_remote_branches() {
            Ok(branches) => branches
                .into_iter()
                .map(|b| (normalize_branch_name(&b.name).to_string(), b.head))
                .collect(),
            Err(e) => {
                debug!(error = %e, "no remote branches for divergence");
                HashMap::new()
            }
        };
        Self {
            port,
            local_heads,
            remote_heads,
        }
    }

    /// All branch names known locally or remotely, remote names normalized.
    pub fn branch_names(&self) -> BTreeSet<String> {
        self.local_heads
            .keys()
            .chain(self.remote_heads.keys())
            .cloned()
            .collect()
    }

    pub fn local_head(&self, branch: &str) -> Option<&str> {
        self.local_heads.get(branch).map(String::as_str)
    }

    pub fn remote_head(&self, branch: &str) -> Option<&str> {
        self.remote_heads.get(branch).map(String::as_str)
    }

    /// Classify `branch`. Never fails: a merge-base lookup error is treated
    /// as unrelated histories, which counts as diverged.
    pub fn divergence(&self, branch: &str) -> Result<BranchDivergence> {
        let local = self.local_heads.get(branch).cloned();
        let remote = self.remote_heads.get(branch).cloned();

        let (Some(l), Some(r)) = (local.clone(), remote.clone()) else {
            return Ok(BranchDivergence {
                diverged: false,
                local_head: local,
                remote_head: remote,
                merge_base: None,
            });
        };

        if l == r {
            return Ok(BranchDivergence {
                diverged: false,
                local_head: Some(l.clone()),
                remote_head: Some(r),
                merge_base: Some(l),
            });
        }

        let merge_base = match self.port.merge_base(&l, &r) {
            Ok(base) => base,
            Err(e) => {
                warn!(branch, error = %e, "merge-base lookup failed");
                None
            }
        };
        let diverged = match &merge_base {
            Some(base) => *base != l && *base != r,
            // No common ancestor at all: both sides moved independently.
            None => true,
        };

        Ok(BranchDivergence {
            diverged,
            local_head: Some(l),
            remote_head: Some(r),
            merge_base,
        })
    }
}
