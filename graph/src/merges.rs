//! Virtual merge-branch detection.
//!
//! A merge commit's second parent marks the tip of a branch that may no
//! longer exist as a ref. Walking first-parents from that tip back to the
//! merge-base reconstructs the branch, so it can be drawn in its own lane
//! with a faded color.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::color::{make_color_pale, PaleKind};
use crate::core::{Commit, MergeBranch};
use crate::port::RepositoryPort;

/// Color used when the mainline parent's color cannot be resolved.
const MERGE_FALLBACK_COLOR: &str = "#666666";

/// Scans an ingested commit list for 2-parent merge commits.
///
/// Octopus merges are reduced to their first two parents; extra parents are
/// ignored.
pub struct MergeBranchDetector<'a> {
    port: &'a dyn RepositoryPort,
    /// Short hash back to full hash, for merge-base lookups.
    full_hashes: &'a HashMap<String, String>,
}

impl<'a> MergeBranchDetector<'a> {
    pub fn new(port: &'a dyn RepositoryPort, full_hashes: &'a HashMap<String, String>) -> Self {
        Self { port, full_hashes }
    }

    /// One [`MergeBranch`] per resolvable merge commit, in commit-list
    /// order. Unresolvable merges are skipped whole.
    pub fn detect(&self, commits: &[Commit]) -> Vec<MergeBranch> {
        let by_hash: HashMap<&str, &Commit> =
            commits.iter().map(|c| (c.hash.as_str(), c)).collect();

        let mut branches = Vec::new();
        for commit in commits.iter().filter(|c| c.is_merge()) {
            match self.trace(commit, &by_hash) {
                Some(branch) => branches.push(branch),
                None => debug!(merge = %commit.hash, "skipping unresolvable merge"),
            }
        }
        branches
    }

    fn trace(&self, merge: &Commit, by_hash: &HashMap<&str, &Commit>) -> Option<MergeBranch> {
        let mainline = merge.parents[0].as_str();
        let incoming = merge.parents[1].as_str();

        let base = match self.merge_base_short(mainline, incoming) {
            Ok(Some(base)) => base,
            Ok(None) => {
                // Unrelated histories; without a branch point there is no
                // branch to reconstruct.
                debug!(merge = %merge.hash, "merge parents share no ancestor");
                return None;
            }
            Err(e) => {
                warn!(merge = %merge.hash, error = %e, "merge-base lookup failed");
                return None;
            }
        };

        // First-parent walk from the incoming tip down to the base.
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut cursor = incoming.to_string();
        loop {
            if cursor == base || !visited.insert(cursor.clone()) {
                break;
            }
            let Some(commit) = by_hash.get(cursor.as_str()) else {
                // Chain left the ingested set; no partial branch.
                debug!(merge = %merge.hash, missing = %cursor, "merge chain not fully ingested");
                return None;
            };
            chain.push(cursor.clone());
            match commit.parents.first() {
                Some(parent) => cursor = parent.clone(),
                None => break,
            }
        }

        if chain.is_empty() {
            return None;
        }

        let original_color = by_hash
            .get(mainline)
            .map(|c| c.branch_color.clone())
            .unwrap_or_else(|| MERGE_FALLBACK_COLOR.to_string());

        Some(MergeBranch {
            branch_point_hash: base,
            merge_point_hash: merge.hash.clone(),
            commits_in_branch: chain,
            virtual_branch_name: format!("merge-{}", merge.hash),
            original_color,
        })
    }

    /// Merge-base of two short hashes, returned as a short hash.
    fn merge_base_short(&self, a: &str, b: &str) -> anyhow::Result<Option<String>> {
        let full_a = self.full_hashes.get(a).map(String::as_str).unwrap_or(a);
        let full_b = self.full_hashes.get(b).map(String::as_str).unwrap_or(b);
        Ok(self
            .port
            .merge_base(full_a, full_b)?
            .map(|h| crate::core::short_hash(&h)))
    }
}

/// Re-attribute and re-color the commits owned by virtual merge branches.
///
/// Produces a new list rather than mutating in place. First detection wins
/// when two merge branches claim the same commit.
pub fn apply_merge_styling(commits: Vec<Commit>, merge_branches: &[MergeBranch]) -> Vec<Commit> {
    let mut owner: HashMap<&str, &MergeBranch> = HashMap::new();
    for branch in merge_branches {
        for hash in &branch.commits_in_branch {
            owner.entry(hash.as_str()).or_insert(branch);
        }
    }

    commits
        .into_iter()
        .map(|mut commit| {
            if let Some(branch) = owner.get(commit.hash.as_str()).copied() {
                commit.branch = branch.virtual_branch_name.clone();
                commit.branch_color = make_color_pale(&commit.branch_color, PaleKind::Merge);
                commit.is_merge_branch = true;
            }
            commit
        })
        .collect()
}
