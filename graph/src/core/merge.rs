/// A synthetic branch reconstructed from a merge commit.
///
/// Not backed by any git object: it stands in for a branch whose ref was
/// deleted (or squashed away) after merging, so its commit sequence can
/// still be drawn as a branch. Rebuilt from scratch on every ingestion
/// pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeBranch {
    /// Merge base of the two merge parents (short hash).
    pub branch_point_hash: String,
    /// The merge commit itself (short hash).
    pub merge_point_hash: String,
    /// Short hashes from the merge parent back to, but excluding, the
    /// branch point, in traversal order.
    pub commits_in_branch: Vec<String>,
    /// `merge-<merge commit hash>`.
    pub virtual_branch_name: String,
    /// Color of the mainline branch before paling.
    pub original_color: String,
}

impl MergeBranch {
    pub fn contains(&self, hash: &str) -> bool {
        self.commits_in_branch.iter().any(|h| h == hash)
    }
}
