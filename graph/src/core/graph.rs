use std::collections::HashSet;

use super::commit::Commit;
use super::merge::MergeBranch;

/// Final output of the pipeline: positioned commits plus the virtual
/// merge branches, handed to the renderer as-is.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    /// Ordered newest-first; the uncommitted pseudo-commit, when present,
    /// is always the first element.
    pub commits: Vec<Commit>,
    pub merge_branches: Vec<MergeBranch>,
}

/// Aggregate counts over one graph, for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepositoryStats {
    pub authors: usize,
    pub branches: usize,
    pub commits: usize,
    pub tags: usize,
    pub local_tags: usize,
    pub remote_tags: usize,
}

impl GraphModel {
    /// A successfully opened but empty repository yields an empty commit
    /// list rather than an error.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn stats(&self) -> RepositoryStats {
        let mut authors = HashSet::new();
        let mut branches = HashSet::new();
        let mut all_tags = HashSet::new();
        let mut local_tags = HashSet::new();
        let mut remote_tags = HashSet::new();

        for commit in &self.commits {
            authors.insert(commit.author.as_str());
            branches.insert(commit.branch.as_str());
            for tag in &commit.tags {
                all_tags.insert(tag.name.as_str());
                if tag.is_remote {
                    remote_tags.insert(tag.name.as_str());
                } else {
                    local_tags.insert(tag.name.as_str());
                }
            }
        }

        RepositoryStats {
            authors: authors.len(),
            branches: branches.len(),
            commits: self.commits.len(),
            tags: all_tags.len(),
            local_tags: local_tags.len(),
            remote_tags: remote_tags.len(),
        }
    }
}
