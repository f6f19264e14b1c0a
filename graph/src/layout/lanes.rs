//! Lane bookkeeping: branch relationships and the recyclable lane pool.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::core::Commit;

/// Per-branch relationships over one commit list.
///
/// Built once per layout pass from the already-styled commits, so virtual
/// merge branches participate like any other branch.
#[derive(Debug, Default)]
pub(crate) struct BranchGraph {
    /// Branches reachable through a commit's parents that differ from the
    /// commit's own branch.
    parents: HashMap<String, HashSet<String>>,
    /// Index of each branch's last (oldest) commit in the newest-first list.
    last_index: HashMap<String, usize>,
}

impl BranchGraph {
    pub(crate) fn build(commits: &[Commit]) -> Self {
        let branch_of: HashMap<&str, &str> = commits
            .iter()
            .map(|c| (c.hash.as_str(), c.branch.as_str()))
            .collect();

        let mut graph = Self::default();
        for (index, commit) in commits.iter().enumerate() {
            // Later index wins: the oldest occurrence closes the lane.
            graph.last_index.insert(commit.branch.clone(), index);

            for parent in &commit.parents {
                if let Some(&parent_branch) = branch_of.get(parent.as_str()) {
                    if parent_branch != commit.branch {
                        graph
                            .parents
                            .entry(commit.branch.clone())
                            .or_default()
                            .insert(parent_branch.to_string());
                    }
                }
            }
        }
        graph
    }

    pub(crate) fn parent_branches(&self, branch: &str) -> Option<&HashSet<String>> {
        self.parents.get(branch)
    }

    /// Whether `index` is the branch's oldest commit, closing its lane.
    pub(crate) fn closes_at(&self, branch: &str, index: usize) -> bool {
        self.last_index.get(branch) == Some(&index)
    }
}

/// Allocates lane indices, preferring freed lanes over new ones.
#[derive(Debug, Default)]
pub(crate) struct LanePool {
    free: BTreeSet<usize>,
    next: usize,
}

impl LanePool {
    pub(crate) fn starting_at(next: usize) -> Self {
        Self {
            free: BTreeSet::new(),
            next,
        }
    }

    /// Smallest freed lane at or above `min_lane`, else a fresh lane.
    pub(crate) fn allocate(&mut self, min_lane: usize) -> usize {
        if let Some(&lane) = self.free.range(min_lane..).next() {
            self.free.remove(&lane);
            return lane;
        }
        let lane = self.next.max(min_lane);
        // Lanes jumped over stay available for later branches.
        for skipped in self.next..lane {
            self.free.insert(skipped);
        }
        self.next = lane + 1;
        lane
    }

    pub(crate) fn release(&mut self, lane: usize) {
        self.free.insert(lane);
    }
}
