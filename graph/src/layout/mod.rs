//! Lane assignment and 2-D positioning.

mod lanes;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::core::{Commit, MergeBranch};
use lanes::{BranchGraph, LanePool};

const MAIN_LANE: usize = 0;

fn is_main_branch(name: &str) -> bool {
    name.eq_ignore_ascii_case("main") || name.eq_ignore_ascii_case("master")
}

/// Pixel spacing applied to (lane, row) positions.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    pub branch_spacing: i32,
    pub commit_start_x: i32,
    pub vertical_spacing: i32,
    pub start_y: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            branch_spacing: 20,
            commit_start_x: 160,
            vertical_spacing: 30,
            start_y: 50,
        }
    }
}

/// Assigns one lane per branch with recycling and writes coordinates.
///
/// Holds the lane map for one pass; construct a fresh engine per layout.
#[derive(Debug, Default)]
pub struct LaneLayoutEngine {
    config: LayoutConfig,
    branch_lanes: HashMap<String, usize>,
}

impl LaneLayoutEngine {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            config,
            branch_lanes: HashMap::new(),
        }
    }

    /// Position every commit. The input must already be sorted newest
    /// first; ordering is preserved, only `x`/`y`/`table_row` change.
    pub fn layout(
        &mut self,
        commits: Vec<Commit>,
        merge_branches: &[MergeBranch],
    ) -> Vec<Commit> {
        self.branch_lanes.clear();
        let graph = BranchGraph::build(&commits);
        let virtual_names: HashSet<&str> = merge_branches
            .iter()
            .map(|b| b.virtual_branch_name.as_str())
            .collect();

        // Pin main before the pass so no topic branch can claim lane 0.
        let main_branch = commits
            .iter()
            .map(|c| c.branch.as_str())
            .find(|b| is_main_branch(b))
            .map(str::to_string);
        let mut pool = match &main_branch {
            Some(name) => {
                self.branch_lanes.insert(name.clone(), MAIN_LANE);
                LanePool::starting_at(MAIN_LANE + 1)
            }
            None => LanePool::starting_at(MAIN_LANE),
        };

        let mut positioned = Vec::with_capacity(commits.len());
        for (index, mut commit) in commits.into_iter().enumerate() {
            let lane = match self.branch_lanes.get(&commit.branch) {
                Some(&lane) => lane,
                None => {
                    let mut min_lane = graph
                        .parent_branches(&commit.branch)
                        .into_iter()
                        .flatten()
                        .filter_map(|p| self.branch_lanes.get(p))
                        .max()
                        .map_or(0, |&max| max + 1);
                    if virtual_names.contains(commit.branch.as_str()) {
                        min_lane = min_lane.max(MAIN_LANE + 1);
                    }
                    let lane = pool.allocate(min_lane);
                    debug!(branch = %commit.branch, lane, "assigned lane");
                    self.branch_lanes.insert(commit.branch.clone(), lane);
                    lane
                }
            };

            if graph.closes_at(&commit.branch, index)
                && main_branch.as_deref() != Some(commit.branch.as_str())
            {
                pool.release(lane);
            }

            commit.x = lane as i32 * self.config.branch_spacing + self.config.commit_start_x;
            commit.y = index as i32 * self.config.vertical_spacing + self.config.start_y;
            commit.table_row = index;
            positioned.push(commit);
        }
        positioned
    }

    /// Lane assigned to `branch` during the last pass.
    pub fn branch_lane(&self, branch: &str) -> Option<usize> {
        self.branch_lanes.get(branch).copied()
    }

    pub fn branch_lanes(&self) -> &HashMap<String, usize> {
        &self.branch_lanes
    }
}
