//! Branch-to-commit attribution and branch availability.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::color::normalize_branch_name;
use crate::core::BranchAvailability;
use crate::port::{BranchRef, RepositoryPort};

const MAIN_BRANCHES: [&str; 2] = ["main", "master"];

fn is_main(name: &str) -> bool {
    MAIN_BRANCHES.contains(&name)
}

/// Local branches with `main`/`master` moved to the front, so their
/// commits win attribution over topic branches that also reach them.
fn prioritized(mut branches: Vec<BranchRef>) -> Vec<BranchRef> {
    // Stable: preserves listing order within each group.
    branches.sort_by_key(|b| !is_main(&b.name));
    branches
}

/// Map every reachable commit (full hash) to the first local branch that
/// reaches it. Attribution is first-writer-wins and therefore depends on
/// branch iteration order; that order is stable, which is all the graph
/// needs.
pub(crate) fn local_branch_map(port: &dyn RepositoryPort) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let branches = match port.list_local_branches() {
        Ok(branches) => prioritized(branches),
        Err(e) => {
            warn!(error = %e, "failed to list local branches");
            return map;
        }
    };

    for branch in &branches {
        match port.iter_commits(&branch.name) {
            Ok(commits) => {
                for commit in commits {
                    map.entry(commit.hash).or_insert_with(|| branch.name.clone());
                }
            }
            Err(e) => {
                warn!(branch = %branch.name, error = %e, "skipping branch during attribution");
            }
        }
    }
    map
}

/// Local attribution plus a disjoint remote map: a commit lands in the
/// remote map only when no local branch reaches it.
pub(crate) fn branch_maps_with_remote(
    port: &dyn RepositoryPort,
) -> (HashMap<String, String>, HashMap<String, String>) {
    let local = local_branch_map(port);
    let mut remote = HashMap::new();

    let remote_branches = match port.list_remote_branches() {
        Ok(branches) => branches,
        Err(e) => {
            debug!(error = %e, "no remote branches available");
            return (local, remote);
        }
    };

    for branch in &remote_branches {
        match port.iter_commits(&branch.name) {
            Ok(commits) => {
                for commit in commits {
                    if !local.contains_key(&commit.hash) {
                        remote.entry(commit.hash).or_insert_with(|| branch.name.clone());
                    }
                }
            }
            Err(e) => {
                warn!(branch = %branch.name, error = %e, "skipping remote ref during attribution");
            }
        }
    }
    (local, remote)
}

/// Classify every known branch name as local-only, remote-only or both.
/// Remote names are compared with the `origin/` prefix stripped.
pub(crate) fn availability_map(
    port: &dyn RepositoryPort,
    include_remote: bool,
) -> HashMap<String, BranchAvailability> {
    let mut map = HashMap::new();

    let local: Vec<String> = match port.list_local_branches() {
        Ok(branches) => branches.into_iter().map(|b| b.name).collect(),
        Err(e) => {
            warn!(error = %e, "failed to list local branches for availability");
            Vec::new()
        }
    };
    for name in &local {
        map.insert(name.clone(), BranchAvailability::LocalOnly);
    }

    if include_remote {
        let remote = match port.list_remote_branches() {
            Ok(branches) => branches,
            Err(e) => {
                debug!(error = %e, "no remote branches for availability");
                Vec::new()
            }
        };
        for branch in remote {
            let name = normalize_branch_name(&branch.name).to_string();
            map.entry(name)
                .and_modify(|a| *a = BranchAvailability::Both)
                .or_insert(BranchAvailability::RemoteOnly);
        }
    }
    map
}
