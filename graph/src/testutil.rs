//! In-memory [`RepositoryPort`] for unit tests.

use std::collections::{HashMap, HashSet, VecDeque};

use anyhow::{anyhow, Result};
use chrono::{DateTime, TimeZone, Utc};
use smallvec::SmallVec;

use crate::port::{BranchRef, RawCommit, RawTag, RepositoryPort, WorkingTreeStatus};

/// Scripted repository: commits are added explicitly and branches point at
/// them by full hash.
#[derive(Debug, Default)]
pub struct MemoryPort {
    pub commits: HashMap<String, RawCommit>,
    pub local_branches: Vec<BranchRef>,
    pub remote_branches: Vec<BranchRef>,
    pub tags: Vec<RawTag>,
    pub remote_tags: Vec<RawTag>,
    pub status: WorkingTreeStatus,
    pub head_branch: String,
}

impl MemoryPort {
    pub fn new() -> Self {
        Self {
            head_branch: "main".to_string(),
            ..Default::default()
        }
    }

    /// Add a commit and return its full hash. `prefix` is padded by
    /// repetition to 40 characters, so short prefixes stay recognizable
    /// in assertions.
    pub fn add_commit(
        &mut self,
        prefix: &str,
        parents: &[&String],
        timestamp: i64,
        message: &str,
    ) -> String {
        let hash: String = prefix.chars().cycle().take(40).collect();
        let parent_hashes: SmallVec<[String; 2]> =
            parents.iter().map(|p| (*p).clone()).collect();
        self.commits.insert(
            hash.clone(),
            RawCommit {
                hash: hash.clone(),
                message: message.to_string(),
                author_name: "Test Author".to_string(),
                author_email: "test@example.com".to_string(),
                committed_at: self.at(timestamp),
                parent_hashes,
            },
        );
        hash
    }

    pub fn add_local_branch(&mut self, name: &str, head: &str) {
        self.local_branches.push(BranchRef {
            name: name.to_string(),
            head: head.to_string(),
        });
    }

    pub fn add_remote_branch(&mut self, name: &str, head: &str) {
        self.remote_branches.push(BranchRef {
            name: name.to_string(),
            head: head.to_string(),
        });
    }

    fn at(&self, timestamp: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(timestamp, 0).unwrap()
    }

    fn head_of(&self, refname: &str) -> Option<&str> {
        self.local_branches
            .iter()
            .chain(self.remote_branches.iter())
            .find(|b| b.name == refname)
            .map(|b| b.head.as_str())
    }

    fn ancestors(&self, start: &str) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([start.to_string()]);
        while let Some(hash) = queue.pop_front() {
            if !seen.insert(hash.clone()) {
                continue;
            }
            if let Some(commit) = self.commits.get(&hash) {
                for parent in &commit.parent_hashes {
                    queue.push_back(parent.clone());
                }
            }
        }
        seen
    }
}

impl RepositoryPort for MemoryPort {
    fn list_local_branches(&self) -> Result<Vec<BranchRef>> {
        Ok(self.local_branches.clone())
    }

    fn list_remote_branches(&self) -> Result<Vec<BranchRef>> {
        Ok(self.remote_branches.clone())
    }

    fn iter_commits(&self, refname: &str) -> Result<Vec<RawCommit>> {
        let head = self
            .head_of(refname)
            .ok_or_else(|| anyhow!("unknown ref: {refname}"))?;
        let mut reachable: Vec<RawCommit> = self
            .ancestors(head)
            .into_iter()
            .filter_map(|h| self.commits.get(&h).cloned())
            .collect();
        // Newest first, hash as tie-breaker for determinism.
        reachable.sort_by(|a, b| {
            b.committed_at
                .cmp(&a.committed_at)
                .then_with(|| a.hash.cmp(&b.hash))
        });
        Ok(reachable)
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<Option<String>> {
        let ancestors_of_a = self.ancestors(a);
        let mut candidates: Vec<&RawCommit> = self
            .ancestors(b)
            .intersection(&ancestors_of_a)
            .filter_map(|h| self.commits.get(h))
            .collect();
        candidates.sort_by_key(|c| std::cmp::Reverse(c.committed_at));
        Ok(candidates.first().map(|c| c.hash.clone()))
    }

    fn list_tags(&self) -> Result<Vec<RawTag>> {
        Ok(self.tags.clone())
    }

    fn list_remote_tags(&self) -> Result<Vec<RawTag>> {
        Ok(self.remote_tags.clone())
    }

    fn working_tree_status(&self) -> Result<WorkingTreeStatus> {
        Ok(self.status.clone())
    }

    fn current_branch_name(&self) -> Result<String> {
        Ok(self.head_branch.clone())
    }
}
