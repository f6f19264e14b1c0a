use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use git2::{BranchType, ErrorCode, Oid, Repository, Sort, Status, StatusOptions};
use smallvec::SmallVec;

use crate::error::GraphError;
use crate::port::{BranchRef, RawCommit, RawTag, RepositoryPort, WorkingTreeStatus};

/// git2-backed implementation of [`RepositoryPort`].
pub struct GitRepository {
    path: PathBuf,
    repo: Repository,
}

impl GitRepository {
    /// Open an existing repository.
    ///
    /// This is the only hard failure in the pipeline; everything after a
    /// successful open degrades per-ref instead of aborting.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        let path = path.as_ref().to_path_buf();
        let repo = Repository::open(&path).map_err(|source| GraphError::RepositoryUnavailable {
            path: path.clone(),
            source,
        })?;
        Ok(GitRepository { path, repo })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn branches_of(&self, kind: BranchType) -> Result<Vec<BranchRef>> {
        let mut refs = Vec::new();
        for branch in self.repo.branches(Some(kind))? {
            let (branch, _) = branch?;
            let Some(name) = branch.name()? else { continue };
            // The symbolic origin/HEAD ref is not a branch of its own.
            if name.ends_with("/HEAD") {
                continue;
            }
            if let Some(target) = branch.get().target() {
                refs.push(BranchRef {
                    name: name.to_string(),
                    head: target.to_string(),
                });
            }
        }
        Ok(refs)
    }

    fn raw_commit(&self, commit: &git2::Commit) -> Result<RawCommit> {
        let committed_at = commit_time(commit)?;
        let parent_hashes: SmallVec<[String; 2]> =
            commit.parent_ids().map(|oid| oid.to_string()).collect();
        Ok(RawCommit {
            hash: commit.id().to_string(),
            message: commit.message().unwrap_or("").to_string(),
            author_name: commit.author().name().unwrap_or("Unknown").to_string(),
            author_email: commit.author().email().unwrap_or("").to_string(),
            committed_at,
            parent_hashes,
        })
    }
}

fn commit_time(commit: &git2::Commit) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(commit.time().seconds(), 0)
        .single()
        .context("Invalid commit timestamp")
}

impl RepositoryPort for GitRepository {
    fn list_local_branches(&self) -> Result<Vec<BranchRef>> {
        self.branches_of(BranchType::Local)
    }

    fn list_remote_branches(&self) -> Result<Vec<BranchRef>> {
        self.branches_of(BranchType::Remote)
    }

    fn iter_commits(&self, refname: &str) -> Result<Vec<RawCommit>> {
        let head = self
            .repo
            .revparse_single(refname)
            .with_context(|| format!("Failed to resolve ref {refname}"))?
            .peel_to_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head.id())?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(self.raw_commit(&commit)?);
        }
        Ok(commits)
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<Option<String>> {
        let a = Oid::from_str(a)?;
        let b = Oid::from_str(b)?;
        match self.repo.merge_base(a, b) {
            Ok(base) => Ok(Some(base.to_string())),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_tags(&self) -> Result<Vec<RawTag>> {
        let mut tags = Vec::new();
        for name in self.repo.tag_names(None)?.iter().flatten() {
            let reference = match self.repo.find_reference(&format!("refs/tags/{name}")) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(tag = name, error = %e, "skipping unreadable tag");
                    continue;
                }
            };
            let Ok(target) = reference.peel_to_commit() else {
                // Tags pointing at trees or blobs have no place in the graph.
                continue;
            };
            let message = reference
                .peel_to_tag()
                .ok()
                .and_then(|t| t.message().map(|m| m.to_string()));
            tags.push(RawTag {
                name: name.to_string(),
                target_hash: target.id().to_string(),
                message,
            });
        }
        Ok(tags)
    }

    fn list_remote_tags(&self) -> Result<Vec<RawTag>> {
        let mut tags = Vec::new();
        let refs = match self.repo.references_glob("refs/remotes/*/tags/*") {
            Ok(refs) => refs,
            Err(e) => {
                tracing::debug!(error = %e, "no remote tag refs");
                return Ok(tags);
            }
        };
        for reference in refs {
            let reference = reference?;
            let Some(name) = reference.name() else { continue };
            let Some((_, tag_name)) = name.split_once("/tags/") else {
                continue;
            };
            let Ok(target) = reference.peel_to_commit() else {
                continue;
            };
            tags.push(RawTag {
                name: tag_name.to_string(),
                target_hash: target.id().to_string(),
                message: None,
            });
        }
        Ok(tags)
    }

    fn working_tree_status(&self) -> Result<WorkingTreeStatus> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true).recurse_untracked_dirs(true);
        let statuses = self.repo.statuses(Some(&mut opts))?;

        let staged = Status::INDEX_NEW
            | Status::INDEX_MODIFIED
            | Status::INDEX_DELETED
            | Status::INDEX_RENAMED
            | Status::INDEX_TYPECHANGE;
        let unstaged = Status::WT_NEW
            | Status::WT_MODIFIED
            | Status::WT_DELETED
            | Status::WT_RENAMED
            | Status::WT_TYPECHANGE;

        let mut status = WorkingTreeStatus::default();
        for entry in statuses.iter() {
            let Some(path) = entry.path() else { continue };
            if entry.status().intersects(staged) {
                status.staged_files.push(path.to_string());
            }
            if entry.status().intersects(unstaged) {
                status.unstaged_files.push(path.to_string());
            }
        }
        Ok(status)
    }

    fn current_branch_name(&self) -> Result<String> {
        let head = self.repo.head()?;
        Ok(head.shorthand().unwrap_or("HEAD").to_string())
    }
}
