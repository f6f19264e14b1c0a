//! Repository ingestion: raw port data to normalized [`Commit`] records.

mod branches;
mod tags;
pub mod text;

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::color::{make_color_pale, BranchColorAssigner, PaleKind};
use crate::core::{short_hash, BranchHeadType, Commit, UncommittedType};
use crate::divergence::BranchDivergenceAnalyzer;
use crate::port::{RawCommit, RepositoryPort};

/// Branch used when a commit cannot be attributed to any ref.
const FALLBACK_BRANCH: &str = "unknown";
/// Color of the uncommitted pseudo-commit when its branch has no commits.
const UNCOMMITTED_FALLBACK_COLOR: &str = "#cccccc";

const WIP_MESSAGE: &str = "WIP (Work In Progress)";

/// Output of one ingestion pass.
#[derive(Debug, Default)]
pub struct Ingested {
    /// Date-descending commits, pseudo-commit first when present.
    pub commits: Vec<Commit>,
    /// Short hash back to full hash, for later merge-base lookups.
    pub full_hashes: HashMap<String, String>,
}

/// Walks branch refs and builds the normalized commit list.
///
/// Color state lives inside one `ingest` call, so repeated runs over the
/// same snapshot produce identical output.
pub struct CommitIngestor<'a> {
    port: &'a dyn RepositoryPort,
}

impl<'a> CommitIngestor<'a> {
    pub fn new(port: &'a dyn RepositoryPort) -> Self {
        Self { port }
    }

    /// Ingest local branches only.
    pub fn ingest_local(&self) -> Ingested {
        self.ingest(false)
    }

    /// Ingest local branches plus remote refs and remote tags.
    pub fn ingest_with_remote(&self) -> Ingested {
        self.ingest(true)
    }

    fn ingest(&self, include_remote: bool) -> Ingested {
        let (local_map, remote_map) = if include_remote {
            branches::branch_maps_with_remote(self.port)
        } else {
            (branches::local_branch_map(self.port), HashMap::new())
        };
        let availability = branches::availability_map(self.port, include_remote);
        let mut tag_map = tags::tag_map(self.port, include_remote);

        let head_types = if include_remote {
            self.head_types()
        } else {
            HashMap::new()
        };

        let raw = self.collect_raw(include_remote);
        let mut colors = BranchColorAssigner::new();
        let now = Utc::now();

        let mut full_hashes = HashMap::with_capacity(raw.len());
        let mut commits = Vec::with_capacity(raw.len());
        for rc in raw {
            let short = short_hash(&rc.hash);
            full_hashes.insert(short.clone(), rc.hash.clone());

            let branch = local_map
                .get(&rc.hash)
                .or_else(|| remote_map.get(&rc.hash))
                .cloned()
                .unwrap_or_else(|| FALLBACK_BRANCH.to_string());
            let is_remote = !local_map.contains_key(&rc.hash) && remote_map.contains_key(&rc.hash);

            let base_color = colors.assign(&branch);
            let branch_color = if is_remote {
                make_color_pale(&base_color, PaleKind::Remote)
            } else {
                base_color
            };

            let (subject, body) = split_message(&rc.message);
            let head_type = head_types
                .get(crate::color::normalize_branch_name(&branch))
                .and_then(|heads| heads.get(&rc.hash))
                .copied()
                .unwrap_or_default();

            commits.push(Commit {
                hash: short,
                message: subject.to_string(),
                short_message: text::truncate_subject(subject, text::MESSAGE_MAX_LEN),
                description: body.to_string(),
                description_short: text::truncate_description(body, text::DESCRIPTION_MAX_LEN),
                author: rc.author_name.clone(),
                author_short: text::short_author_name(&rc.author_name),
                author_email: rc.author_email,
                date: rc.committed_at,
                date_relative: text::relative_date(rc.committed_at, now),
                date_short: text::full_date(rc.committed_at),
                parents: rc
                    .parent_hashes
                    .iter()
                    .map(|p| short_hash(p))
                    .collect::<SmallVec<[String; 2]>>(),
                branch: branch.clone(),
                branch_color,
                branch_availability: availability
                    .get(crate::color::normalize_branch_name(&branch))
                    .copied()
                    .unwrap_or_default(),
                is_remote,
                is_branch_head: head_type != BranchHeadType::None,
                branch_head_type: head_type,
                tags: tag_map.remove(&rc.hash).unwrap_or_default(),
                ..Default::default()
            });
        }

        // Stable by construction, so equal dates keep collection order.
        commits.sort_by(|a, b| b.date.cmp(&a.date));

        if let Some(wip) = self.uncommitted_commit(&commits) {
            commits.insert(0, wip);
        }

        info!(commits = commits.len(), include_remote, "ingestion complete");
        Ingested {
            commits,
            full_hashes,
        }
    }

    /// All reachable commits, local branches first, deduplicated by hash.
    fn collect_raw(&self, include_remote: bool) -> Vec<RawCommit> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut raw = Vec::new();

        let mut walk = |branch_names: Vec<String>| {
            for name in branch_names {
                match self.port.iter_commits(&name) {
                    Ok(commits) => {
                        for commit in commits {
                            if seen.insert(commit.hash.clone()) {
                                raw.push(commit);
                            }
                        }
                    }
                    Err(e) => warn!(branch = %name, error = %e, "skipping unreadable ref"),
                }
            }
        };

        match self.port.list_local_branches() {
            Ok(branches) => walk(branches.into_iter().map(|b| b.name).collect()),
            Err(e) => warn!(error = %e, "failed to list local branches"),
        }
        if include_remote {
            match self.port.list_remote_branches() {
                Ok(branches) => walk(branches.into_iter().map(|b| b.name).collect()),
                Err(e) => debug!(error = %e, "no remote branches to walk"),
            }
        }
        raw
    }

    /// Normalized branch -> full head hash -> marker, from per-branch
    /// divergence records. A commit is only a head of the branch it is
    /// attributed to, so markers are looked up under the owning branch.
    fn head_types(&self) -> HashMap<String, HashMap<String, BranchHeadType>> {
        let analyzer = BranchDivergenceAnalyzer::new(self.port);
        let mut map: HashMap<String, HashMap<String, BranchHeadType>> = HashMap::new();

        for branch in analyzer.branch_names() {
            let record = match analyzer.divergence(&branch) {
                Ok(record) => record,
                Err(e) => {
                    warn!(branch = %branch, error = %e, "divergence lookup failed");
                    continue;
                }
            };
            let heads = map.entry(branch).or_default();
            match (record.local_head, record.remote_head) {
                (Some(l), Some(r)) if l == r => {
                    heads.insert(l, BranchHeadType::Both);
                }
                (local, remote) => {
                    if let Some(l) = local {
                        heads.insert(l, BranchHeadType::Local);
                    }
                    if let Some(r) = remote {
                        heads.insert(r, BranchHeadType::Remote);
                    }
                }
            }
        }
        map
    }

    /// Pseudo-commit for a dirty working tree, or `None` when clean.
    ///
    /// An unreadable status is treated as clean.
    fn uncommitted_commit(&self, sorted: &[Commit]) -> Option<Commit> {
        let status = match self.port.working_tree_status() {
            Ok(status) => status,
            Err(e) => {
                debug!(error = %e, "working tree status unavailable, assuming clean");
                return None;
            }
        };
        if status.is_clean() {
            return None;
        }

        let branch = match self.port.current_branch_name() {
            Ok(branch) => branch,
            Err(e) => {
                warn!(error = %e, "cannot resolve HEAD branch for uncommitted changes");
                return None;
            }
        };

        let uncommitted_type = match (
            !status.staged_files.is_empty(),
            !status.unstaged_files.is_empty(),
        ) {
            (true, true) => UncommittedType::Both,
            (true, false) => UncommittedType::Staged,
            _ => UncommittedType::Working,
        };

        // A file can be both staged and modified again; count it once.
        let touched: HashSet<&String> = status
            .staged_files
            .iter()
            .chain(status.unstaged_files.iter())
            .collect();
        let description = match touched.len() {
            1 => "1 file".to_string(),
            n => format!("{n} files"),
        };

        // Newest real commit on the HEAD branch; the list is date-descending.
        let head = sorted.iter().find(|c| c.branch == branch);
        let now = Utc::now();

        Some(Commit {
            hash: short_hash(&format!("uncommit_{}_{}", branch, now.timestamp())),
            message: WIP_MESSAGE.to_string(),
            short_message: WIP_MESSAGE.to_string(),
            description: description.clone(),
            description_short: description,
            date: now,
            date_relative: "now".to_string(),
            date_short: text::full_date(now),
            parents: head.map(|h| h.hash.clone()).into_iter().collect(),
            branch,
            branch_color: head
                .map(|h| h.branch_color.clone())
                .unwrap_or_else(|| UNCOMMITTED_FALLBACK_COLOR.to_string()),
            is_uncommitted: true,
            uncommitted_type: Some(uncommitted_type),
            ..Default::default()
        })
    }
}

/// Subject line and trimmed body of a raw commit message.
fn split_message(message: &str) -> (&str, &str) {
    match message.split_once('\n') {
        Some((subject, body)) => (subject.trim_end(), body.trim()),
        None => (message.trim_end(), ""),
    }
}
