//! End-to-end pipeline scenarios over real repositories.

use git2::{Oid, Repository, RepositoryInitOptions, Signature, Time};
use tempfile::TempDir;

use graph::color::hex_to_hsl;
use graph::core::{short_hash, UncommittedType};
use graph::{GitRepository, GraphModel, GraphPipeline};

struct Fixture {
    dir: TempDir,
    repo: Repository,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(dir.path(), &opts).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        Fixture { dir, repo }
    }

    /// Commit with an empty tree at a fixed timestamp, updating `refname`.
    ///
    /// Empty trees keep the working tree clean, so no scenario grows an
    /// accidental uncommitted pseudo-commit.
    fn commit(&self, refname: &str, parents: &[Oid], message: &str, seconds: i64) -> Oid {
        let sig =
            Signature::new("Test User", "test@example.com", &Time::new(seconds, 0)).unwrap();
        let tree_id = self.repo.treebuilder(None).unwrap().write().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let parents: Vec<git2::Commit> = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).unwrap())
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        self.repo
            .commit(Some(refname), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    fn build(&self) -> GraphModel {
        let port = GitRepository::open(self.dir.path()).unwrap();
        GraphPipeline::new(&port).build_local()
    }
}

fn find<'a>(model: &'a GraphModel, oid: &Oid) -> &'a graph::Commit {
    let short = short_hash(&oid.to_string());
    model
        .commits
        .iter()
        .find(|c| c.hash == short)
        .unwrap_or_else(|| panic!("commit {short} not in model"))
}

#[test]
fn linear_main_stays_in_lane_zero() {
    let fx = Fixture::new();
    let c1 = fx.commit("refs/heads/main", &[], "first", 100);
    let c2 = fx.commit("refs/heads/main", &[c1], "second", 200);
    let c3 = fx.commit("refs/heads/main", &[c2], "third", 300);

    let model = fx.build();
    assert_eq!(model.commits.len(), 3);
    assert!(model.merge_branches.is_empty());

    // Newest first, same x for the whole branch, strictly increasing y.
    let hashes: Vec<&str> = model.commits.iter().map(|c| c.hash.as_str()).collect();
    assert_eq!(
        hashes,
        vec![
            short_hash(&c3.to_string()),
            short_hash(&c2.to_string()),
            short_hash(&c1.to_string())
        ]
    );
    assert!(model.commits.iter().all(|c| c.branch == "main"));
    assert!(model.commits.iter().all(|c| c.x == model.commits[0].x));
    assert!(model
        .commits
        .windows(2)
        .all(|pair| pair[0].y < pair[1].y));
}

#[test]
fn feature_branch_takes_lane_one_with_its_semantic_hue() {
    let fx = Fixture::new();
    let c1 = fx.commit("refs/heads/main", &[], "first", 100);
    let c2 = fx.commit("refs/heads/main", &[c1], "second", 200);
    let f1 = fx.commit("refs/heads/feature/login", &[c2], "login form", 300);

    let model = fx.build();
    let feature = find(&model, &f1);
    let main = find(&model, &c2);

    assert_eq!(feature.branch, "feature/login");
    // One lane to the right of main.
    assert_eq!(feature.x - main.x, 20);

    let (hue, _, _) = hex_to_hsl(&feature.branch_color).unwrap();
    assert!((hue - 90.0).abs() < 2.0, "feature hue was {hue}");
}

#[test]
fn merged_branch_becomes_a_desaturated_virtual_branch() {
    let fx = Fixture::new();
    let c1 = fx.commit("refs/heads/main", &[], "base", 100);
    let f1 = fx.commit("refs/heads/feature/x", &[c1], "feature work", 200);
    let c2 = fx.commit("refs/heads/main", &[c1], "main work", 250);
    let merge = fx.commit("refs/heads/main", &[c2, f1], "merge feature/x", 300);

    let model = fx.build();
    assert_eq!(model.merge_branches.len(), 1);
    let mb = &model.merge_branches[0];
    assert_eq!(mb.merge_point_hash, short_hash(&merge.to_string()));
    assert_eq!(mb.branch_point_hash, short_hash(&c1.to_string()));
    assert_eq!(mb.commits_in_branch, vec![short_hash(&f1.to_string())]);

    let styled = find(&model, &f1);
    assert!(styled.is_merge_branch);
    assert_eq!(styled.branch, mb.virtual_branch_name);

    // Strictly more desaturated than an unmerged branch color.
    let (_, styled_s, _) = hex_to_hsl(&styled.branch_color).unwrap();
    let (_, plain_s, _) = hex_to_hsl(&find(&model, &c2).branch_color).unwrap();
    assert!(styled_s < plain_s);
}

#[test]
fn dirty_working_tree_synthesizes_one_pseudo_commit() {
    let fx = Fixture::new();
    let head = fx.commit("refs/heads/main", &[], "base", 100);

    // Two staged files, one untracked.
    std::fs::write(fx.dir.path().join("a.txt"), "a").unwrap();
    std::fs::write(fx.dir.path().join("b.txt"), "b").unwrap();
    let mut index = fx.repo.index().unwrap();
    index.add_path(std::path::Path::new("a.txt")).unwrap();
    index.add_path(std::path::Path::new("b.txt")).unwrap();
    index.write().unwrap();
    std::fs::write(fx.dir.path().join("c.txt"), "c").unwrap();

    let model = fx.build();
    let wip = &model.commits[0];
    assert!(wip.is_uncommitted);
    assert_eq!(wip.uncommitted_type, Some(UncommittedType::Both));
    assert_eq!(wip.branch, "main");
    assert_eq!(wip.parents.as_slice(), [short_hash(&head.to_string())]);
    assert_eq!(
        model.commits.iter().filter(|c| c.is_uncommitted).count(),
        1
    );
}

#[test]
fn sequential_branches_recycle_a_lane() {
    let fx = Fixture::new();
    let c1 = fx.commit("refs/heads/main", &[], "base", 100);
    let a1 = fx.commit("refs/heads/feature-a", &[c1], "a1", 200);
    let a2 = fx.commit("refs/heads/feature-a", &[a1], "a2", 250);
    let b1 = fx.commit("refs/heads/feature-b", &[c1], "b1", 400);
    let b2 = fx.commit("refs/heads/feature-b", &[b1], "b2", 450);

    let model = fx.build();
    let lane_a = find(&model, &a2).x;
    let lane_b = find(&model, &b2).x;
    assert_eq!(lane_a, lane_b);
    assert_ne!(lane_a, find(&model, &c1).x);
}

#[test]
fn overlapping_branches_occupy_distinct_lanes() {
    let fx = Fixture::new();
    let c1 = fx.commit("refs/heads/main", &[], "base", 100);
    let a1 = fx.commit("refs/heads/feature-a", &[c1], "a1", 200);
    let b1 = fx.commit("refs/heads/feature-b", &[c1], "b1", 300);
    let a2 = fx.commit("refs/heads/feature-a", &[a1], "a2", 400);
    let b2 = fx.commit("refs/heads/feature-b", &[b1], "b2", 500);

    let model = fx.build();
    assert_ne!(find(&model, &a2).x, find(&model, &b2).x);
    assert_eq!(find(&model, &a1).x, find(&model, &a2).x);
    assert_eq!(find(&model, &b1).x, find(&model, &b2).x);
}

#[test]
fn rebuilding_an_unchanged_repository_is_deterministic() {
    let fx = Fixture::new();
    let c1 = fx.commit("refs/heads/main", &[], "base", 100);
    let f1 = fx.commit("refs/heads/feature/x", &[c1], "feature", 200);
    let c2 = fx.commit("refs/heads/main", &[c1], "main work", 250);
    fx.commit("refs/heads/main", &[c2, f1], "merge", 300);
    fx.commit("refs/heads/topic-1", &[c2], "topic", 400);

    let key = |model: &GraphModel| -> Vec<(String, String, String, i32, i32)> {
        model
            .commits
            .iter()
            .map(|c| {
                (
                    c.hash.clone(),
                    c.branch.clone(),
                    c.branch_color.clone(),
                    c.x,
                    c.y,
                )
            })
            .collect()
    };
    assert_eq!(key(&fx.build()), key(&fx.build()));
}
