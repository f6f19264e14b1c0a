use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use graph::{GitRepository, GraphPipeline};

#[derive(Parser)]
#[command(name = "gitviz")]
#[command(about = "Build a positioned commit graph from a Git repository", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the positioned commit graph
    Graph {
        /// Path to the repository
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Include remote branches and tags
        #[arg(short, long)]
        remote: bool,
    },
    /// Show repository statistics
    Stats {
        /// Path to the repository
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Include remote branches and tags
        #[arg(short, long)]
        remote: bool,
    },
    /// List detected virtual merge branches
    Merges {
        /// Path to the repository
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

fn build(path: &PathBuf, remote: bool) -> Result<graph::GraphModel> {
    let repo = GitRepository::open(path)?;
    let pipeline = GraphPipeline::new(&repo);
    Ok(if remote {
        pipeline.build_with_remote()
    } else {
        pipeline.build_local()
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Graph { path, remote } => {
            let model = build(&path, remote)?;
            if model.is_empty() {
                println!("Repository is empty");
                return Ok(());
            }
            for commit in &model.commits {
                let marker = if commit.is_uncommitted {
                    "*"
                } else if commit.is_merge() {
                    "M"
                } else {
                    " "
                };
                let tags = if commit.tags.is_empty() {
                    String::new()
                } else {
                    let names: Vec<&str> =
                        commit.tags.iter().map(|t| t.name.as_str()).collect();
                    format!(" [{}]", names.join(", "))
                };
                println!(
                    "{} {:>4},{:<4} {} {} ({}) {} {}{}",
                    marker,
                    commit.x,
                    commit.y,
                    commit.hash,
                    commit.branch_color,
                    commit.branch,
                    commit.date_short,
                    commit.short_message,
                    tags
                );
            }
        }
        Commands::Stats { path, remote } => {
            let model = build(&path, remote)?;
            let stats = model.stats();
            println!("Commits:  {}", stats.commits);
            println!("Branches: {}", stats.branches);
            println!("Authors:  {}", stats.authors);
            println!(
                "Tags:     {} ({} local, {} remote)",
                stats.tags, stats.local_tags, stats.remote_tags
            );
        }
        Commands::Merges { path } => {
            let model = build(&path, false)?;
            if model.merge_branches.is_empty() {
                println!("No merged branches detected");
                return Ok(());
            }
            for mb in &model.merge_branches {
                println!(
                    "{}: {} commit(s), merged at {} from {}",
                    mb.virtual_branch_name,
                    mb.commits_in_branch.len(),
                    mb.merge_point_hash,
                    mb.branch_point_hash
                );
            }
        }
    }

    Ok(())
}
