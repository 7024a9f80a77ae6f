use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use taskmerge::commands::check::CheckOptions;
use taskmerge::commands::{abort, check, merge, push, resolve, status};
use taskmerge::git::check_git_available;
use taskmerge::telemetry::{init_tracing, level_for};

#[derive(Parser)]
#[command(name = "taskmerge")]
#[command(about = "Merge the branches that belong to a set of task ids", long_about = None)]
#[command(version)]
struct Cli {
    /// Repository to operate on
    #[arg(long, global = true, default_value = ".")]
    repo: PathBuf,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the unmerged branches for the task ids and write the required list
    Check {
        /// Task id file (one id per line)
        #[arg(long)]
        task_ids: Option<PathBuf>,

        /// Skip `git fetch --all`
        #[arg(long)]
        no_fetch: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge every required branch into the current branch
    ///
    /// Stops on the first conflict and exits with status 2. Resolve the
    /// conflicts, then run `taskmerge resolve`.
    Merge {
        #[arg(long)]
        json: bool,
    },

    /// Commit the resolved conflict and continue with the remaining branches
    Resolve {
        /// Commit message for the resolution
        #[arg(short, long)]
        message: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Abort the conflicted merge and keep the branch for a later retry
    Abort,

    /// Push the current branch, setting the upstream if it has none
    Push,

    /// Show the state of the merge workflow
    Status {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(level_for(cli.verbose));

    match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<ExitCode> {
    check_git_available()?;
    let repo = cli.repo;

    match cli.command {
        Commands::Check {
            task_ids,
            no_fetch,
            json,
        } => {
            let options = CheckOptions {
                task_ids,
                fetch: !no_fetch,
            };
            check::execute(&repo, options, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Merge { json } => merge::execute(&repo, json),
        Commands::Resolve { message, json } => resolve::execute(&repo, message, json),
        Commands::Abort => {
            abort::execute(&repo)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Push => {
            push::execute(&repo)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Status { json } => {
            status::execute(&repo, json)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
