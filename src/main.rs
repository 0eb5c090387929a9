use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;

use meta_git_flow::{CloneOrchestrator, FlowDispatcher, GitCloneSync, SystemGit, Workspace};

#[derive(Parser)]
#[command(name = "meta-flow")]
#[command(author, version, about = "Run git-flow across every repo of a meta workspace", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Workspace root (default: nearest directory above the current one with a .meta file)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Performs the initial clone for all repos and checks out the tracking branch
    Clone {
        /// Options for the sync step, given after `--` (e.g. `-- --depth 1`)
        #[arg(last = true, value_name = "SYNC_ARGS")]
        sync_args: Vec<String>,
    },

    /// Passes a git flow command along to multiple repos (only if everything is on the same branch)
    Flow {
        /// Projects to operate on (default: all)
        #[arg(value_name = "PROJECT")]
        projects: Vec<String>,

        /// Git flow command to execute (e.g. "init", "feature start foo"); takes the rest of the line
        #[arg(
            short = 'c',
            long = "command",
            num_args = 0..,
            allow_hyphen_values = true,
            value_name = "COMMAND"
        )]
        command: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_module("meta_git_flow", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let workspace = match cli.workspace {
        Some(root) => Workspace::load(&root)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to determine current directory")?;
            Workspace::discover(&cwd)?
        }
    };
    let git = SystemGit::new(workspace.config.git.clone());

    match cli.command {
        Commands::Clone { sync_args } => {
            let syncer = GitCloneSync::new(&git);
            let switched = CloneOrchestrator::new(&workspace, &git, &syncer).execute(&sync_args)?;
            log::info!("Cloned and switched {} projects", switched.len());
        }
        Commands::Flow { projects, command } => {
            let raw = command.join(" ");
            log::debug!("Flow command: {raw:?} on {projects:?}");
            let report = FlowDispatcher::new(&workspace, &git).execute(&projects, &raw)?;
            log::info!("Applied to {} projects", report.applied.len());
        }
    }
    Ok(())
}
