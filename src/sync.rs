//! Bulk clone of every project in the workspace.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::git::{args, GitRunner};
use crate::project::Project;
use crate::workspace::Workspace;

/// Options accepted after `clone --`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(name = "sync", no_binary_name = true)]
pub struct SyncOptions {
    /// Create shallow clones with this many commits
    #[arg(long)]
    pub depth: Option<u32>,

    /// Don't show progress spinners
    #[arg(short, long)]
    pub quiet: bool,
}

impl SyncOptions {
    pub fn parse_args(args: &[String]) -> Result<Self> {
        Self::try_parse_from(args).context("Invalid sync options")
    }
}

/// Record written per cloned project into the workspace registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub name: String,
    pub url: String,
    pub path: String,
    pub cloned_at: DateTime<Utc>,
}

/// Clones every registered project of a workspace.
pub trait Syncer {
    fn sync(&self, workspace: &Workspace, options: &SyncOptions) -> Result<()>;
}

/// Clones with the git binary, one project at a time.
pub struct GitCloneSync<'a> {
    git: &'a dyn GitRunner,
}

impl<'a> GitCloneSync<'a> {
    pub fn new(git: &'a dyn GitRunner) -> Self {
        Self { git }
    }

    /// Fetch one project unless its directory already exists.
    ///
    /// The checkout is left without local branches; every remote branch is
    /// available as `remotes/<remote>/<branch>`.
    fn clone_project(
        &self,
        workspace: &Workspace,
        project: &Project,
        url: &str,
        options: &SyncOptions,
        pb: Option<&ProgressBar>,
    ) -> Result<()> {
        if project.path.exists() {
            let msg = format!("{}: already exists, skipping", project.name);
            match pb {
                Some(pb) => pb.finish_with_message(msg),
                None => println!("{msg}"),
            }
            return Ok(());
        }

        let remote = workspace.config.remote.as_str();
        let mut fetch = vec!["fetch".to_string()];
        if let Some(depth) = options.depth {
            fetch.push("--depth".to_string());
            fetch.push(depth.to_string());
        }
        fetch.push(remote.to_string());

        let steps = [
            (
                workspace.root.as_path(),
                vec![
                    "init".to_string(),
                    "--quiet".to_string(),
                    project.path.to_string_lossy().to_string(),
                ],
            ),
            (
                project.path.as_path(),
                args(["remote", "add", remote, url]),
            ),
            (project.path.as_path(), fetch),
        ];

        if let Err(err) = self.run_steps(project, url, &steps, pb) {
            // A half-initialised checkout would be skipped as existing next time.
            if project.path.exists() {
                if let Err(e) = fs::remove_dir_all(&project.path) {
                    warn!("Failed to remove {}: {e}", project.path.display());
                }
            }
            return Err(err);
        }

        let msg = format!("{} ✓", style(&project.name).green());
        match pb {
            Some(pb) => pb.finish_with_message(msg),
            None => println!("{msg}"),
        }
        Ok(())
    }

    fn run_steps(
        &self,
        project: &Project,
        url: &str,
        steps: &[(&Path, Vec<String>)],
        pb: Option<&ProgressBar>,
    ) -> Result<()> {
        for (dir, step) in steps {
            if let Some(pb) = pb {
                pb.set_message(format!("git {}", step[0]));
            }
            let output = self
                .git
                .capture(dir, step)
                .with_context(|| format!("Failed to run git {} for '{}'", step[0], project.name))?;

            if !output.success() {
                if let Some(pb) = pb {
                    pb.finish_with_message(format!("{} ✗", style(&project.name).red()));
                }
                anyhow::bail!(
                    "Failed to clone {} into {}: {}",
                    url,
                    project.path.display(),
                    output.stderr.trim()
                );
            }
        }
        Ok(())
    }
}

impl Syncer for GitCloneSync<'_> {
    fn sync(&self, workspace: &Workspace, options: &SyncOptions) -> Result<()> {
        let mut entries = Vec::new();
        for project in &workspace.projects {
            // Skip projects without a repo URL (cannot clone)
            let Some(url) = project.url.as_deref() else {
                warn!("'{}' has no repo URL, not cloning it", project.name);
                continue;
            };

            let pb = (!options.quiet).then(|| spinner(&project.name));
            self.clone_project(workspace, project, url, options, pb.as_ref())?;

            entries.push(RegistryEntry {
                name: project.name.clone(),
                url: url.to_string(),
                path: project
                    .path
                    .strip_prefix(&workspace.root)
                    .unwrap_or(&project.path)
                    .to_string_lossy()
                    .to_string(),
                cloned_at: Utc::now(),
            });
        }

        // Only a completed sync marks the workspace as cloned.
        write_registry(&workspace.registry_dir(), &entries)
    }
}

fn spinner(name: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner} {prefix:.bold} {msg}") {
        pb.set_style(template);
    }
    pb.set_prefix(name.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn write_registry(dir: &Path, entries: &[RegistryEntry]) -> Result<()> {
    fs::create_dir_all(dir).context("Failed to create registry directory")?;
    for entry in entries {
        let file = dir.join(format!("{}.json", entry.name.replace('/', "__")));
        let json = serde_json::to_string_pretty(entry).context("Failed to serialize registry entry")?;
        fs::write(&file, json)
            .with_context(|| format!("Failed to write {}", file.display()))?;
        debug!("Registered {} at {}", entry.name, file.display());
    }
    Ok(())
}
