//! Managed checkouts and the typed git queries made against them.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::{FlowError, Result};
use crate::git::{args, GitOutput, GitRunner};
use crate::status::{parse_remote_branches, StatusSnapshot};

/// One checkout in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Unique name within the workspace
    pub name: String,
    /// Absolute path of the working tree
    pub path: PathBuf,
    /// Git URL to clone from (None for projects that are never cloned)
    pub url: Option<String>,
}

/// A project bound to the runner that executes git against it.
pub struct ProjectHandle<'a> {
    project: &'a Project,
    git: &'a dyn GitRunner,
}

impl<'a> ProjectHandle<'a> {
    pub fn new(project: &'a Project, git: &'a dyn GitRunner) -> Self {
        Self { project, git }
    }

    pub fn name(&self) -> &str {
        &self.project.name
    }

    /// Run a git subcommand and return its captured output, whatever the exit code.
    pub fn run(&self, git_args: &[String]) -> Result<GitOutput> {
        self.git
            .capture(&self.project.path, git_args)
            .map_err(|source| FlowError::Spawn {
                project: self.project.name.clone(),
                source,
            })
    }

    /// Like [`run`](Self::run) but a non-zero exit becomes [`FlowError::GitFailed`].
    fn query(&self, git_args: &[String]) -> Result<String> {
        let output = self.run(git_args)?;
        if !output.success() {
            return Err(FlowError::GitFailed {
                project: self.project.name.clone(),
                command: git_args.join(" "),
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    pub fn status(&self) -> Result<StatusSnapshot> {
        let text = self.query(&args([
            "status",
            "--untracked-files=no",
            "--ignore-submodules",
        ]))?;
        Ok(StatusSnapshot::parse(&text))
    }

    pub fn remote_branches(&self, remote: &str) -> Result<BTreeSet<String>> {
        let text = self.query(&args(["branch", "-r"]))?;
        Ok(parse_remote_branches(&text, remote))
    }

    /// Run with the terminal attached; returns the exit code.
    pub fn passthrough(&self, git_args: &[String]) -> Result<i32> {
        self.git
            .passthrough(&self.project.path, git_args)
            .map_err(|source| FlowError::Spawn {
                project: self.project.name.clone(),
                source,
            })
    }
}
