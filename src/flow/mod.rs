//! Forwarding git-flow commands across projects.
//!
//! A command is only forwarded once every selected project is clean, all of
//! them are on the same branch, the subcommand is one git-flow knows, and
//! for `finish` the branch exists on the remote in every project. Projects
//! are visited one at a time in selection order.
//!
//! Nothing is locked between validation and dispatch; a repository changed
//! by someone else in between is not detected.

pub mod command;
pub mod dispatch;
pub mod validate;

pub use command::{FlowCommand, FlowSubcommand};
pub use dispatch::{dispatch, DispatchReport};
pub use validate::{validate, FlowPlan};

use crate::error::Result;
use crate::git::GitRunner;
use crate::project::ProjectHandle;
use crate::selector::select_projects;
use crate::workspace::Workspace;

pub struct FlowDispatcher<'a> {
    workspace: &'a Workspace,
    git: &'a dyn GitRunner,
}

impl<'a> FlowDispatcher<'a> {
    pub fn new(workspace: &'a Workspace, git: &'a dyn GitRunner) -> Self {
        Self { workspace, git }
    }

    /// Validate, then forward `raw_command` to the projects named by `project_args`.
    pub fn execute(&self, project_args: &[String], raw_command: &str) -> Result<DispatchReport> {
        let selected = select_projects(&self.workspace.projects, &self.workspace.root, project_args)?;
        let handles: Vec<ProjectHandle<'_>> = selected
            .into_iter()
            .map(|p| ProjectHandle::new(p, self.git))
            .collect();

        let plan = validate(&handles, raw_command, &self.workspace.config.remote)?;
        dispatch(&handles, &plan)
    }
}
