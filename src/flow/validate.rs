//! Checks that must all pass before anything is forwarded.
//!
//! Each phase returns a `Result`; only a fully validated [`FlowPlan`] can be
//! handed to dispatch.

use log::debug;
use std::collections::BTreeSet;

use super::command::FlowCommand;
use crate::error::{FlowError, Result};
use crate::project::ProjectHandle;

/// Outcome of validation: what to run and on which shared branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowPlan {
    current_branch: String,
    command: FlowCommand,
    branch_to_finish: Option<String>,
}

impl FlowPlan {
    pub fn current_branch(&self) -> &str {
        &self.current_branch
    }

    pub fn command(&self) -> &FlowCommand {
        &self.command
    }

    /// Set for `finish` operations only.
    pub fn branch_to_finish(&self) -> Option<&str> {
        self.branch_to_finish.as_deref()
    }
}

/// Every project must be clean and on a branch, and all on the same one.
///
/// Stops at the first project that is detached or dirty.
pub fn require_common_branch(projects: &[ProjectHandle<'_>]) -> Result<String> {
    let mut branches = BTreeSet::new();
    for project in projects {
        let status = project.status()?;

        let Some(branch) = status.branch() else {
            return Err(FlowError::NotOnBranch {
                project: project.name().to_string(),
            });
        };
        if !status.is_clean() {
            return Err(FlowError::DirtyWorkingTree {
                project: project.name().to_string(),
            });
        }
        debug!("{}: clean on {}", project.name(), branch);
        branches.insert(branch.to_string());
    }

    if branches.len() != 1 {
        return Err(FlowError::BranchMismatch {
            branches: branches.into_iter().collect(),
        });
    }
    Ok(branches.into_iter().next().unwrap_or_default())
}

/// `branch` must exist on `remote` in every project.
pub fn require_remote_branch(
    projects: &[ProjectHandle<'_>],
    branch: &str,
    remote: &str,
) -> Result<()> {
    for project in projects {
        if !project.remote_branches(remote)?.contains(branch) {
            return Err(FlowError::RemoteBranchMissing {
                project: project.name().to_string(),
                branch: branch.to_string(),
                remote: remote.to_string(),
            });
        }
        debug!("{}: {remote}/{branch} present", project.name());
    }
    Ok(())
}

/// Run the branch, command and finish checks in order.
pub fn validate(projects: &[ProjectHandle<'_>], raw_command: &str, remote: &str) -> Result<FlowPlan> {
    let current_branch = require_common_branch(projects)?;
    debug!("All {} projects on '{current_branch}'", projects.len());

    let command = FlowCommand::parse(raw_command)?;

    let branch_to_finish = if command.is_finish() {
        let branch = command.branch_to_finish(&current_branch);
        require_remote_branch(projects, &branch, remote)?;
        Some(branch)
    } else {
        None
    };

    Ok(FlowPlan {
        current_branch,
        command,
        branch_to_finish,
    })
}
