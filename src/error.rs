//! Error taxonomy for clone and flow commands.
//!
//! Every variant is fatal: the binary reports it and exits with status 1.

use std::path::PathBuf;

use crate::flow::command::FlowSubcommand;

pub type Result<T> = std::result::Result<T, FlowError>;

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("this working directory has already been cloned into ({}), exiting", .marker.display())]
    AlreadyInitialized { marker: PathBuf },

    #[error("'{project}' is not on a branch")]
    NotOnBranch { project: String },

    #[error("'{project}' has uncommitted changes, run 'git status' in it for more info")]
    DirtyWorkingTree { project: String },

    #[error("not all projects are on the same branch (found: {}), run 'git branch' in each for more info", .branches.join(", "))]
    BranchMismatch { branches: Vec<String> },

    #[error("invalid git-flow subcommand '{subcommand}'\nvalid subcommands are: {}", FlowSubcommand::valid_list())]
    UnknownSubcommand { subcommand: String },

    #[error("could not parse flow command '{command}': {reason}")]
    MalformedCommand { command: String, reason: String },

    #[error(
        "remote branch '{branch}' does not exist on '{project}', can't finish yet\n\
         please push the branch upstream before finishing:\n    git push -u {remote} {branch}"
    )]
    RemoteBranchMissing {
        project: String,
        branch: String,
        remote: String,
    },

    #[error("git flow command failed for '{project}'{}", applied_suffix(.applied))]
    DispatchFailed {
        project: String,
        applied: Vec<String>,
    },

    #[error("project '{name}' not found, known projects: {}", .known.join(", "))]
    UnknownProject { name: String, known: Vec<String> },

    #[error("checkout of tracking branch failed for '{project}'{}", applied_suffix(.applied))]
    CheckoutFailed {
        project: String,
        applied: Vec<String>,
    },

    #[error("sync failed: {0:#}")]
    SyncFailed(anyhow::Error),

    #[error("`git {command}` failed in '{project}': {stderr}")]
    GitFailed {
        project: String,
        command: String,
        stderr: String,
    },

    #[error("failed to run git for '{project}'")]
    Spawn {
        project: String,
        #[source]
        source: std::io::Error,
    },
}

/// Names the projects already mutated before a fatal failure.
fn applied_suffix(applied: &[String]) -> String {
    if applied.is_empty() {
        String::new()
    } else {
        format!(" (already applied to: {})", applied.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_failure_lists_applied_projects() {
        let err = FlowError::DispatchFailed {
            project: "gamma".to_string(),
            applied: vec!["alpha".to_string(), "beta".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "git flow command failed for 'gamma' (already applied to: alpha, beta)"
        );
    }

    #[test]
    fn dispatch_failure_on_first_project_has_no_suffix() {
        let err = FlowError::DispatchFailed {
            project: "alpha".to_string(),
            applied: vec![],
        };
        assert_eq!(err.to_string(), "git flow command failed for 'alpha'");
    }

    #[test]
    fn remote_branch_missing_suggests_push() {
        let err = FlowError::RemoteBranchMissing {
            project: "api".to_string(),
            branch: "release/v2".to_string(),
            remote: "origin".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'release/v2' does not exist on 'api'"));
        assert!(msg.contains("git push -u origin release/v2"));
    }

    #[test]
    fn unknown_subcommand_enumerates_valid_set() {
        let err = FlowError::UnknownSubcommand {
            subcommand: "bugfix".to_string(),
        };
        assert!(err
            .to_string()
            .ends_with("valid subcommands are: init, feature, release, hotfix, support, version"));
    }
}
