//! Multi-repo git orchestration for meta workspaces.
//!
//! `clone` performs the initial checkout of every project in a workspace;
//! `flow` forwards a git-flow command to a set of projects once they are
//! all clean and on the same branch.

pub mod clone;
pub mod config;
pub mod error;
pub mod flow;
pub mod git;
pub mod manifest;
pub mod project;
pub mod selector;
pub mod status;
pub mod sync;
pub mod workspace;

pub use clone::CloneOrchestrator;
pub use config::FlowConfig;
pub use error::{FlowError, Result};
pub use flow::{DispatchReport, FlowCommand, FlowDispatcher, FlowPlan, FlowSubcommand};
pub use git::{GitOutput, GitRunner, SystemGit};
pub use project::{Project, ProjectHandle};
pub use status::StatusSnapshot;
pub use sync::{GitCloneSync, SyncOptions, Syncer};
pub use workspace::Workspace;
