//! Forwarding a validated command to each project in turn.

use console::style;
use log::info;

use super::validate::FlowPlan;
use crate::error::{FlowError, Result};
use crate::project::ProjectHandle;

/// Projects the command completed in, in dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub applied: Vec<String>,
}

/// Run `git flow ...` in every project, stopping at the first failure.
///
/// Projects before the failing one keep whatever the command did to them;
/// the error names them.
pub fn dispatch(projects: &[ProjectHandle<'_>], plan: &FlowPlan) -> Result<DispatchReport> {
    let git_args = plan.command().git_args();
    let mut report = DispatchReport::default();

    for project in projects {
        println!("{}", style(format!("{}:", project.name())).bold());
        let code = project.passthrough(&git_args)?;
        if code != 0 {
            return Err(FlowError::DispatchFailed {
                project: project.name().to_string(),
                applied: report.applied,
            });
        }
        info!("{}: git {} ok", project.name(), git_args.join(" "));
        report.applied.push(project.name().to_string());
    }
    Ok(report)
}
