//! Resolving command-line project arguments to workspace projects.

use std::path::Path;

use crate::error::{FlowError, Result};
use crate::project::Project;

/// Resolve `args` to projects, in argument order.
///
/// An empty argument list selects every project in manifest order. An
/// argument matches a project by name, or by path relative to `root`.
/// Repeated selections of the same project are collapsed to the first.
pub fn select_projects<'a>(
    projects: &'a [Project],
    root: &Path,
    args: &[String],
) -> Result<Vec<&'a Project>> {
    if args.is_empty() {
        return Ok(projects.iter().collect());
    }

    let mut selected: Vec<&Project> = Vec::with_capacity(args.len());
    for arg in args {
        let wanted = arg.trim_end_matches('/');
        let project = projects
            .iter()
            .find(|p| p.name == wanted)
            .or_else(|| {
                projects
                    .iter()
                    .find(|p| p.path.strip_prefix(root).is_ok_and(|rel| rel == Path::new(wanted)))
            })
            .ok_or_else(|| FlowError::UnknownProject {
                name: arg.clone(),
                known: projects.iter().map(|p| p.name.clone()).collect(),
            })?;

        if !selected.iter().any(|p| p.name == project.name) {
            selected.push(project);
        }
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn projects() -> Vec<Project> {
        ["web", "api", "shared"]
            .iter()
            .map(|name| Project {
                name: name.to_string(),
                path: if *name == "shared" {
                    PathBuf::from("/ws/libs/shared")
                } else {
                    PathBuf::from("/ws").join(name)
                },
                url: None,
            })
            .collect()
    }

    fn names(selected: &[&Project]) -> Vec<String> {
        selected.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn empty_selects_all_in_manifest_order() {
        let all = projects();
        let selected = select_projects(&all, Path::new("/ws"), &[]).unwrap();
        assert_eq!(names(&selected), vec!["web", "api", "shared"]);
    }

    #[test]
    fn argument_order_is_kept() {
        let all = projects();
        let args = vec!["api".to_string(), "web".to_string()];
        let selected = select_projects(&all, Path::new("/ws"), &args).unwrap();
        assert_eq!(names(&selected), vec!["api", "web"]);
    }

    #[test]
    fn select_by_relative_path() {
        let all = projects();
        let args = vec!["libs/shared/".to_string()];
        let selected = select_projects(&all, Path::new("/ws"), &args).unwrap();
        assert_eq!(names(&selected), vec!["shared"]);
    }

    #[test]
    fn duplicates_collapse() {
        let all = projects();
        let args = vec!["web".to_string(), "api".to_string(), "web".to_string()];
        let selected = select_projects(&all, Path::new("/ws"), &args).unwrap();
        assert_eq!(names(&selected), vec!["web", "api"]);
    }

    #[test]
    fn unknown_project_lists_known_names() {
        let all = projects();
        let args = vec!["mobile".to_string()];
        match select_projects(&all, Path::new("/ws"), &args) {
            Err(FlowError::UnknownProject { name, known }) => {
                assert_eq!(name, "mobile");
                assert_eq!(known, vec!["web", "api", "shared"]);
            }
            other => panic!("expected UnknownProject, got {other:?}"),
        }
    }
}
