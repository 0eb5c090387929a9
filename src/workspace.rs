//! The multi-repo workspace: root directory, projects and configuration.

use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use crate::config::FlowConfig;
use crate::manifest;
use crate::project::Project;

/// Directory whose presence marks a workspace as already cloned.
pub const REGISTRY_DIR: &str = ".meta-flow/projects";

#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub projects: Vec<Project>,
    pub config: FlowConfig,
}

impl Workspace {
    /// Load the workspace whose manifest lives in `root`.
    ///
    /// The root is made absolute so project paths stay valid whatever
    /// directory git is started from.
    pub fn load(root: &Path) -> Result<Self> {
        let manifest_path = manifest::find_manifest_in(root)
            .with_context(|| format!("No .meta manifest found in {}", root.display()))?;
        let root = root
            .canonicalize()
            .with_context(|| format!("Failed to resolve workspace root {}", root.display()))?;
        let value = manifest::read_manifest_value(&manifest_path)?;
        let config = FlowConfig::from_manifest(&value)?;

        let projects: Vec<Project> = manifest::parse_projects(&value)?
            .into_iter()
            .map(|info| Project {
                path: root.join(&info.path),
                name: info.name,
                url: info.repo,
            })
            .collect();
        debug!(
            "Loaded {} projects from {}",
            projects.len(),
            manifest_path.display()
        );

        Ok(Self {
            root,
            projects,
            config,
        })
    }

    /// Load the workspace enclosing `start`.
    pub fn discover(start: &Path) -> Result<Self> {
        let root = manifest::find_workspace_root(start).with_context(|| {
            format!(
                "Not inside a meta workspace (no .meta found above {})",
                start.display()
            )
        })?;
        Self::load(&root)
    }

    pub fn registry_dir(&self) -> PathBuf {
        self.root.join(REGISTRY_DIR)
    }
}
