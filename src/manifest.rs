//! Loading the project list from a `.meta` manifest.
//!
//! The manifest is JSON or YAML:
//!
//! ```json
//! { "projects": { "alpha": "git@github.com:org/alpha.git",
//!                 "beta": { "repo": "git@github.com:org/beta.git", "path": "libs/beta" } } }
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const MANIFEST_NAMES: &[&str] = &[".meta", ".meta.json", ".meta.yaml", ".meta.yml"];

/// A project as declared in the manifest (path relative to the workspace root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub name: String,
    pub path: String,
    pub repo: Option<String>,
}

/// First manifest file present in `dir`.
pub fn find_manifest_in(dir: &Path) -> Option<PathBuf> {
    MANIFEST_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Walk up from `start` to the first directory holding a manifest.
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| find_manifest_in(dir).is_some())
        .map(Path::to_path_buf)
}

/// Read a manifest as a JSON value. JSON is tried first, then YAML.
pub fn read_manifest_value(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;

    if let Ok(v) = serde_json::from_str::<serde_json::Value>(&content) {
        return Ok(v);
    }
    let yaml: serde_yaml_ng::Value = serde_yaml_ng::from_str(&content)
        .with_context(|| format!("Manifest {} is neither JSON nor YAML", path.display()))?;
    // Convert YAML Value to JSON Value for uniform access
    serde_json::to_value(yaml)
        .with_context(|| format!("Manifest {} has non-JSON-compatible YAML", path.display()))
}

/// Parse the `projects` table, preserving manifest order.
pub fn parse_projects(manifest: &serde_json::Value) -> Result<Vec<ProjectInfo>> {
    let Some(table) = manifest.get("projects") else {
        return Ok(Vec::new());
    };
    let table = table
        .as_object()
        .context("'projects' must be a map of name to repo URL or project object")?;

    let mut projects = Vec::with_capacity(table.len());
    for (name, entry) in table {
        let project = match entry {
            serde_json::Value::String(url) => ProjectInfo {
                name: name.clone(),
                path: name.clone(),
                repo: Some(url.clone()),
            },
            serde_json::Value::Object(fields) => ProjectInfo {
                name: name.clone(),
                path: fields
                    .get("path")
                    .and_then(|v| v.as_str())
                    .unwrap_or(name)
                    .to_string(),
                repo: fields
                    .get("repo")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
            },
            other => anyhow::bail!("Project '{name}' has unsupported manifest entry: {other}"),
        };
        projects.push(project);
    }
    Ok(projects)
}
