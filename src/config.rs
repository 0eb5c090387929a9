//! Runtime configuration.
//!
//! Values come from the manifest's `flow` section and are overridden by
//! `META_FLOW_GIT`, `META_FLOW_REMOTE` and `META_FLOW_TRACKING_BRANCH`.

use serde::Deserialize;

pub const ENV_GIT: &str = "META_FLOW_GIT";
pub const ENV_REMOTE: &str = "META_FLOW_REMOTE";
pub const ENV_TRACKING_BRANCH: &str = "META_FLOW_TRACKING_BRANCH";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// git binary to invoke
    pub git: String,
    /// Remote whose branches gate `finish` and back the tracking branch
    pub remote: String,
    /// Branch checked out in every project after the initial clone
    pub tracking_branch: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            remote: "origin".to_string(),
            tracking_branch: "master".to_string(),
        }
    }
}

impl FlowConfig {
    /// Build from a parsed manifest, then apply environment overrides.
    pub fn from_manifest(manifest: &serde_json::Value) -> anyhow::Result<Self> {
        let mut config = match manifest.get("flow") {
            Some(section) => serde_json::from_value(section.clone())
                .map_err(|e| anyhow::anyhow!("Invalid 'flow' section in manifest: {e}"))?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        for (var, field) in [
            (ENV_GIT, &mut self.git),
            (ENV_REMOTE, &mut self.remote),
            (ENV_TRACKING_BRANCH, &mut self.tracking_branch),
        ] {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    log::debug!("{var} overrides configured value '{field}' with '{value}'");
                    *field = value;
                }
            }
        }
    }
}
