//! Parsing and inspecting the git-flow command forwarded to every project.

use std::fmt;
use std::str::FromStr;

use crate::error::{FlowError, Result};

/// The git-flow subcommands that may be forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSubcommand {
    Init,
    Feature,
    Release,
    Hotfix,
    Support,
    Version,
}

impl FlowSubcommand {
    pub const ALL: [FlowSubcommand; 6] = [
        FlowSubcommand::Init,
        FlowSubcommand::Feature,
        FlowSubcommand::Release,
        FlowSubcommand::Hotfix,
        FlowSubcommand::Support,
        FlowSubcommand::Version,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FlowSubcommand::Init => "init",
            FlowSubcommand::Feature => "feature",
            FlowSubcommand::Release => "release",
            FlowSubcommand::Hotfix => "hotfix",
            FlowSubcommand::Support => "support",
            FlowSubcommand::Version => "version",
        }
    }

    /// Comma-separated list for diagnostics.
    pub fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FlowSubcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowSubcommand {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|sub| sub.as_str() == s)
            .ok_or_else(|| FlowError::UnknownSubcommand {
                subcommand: s.to_string(),
            })
    }
}

/// A tokenized git-flow command line, e.g. `release finish -F v2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowCommand {
    tokens: Vec<String>,
    subcommand: FlowSubcommand,
}

impl FlowCommand {
    /// Tokenize with shell quoting rules and check the subcommand.
    pub fn parse(raw: &str) -> Result<Self> {
        let tokens = shell_words::split(raw).map_err(|e| FlowError::MalformedCommand {
            command: raw.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_tokens(tokens)
    }

    pub fn from_tokens(tokens: Vec<String>) -> Result<Self> {
        let subcommand = tokens.first().map(String::as_str).unwrap_or("").parse()?;
        Ok(Self { tokens, subcommand })
    }

    pub fn subcommand(&self) -> FlowSubcommand {
        self.subcommand
    }

    /// Second token, empty when absent.
    pub fn operation(&self) -> &str {
        self.tokens.get(1).map(String::as_str).unwrap_or("")
    }

    pub fn is_finish(&self) -> bool {
        self.operation() == "finish"
    }

    /// The branch a `finish` would merge.
    ///
    /// Without an explicit name (last token is `finish` or an option) this is
    /// the branch every project is on; otherwise `<subcommand>/<name>`.
    pub fn branch_to_finish(&self, current_branch: &str) -> String {
        match self.tokens.last() {
            Some(last) if last != "finish" && !last.starts_with('-') => {
                format!("{}/{}", self.subcommand, last)
            }
            _ => current_branch.to_string(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Arguments for git: the tokens prefixed with `flow`.
    pub fn git_args(&self) -> Vec<String> {
        std::iter::once("flow".to_string())
            .chain(self.tokens.iter().cloned())
            .collect()
    }
}
