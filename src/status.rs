//! Typed views over `git status` and `git branch -r` text.

use std::collections::BTreeSet;

const ON_BRANCH: &str = "On branch";
const NOTHING_TO_COMMIT: &str = "nothing to commit";

/// State of one checkout at the instant `git status` ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// The branch name (None if detached HEAD or no branch line)
    branch: Option<String>,
    clean: bool,
}

impl StatusSnapshot {
    /// Parse the long-format output of
    /// `git status --untracked-files=no --ignore-submodules`.
    pub fn parse(status: &str) -> Self {
        let first_line = status.lines().next().unwrap_or("");
        let branch = first_line
            .split_once(ON_BRANCH)
            .map(|(_, rest)| rest.trim().to_string())
            .filter(|b| !b.is_empty());

        Self {
            branch,
            clean: status.contains(NOTHING_TO_COMMIT),
        }
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn is_clean(&self) -> bool {
        self.clean
    }
}

/// Remote-tracking branches of `remote`, with the `<remote>/` prefix removed.
///
/// Symbolic entries such as `origin/HEAD -> origin/master` contribute only
/// the part before the arrow.
pub fn parse_remote_branches(branch_r: &str, remote: &str) -> BTreeSet<String> {
    let prefix = format!("{remote}/");
    branch_r
        .lines()
        .map(|line| line.split("->").next().unwrap_or("").trim())
        .filter_map(|name| name.strip_prefix(prefix.as_str()))
        .map(|name| name.to_string())
        .collect()
}
