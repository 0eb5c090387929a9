//! Process invoker: runs `git` subcommands against a checkout.
//!
//! Everything above this module talks to git through [`GitRunner`], so the
//! flow and clone orchestration can be exercised without a real binary.

use log::debug;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured result of a git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// Exit code, `-1` when the process was killed by a signal
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// stdout followed by stderr, the way a terminal would show them.
    pub fn transcript(&self) -> String {
        let mut out = self.stdout.trim_end().to_string();
        let err = self.stderr.trim_end();
        if !err.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(err);
        }
        out
    }
}

pub trait GitRunner {
    /// Run `git <args>` in `dir`, capturing its output.
    fn capture(&self, dir: &Path, args: &[String]) -> io::Result<GitOutput>;

    /// Run `git <args>` in `dir` with stdio inherited; returns the exit code.
    fn passthrough(&self, dir: &Path, args: &[String]) -> io::Result<i32>;
}

/// Runs the real git binary.
#[derive(Debug, Clone)]
pub struct SystemGit {
    binary: String,
}

impl SystemGit {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitRunner for SystemGit {
    fn capture(&self, dir: &Path, args: &[String]) -> io::Result<GitOutput> {
        debug!("{}$ {} {}", dir.display(), self.binary, args.join(" "));
        // Status markers are matched as English text.
        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(dir)
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(GitOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    fn passthrough(&self, dir: &Path, args: &[String]) -> io::Result<i32> {
        debug!("{}$ {} {} (passthrough)", dir.display(), self.binary, args.join(" "));
        let status = Command::new(&self.binary)
            .args(args)
            .current_dir(dir)
            .status()?;
        Ok(status.code().unwrap_or(-1))
    }
}

/// Turn a fixed argument list into the owned form [`GitRunner`] takes.
pub fn args<const N: usize>(items: [&str; N]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    /// Create a minimal git repo in a tempdir and return the tempdir handle.
    fn init_git_repo() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        Command::new("git")
            .args(["init"])
            .current_dir(tmp.path())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .unwrap();
        tmp
    }

    #[test]
    fn transcript_joins_stdout_and_stderr() {
        let out = GitOutput {
            code: 0,
            stdout: "Branch 'master' set up\n".to_string(),
            stderr: "Switched to a new branch 'master'\n".to_string(),
        };
        assert_eq!(
            out.transcript(),
            "Branch 'master' set up\nSwitched to a new branch 'master'"
        );
    }

    #[test]
    fn transcript_of_silent_command_is_empty() {
        assert_eq!(GitOutput::default().transcript(), "");
    }

    #[test]
    fn capture_reports_exit_code_and_output() {
        let tmp = init_git_repo();
        let git = SystemGit::default();

        let ok = git
            .capture(tmp.path(), &args(["rev-parse", "--is-inside-work-tree"]))
            .unwrap();
        assert!(ok.success());
        assert_eq!(ok.stdout.trim(), "true");

        let bad = git
            .capture(tmp.path(), &args(["rev-parse", "--verify", "no-such-ref"]))
            .unwrap();
        assert!(!bad.success());
    }

    #[test]
    fn missing_binary_is_an_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let git = SystemGit::new("definitely-not-a-git-binary");
        assert!(git.capture(tmp.path(), &args(["status"])).is_err());
    }
}
