//! Initial clone of a workspace: sync every project, then check out the
//! tracking branch everywhere.

use console::style;
use log::debug;

use crate::error::{FlowError, Result};
use crate::git::GitRunner;
use crate::project::ProjectHandle;
use crate::selector::select_projects;
use crate::sync::{SyncOptions, Syncer};
use crate::workspace::Workspace;

pub struct CloneOrchestrator<'a> {
    workspace: &'a Workspace,
    git: &'a dyn GitRunner,
    syncer: &'a dyn Syncer,
}

impl<'a> CloneOrchestrator<'a> {
    pub fn new(workspace: &'a Workspace, git: &'a dyn GitRunner, syncer: &'a dyn Syncer) -> Self {
        Self {
            workspace,
            git,
            syncer,
        }
    }

    /// Clone the workspace; `sync_args` are the arguments given after `--`.
    ///
    /// Returns the projects switched to the tracking branch; projects without
    /// a repo URL are left alone. A checkout failure stops the run and leaves
    /// earlier projects switched.
    pub fn execute(&self, sync_args: &[String]) -> Result<Vec<String>> {
        let marker = self.workspace.registry_dir();
        if marker.exists() {
            return Err(FlowError::AlreadyInitialized { marker });
        }

        let options = SyncOptions::parse_args(sync_args).map_err(FlowError::SyncFailed)?;
        debug!("Syncing with {options:?}");
        self.syncer
            .sync(self.workspace, &options)
            .map_err(FlowError::SyncFailed)?;

        let config = &self.workspace.config;
        let checkout = vec![
            "checkout".to_string(),
            "-t".to_string(),
            "-b".to_string(),
            config.tracking_branch.clone(),
            format!("remotes/{}/{}", config.remote, config.tracking_branch),
        ];

        let mut switched = Vec::new();
        for project in select_projects(&self.workspace.projects, &self.workspace.root, &[])? {
            // The sync never clones a project without a repo URL.
            if project.url.is_none() {
                debug!("Skipping checkout in '{}': no repo URL", project.name);
                continue;
            }
            let handle = ProjectHandle::new(project, self.git);
            println!("{}", style(format!("{}:", project.name)).bold());
            let output = handle.run(&checkout)?;
            println!("{}", output.transcript());
            println!();

            if !output.success() {
                return Err(FlowError::CheckoutFailed {
                    project: project.name.clone(),
                    applied: switched,
                });
            }
            switched.push(project.name.clone());
        }
        Ok(switched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlowConfig;
    use crate::git::fake::ScriptedGit;
    use crate::project::Project;
    use std::cell::{Cell, RefCell};
    use std::path::Path;

    /// Counts calls and creates the registry like a real sync would.
    #[derive(Default)]
    struct RecordingSync {
        calls: Cell<usize>,
        options: RefCell<Option<SyncOptions>>,
        fail: bool,
    }

    impl Syncer for RecordingSync {
        fn sync(&self, workspace: &Workspace, options: &SyncOptions) -> anyhow::Result<()> {
            self.calls.set(self.calls.get() + 1);
            *self.options.borrow_mut() = Some(options.clone());
            if self.fail {
                anyhow::bail!("network unreachable");
            }
            std::fs::create_dir_all(workspace.registry_dir())?;
            Ok(())
        }
    }

    fn workspace(root: &Path) -> Workspace {
        Workspace {
            root: root.to_path_buf(),
            projects: ["web", "api", "docs"]
                .iter()
                .map(|n| Project {
                    name: n.to_string(),
                    path: root.join(n),
                    url: Some(format!("git@github.com:org/{n}.git")),
                })
                .collect(),
            config: FlowConfig::default(),
        }
    }

    #[test]
    fn checks_out_tracking_branch_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(dir.path());
        let git = ScriptedGit::new();
        let sync = RecordingSync::default();

        let switched = CloneOrchestrator::new(&ws, &git, &sync).execute(&[]).unwrap();

        assert_eq!(switched, vec!["web", "api", "docs"]);
        assert_eq!(sync.calls.get(), 1);
        let calls = git.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[0].args,
            vec!["checkout", "-t", "-b", "master", "remotes/origin/master"]
        );
        assert_eq!(calls[2].dir, dir.path().join("docs"));
    }

    #[test]
    fn second_clone_is_refused_without_syncing() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(dir.path());
        let git = ScriptedGit::new();
        let sync = RecordingSync::default();
        let orchestrator = CloneOrchestrator::new(&ws, &git, &sync);

        orchestrator.execute(&[]).unwrap();
        let git_calls = git.calls().len();

        let result = orchestrator.execute(&[]);
        assert!(matches!(result, Err(FlowError::AlreadyInitialized { .. })));
        assert_eq!(sync.calls.get(), 1);
        assert_eq!(git.calls().len(), git_calls);
    }

    #[test]
    fn sync_args_are_forwarded() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(dir.path());
        let git = ScriptedGit::new();
        let sync = RecordingSync::default();

        CloneOrchestrator::new(&ws, &git, &sync)
            .execute(&["--depth".to_string(), "5".to_string()])
            .unwrap();

        assert_eq!(sync.options.borrow().as_ref().unwrap().depth, Some(5));
    }

    #[test]
    fn sync_failure_skips_checkout() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(dir.path());
        let git = ScriptedGit::new();
        let sync = RecordingSync {
            fail: true,
            ..Default::default()
        };

        let err = CloneOrchestrator::new(&ws, &git, &sync)
            .execute(&[])
            .unwrap_err();
        assert!(err.to_string().contains("network unreachable"));
        assert!(git.calls().is_empty());
    }

    #[test]
    fn checkout_failure_stops_and_names_switched_projects() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(dir.path());
        let mut git = ScriptedGit::new();
        git.respond_with(
            dir.path().join("api"),
            "checkout",
            128,
            "",
            "fatal: 'remotes/origin/master' is not a commit\n",
        );
        let sync = RecordingSync::default();

        match CloneOrchestrator::new(&ws, &git, &sync).execute(&[]) {
            Err(FlowError::CheckoutFailed { project, applied }) => {
                assert_eq!(project, "api");
                assert_eq!(applied, vec!["web"]);
            }
            other => panic!("expected CheckoutFailed, got {other:?}"),
        }
        assert_eq!(git.calls().len(), 2);
    }

    #[test]
    fn custom_tracking_branch_and_remote() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = workspace(dir.path());
        ws.config.tracking_branch = "main".to_string();
        ws.config.remote = "upstream".to_string();
        let git = ScriptedGit::new();
        let sync = RecordingSync::default();

        CloneOrchestrator::new(&ws, &git, &sync).execute(&[]).unwrap();
        assert_eq!(
            git.calls()[0].args,
            vec!["checkout", "-t", "-b", "main", "remotes/upstream/main"]
        );
    }

    #[test]
    fn projects_without_url_are_not_checked_out() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = workspace(dir.path());
        ws.projects.insert(
            1,
            Project {
                name: "local".to_string(),
                path: dir.path().join("local"),
                url: None,
            },
        );
        let git = ScriptedGit::new();
        let sync = RecordingSync::default();

        let switched = CloneOrchestrator::new(&ws, &git, &sync).execute(&[]).unwrap();

        assert_eq!(switched, vec!["web", "api", "docs"]);
        assert!(!git.dirs_for("checkout").contains(&dir.path().join("local")));
        assert_eq!(git.calls().len(), 3);
    }
}
