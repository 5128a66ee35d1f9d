//! git CLI wrapper used for the initial clone
//!
//! The system `git` is used so SSH agents, credential helpers and
//! `~/.gitconfig` all apply as they would for a manual clone.

use async_trait::async_trait;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Errors returned by a single clone attempt.
#[derive(Error, Debug)]
pub enum GitError {
    /// git could not be started.
    #[error("failed to run git: {0}")]
    Spawn(#[source] std::io::Error),
    /// git ran and exited unsuccessfully.
    #[error("git clone exited with {0}")]
    Exit(ExitStatus),
    /// The attempt exceeded the configured timeout and was killed.
    #[error("git clone timed out after {0:?}")]
    TimedOut(Duration),
    /// The user interrupted the clone.
    #[error("git clone interrupted")]
    Interrupted,
    /// Waiting on the child failed.
    #[error("failed waiting for git: {0}")]
    Wait(#[source] std::io::Error),
}

/// Something that can clone `url` into an existing, empty `dest`.
#[async_trait]
pub trait GitRunner: Send + Sync {
    async fn clone_into(&self, url: &str, dest: &Path) -> Result<(), GitError>;
}

/// Runs `git clone <url> .` inside the destination directory.
pub struct GitCli {
    git_path: String,
    timeout: Duration,
}

enum Waited {
    Finished(Result<std::io::Result<ExitStatus>, tokio::time::error::Elapsed>),
    Interrupted,
}

impl GitCli {
    pub fn new(timeout: Duration) -> Self {
        Self {
            git_path: "git".into(),
            timeout,
        }
    }

    /// Create a Command with prompts disabled and stdout kept clean.
    ///
    /// stdout carries the destination path for shell wrappers, so git's
    /// output is sent to stderr instead.
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.git_path);
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::from(std::io::stderr()));
        cmd.stderr(Stdio::inherit());
        cmd.kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl GitRunner for GitCli {
    async fn clone_into(&self, url: &str, dest: &Path) -> Result<(), GitError> {
        // Installed before git starts so a Ctrl-C that git also sees is never missed
        let interrupt = interrupt_listener();

        let mut child = self
            .command()
            .args(["clone", "--", url, "."])
            .current_dir(dest)
            .spawn()
            .map_err(GitError::Spawn)?;

        let waited = tokio::select! {
            biased;
            _ = interrupt => Waited::Interrupted,
            res = tokio::time::timeout(self.timeout, child.wait()) => Waited::Finished(res),
        };

        match waited {
            Waited::Finished(Ok(Ok(status))) if status.success() => Ok(()),
            Waited::Finished(Ok(Ok(status))) if killed_by_interrupt(&status) => {
                Err(GitError::Interrupted)
            }
            Waited::Finished(Ok(Ok(status))) => Err(GitError::Exit(status)),
            Waited::Finished(Ok(Err(e))) => Err(GitError::Wait(e)),
            Waited::Finished(Err(_)) => {
                let _ = child.kill().await;
                Err(GitError::TimedOut(self.timeout))
            }
            Waited::Interrupted => {
                let _ = child.kill().await;
                Err(GitError::Interrupted)
            }
        }
    }
}

/// Resolves on Ctrl-C. The handler is registered when this is called.
fn interrupt_listener() -> Pin<Box<dyn Future<Output = ()> + Send>> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::interrupt()) {
            Ok(mut sigint) => Box::pin(async move {
                sigint.recv().await;
            }),
            Err(e) => {
                log::debug!("Could not listen for Ctrl-C: {}", e);
                Box::pin(std::future::pending())
            }
        }
    }
    #[cfg(not(unix))]
    {
        Box::pin(async {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        })
    }
}

/// Whether git died from (or exited because of) SIGINT
fn killed_by_interrupt(status: &ExitStatus) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if status.signal() == Some(SIGINT) {
            return true;
        }
    }
    status.code() == Some(128 + SIGINT)
}

const SIGINT: i32 = 2;

/// Whether a working `git` binary is on PATH
pub async fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_clone_of_missing_local_repo_fails() {
        if !git_available().await {
            return;
        }

        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let dest = dir.path().join("dest");
        std::fs::create_dir(&dest).unwrap();

        let git = GitCli::new(Duration::from_secs(30));
        let result = git
            .clone_into(&missing.to_string_lossy(), &dest)
            .await;

        assert!(matches!(result, Err(GitError::Exit(_))));
    }

    #[tokio::test]
    async fn test_clone_of_local_repo_succeeds() {
        if !git_available().await {
            return;
        }

        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        std::fs::create_dir(&source).unwrap();
        let init = std::process::Command::new("git")
            .args(["init", "--quiet"])
            .current_dir(&source)
            .status()
            .unwrap();
        assert!(init.success());

        let dest = dir.path().join("dest");
        std::fs::create_dir(&dest).unwrap();

        GitCli::new(Duration::from_secs(30))
            .clone_into(&source.to_string_lossy(), &dest)
            .await
            .unwrap();

        assert!(dest.join(".git").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_sigint_exit_counts_as_interrupt() {
        use std::os::unix::process::ExitStatusExt;

        // Raw wait statuses: low byte is the signal, high byte the exit code
        assert!(killed_by_interrupt(&ExitStatus::from_raw(SIGINT)));
        assert!(killed_by_interrupt(&ExitStatus::from_raw(130 << 8)));
        assert!(!killed_by_interrupt(&ExitStatus::from_raw(128 << 8)));
        assert!(!killed_by_interrupt(&ExitStatus::from_raw(9)));
    }

    #[test]
    fn test_error_messages() {
        let err = GitError::TimedOut(Duration::from_secs(5));
        assert!(err.to_string().contains("timed out"));
        assert_eq!(GitError::Interrupted.to_string(), "git clone interrupted");
    }
}
