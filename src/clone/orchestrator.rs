//! Clone orchestration
//!
//! Prepares the destination directory and clones into it, trying SSH before
//! HTTPS. A destination that already has entries is assumed to be the
//! right repository; its contents are not verified. An interrupted attempt
//! ends the clone without trying the next transport.

use std::fmt;
use std::path::{Path, PathBuf};

use super::git::{GitError, GitRunner};
use crate::error::CloneError;
use crate::models::Repository;

/// Transport used for a clone attempt, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Ssh,
    Https,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Ssh => f.write_str("ssh"),
            Transport::Https => f.write_str("https"),
        }
    }
}

/// How `ensure_cloned` finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneOutcome {
    /// The directory already had entries; nothing was cloned
    AlreadyPresent,
    /// A fresh clone succeeded over this transport
    Cloned(Transport),
}

pub struct CloneOrchestrator<G: GitRunner> {
    git: G,
}

impl<G: GitRunner> CloneOrchestrator<G> {
    pub fn new(git: G) -> Self {
        Self { git }
    }

    /// Make sure `repo` is available at `dest`, cloning if it is empty.
    pub async fn ensure_cloned(&self, repo: &Repository, dest: &Path) -> Result<PathBuf, CloneError> {
        let outcome = self.ensure_cloned_with_outcome(repo, dest).await?;
        log::debug!("{} at {}: {:?}", repo.label(), dest.display(), outcome);
        Ok(dest.to_path_buf())
    }

    pub async fn ensure_cloned_with_outcome(
        &self,
        repo: &Repository,
        dest: &Path,
    ) -> Result<CloneOutcome, CloneError> {
        ensure_dir(dest)?;

        if !is_empty_dir(dest)? {
            return Ok(CloneOutcome::AlreadyPresent);
        }

        let attempts = [
            (Transport::Ssh, repo.ssh_url.as_deref()),
            (Transport::Https, repo.https_url.as_deref()),
        ];

        let mut last_error: Option<String> = None;
        for (transport, url) in attempts {
            let Some(url) = url else {
                continue;
            };

            if let Some(previous) = &last_error {
                log::warn!("failed to clone with ssh, falling back to https: {}", previous);
            }

            log::info!("Cloning {} over {}", repo.full_name, transport);
            match self.git.clone_into(url, dest).await {
                Ok(()) => return Ok(CloneOutcome::Cloned(transport)),
                Err(GitError::Interrupted) => {
                    clear_dir(dest);
                    return Err(CloneError::Interrupted {
                        repository: repo.full_name.clone(),
                    });
                }
                Err(e) => {
                    // Leave an empty directory behind for the next attempt
                    clear_dir(dest);
                    last_error = Some(format!("{} clone of {} failed: {}", transport, url, e));
                }
            }
        }

        Err(CloneError::Failed {
            repository: repo.full_name.clone(),
            reason: last_error.unwrap_or_else(|| "no ssh or https url available".to_string()),
        })
    }
}

fn ensure_dir(dest: &Path) -> Result<(), CloneError> {
    if dest.is_dir() {
        return Ok(());
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder
        .create(dest)
        .map_err(|source| CloneError::DestinationUnwritable {
            path: dest.to_path_buf(),
            source,
        })
}

fn is_empty_dir(dest: &Path) -> Result<bool, CloneError> {
    let mut entries = std::fs::read_dir(dest).map_err(|source| CloneError::DestinationUnreadable {
        path: dest.to_path_buf(),
        source,
    })?;
    Ok(entries.next().is_none())
}

/// Remove whatever a failed clone attempt left inside `dest`
fn clear_dir(dest: &Path) {
    let Ok(entries) = std::fs::read_dir(dest) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let removed = if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        if let Err(e) = removed {
            log::debug!("Failed to remove {}: {}", path.display(), e);
        }
    }
}
