//! Destination path resolution
//!
//! Maps a repository to the directory it should be cloned into. Never
//! touches the filesystem.

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::CloneError;
use crate::models::Repository;

/// How the destination is laid out, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationMode<'a> {
    /// `<cwd>/<name>`
    CurrentDir,
    /// `<root>/<name>`
    Flattened { root: &'a Path },
    /// `<root>/<origin>/<owner>/<name>`
    Namespaced { root: &'a Path },
}

impl<'a> DestinationMode<'a> {
    pub fn from_settings(settings: &'a Settings) -> Self {
        if settings.use_cwd {
            DestinationMode::CurrentDir
        } else if settings.flatten_destination {
            DestinationMode::Flattened {
                root: &settings.root,
            }
        } else {
            DestinationMode::Namespaced {
                root: &settings.root,
            }
        }
    }
}

/// Compute where `repo` lands. `cwd` is only used in current-dir mode.
pub fn resolve(repo: &Repository, settings: &Settings, cwd: &Path) -> Result<PathBuf, CloneError> {
    let name = repo.base_name().ok_or_else(|| {
        CloneError::InvalidRepository(format!("'{}' has no repository name", repo.full_name))
    })?;

    let dest = match DestinationMode::from_settings(settings) {
        DestinationMode::CurrentDir => cwd.join(name),
        DestinationMode::Flattened { root } => root.join(name),
        DestinationMode::Namespaced { root } => repo
            .full_name
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(root.join(repo.origin.as_str()), |path, segment| {
                path.join(segment)
            }),
    };

    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFile, Defaults, Overrides};
    use crate::models::Origin;

    fn settings(use_cwd: bool, flatten: bool) -> Settings {
        let overrides = Overrides {
            use_cwd: Some(use_cwd),
            flatten_destination: Some(flatten),
            root: Some(PathBuf::from("/home/u/git")),
            ..Default::default()
        };
        Settings::from_layers(
            &overrides,
            ConfigFile::default(),
            Defaults::default(),
            PathBuf::new(),
        )
    }

    fn repo() -> Repository {
        Repository::new(Origin::GitHub, "kjuulh/fuzzy-clone")
    }

    const CWD: &str = "/tmp/work";

    #[test]
    fn test_namespaced_default() {
        let dest = resolve(&repo(), &settings(false, false), Path::new(CWD)).unwrap();
        assert_eq!(dest, PathBuf::from("/home/u/git/github.com/kjuulh/fuzzy-clone"));
    }

    #[test]
    fn test_flattened() {
        let dest = resolve(&repo(), &settings(false, true), Path::new(CWD)).unwrap();
        assert_eq!(dest, PathBuf::from("/home/u/git/fuzzy-clone"));
    }

    #[test]
    fn test_current_dir() {
        let dest = resolve(&repo(), &settings(true, false), Path::new(CWD)).unwrap();
        assert_eq!(dest, PathBuf::from("/tmp/work/fuzzy-clone"));
    }

    #[test]
    fn test_current_dir_beats_flatten() {
        let dest = resolve(&repo(), &settings(true, true), Path::new(CWD)).unwrap();
        assert_eq!(dest, PathBuf::from("/tmp/work/fuzzy-clone"));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let s = settings(false, false);
        let first = resolve(&repo(), &s, Path::new(CWD)).unwrap();
        let second = resolve(&repo(), &s, Path::new(CWD)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_full_name_is_invalid() {
        let empty = Repository::new(Origin::GitHub, "");
        match resolve(&empty, &settings(false, false), Path::new(CWD)) {
            Err(CloneError::InvalidRepository(_)) => (),
            other => panic!("Expected CloneError::InvalidRepository, got {:?}", other),
        }

        let slashes = Repository::new(Origin::GitHub, "//");
        assert!(resolve(&slashes, &settings(false, true), Path::new(CWD)).is_err());
    }

    #[test]
    fn test_mode_from_settings() {
        let s = settings(false, false);
        assert_eq!(
            DestinationMode::from_settings(&s),
            DestinationMode::Namespaced {
                root: Path::new("/home/u/git")
            }
        );
        assert_eq!(
            DestinationMode::from_settings(&settings(true, true)),
            DestinationMode::CurrentDir
        );
    }
}
