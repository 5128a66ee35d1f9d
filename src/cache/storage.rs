//! JSON snapshot storage for the repository list
//!
//! The snapshot groups repositories by origin. Writes go to a temporary
//! sibling file that is renamed into place, so a reader never sees a
//! half-written snapshot.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::CacheError;
use crate::models::{Origin, Repository};

pub(crate) type Result<T> = std::result::Result<T, CacheError>;

const SNAPSHOT_FILE: &str = "cache.json";
const FRESHNESS_FILE: &str = "freshness";

/// Per-process counter keeping temp file names unique
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// One repository as stored under its origin key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry {
    full_name: String,
    ssh_url: Option<String>,
    https_url: Option<String>,
}

impl CacheEntry {
    fn from_repository(repo: &Repository) -> Self {
        Self {
            full_name: repo.full_name.clone(),
            ssh_url: repo.ssh_url.clone(),
            https_url: repo.https_url.clone(),
        }
    }

    fn into_repository(self, origin: Origin) -> Repository {
        Repository {
            origin,
            full_name: self.full_name,
            ssh_url: self.ssh_url,
            https_url: self.https_url,
        }
    }
}

/// On-disk layout: origin identifier → repositories in provider order
type Snapshot = BTreeMap<String, Vec<CacheEntry>>;

/// File-backed repository cache
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Cache store at the default location (`~/.cache/fuzzy-clone/cache` on Linux)
    pub fn open() -> Result<Self> {
        Ok(Self::at(Self::cache_dir()?))
    }

    /// Default cache directory for this platform
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(CacheError::NoCacheDir)?;
        Ok(cache_base.join("fuzzy-clone").join("cache"))
    }

    /// Cache store rooted at a specific directory. Nothing is created until
    /// the first write.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    pub fn freshness_path(&self) -> PathBuf {
        self.dir.join(FRESHNESS_FILE)
    }

    /// Read the cached repositories.
    ///
    /// Returns `Ok(None)` when the snapshot is missing or holds no
    /// repositories. A snapshot that exists but cannot be parsed is
    /// reported as [`CacheError::Corrupt`] rather than silently discarded;
    /// one that cannot be read at all is [`CacheError::Unreadable`].
    pub fn get(&self) -> Result<Option<Vec<Repository>>> {
        let path = self.snapshot_path();
        let contents = match std::fs::read(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Unreadable { path, source }),
        };

        let snapshot: Snapshot =
            serde_json::from_slice(&contents).map_err(|e| CacheError::Corrupt {
                path: path.clone(),
                message: e.to_string(),
            })?;

        let mut repos = Vec::new();
        for (origin, entries) in snapshot {
            let origin: Origin = origin.parse().map_err(|message| CacheError::Corrupt {
                path: path.clone(),
                message,
            })?;
            repos.extend(entries.into_iter().map(|e| e.into_repository(origin)));
        }

        if repos.is_empty() {
            return Ok(None);
        }

        log::debug!("Loaded {} repositories from {}", repos.len(), path.display());
        Ok(Some(repos))
    }

    /// Replace the snapshot with `repos`, grouped by origin.
    ///
    /// Input order is preserved within each origin. A repeated
    /// `full_name` within one origin keeps its first occurrence.
    pub fn update(&self, repos: &[Repository]) -> Result<()> {
        let mut snapshot = Snapshot::new();
        let mut seen: HashSet<(Origin, &str)> = HashSet::new();

        for repo in repos {
            if !seen.insert((repo.origin, repo.full_name.as_str())) {
                log::debug!("Skipping duplicate repository {}", repo.label());
                continue;
            }
            snapshot
                .entry(repo.origin.as_str().to_string())
                .or_default()
                .push(CacheEntry::from_repository(repo));
        }

        let output = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| CacheError::PersistFailure(format!("failed to encode cache: {}", e)))?;

        self.write_atomic(&self.snapshot_path(), &output)?;
        log::debug!(
            "Wrote {} repositories to {}",
            seen.len(),
            self.snapshot_path().display()
        );
        Ok(())
    }

    /// Remove the snapshot. Returns whether a file was actually removed.
    ///
    /// The freshness record is left alone.
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(self.snapshot_path()) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheError::PersistFailure(format!(
                "failed to remove cache file: {}",
                e
            ))),
        }
    }

    /// Summarize the snapshot and freshness record
    pub fn stats(&self) -> Result<CacheStats> {
        let mut per_origin: BTreeMap<Origin, usize> = BTreeMap::new();
        let mut unclonable = 0;
        if let Some(repos) = self.get()? {
            for repo in &repos {
                *per_origin.entry(repo.origin).or_default() += 1;
                if !repo.is_clonable() {
                    unclonable += 1;
                }
            }
        }

        Ok(CacheStats {
            location: self.snapshot_path(),
            per_origin,
            unclonable,
            last_refreshed: self.last_refreshed(),
        })
    }

    /// Write `data` to a temp file next to `path`, then rename it into place.
    pub(crate) fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            CacheError::PersistFailure(format!(
                "failed to create cache dir {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let counter = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cache".to_string());
        let tmp_path = path.with_file_name(format!(
            ".{}.tmp.{}.{}",
            file_name,
            std::process::id(),
            counter
        ));

        let written = (|| -> std::io::Result<()> {
            let mut file = std::fs::File::create(&tmp_path)?;
            file.write_all(data)?;
            file.sync_all()?;
            std::fs::rename(&tmp_path, path)
        })();

        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(CacheError::PersistFailure(format!(
                "failed to write {}: {}",
                path.display(),
                e
            )));
        }

        Ok(())
    }
}

/// Statistics about the cache state
#[derive(Debug)]
pub struct CacheStats {
    pub location: PathBuf,
    pub per_origin: BTreeMap<Origin, usize>,
    /// Entries with neither an SSH nor an HTTPS URL
    pub unclonable: usize,
    pub last_refreshed: Option<chrono::DateTime<chrono::Utc>>,
}

impl CacheStats {
    pub fn total(&self) -> usize {
        self.per_origin.values().sum()
    }
}
