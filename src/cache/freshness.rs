//! Freshness record for cooldown-gated refreshes
//!
//! A single RFC3339 timestamp stored next to the snapshot. It is only
//! written after a successful cache update.
//!
//! Staleness and the cooldown setting are kept apart: `needs_refresh` only
//! compares the record against a window, and whether cooldown applies at
//! all is decided in [`refresh_due`].

use chrono::{DateTime, Utc};
use std::time::Duration;

use super::storage::{CacheStore, Result};

impl CacheStore {
    /// Time of the last successful update, if a readable record exists
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        let raw = std::fs::read_to_string(self.freshness_path()).ok()?;
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                log::debug!("Ignoring unreadable freshness record: {}", e);
                None
            }
        }
    }

    /// Whether the snapshot is older than `window`.
    ///
    /// A missing or unparsable record is always stale. This takes no
    /// cooldown flag; callers gate on it through [`refresh_due`].
    pub fn needs_refresh(&self, window: Duration) -> bool {
        is_stale(self.last_refreshed(), Utc::now(), window)
    }

    /// Overwrite the freshness record with `now`
    pub fn record_freshness(&self, now: DateTime<Utc>) -> Result<()> {
        self.write_atomic(&self.freshness_path(), now.to_rfc3339().as_bytes())
    }
}

/// Caller-side refresh policy.
///
/// With cooldown disabled every update refreshes; with it enabled only a
/// stale record (or `force`) does.
pub fn refresh_due(store: &CacheStore, cooldown: bool, window: Duration, force: bool) -> bool {
    force || !cooldown || store.needs_refresh(window)
}

fn is_stale(recorded: Option<DateTime<Utc>>, now: DateTime<Utc>, window: Duration) -> bool {
    let Some(recorded) = recorded else {
        return true;
    };

    // A window too large for chrono can never elapse
    let Ok(window) = chrono::Duration::from_std(window) else {
        return false;
    };

    now.signed_duration_since(recorded) >= window
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HOUR: Duration = Duration::from_secs(60 * 60);

    fn test_store() -> (CacheStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::at(dir.path());
        (store, dir)
    }

    #[test]
    fn test_missing_record_needs_refresh() {
        let (store, _dir) = test_store();
        assert!(store.needs_refresh(HOUR));
    }

    #[test]
    fn test_fresh_record_does_not_need_refresh() {
        let (store, _dir) = test_store();
        store.record_freshness(Utc::now()).unwrap();
        assert!(!store.needs_refresh(HOUR));
    }

    #[test]
    fn test_old_record_needs_refresh() {
        let (store, _dir) = test_store();
        store
            .record_freshness(Utc::now() - chrono::Duration::hours(2))
            .unwrap();
        assert!(store.needs_refresh(HOUR));
    }

    #[test]
    fn test_garbage_record_needs_refresh() {
        let (store, _dir) = test_store();
        std::fs::write(store.freshness_path(), "yesterday-ish").unwrap();
        assert!(store.last_refreshed().is_none());
        assert!(store.needs_refresh(HOUR));
    }

    #[test]
    fn test_record_is_rfc3339_text() {
        let (store, _dir) = test_store();
        let now = Utc::now();
        store.record_freshness(now).unwrap();

        let raw = std::fs::read_to_string(store.freshness_path()).unwrap();
        assert!(DateTime::parse_from_rfc3339(&raw).is_ok());
        assert_eq!(store.last_refreshed().map(|t| t.timestamp()), Some(now.timestamp()));
    }

    #[test]
    fn test_is_stale_boundary() {
        let now = Utc::now();
        assert!(is_stale(None, now, HOUR));
        assert!(is_stale(Some(now - chrono::Duration::hours(1)), now, HOUR));
        assert!(!is_stale(Some(now - chrono::Duration::minutes(59)), now, HOUR));
        // A zero window is always elapsed
        assert!(is_stale(Some(now), now, Duration::ZERO));
    }

    #[test]
    fn test_refresh_due_policy() {
        let (store, _dir) = test_store();
        store.record_freshness(Utc::now()).unwrap();

        // Cooldown off: always refresh
        assert!(refresh_due(&store, false, HOUR, false));
        // Cooldown on with a fresh record: skip
        assert!(!refresh_due(&store, true, HOUR, false));
        // Force wins over cooldown
        assert!(refresh_due(&store, true, HOUR, true));
    }
}
