//! Local repository cache
//!
//! Stores the last fetched repository list as a JSON snapshot grouped by
//! origin, with a separate freshness record used for cooldown decisions.

pub mod freshness;
pub mod storage;

use std::time::Duration;

/// Default cooldown window between refreshes when cooldown is enabled
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60 * 60); // 1 hr

pub use freshness::refresh_due;
pub use storage::CacheStore;
