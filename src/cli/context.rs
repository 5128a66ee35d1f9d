//! Command execution context
//!
//! Resolves settings and opens the cache once, so each command starts from
//! the same state.

use crate::cache::CacheStore;
use crate::cli::GlobalArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::provider::{ProviderKind, RepositoryProvider};

/// Context for command execution: resolved settings plus the cache they point at
pub struct CommandContext {
    /// Fully layered settings for this run
    pub settings: Settings,
    /// Repository cache (default location unless overridden)
    pub cache: CacheStore,
}

impl CommandContext {
    /// Load settings from flags, environment and config file, and open the cache.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be parsed or no cache
    /// directory can be determined.
    pub fn new(global: &GlobalArgs) -> Result<Self> {
        let settings = Settings::load(&global.overrides())?;
        let cache = match &settings.cache_dir {
            Some(dir) => CacheStore::at(dir),
            None => CacheStore::open()?,
        };
        log::debug!("Using cache at {}", cache.dir().display());

        Ok(Self { settings, cache })
    }

    /// Build from already resolved parts
    #[cfg(test)]
    pub fn from_parts(settings: Settings, cache: CacheStore) -> Self {
        Self { settings, cache }
    }

    /// Provider for this run. Credentials are resolved here, not at startup,
    /// so cache-only paths never need a token.
    pub async fn provider(&self) -> Result<Box<dyn RepositoryProvider>> {
        ProviderKind::from_settings(&self.settings)
            .build(&self.settings)
            .await
    }
}
