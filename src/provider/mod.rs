//! Repository providers
//!
//! A provider knows how to list every repository the configured identity
//! can clone from one origin. The cache and clone paths only see the
//! [`RepositoryProvider`] trait, so new origins plug in here.

use async_trait::async_trait;

use crate::config::Settings;
use crate::error::Result;
use crate::models::{Origin, Repository};

pub mod github;
#[cfg(test)]
pub mod mock;
pub mod pagination;
pub mod token;

pub use github::GitHubProvider;
#[cfg(test)]
pub use mock::MockProvider;

/// Capability: fetch all repositories for a configured identity
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    /// Origin every returned repository belongs to
    fn origin(&self) -> Origin;

    /// Enumerate all repositories, following pagination to the end.
    ///
    /// Any failure aborts the whole listing; there are no partial results.
    async fn fetch_all(&self) -> Result<Vec<Repository>>;
}

/// Available provider implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    GitHub,
}

impl ProviderKind {
    /// The single source of truth for this run
    pub fn from_settings(_settings: &Settings) -> Self {
        ProviderKind::GitHub
    }

    /// Build the provider, resolving credentials as needed
    pub async fn build(self, settings: &Settings) -> Result<Box<dyn RepositoryProvider>> {
        match self {
            ProviderKind::GitHub => {
                let token = token::resolve(settings.github_token.as_deref()).await?;
                let provider = GitHubProvider::with_base_url(token, settings.github_api.clone())?;
                Ok(Box::new(provider))
            }
        }
    }
}
