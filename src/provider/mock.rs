//! Mock repository provider for testing
//!
//! Returns a canned repository list (or a canned failure) and counts calls.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use super::RepositoryProvider;
use crate::error::{ProviderError, Result};
use crate::models::{Origin, Repository};

/// Mock provider.
///
/// # Example
/// ```ignore
/// let mock = MockProvider::new().with_repos(vec![Repository::new(Origin::GitHub, "a/b")]);
/// let repos = mock.fetch_all().await?;
/// ```
#[derive(Default)]
pub struct MockProvider {
    repos: Arc<Mutex<Vec<Repository>>>,
    /// Error to return (if any), consumed on first use
    error: Arc<Mutex<Option<ProviderError>>>,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repos(self, repos: Vec<Repository>) -> Self {
        Self {
            repos: Arc::new(Mutex::new(repos)),
            ..self
        }
    }

    pub fn with_error(self, error: ProviderError) -> Self {
        Self {
            error: Arc::new(Mutex::new(Some(error))),
            ..self
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepositoryProvider for MockProvider {
    fn origin(&self) -> Origin {
        Origin::GitHub
    }

    async fn fetch_all(&self) -> Result<Vec<Repository>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.error.lock().await.take() {
            return Err(err.into());
        }
        Ok(self.repos.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_repos_and_counts_calls() {
        let mock = MockProvider::new().with_repos(vec![Repository::new(Origin::GitHub, "a/b")]);

        let repos = mock.fetch_all().await.unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_error_is_consumed() {
        let mock = MockProvider::new().with_error(ProviderError::AuthenticationMissing);

        assert!(mock.fetch_all().await.is_err());
        assert!(mock.fetch_all().await.unwrap().is_empty());
        assert_eq!(mock.call_count(), 2);
    }
}
