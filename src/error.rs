//! Error types for fuzzy-clone

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fuzzy-clone operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Clone(#[from] CloneError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    /// The user backed out of the picker. Not a failure, but the process
    /// still exits non-zero so shell wrappers do not `cd` anywhere.
    #[error("Selection cancelled")]
    SelectionCancelled,

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Errors raised by the on-disk repository cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache corrupted at {path}: {message}. Run `fuzzy-clone cache clear` to reset it.")]
    Corrupt { path: PathBuf, message: String },

    #[error("Failed to read cache file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to persist cache: {0}")]
    PersistFailure(String),

    #[error("Could not determine a cache directory for this platform")]
    NoCacheDir,
}

/// Errors raised while fetching repositories from a provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(
        "A token is required for GitHub. Set FUZZY_CLONE_GITHUB_TOKEN, add `token` under [github] \
         in the config file, or install and log in with the GitHub CLI (`gh auth login`). \
         The token needs at least repo read access."
    )]
    AuthenticationMissing,

    #[error("Repository provider unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Unavailable("Request timed out".to_string())
        } else if err.is_connect() {
            ProviderError::Unavailable("Failed to connect to API".to_string())
        } else {
            ProviderError::Unavailable(err.to_string())
        }
    }
}

/// Errors raised while resolving a destination or cloning into it
#[derive(Debug, Error)]
pub enum CloneError {
    #[error("Invalid repository: {0}")]
    InvalidRepository(String),

    #[error("Failed to prepare destination {path}: {source}")]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read destination {path}: {source}")]
    DestinationUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to clone {repository}: {reason}")]
    Failed { repository: String, reason: String },

    /// Ctrl-C during a clone; no further transport is tried
    #[error("Clone of {repository} interrupted")]
    Interrupted { repository: String },
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_corrupt_mentions_path_and_clear() {
        let err = CacheError::Corrupt {
            path: PathBuf::from("/tmp/cache.json"),
            message: "expected value at line 1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/cache.json"));
        assert!(msg.contains("cache clear"));
    }

    #[test]
    fn test_authentication_missing_message() {
        let err = ProviderError::AuthenticationMissing;
        let msg = err.to_string();
        assert!(msg.contains("FUZZY_CLONE_GITHUB_TOKEN"));
        assert!(msg.contains("gh auth login"));
    }

    #[test]
    fn test_provider_unavailable() {
        let err = ProviderError::Unavailable("HTTP 502".to_string());
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_clone_failed_names_repository() {
        let err = CloneError::Failed {
            repository: "kjuulh/fuzzy-clone".to_string(),
            reason: "exit status 128".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("kjuulh/fuzzy-clone"));
        assert!(msg.contains("128"));
    }

    #[test]
    fn test_destination_errors_carry_path() {
        let err = CloneError::DestinationUnwritable {
            path: PathBuf::from("/readonly/repo"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/readonly/repo"));

        let err = CloneError::DestinationUnreadable {
            path: PathBuf::from("/secret/repo"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/secret/repo"));
    }

    #[test]
    fn test_error_from_cache_error() {
        let err: Error = CacheError::NoCacheDir.into();

        match err {
            Error::Cache(CacheError::NoCacheDir) => (),
            _ => panic!("Expected Error::Cache(CacheError::NoCacheDir)"),
        }
    }

    #[test]
    fn test_error_from_provider_error() {
        let err: Error = ProviderError::AuthenticationMissing.into();

        match err {
            Error::Provider(ProviderError::AuthenticationMissing) => (),
            _ => panic!("Expected Error::Provider(ProviderError::AuthenticationMissing)"),
        }
    }

    #[test]
    fn test_config_error_parse() {
        let err = ConfigError::Parse {
            path: PathBuf::from("config.toml"),
            message: "unexpected key".to_string(),
        };
        assert!(err.to_string().contains("unexpected key"));
    }

    #[test]
    fn test_selection_cancelled_message() {
        assert_eq!(Error::SelectionCancelled.to_string(), "Selection cancelled");
    }
}
