//! GitHub credential discovery
//!
//! The configured token (flag, env or config file) wins. Otherwise the
//! GitHub CLI is asked via `gh auth token`.

use tokio::process::Command;

use crate::error::ProviderError;

/// Resolve a usable token or fail with `AuthenticationMissing`
pub async fn resolve(configured: Option<&str>) -> Result<String, ProviderError> {
    if let Some(token) = configured.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    match gh_auth_token().await {
        Some(token) => {
            log::debug!("Using token from `gh auth token`");
            Ok(token)
        }
        None => Err(ProviderError::AuthenticationMissing),
    }
}

/// Ask the GitHub CLI for its token. `None` if gh is missing or logged out.
pub async fn gh_auth_token() -> Option<String> {
    let output = match Command::new("gh")
        .args(["auth", "token"])
        .stdin(std::process::Stdio::null())
        .output()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            log::debug!("Could not run gh: {}", e);
            return None;
        }
    };

    if !output.status.success() {
        log::debug!(
            "gh auth token failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }

    parse_token_output(&output.stdout)
}

fn parse_token_output(stdout: &[u8]) -> Option<String> {
    let token = String::from_utf8_lossy(stdout).trim().to_string();
    if token.is_empty() { None } else { Some(token) }
}
