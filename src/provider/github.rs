//! GitHub repository provider

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::header::{ACCEPT, HeaderMap};
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;

use super::RepositoryProvider;
use super::pagination::{MAX_PAGE_SIZE, Page, next_link, paginate};
use crate::error::{ProviderError, Result};
use crate::models::{Origin, Repository};

/// GitHub REST API base URL
const API_BASE_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";

/// Relationship between the authenticated user and a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affiliation {
    /// Repositories of organizations the user belongs to
    OrganizationMember,
    /// Repositories the user owns
    Owner,
}

impl Affiliation {
    fn as_str(&self) -> &'static str {
        match self {
            Affiliation::OrganizationMember => "organization_member",
            Affiliation::Owner => "owner",
        }
    }
}

/// Repository as returned by `GET /user/repos`
#[derive(Debug, Clone, Deserialize)]
struct GitHubRepo {
    full_name: String,
    #[serde(default)]
    ssh_url: Option<String>,
    #[serde(default)]
    clone_url: Option<String>,
}

impl From<GitHubRepo> for Repository {
    fn from(repo: GitHubRepo) -> Self {
        let mut repository = Repository::new(Origin::GitHub, repo.full_name);
        if let Some(url) = repo.ssh_url {
            repository = repository.with_ssh_url(url);
        }
        if let Some(url) = repo.clone_url {
            repository = repository.with_https_url(url);
        }
        repository
    }
}

/// Lists repositories for the token's user through the GitHub REST API
pub struct GitHubProvider {
    http: HttpClient,
    base_url: String,
    token: String,
}

impl GitHubProvider {
    /// Create a provider. `base_url` defaults to api.github.com.
    pub fn with_base_url(token: String, base_url: Option<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("fuzzy-clone/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let base_url = base_url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| API_BASE_URL.to_string());

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn first_page_url(&self, affiliation: Affiliation) -> String {
        format!(
            "{}/user/repos?affiliation={}&visibility=all&sort=updated&per_page={}&page=1",
            self.base_url,
            affiliation.as_str(),
            MAX_PAGE_SIZE
        )
    }

    /// All repositories for one affiliation, most recently updated first
    async fn list(&self, affiliation: Affiliation) -> Result<Vec<Repository>> {
        let pages = paginate(self.first_page_url(affiliation), |url| self.get_page(url));
        let repos: Vec<GitHubRepo> = pages.try_concat().await?;

        log::debug!("Fetched {} {} repositories", repos.len(), affiliation.as_str());
        Ok(repos.into_iter().map(Repository::from).collect())
    }

    async fn get_page(&self, url: String) -> Result<Page<GitHubRepo>> {
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await
            .map_err(ProviderError::from)?;

        let status = response.status();
        if status != StatusCode::OK {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &headers, &body).into());
        }

        let next = next_link(response.headers());
        let items = response.json::<Vec<GitHubRepo>>().await.map_err(|e| {
            ProviderError::Unavailable(format!("Failed to parse GitHub response: {}", e))
        })?;

        Ok(Page { items, next })
    }
}

/// Map a non-200 response to a descriptive provider error
fn status_error(status: StatusCode, headers: &HeaderMap, body: &str) -> ProviderError {
    let rate_limited = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "0");

    match status {
        StatusCode::UNAUTHORIZED => ProviderError::Unavailable(
            "GitHub rejected the token (401 Unauthorized). Check that it is valid and has repo read access."
                .to_string(),
        ),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS if rate_limited => {
            ProviderError::Unavailable("GitHub API rate limit exceeded, try again later".to_string())
        }
        StatusCode::FORBIDDEN => ProviderError::Unavailable(format!(
            "Access denied by GitHub (403): {}",
            body.trim()
        )),
        status if status.is_server_error() => {
            ProviderError::Unavailable(format!("GitHub server error: {}", status))
        }
        status => ProviderError::Unavailable(format!("Unexpected status code: {}", status)),
    }
}

#[async_trait]
impl RepositoryProvider for GitHubProvider {
    fn origin(&self) -> Origin {
        Origin::GitHub
    }

    async fn fetch_all(&self) -> Result<Vec<Repository>> {
        let mut repos = self.list(Affiliation::OrganizationMember).await?;
        repos.extend(self.list(Affiliation::Owner).await?);
        Ok(repos)
    }
}
