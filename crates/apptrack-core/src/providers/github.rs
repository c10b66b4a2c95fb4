// GitHub provider - bridges the API client with the RepositoryLister trait
use apptrack_api::{GitHubClient, GitHubError, GitHubRepo};
use async_trait::async_trait;

use super::{RepoSummary, RepositoryLister, RepositoryListing};
use crate::{Error, Result};

/// Lists repositories through the GitHub REST API. A fresh client is built
/// for every call so the token never outlives the request.
pub struct GitHubLister {
    api_url: String,
}

impl GitHubLister {
    pub fn new(api_url: String) -> Self {
        Self { api_url }
    }
}

#[async_trait]
impl RepositoryLister for GitHubLister {
    async fn list_repositories(&self, token: &str) -> Result<RepositoryListing> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::AuthError("no token provided".to_string()));
        }

        let client =
            GitHubClient::with_base_url(token.to_string(), self.api_url.clone()).map_err(map_error)?;

        let user = client.authenticated_user().await.map_err(map_error)?;
        let repos = client.list_user_repos().await.map_err(map_error)?;

        tracing::info!("Fetched {} repositories for {}", repos.len(), user.login);

        Ok(RepositoryListing {
            login: user.login,
            repos: repos.into_iter().map(github_to_summary).collect(),
        })
    }
}

/// Convert the API error into the dashboard's taxonomy
fn map_error(err: GitHubError) -> Error {
    match err {
        GitHubError::AuthFailed(msg) => Error::AuthError(msg),
        GitHubError::NetworkError(e) if !e.is_decode() => Error::NetworkError(e.to_string()),
        other => Error::ApiError(other.to_string()),
    }
}

/// Convert GitHub API repo to the dashboard's summary row
fn github_to_summary(gh: GitHubRepo) -> RepoSummary {
    RepoSummary {
        name: gh.name,
        stars: gh.stargazers_count,
        forks: gh.forks_count,
        open_issues: gh.open_issues_count,
        description: gh.description,
        url: gh.html_url,
        is_private: gh.private,
    }
}
