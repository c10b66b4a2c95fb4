use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retry::{is_retryable_status, with_retry, RetryConfig, Retryable};

const PER_PAGE: usize = 100;
// Hard stop so a misbehaving server can't keep us paging forever
const MAX_PAGES: u32 = 50;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Server error: {0}")]
    ServerError(reqwest::StatusCode),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl Retryable for GitHubError {
    fn is_retryable(&self) -> bool {
        match self {
            GitHubError::NetworkError(e) => !e.is_decode(),
            GitHubError::RateLimitExceeded | GitHubError::ServerError(_) => true,
            GitHubError::RequestFailed(_) => false,
            GitHubError::AuthFailed(_) | GitHubError::ParseError(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// Authenticated account, only the login is interesting to us
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

/// Repository as returned by `GET /user/repos`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
    #[serde(default)]
    pub private: bool,
}

pub struct GitHubClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
    retry_config: RetryConfig,
    max_pages: u32,
}

impl GitHubClient {
    /// `base_url` is `https://api.github.com`, a GitHub Enterprise API root,
    /// or a local test server
    pub fn with_base_url(token: String, base_url: String) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("apptrack/0.1.0"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_config: RetryConfig::default(),
            max_pages: MAX_PAGES,
        })
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Who does this token belong to
    pub async fn authenticated_user(&self) -> Result<GitHubUser> {
        let url = format!("{}/user", self.base_url);
        let (client, token, url) = (&self.client, &self.token, &url);

        with_retry(&self.retry_config, || async move {
            let response = client.get(url).bearer_auth(token).send().await?;
            let response = check_status(response).await?;
            Ok(response.json::<GitHubUser>().await?)
        })
        .await
    }

    /// List every repository the token can see, following pagination
    pub async fn list_user_repos(&self) -> Result<Vec<GitHubRepo>> {
        let url = format!("{}/user/repos", self.base_url);
        let (client, token, url) = (&self.client, &self.token, &url);
        let mut repos = Vec::new();
        let mut reached_end = false;

        for page in 1..=self.max_pages {
            let batch = with_retry(&self.retry_config, || async move {
                let response = client
                    .get(url)
                    .bearer_auth(token)
                    .query(&[
                        ("per_page", PER_PAGE.to_string()),
                        ("page", page.to_string()),
                        ("sort", "full_name".to_string()),
                    ])
                    .send()
                    .await?;
                let response = check_status(response).await?;
                let body = response.text().await?;
                Ok::<_, GitHubError>(serde_json::from_str::<Vec<GitHubRepo>>(&body)?)
            })
            .await?;

            tracing::debug!("Fetched page {} with {} repositories", page, batch.len());

            let last_page = batch.len() < PER_PAGE;
            repos.extend(batch);
            if last_page {
                reached_end = true;
                break;
            }
        }

        if !reached_end {
            tracing::warn!(
                "Stopped listing after {} pages, {} repositories returned",
                self.max_pages,
                repos.len()
            );
        }

        Ok(repos)
    }
}

/// Map non-success responses onto our error type
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(GitHubError::AuthFailed("token was rejected".to_string()));
    }

    if status == reqwest::StatusCode::FORBIDDEN {
        // GitHub answers 403 both for missing scopes and for exhausted rate limits
        if body.to_lowercase().contains("rate limit") {
            return Err(GitHubError::RateLimitExceeded);
        }
        return Err(GitHubError::AuthFailed(
            "token lacks the required scope".to_string(),
        ));
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GitHubError::RateLimitExceeded);
    }

    if is_retryable_status(status) {
        return Err(GitHubError::ServerError(status));
    }

    Err(GitHubError::RequestFailed(format!("Status {}: {}", status, body)))
}
