// Outside collaborators the dashboard talks to, behind traits so the
// session can be exercised without a network
pub mod github;
pub mod smtp;

pub use github::GitHubLister;
pub use smtp::SmtpNotifier;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Per-repository stats shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoSummary {
    pub name: String,
    pub stars: u32,
    pub forks: u32,
    pub open_issues: u32,
    pub description: Option<String>,
    pub url: String,
    pub is_private: bool,
}

/// Everything the token can see, in the order the API returned it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryListing {
    pub login: String,
    pub repos: Vec<RepoSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub subject: String,
    pub body: String,
    pub recipient: String,
    pub attachment: Option<EmailAttachment>,
}

/// Lists the repositories a credential has access to
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryLister: Send + Sync {
    /// Fails with `AuthError` for a bad or under-scoped token and
    /// `NetworkError` when the API can't be reached
    async fn list_repositories(&self, token: &str) -> Result<RepositoryListing>;
}

/// Delivers an email, reporting `DeliveryError` on any failure
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<()>;
}
