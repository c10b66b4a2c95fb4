// Clients for the outside world: the GitHub API and an SMTP relay
pub mod github;
pub mod mailer;
pub mod retry;

// Re-export common types
pub use github::{GitHubClient, GitHubError, GitHubRepo, GitHubUser};
pub use mailer::{MailAttachment, MailError, OutgoingMail, SmtpMailer, SmtpSettings};
pub use retry::RetryConfig;
