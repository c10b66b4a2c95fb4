use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::summary::WeekStart;

/// Main configuration structure
///
/// Loaded from `config.toml`; the CLI applies flag and env overrides on top.
/// Secrets never live here: the GitHub token is typed in per session and
/// the SMTP password is read from the environment variable named below.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub reports: ReportConfig,
}

impl Config {
    /// Load config from default location, or defaults if there is none
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save config to disk, returning where it went
    pub fn save(&self) -> crate::Result<PathBuf> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, contents)?;
        Ok(config_path)
    }

    /// `<config dir>/apptrack/config.toml`
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("apptrack");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// API URL (for GitHub Enterprise)
    #[serde(default = "default_github_url")]
    pub api_url: String,
}

fn default_github_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: Option<String>,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    pub username: Option<String>,

    /// Sender address; falls back to `username` when unset
    pub from_address: Option<String>,

    /// Environment variable holding the SMTP password
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_password_env() -> String {
    "APPTRACK_SMTP_PASSWORD".to_string()
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_smtp_port(),
            username: None,
            from_address: None,
            password_env: default_password_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    /// Pre-filled recipient for the weekly email
    pub recipient: Option<String>,

    /// Where downloaded reports land (current directory when unset)
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub week_start: WeekStart,
}

impl ReportConfig {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.smtp.password_env, "APPTRACK_SMTP_PASSWORD");
        assert_eq!(config.reports.week_start, WeekStart::Monday);
        assert_eq!(config.reports.output_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("api_url"));
        assert!(toml.contains("week_start = \"monday\""));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [smtp]
            host = "smtp.example.com"
            username = "me@example.com"

            [reports]
            week_start = "sunday"
            "#,
        )
        .unwrap();

        assert_eq!(config.smtp.host.as_deref(), Some("smtp.example.com"));
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.reports.week_start, WeekStart::Sunday);
        assert_eq!(config.github.api_url, "https://api.github.com");
    }

    #[test]
    fn test_load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "reports = 12").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(crate::Error::ConfigError(_))
        ));
    }
}
