//! # Configuration
//!
//! Manages the loading and parsing of the bot's configuration file (`config.yaml`).
//! Every secret can also be supplied through environment variables, which take
//! precedence over the file.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

/// Configuration for the connected services.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ServicesConfig {
    #[serde(default)]
    pub matrix: MatrixConfig,
    #[serde(default)]
    pub reddit: RedditConfig,
    #[serde(default)]
    pub quotes: QuotesConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct MatrixConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub homeserver: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Room that receives level-up announcements.
    #[serde(default)]
    pub notify_room: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedditConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_subreddit")]
    pub subreddit: String,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            user_agent: default_user_agent(),
            subreddit: default_subreddit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuotesConfig {
    #[serde(default = "default_quotes_endpoint")]
    pub endpoint: String,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            endpoint: default_quotes_endpoint(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// System-level settings for the bot.
#[derive(Debug, Deserialize, Clone)]
pub struct SystemConfig {
    #[serde(default = "default_health_port")]
    pub health_port: u16,
    #[serde(default = "default_presence_interval")]
    pub presence_interval_secs: u64,
    #[serde(default = "default_statuses")]
    pub statuses: Vec<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            health_port: default_health_port(),
            presence_interval_secs: default_presence_interval(),
            statuses: default_statuses(),
        }
    }
}

fn default_user_agent() -> String {
    "levelup-bot/0.1".to_string()
}
fn default_subreddit() -> String {
    "memes".to_string()
}
fn default_quotes_endpoint() -> String {
    "https://zenquotes.io/api/random".to_string()
}
fn default_database_url() -> String {
    "sqlite:data/levelup.db".to_string()
}
fn default_max_connections() -> u32 {
    5
}
fn default_health_port() -> u16 {
    8080
}
fn default_presence_interval() -> u64 {
    20
}

fn default_statuses() -> Vec<String> {
    vec![
        "Leveling up in real life 🌟".to_string(),
        "Your journey to greatness 🚀".to_string(),
        "The sound of progress 🎧".to_string(),
        "Turning effort into achievement 🛠️".to_string(),
    ]
}

impl AppConfig {
    /// Reads the YAML file at `path` (if present), then applies environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_yaml::from_str::<AppConfig>(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            tracing::warn!("{} not found, using defaults and environment", path.display());
            AppConfig::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overlays values from `lookup` (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let matrix = &mut self.services.matrix;
        if let Some(v) = lookup("MATRIX_HOMESERVER") {
            matrix.homeserver = v;
        }
        if let Some(v) = lookup("MATRIX_USERNAME") {
            matrix.username = v;
        }
        if let Some(v) = lookup("MATRIX_PASSWORD") {
            matrix.password = v;
        }
        if let Some(v) = lookup("NOTIFY_ROOM") {
            matrix.notify_room = Some(v);
        }

        let reddit = &mut self.services.reddit;
        if let Some(v) = lookup("REDDIT_CLIENT_ID") {
            reddit.client_id = Some(v);
        }
        if let Some(v) = lookup("REDDIT_CLIENT_SECRET") {
            reddit.client_secret = Some(v);
        }
        if let Some(v) = lookup("REDDIT_USER_AGENT") {
            reddit.user_agent = v;
        }

        if let Some(v) = lookup("DATABASE_URL") {
            self.storage.database_url = v;
        }
        if let Some(port) = lookup("HEALTH_PORT").and_then(|v| v.parse().ok()) {
            self.system.health_port = port;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let matrix = &self.services.matrix;
        if matrix.homeserver.is_empty() {
            bail!("Matrix homeserver is not configured (MATRIX_HOMESERVER)");
        }
        if matrix.username.is_empty() || matrix.password.is_empty() {
            bail!("Matrix credentials are not configured (MATRIX_USERNAME / MATRIX_PASSWORD)");
        }
        if self.system.statuses.is_empty() {
            bail!("system.statuses must contain at least one entry");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.storage.database_url, "sqlite:data/levelup.db");
        assert_eq!(config.system.health_port, 8080);
        assert_eq!(config.system.presence_interval_secs, 20);
        assert_eq!(config.system.statuses.len(), 4);
        assert_eq!(config.services.reddit.subreddit, "memes");
        assert!(config.services.matrix.notify_room.is_none());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let yaml = r#"
services:
  matrix:
    homeserver: https://matrix.example.org
    username: bot
    password: from-file
"#;
        let mut config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        let env: HashMap<&str, &str> = [
            ("MATRIX_PASSWORD", "from-env"),
            ("NOTIFY_ROOM", "!levels:example.org"),
            ("HEALTH_PORT", "9000"),
            ("DATABASE_URL", "sqlite::memory:"),
        ]
        .into_iter()
        .collect();

        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.services.matrix.username, "bot");
        assert_eq!(config.services.matrix.password, "from-env");
        assert_eq!(
            config.services.matrix.notify_room.as_deref(),
            Some("!levels:example.org")
        );
        assert_eq!(config.system.health_port, 9000);
        assert_eq!(config.storage.database_url, "sqlite::memory:");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| (key == "HEALTH_PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.system.health_port, 8080);
    }

    #[test]
    fn test_missing_credentials_fail_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "services:\n  matrix:\n    homeserver: https://hs\n    username: u\n    password: p\nsystem:\n  statuses: [\"one\"]"
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.system.statuses, vec!["one".to_string()]);
        assert_eq!(config.system.presence_interval_secs, 20);
    }
}
