//! Battle configuration with documented defaults
//!
//! Values come from three layers, later layers winning:
//! built-in defaults, an optional TOML file, then environment variables.
//! The resulting `BattleConfig` is passed explicitly to whoever needs it.

use crate::core::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Number of characters on every team
pub const TEAM_SIZE: usize = 5;

/// Separator between the two team names on the battle log's first line
pub const TEAM_SEPARATOR: &str = " v/s ";

/// Top-level configuration for one battle run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Team assembly parameters
    pub roster: RosterConfig,

    /// Remote attribute lookup service
    pub api: ApiConfig,

    /// Report delivery channel
    pub mail: MailConfig,

    /// Where the battle log is written (overwritten on every run)
    pub log_path: PathBuf,

    /// Display names of the two teams, first name attacks first each round
    pub team_names: [String; 2],
}

/// Parameters controlling how teams are drawn from the attribute source
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Highest character id in the source; ids are drawn from 1..=max
    ///
    /// The public Superhero API exposes 731 characters.
    pub max_character_id: u32,

    /// Fetch attempts per character id before the whole assembly fails
    pub fetch_attempts: u32,

    /// Pause between two fetch attempts for the same id (milliseconds)
    pub retry_delay_ms: u64,
}

/// Remote attribute lookup service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, the API key and character id are appended as path segments
    pub base_url: String,

    /// Access token issued by the Superhero API
    pub api_key: Option<String>,

    /// Upper bound on a single request; fetches never block indefinitely
    pub request_timeout_secs: u64,
}

/// Mailgun-backed report delivery
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub api_key: Option<String>,
    pub domain: Option<String>,
    pub sender: String,
    pub request_timeout_secs: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            roster: RosterConfig::default(),
            api: ApiConfig::default(),
            mail: MailConfig::default(),
            log_path: PathBuf::from("battle_log.txt"),
            team_names: ["TEAM 1".to_string(), "TEAM 2".to_string()],
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            max_character_id: 731,
            fetch_attempts: 3,
            retry_delay_ms: 5_000,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://superheroapi.com/api".to_string(),
            api_key: None,
            request_timeout_secs: 10,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            domain: None,
            sender: "Superhero Battle <battle@superherobattle.com>".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl RosterConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl MailConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl BattleConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the layered configuration: defaults, optional TOML file, environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_toml_str(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Override values from process environment variables.
    ///
    /// Environment variables:
    /// - `SUPERHERO_API_KEY` - Superhero API access token
    /// - `SUPERHERO_API_URL` - Superhero API base URL
    /// - `MAILGUN_API_KEY` - Mailgun private key
    /// - `MAILGUN_DOMAIN_NAME` - Mailgun sending domain
    /// - `BATTLE_LOG_PATH` - Battle log location
    /// - `BATTLE_FETCH_ATTEMPTS` - Fetch attempts per character id
    /// - `BATTLE_RETRY_DELAY_MS` - Pause between fetch attempts
    pub fn apply_env(&mut self) {
        if let Ok(key) = env::var("SUPERHERO_API_KEY") {
            self.api.api_key = Some(key);
        }
        if let Ok(url) = env::var("SUPERHERO_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(key) = env::var("MAILGUN_API_KEY") {
            self.mail.api_key = Some(key);
        }
        if let Ok(domain) = env::var("MAILGUN_DOMAIN_NAME") {
            self.mail.domain = Some(domain);
        }
        if let Ok(path) = env::var("BATTLE_LOG_PATH") {
            self.log_path = PathBuf::from(path);
        }
        if let Some(attempts) = read_env::<u32>("BATTLE_FETCH_ATTEMPTS") {
            self.roster.fetch_attempts = attempts;
        }
        if let Some(delay) = read_env::<u64>("BATTLE_RETRY_DELAY_MS") {
            self.roster.retry_delay_ms = delay;
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roster.fetch_attempts == 0 {
            return Err(ConfigError::Invalid("fetch_attempts must be at least 1".into()));
        }

        // Both teams draw from the same id space without overlap
        let needed = 2 * TEAM_SIZE;
        if (self.roster.max_character_id as usize) < needed {
            return Err(ConfigError::Invalid(format!(
                "max_character_id ({}) must be >= {} to fill two teams",
                self.roster.max_character_id, needed
            )));
        }

        let [first, second] = &self.team_names;
        if first.trim().is_empty() || second.trim().is_empty() {
            return Err(ConfigError::Invalid("team names must not be empty".into()));
        }
        if first == second {
            return Err(ConfigError::Invalid(format!(
                "team names must differ (both are {:?})",
                first
            )));
        }
        if self.team_names.iter().any(|name| name.contains(['\n', '\r'])) {
            return Err(ConfigError::Invalid("team names must fit on one line".into()));
        }
        if self.team_names.iter().any(|name| name.contains(TEAM_SEPARATOR.trim())) {
            return Err(ConfigError::Invalid(format!(
                "team names must not contain {:?}",
                TEAM_SEPARATOR.trim()
            )));
        }

        Ok(())
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.parse().ok())
}
