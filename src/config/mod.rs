use std::time::Duration;

use url::Url;

use crate::domain::Script;
use crate::errors::{CounterError, CounterResult};

pub const DEFAULT_MEDIUM_HOST: &str = "medium";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 60;

/// Settings for fetching and counting articles
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub medium_host: String,
    pub wordpress_host: String,
    pub wordpress_api: String,
    pub wordpress_login: String,
    pub wordpress_password: String,
    pub script: Script,
    pub fetch_timeout: Duration,
}

/// Reply texts sent by the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotTexts {
    pub start: String,
    pub unknown: String,
    pub wrong_link: String,
    pub unauthorized: String,
}

impl Default for BotTexts {
    fn default() -> Self {
        Self {
            start: "Send me a link to a Medium or WordPress article and I will count its Cyrillic characters.".to_string(),
            unknown: "Unknown command.".to_string(),
            wrong_link: "This is not a link I can read.".to_string(),
            unauthorized: "401 unauthorized".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_token: Option<String>,
    pub telegram_api_url: String,
    pub poll_timeout: Duration,
    pub access_users: Vec<String>,
    pub log_level: String,
    pub texts: BotTexts,
    pub scraper: ScraperConfig,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> CounterResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> CounterResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| CounterError::MissingEnvVar(key.to_string()));

        let wordpress_api = require("WORDPRESS_API")?;
        Url::parse(&wordpress_api)
            .map_err(|e| CounterError::Config(format!("WORDPRESS_API is not a valid URL: {}", e)))?;

        let script = match get("COUNT_SCRIPT") {
            Some(raw) => raw.parse::<Script>().map_err(CounterError::Config)?,
            None => Script::default(),
        };

        let scraper = ScraperConfig {
            medium_host: get("MEDIUM_HOST").unwrap_or_else(|| DEFAULT_MEDIUM_HOST.to_string()),
            wordpress_host: require("WORDPRESS_HOST")?,
            wordpress_api,
            wordpress_login: get("WORDPRESS_LOGIN").unwrap_or_default(),
            wordpress_password: get("WORDPRESS_PASSWORD").unwrap_or_default(),
            script,
            fetch_timeout: Duration::from_secs(parse_secs(
                "FETCH_TIMEOUT_SECS",
                get("FETCH_TIMEOUT_SECS"),
                DEFAULT_FETCH_TIMEOUT_SECS,
            )?),
        };

        let defaults = BotTexts::default();
        let texts = BotTexts {
            start: get("TEXT_START").unwrap_or(defaults.start),
            unknown: get("TEXT_UNKNOWN").unwrap_or(defaults.unknown),
            wrong_link: get("TEXT_WRONG_LINK").unwrap_or(defaults.wrong_link),
            unauthorized: get("TEXT_UNAUTHORIZED").unwrap_or(defaults.unauthorized),
        };

        let access_users: Vec<String> = get("ACCESS_USERS")
            .map(|raw| {
                raw.split(',')
                    .map(|u| u.trim().trim_start_matches('@').to_string())
                    .filter(|u| !u.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            telegram_token: get("TELEGRAM_TOKEN"),
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| telegram::DEFAULT_API_URL.to_string()),
            poll_timeout: Duration::from_secs(parse_secs(
                "POLL_TIMEOUT_SECS",
                get("POLL_TIMEOUT_SECS"),
                DEFAULT_POLL_TIMEOUT_SECS,
            )?),
            access_users,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            texts,
            scraper,
        })
    }

    /// The bot token, which only the `run` command needs
    pub fn require_token(&self) -> CounterResult<&str> {
        self.telegram_token
            .as_deref()
            .ok_or_else(|| CounterError::MissingEnvVar("TELEGRAM_TOKEN".to_string()))
    }
}

fn parse_secs(key: &str, raw: Option<String>, default: u64) -> CounterResult<u64> {
    match raw {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(CounterError::Config(format!(
                "{} must be a positive number of seconds, got {:?}",
                key, raw
            ))),
            Ok(secs) => Ok(secs),
        },
    }
}
