// src/config/settings.rs
use std::path::PathBuf;
use std::time::Duration;

use super::Secret;

pub const DEFAULT_APP_NAME: &str = "crypto-news-pipeline";
pub const DEFAULT_MODEL_NAME: &str = "gpt-4o";
pub const DEFAULT_MODEL_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// The offending value is not echoed; it may be a credential.
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Process settings, read once from the environment (plus `.env` in development).
#[derive(Debug, Clone)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub environment: String,
    pub debug: bool,

    pub db_uri: Secret,
    pub db_name: String,

    pub model_name: String,
    pub model_api_key: Secret,
    pub model_base_url: String,

    pub bot_token: Secret,
    pub group_id: Secret,
    pub telegram_api_url: String,

    pub news_api_key: Secret,
    pub news_url: String,

    pub http_timeout: Duration,
    /// Prometheus textfile written at the end of a run, if set.
    pub metrics_textfile: Option<PathBuf>,
}

impl Settings {
    /// Load from process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let debug = match get("DEBUG") {
            Some(v) => parse_bool("DEBUG", &v)?,
            None => true,
        };

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(v) => v.parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: "HTTP_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if http_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "HTTP_TIMEOUT_SECS",
                reason: "must be greater than zero".into(),
            });
        }

        let news_url = required("NEWS_URL")?;
        if url::Url::parse(&news_url).is_err() {
            return Err(ConfigError::Invalid {
                key: "NEWS_URL",
                reason: "not an absolute URL".into(),
            });
        }

        Ok(Self {
            app_name: get("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            debug,
            db_uri: Secret::new(required("DB_URI")?),
            db_name: required("DB_NAME")?,
            model_name: get("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            model_api_key: Secret::new(required("MODEL_API_KEY")?),
            model_base_url: get("MODEL_BASE_URL")
                .unwrap_or_else(|| DEFAULT_MODEL_BASE_URL.to_string()),
            bot_token: Secret::new(required("BOT_TOKEN")?),
            group_id: Secret::new(required("GROUP_ID")?),
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            news_api_key: Secret::new(required("NEWS_API_KEY")?),
            news_url,
            http_timeout: Duration::from_secs(http_timeout_secs),
            metrics_textfile: get("METRICS_TEXTFILE").map(PathBuf::from),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

fn parse_bool(key: &'static str, v: &str) -> Result<bool, ConfigError> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            reason: "expected a boolean".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DB_URI", "postgres://user:pw@localhost:5432"),
            ("DB_NAME", "crypto"),
            ("MODEL_API_KEY", "sk-test"),
            ("BOT_TOKEN", "123:abc"),
            ("GROUP_ID", "-100200300"),
            ("NEWS_API_KEY", "news-key"),
            ("NEWS_URL", "https://cryptonews-api.com/api/v1/category?section=general&items=50"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Settings, ConfigError> {
        Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_apply() {
        let s = load(&base()).unwrap();
        assert_eq!(s.app_name, DEFAULT_APP_NAME);
        assert_eq!(s.model_name, "gpt-4o");
        assert!(s.debug);
        assert!(s.is_development());
        assert!(!s.is_production());
        assert_eq!(s.http_timeout, Duration::from_secs(30));
        assert!(s.metrics_textfile.is_none());
    }

    #[test]
    fn missing_required_is_reported_by_name() {
        let mut vars = base();
        vars.remove("BOT_TOKEN");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing("BOT_TOKEN"));
    }

    #[test]
    fn blank_counts_as_missing() {
        let mut vars = base();
        vars.insert("NEWS_API_KEY", "   ");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing("NEWS_API_KEY"));
    }

    #[test]
    fn bad_bool_is_invalid() {
        let mut vars = base();
        vars.insert("DEBUG", "maybe");
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid { key: "DEBUG", .. }
        ));
    }

    #[test]
    fn production_flag_is_case_insensitive() {
        let mut vars = base();
        vars.insert("ENVIRONMENT", "Production");
        vars.insert("DEBUG", "false");
        let s = load(&vars).unwrap();
        assert!(s.is_production());
        assert!(!s.debug);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let s = load(&base()).unwrap();
        let dump = format!("{s:?}");
        assert!(!dump.contains("sk-test"));
        assert!(!dump.contains("123:abc"));
        assert!(!dump.contains("user:pw"));
        assert!(dump.contains("crypto"));
    }
}
