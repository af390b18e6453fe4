use chrono::{DateTime, Utc};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use repdate_core::dates::resolve_today;
use repdate_core::repository::DEFAULT_ENTRY_DATES_LIMIT;
use repdate_core::timezone::validate_timezone;
use serde::Deserialize;

use crate::timezone::detect_system_timezone;

/// Settings read from `config.toml` and `REPDATE_*` environment variables.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// SQLite database file, or `sqlite::memory:`
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Fixed reference date for upcoming-date queries
    #[serde(default)]
    pub today: Option<String>,
    /// IANA timezone occurrences are displayed in
    #[serde(default = "detect_system_timezone")]
    pub display_timezone: String,
    /// Number of dates listed when `--limit` is not given
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

fn default_database_path() -> String {
    "repdate.db".to_string()
}

fn default_limit() -> u32 {
    DEFAULT_ENTRY_DATES_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            today: None,
            display_timezone: detect_system_timezone(),
            default_limit: default_limit(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("REPDATE_"))
            .extract()
    }

    /// Applies command-line overrides and checks the display timezone.
    pub fn with_overrides(mut self, today: Option<String>, timezone: Option<String>) -> anyhow::Result<Self> {
        if today.is_some() {
            self.today = today;
        }
        if let Some(timezone) = timezone {
            self.display_timezone = timezone;
        }
        validate_timezone(&self.display_timezone)?;
        Ok(self)
    }

    /// The reference "today": the configured date when it parses, `now` otherwise.
    pub fn today(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        resolve_today(self.today.as_deref(), now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base() -> Config {
        Config {
            database_path: "test.db".to_string(),
            today: None,
            display_timezone: "UTC".to_string(),
            default_limit: 31,
        }
    }

    #[test]
    fn test_overrides_replace_configured_values() {
        let config = base()
            .with_overrides(Some("2024-03-01".to_string()), Some("Europe/Berlin".to_string()))
            .unwrap();
        assert_eq!(config.today.as_deref(), Some("2024-03-01"));
        assert_eq!(config.display_timezone, "Europe/Berlin");
    }

    #[test]
    fn test_missing_overrides_keep_configuration() {
        let mut configured = base();
        configured.today = Some("2024-01-15".to_string());
        let config = configured.with_overrides(None, None).unwrap();
        assert_eq!(config.today.as_deref(), Some("2024-01-15"));
        assert_eq!(config.display_timezone, "UTC");
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        assert!(base().with_overrides(None, Some("Nowhere/Special".to_string())).is_err());
    }

    #[test]
    fn test_today_prefers_configured_date() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let mut config = base();
        assert_eq!(config.today(now), now);

        config.today = Some("2024-02-01".to_string());
        assert_eq!(config.today(now), Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    }
}
