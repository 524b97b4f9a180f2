//! Application configuration management.

use chrono_tz::Tz;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Telegram transport configuration.
    pub telegram: TelegramConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Daily report configuration.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Telegram transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token issued by BotFather.
    pub token: String,
    /// Bot username without the leading `@`, used to detect mentions
    /// in group chats.
    #[serde(default = "default_username")]
    pub username: String,
    /// Long-poll timeout for `getUpdates`, in seconds.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u32,
}

fn default_username() -> String {
    "tally_bot".to_string()
}

fn default_poll_timeout() -> u32 {
    30
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// MongoDB connection string.
    pub url: String,
    /// Database name.
    #[serde(default = "default_database")]
    pub database: String,
    /// Collection holding the ledger document.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// `_id` of the single ledger document.
    #[serde(default = "default_document_id")]
    pub document_id: String,
}

fn default_database() -> String {
    "tally".to_string()
}

fn default_collection() -> String {
    "ledger".to_string()
}

fn default_document_id() -> String {
    "primary".to_string()
}

/// Daily report configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Hour of day (0-23) at which the report fires.
    #[serde(default = "default_report_hour")]
    pub hour: u32,
    /// Minute (0-59) at which the report fires.
    #[serde(default = "default_report_minute")]
    pub minute: u32,
    /// IANA timezone the report clock runs in.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            hour: default_report_hour(),
            minute: default_report_minute(),
            timezone: default_timezone(),
        }
    }
}

fn default_report_hour() -> u32 {
    6
}

fn default_report_minute() -> u32 {
    0
}

fn default_timezone() -> Tz {
    chrono_tz::Asia::Ho_Chi_Minh
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails
    /// validation.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("TALLY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.report.hour > 23 {
            return Err(config::ConfigError::Message(format!(
                "report.hour must be 0-23, got {}",
                self.report.hour
            )));
        }
        if self.report.minute > 59 {
            return Err(config::ConfigError::Message(format!(
                "report.minute must be 0-59, got {}",
                self.report.minute
            )));
        }
        Ok(())
    }
}
