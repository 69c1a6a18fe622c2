//! Application configuration management.

use chrono_tz::Tz;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Fee ledger configuration.
    #[serde(default)]
    pub fees: FeesConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT settings. Tokens are issued by the identity service; this service only
/// validates them.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key shared with the token issuer.
    pub secret: String,
    /// Access token expiration in seconds (used for development tokens).
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

/// Fee ledger settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FeesConfig {
    /// IANA time zone of the school; drives "today" and hour-of-day bucketing.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    /// First hour shown in the by-hour collection chart.
    #[serde(default = "default_report_hour_start")]
    pub report_hour_start: u32,
    /// Last hour (inclusive) shown in the by-hour collection chart.
    #[serde(default = "default_report_hour_end")]
    pub report_hour_end: u32,
    /// Upper bound on a payment write before it is cancelled and rolled back.
    #[serde(default = "default_payment_timeout")]
    pub payment_timeout_secs: u64,
}

fn default_timezone() -> Tz {
    chrono_tz::Asia::Kolkata
}

fn default_report_hour_start() -> u32 {
    7
}

fn default_report_hour_end() -> u32 {
    21
}

fn default_payment_timeout() -> u64 {
    10
}

impl Default for FeesConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            report_hour_start: default_report_hour_start(),
            report_hour_end: default_report_hour_end(),
            payment_timeout_secs: default_payment_timeout(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BURSAR").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("BURSAR__SERVER__PORT", Some("9090")),
                ("BURSAR__DATABASE__URL", Some("postgres://localhost/bursar_test")),
                ("BURSAR__JWT__SECRET", Some("test-secret")),
                ("BURSAR__FEES__TIMEZONE", Some("Asia/Kolkata")),
                ("BURSAR__FEES__REPORT_HOUR_END", Some("20")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.database.url, "postgres://localhost/bursar_test");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.jwt.secret, "test-secret");
                assert_eq!(config.fees.timezone, chrono_tz::Asia::Kolkata);
                assert_eq!(config.fees.report_hour_start, 7);
                assert_eq!(config.fees.report_hour_end, 20);
            },
        );
    }

    #[test]
    fn test_fees_defaults() {
        let fees = FeesConfig::default();
        assert_eq!(fees.report_hour_start, 7);
        assert_eq!(fees.report_hour_end, 21);
        assert_eq!(fees.payment_timeout_secs, 10);
    }
}
