//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger policy configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
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

/// Ledger policy knobs that the surrounding application may tune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Minutes after purchase during which a member may void their own streque.
    #[serde(default = "default_self_void_grace_minutes")]
    pub self_void_grace_minutes: i64,
    /// Whether admin transactions notify the account owner.
    #[serde(default = "default_notify_admin_transactions")]
    pub notify_admin_transactions: bool,
}

fn default_self_void_grace_minutes() -> i64 {
    15
}

fn default_notify_admin_transactions() -> bool {
    true
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            self_void_grace_minutes: default_self_void_grace_minutes(),
            notify_admin_transactions: default_notify_admin_transactions(),
        }
    }
}

impl LedgerConfig {
    /// Returns the self-void grace window as a duration.
    #[must_use]
    pub fn self_void_grace(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.self_void_grace_minutes)
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
            .add_source(config::Environment::with_prefix("STREQUE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_config_defaults() {
        let ledger = LedgerConfig::default();
        assert_eq!(ledger.self_void_grace_minutes, 15);
        assert!(ledger.notify_admin_transactions);
        assert_eq!(ledger.self_void_grace(), chrono::Duration::minutes(15));
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("STREQUE__DATABASE__URL", Some("sqlite::memory:")),
                ("STREQUE__DATABASE__MAX_CONNECTIONS", Some("4")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.database.max_connections, 4);
                assert_eq!(config.database.min_connections, 1);
                assert_eq!(config.ledger, LedgerConfig::default());
            },
        );
    }

    #[test]
    fn test_load_without_database_url_fails() {
        temp_env::with_var_unset("STREQUE__DATABASE__URL", || {
            assert!(AppConfig::load().is_err());
        });
    }
}
