//! Process configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults
//! 2. `stockroom.toml` in the working directory
//! 3. Environment variables: `STOCKROOM_*`, `__` separating nested keys
//!
//! ```toml
//! [database]
//! path = "/var/lib/stockroom/stockroom.sqlite3"
//!
//! [logging]
//! level = "info"
//! dir = "/var/log/stockroom"
//! ```
//!
//! The same settings via environment: `STOCKROOM_DATABASE__PATH`,
//! `STOCKROOM_LOGGING__LEVEL`, `STOCKROOM_LOGGING__DIR`.

use crate::logging::default_log_level;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::path::PathBuf;

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "stockroom.toml";
/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "STOCKROOM_";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// SQLite store location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file. `None` selects an in-memory database.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Rolling file log settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Absolute log directory. File logging stays off when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

fn default_level() -> String {
    default_log_level().to_string()
}

impl Config {
    /// Loads config with layered resolution (defaults → file → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// The provider stack behind [`Config::load`].
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE_NAME))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, CONFIG_FILE_NAME};
    use crate::logging::default_log_level;
    use figment::Jail;
    use std::path::PathBuf;

    #[test]
    fn defaults_apply_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let config: Config = Config::figment().extract()?;
            assert_eq!(config.database.path, None);
            assert_eq!(config.logging.level, default_log_level());
            assert_eq!(config.logging.dir, None);
            Ok(())
        });
    }

    #[test]
    fn file_values_are_read() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE_NAME,
                r#"
                [database]
                path = "/data/stockroom.sqlite3"

                [logging]
                level = "warn"
                "#,
            )?;

            let config: Config = Config::figment().extract()?;
            assert_eq!(
                config.database.path,
                Some(PathBuf::from("/data/stockroom.sqlite3"))
            );
            assert_eq!(config.logging.level, "warn");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE_NAME, "[logging]\nlevel = \"warn\"\n")?;
            jail.set_env("STOCKROOM_LOGGING__LEVEL", "error");
            jail.set_env("STOCKROOM_LOGGING__DIR", "/tmp/stockroom-logs");

            let config: Config = Config::figment().extract()?;
            assert_eq!(config.logging.level, "error");
            assert_eq!(
                config.logging.dir,
                Some(PathBuf::from("/tmp/stockroom-logs"))
            );
            Ok(())
        });
    }
}
