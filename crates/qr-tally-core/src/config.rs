use crate::error::Error;
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_STORE_PATH: &str = "qr_tally.db";
pub const DEFAULT_FLUSH_DELAY_MS: u64 = 800;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// RocksDB directory holding the log, settings and session label.
    pub store_path: String,
    /// Delay before a staged log snapshot is written.
    pub flush_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: DEFAULT_STORE_PATH.to_string(),
            flush_delay_ms: DEFAULT_FLUSH_DELAY_MS,
        }
    }
}

impl AppConfig {
    pub fn flush_delay(&self) -> Duration {
        Duration::from_millis(self.flush_delay_ms)
    }
}

/// Defaults, then an optional `Config` file, then `QR_TALLY_*` variables.
pub fn load_configuration() -> Result<AppConfig, Error> {
    let builder = Config::builder()
        .set_default("store_path", DEFAULT_STORE_PATH)?
        .set_default("flush_delay_ms", DEFAULT_FLUSH_DELAY_MS)?
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("QR_TALLY"))
        .build()?;
    Ok(builder.try_deserialize::<AppConfig>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.store_path, "qr_tally.db");
        assert_eq!(config.flush_delay(), Duration::from_millis(800));
    }

    #[test]
    fn test_builder_defaults_deserialize() {
        let config = Config::builder()
            .set_default("store_path", DEFAULT_STORE_PATH)
            .unwrap()
            .set_default("flush_delay_ms", DEFAULT_FLUSH_DELAY_MS)
            .unwrap()
            .set_override("flush_delay_ms", 50)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize::<AppConfig>()
            .unwrap();
        assert_eq!(config.store_path, DEFAULT_STORE_PATH);
        assert_eq!(config.flush_delay_ms, 50);
    }

    #[test]
    fn test_bad_value_surfaces_as_config_error() {
        let err = Config::builder()
            .set_override("store_path", "scans.db")
            .and_then(|b| b.set_override("flush_delay_ms", "soon"))
            .and_then(|b| b.build())
            .and_then(|c| c.try_deserialize::<AppConfig>())
            .map_err(Error::from)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
