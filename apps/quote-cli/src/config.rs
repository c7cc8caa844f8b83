//! CLI configuration module.
//!
//! Configuration is layered with the `config` crate:
//!
//! ```text
//! built-in defaults
//!   └── TOML file (--config <path> or STONEWORKS_CONFIG), optional
//!         └── environment: STONEWORKS__DATABASE_PATH,
//!                          STONEWORKS__PRICING__WASTE_FACTOR, ...
//! ```
//!
//! Keys are snake_case; the `config` crate lowercases everything it reads.
//!
//! ## Example file
//! ```toml
//! database_path = "./stoneworks.db"
//!
//! [pricing]
//! waste_factor = "0.12"
//! validity_days = 45
//! default_delivery_zone = "regional"
//!
//! [pricing.rates.delivery]
//! metro = "90"
//! regional = "160"
//! ```
//!
//! Rate tables the file leaves out keep their built-in values. A
//! `[pricing.rates.*]` table that is given replaces the built-in table of the
//! same name wholesale, so a partial table fails at quote time with a
//! configuration error rather than pricing the missing keys at zero.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use stoneworks_core::PricingConfig;

/// Environment variable naming the configuration file.
pub const CONFIG_FILE_ENV: &str = "STONEWORKS_CONFIG";

/// Prefix for per-key environment overrides.
pub const ENV_PREFIX: &str = "STONEWORKS";

/// Default SQLite database file.
pub const DEFAULT_DATABASE_PATH: &str = "./stoneworks.db";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Rate table and pricing policy
    #[serde(default)]
    pub pricing: PricingConfig,
}

impl AppConfig {
    /// Loads configuration from defaults, an optional file and the
    /// environment.
    ///
    /// `file` wins over `STONEWORKS_CONFIG`. A file that is named but
    /// missing is an error.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = file
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from));

        let mut builder =
            Config::builder().set_default("database_path", DEFAULT_DATABASE_PATH)?;

        if let Some(path) = &file {
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }

        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use stoneworks_core::{Complexity, DeliveryZone, RateTable};

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("stoneworks-{}-{}.toml", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = write_temp(
            "override",
            r#"
            database_path = "/tmp/quotes.db"

            [pricing]
            waste_factor = "0.12"
            validity_days = 45
            default_delivery_zone = "regional"
            "#,
        );

        let config = AppConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.database_path, PathBuf::from("/tmp/quotes.db"));
        assert_eq!(config.pricing.waste_factor, dec!(0.12));
        assert_eq!(config.pricing.validity_days, 45);
        assert_eq!(config.pricing.default_delivery_zone, DeliveryZone::Regional);
        // Untouched sections keep their defaults
        assert_eq!(
            config.pricing.rates.fabrication_rate(Complexity::Medium).unwrap().amount(),
            dec!(65)
        );
    }

    #[test]
    fn test_documented_example_loads() {
        let path = write_temp(
            "example",
            r#"
database_path = "./stoneworks.db"

[pricing]
waste_factor = "0.12"
validity_days = 45
default_delivery_zone = "regional"

[pricing.rates.delivery]
metro = "90"
regional = "160"
"#,
        );

        let config = AppConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        let rates = &config.pricing.rates;
        assert_eq!(rates.delivery_rate(DeliveryZone::Metro).unwrap().amount(), dec!(90));
        assert_eq!(rates.delivery_rate(DeliveryZone::Regional).unwrap().amount(), dec!(160));
        // Tables the file leaves out keep the built-in rates
        assert_eq!(rates.cutouts, RateTable::default().cutouts);
        assert!(rates.missing_entries().is_empty());
    }

    #[test]
    fn test_partial_table_reports_missing_keys() {
        let path = write_temp(
            "partial",
            r#"
[pricing.rates.delivery]
metro = "90"
"#,
        );

        let config = AppConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert_eq!(config.pricing.rates.missing_entries(), vec![("delivery", "regional")]);
    }

    #[test]
    fn test_missing_named_file_is_an_error() {
        let missing = std::env::temp_dir().join("stoneworks-does-not-exist.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }
}
