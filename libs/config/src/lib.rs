//! # AuraSwap Configuration
//!
//! Centralized configuration for the exchange service. Loads from an
//! optional TOML file with `AURASWAP_`-prefixed environment-variable
//! overrides; defaults are usable with no file present at all.
//!
//! The fee rate lives here rather than as a literal inside the pricing
//! code: it affects all swap pricing and callers may provision pools with
//! a different tier.

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Fee denominator; `fee_bps` must stay strictly below it.
const BPS_DENOMINATOR: u32 = 10_000;

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Proportional swap fee in basis points (30 = 0.3%).
    pub fee_bps: u32,

    /// Pool provisioning settings.
    pub pool: PoolProvisionConfig,

    /// Default log filter when RUST_LOG is unset.
    pub log_level: String,
}

/// Settings for the singleton pool the service provisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolProvisionConfig {
    /// Display symbol of the base asset.
    pub base_symbol: String,
    /// Display symbol of the paired token.
    pub token_symbol: String,
    /// Display decimals for the base asset.
    pub base_decimals: u8,
    /// Display decimals for the token.
    pub token_decimals: u8,
    /// Where the service persists exchange state between invocations.
    pub state_file: PathBuf,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            fee_bps: 30,
            pool: PoolProvisionConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for PoolProvisionConfig {
    fn default() -> Self {
        Self {
            base_symbol: "ETH".to_string(),
            token_symbol: "AURA".to_string(),
            base_decimals: 18,
            token_decimals: 18,
            state_file: PathBuf::from("auraswap-state.json"),
        }
    }
}

impl ExchangeConfig {
    /// Load configuration: defaults, then the TOML file if present, then
    /// `AURASWAP_*` environment variables (e.g. `AURASWAP_FEE_BPS=100`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Config::try_from(&ExchangeConfig::default())
            .context("Failed to encode default configuration")?;

        let mut builder = Config::builder().add_source(defaults);

        let file = path.unwrap_or(Path::new("config/auraswap.toml"));
        if file.exists() {
            debug!(?file, "Loading configuration file");
            builder = builder.add_source(File::from(file).required(true));
        } else if path.is_some() {
            // An explicitly requested file that is missing is an error;
            // the default path silently falls back to defaults.
            bail!("Configuration file not found: {}", file.display());
        } else {
            warn!(?file, "No configuration file found, using defaults");
        }

        builder = builder.add_source(
            Environment::with_prefix("AURASWAP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: ExchangeConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fee_bps >= BPS_DENOMINATOR {
            bail!(
                "fee_bps must be below {}, got {}",
                BPS_DENOMINATOR,
                self.fee_bps
            );
        }
        if self.pool.base_symbol.is_empty() || self.pool.token_symbol.is_empty() {
            bail!("asset symbols must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ExchangeConfig::default();
        assert_eq!(config.fee_bps, 30);
        assert_eq!(config.pool.token_symbol, "AURA");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "fee_bps = 100\n\n[pool]\ntoken_symbol = \"TEST\"\nstate_file = \"/tmp/test-state.json\"\n"
        )
        .unwrap();

        let config = ExchangeConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.fee_bps, 100);
        assert_eq!(config.pool.token_symbol, "TEST");
        // Untouched keys keep their defaults
        assert_eq!(config.pool.base_symbol, "ETH");
    }

    #[test]
    fn env_overrides_file_and_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "log_level = \"warn\"").unwrap();

        // log_level is the one key no other test reads, so setting it here
        // cannot race a concurrently running test.
        std::env::set_var("AURASWAP_LOG_LEVEL", "debug");
        let result = ExchangeConfig::load(Some(file.path()));
        std::env::remove_var("AURASWAP_LOG_LEVEL");

        assert_eq!(result.unwrap().log_level, "debug");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = ExchangeConfig::load(Some(Path::new("/nonexistent/auraswap.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn excessive_fee_is_rejected() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "fee_bps = 10000").unwrap();
        assert!(ExchangeConfig::load(Some(file.path())).is_err());
    }
}
