//! Persistent exchange state
//!
//! The whole exchange (pool book plus custody balances) persists between
//! invocations as pretty-printed JSON, the way the original deployment
//! tooling wrote its address manifest. One file is one exchange instance.

use anyhow::{Context, Result};
use config::ExchangeConfig;
use exchange_core::{InMemoryCustody, Pool};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
pub struct ExchangeState {
    pub base_symbol: String,
    pub token_symbol: String,
    pub pool: Pool,
    pub custody: InMemoryCustody,
}

impl ExchangeState {
    pub fn provision(config: &ExchangeConfig) -> Self {
        Self {
            base_symbol: config.pool.base_symbol.clone(),
            token_symbol: config.pool.token_symbol.clone(),
            pool: Pool::new(config.fee_bps),
            custody: InMemoryCustody::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read exchange state from {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Malformed exchange state in {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create state directory {}", parent.display())
                })?;
            }
        }
        let rendered =
            serde_json::to_string_pretty(self).context("Failed to serialize exchange state")?;
        fs::write(path, rendered)
            .with_context(|| format!("Failed to write exchange state to {}", path.display()))?;
        info!(path = %path.display(), "Exchange state saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_core::Custody;
    use types::{AccountId, AssetSide};

    #[test]
    fn save_load_roundtrip_preserves_everything() {
        let config = ExchangeConfig::default();
        let mut state = ExchangeState::provision(&config);
        let owner = AccountId::from_seed(1);
        state.custody.fund(owner, AssetSide::Base, 5_000);
        state.custody.fund(owner, AssetSide::Token, 10_000);
        state
            .pool
            .add_liquidity(&mut state.custody, owner, 1_000, 2_000)
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        state.save(&path).unwrap();

        let restored = ExchangeState::load(&path).unwrap();
        assert_eq!(restored.pool.reserves(), (1_000, 2_000));
        assert_eq!(restored.pool.total_shares(), 1_000);
        assert_eq!(restored.pool.position_of(&owner), 1_000);
        assert_eq!(restored.custody.balance_of(&owner, AssetSide::Base), 4_000);
        assert_eq!(restored.token_symbol, "AURA");
    }

    #[test]
    fn load_of_missing_file_errors() {
        assert!(ExchangeState::load(Path::new("/nonexistent/state.json")).is_err());
    }
}
