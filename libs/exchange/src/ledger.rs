//! Liquidity share accounting
//!
//! Tracks total outstanding shares and each provider's balance. The sum of
//! positions always equals `total_shares`; positions are removed when they
//! reach zero.

use crate::error::ExchangeError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types::{AccountId, RawAmount};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareLedger {
    total_shares: RawAmount,
    positions: HashMap<AccountId, RawAmount>,
}

impl ShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_shares(&self) -> RawAmount {
        self.total_shares
    }

    pub fn position_of(&self, owner: &AccountId) -> RawAmount {
        self.positions.get(owner).copied().unwrap_or(0)
    }

    pub fn provider_count(&self) -> usize {
        self.positions.len()
    }

    /// Mint shares to an owner. Caller has already validated the amount.
    pub fn mint(&mut self, owner: AccountId, shares: RawAmount) -> Result<(), ExchangeError> {
        let total = self
            .total_shares
            .checked_add(shares)
            .ok_or(ExchangeError::Overflow(auraswap_amm::MathError::Overflow))?;
        let position = self.position_of(&owner);
        let position = position
            .checked_add(shares)
            .ok_or(ExchangeError::Overflow(auraswap_amm::MathError::Overflow))?;
        self.total_shares = total;
        self.positions.insert(owner, position);
        Ok(())
    }

    /// Burn shares from an owner's position.
    pub fn burn(&mut self, owner: &AccountId, shares: RawAmount) -> Result<(), ExchangeError> {
        let position = self.position_of(owner);
        if shares == 0 || shares > position {
            return Err(ExchangeError::InsufficientLiquidity {
                reason: format!(
                    "cannot burn {shares} shares, {owner} holds {position}"
                ),
            });
        }
        // position >= shares and total >= position, so neither subtraction
        // can underflow
        self.total_shares -= shares;
        let remaining = position - shares;
        if remaining == 0 {
            self.positions.remove(owner);
        } else {
            self.positions.insert(*owner, remaining);
        }
        Ok(())
    }
}
