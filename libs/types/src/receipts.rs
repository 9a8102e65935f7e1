//! Operation results returned by the exchange core
//!
//! Each mutating operation returns one of these structures; the service
//! renders them as JSON for the caller, so they all carry serde derives.

use crate::RawAmount;
use serde::{Deserialize, Serialize};

/// Ephemeral pricing breakdown for a single swap. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub amount_in: RawAmount,
    /// Portion of `amount_in` retained by the pool for liquidity providers.
    pub fee_amount: RawAmount,
    pub amount_out: RawAmount,
}

/// Result of a successful `add_liquidity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityAdded {
    pub shares_minted: RawAmount,
    pub base_in: RawAmount,
    pub token_in: RawAmount,
}

/// Result of a successful `remove_liquidity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityRemoved {
    pub base_out: RawAmount,
    pub token_out: RawAmount,
}

/// Result of a successful swap in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapExecuted {
    pub quote: SwapQuote,
}
