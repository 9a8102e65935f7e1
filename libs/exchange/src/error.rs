//! Exchange-core errors
//!
//! Every variant carries enough context to act on the failure without
//! re-deriving pool state. All errors abort the whole operation with zero
//! observable state change; retrying (say, with a looser slippage bound) is
//! the caller's decision.

use crate::custody::CustodyError;
use auraswap_amm::MathError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExchangeError {
    /// A supplied amount is zero, rounds to zero after ratio/fee math, or
    /// violates the caller's own deposit bound.
    #[error("Insufficient input: {reason}")]
    InsufficientInput { reason: String },

    /// Withdrawal beyond the caller's share balance, or a swap against an
    /// empty pool.
    #[error("Insufficient liquidity: {reason}")]
    InsufficientLiquidity { reason: String },

    /// Computed swap output fell below the caller-specified minimum.
    #[error("Slippage exceeded: computed output {computed} below minimum {minimum}")]
    SlippageExceeded { computed: u128, minimum: u128 },

    /// The reserve-product invariant would be violated post-mutation.
    /// Fatal internal-consistency bug, never an expected path.
    #[error("Invariant violation: reserve product {after} fell below {before}")]
    InvariantViolation { before: u128, after: u128 },

    /// An intermediate computation exceeded the representable range.
    #[error("Arithmetic overflow: {0}")]
    Overflow(MathError),

    /// The custody ledger refused the transfer batch.
    #[error("Custody rejected operation: {0}")]
    Custody(#[from] CustodyError),
}

impl From<MathError> for ExchangeError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::Overflow => ExchangeError::Overflow(err),
            MathError::ZeroInput => ExchangeError::InsufficientInput {
                reason: "amount must be positive".to_string(),
            },
            MathError::EmptyReserves => ExchangeError::InsufficientLiquidity {
                reason: "pool has no reserves".to_string(),
            },
            MathError::OutputExceedsReserves { requested, reserve } => {
                ExchangeError::InsufficientLiquidity {
                    reason: format!("requested output {requested} exceeds reserve {reserve}"),
                }
            }
        }
    }
}
