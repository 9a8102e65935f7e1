//! # AuraSwap AMM Library - Constant-Product Mathematics
//!
//! ## Purpose
//!
//! Exact integer mathematics for the AuraSwap exchange core: constant-product
//! swap pricing with basis-point fees, proportional liquidity-share math, and
//! display-level price readouts. All settlement paths use checked `u128`
//! arithmetic in smallest asset units; nothing that settles touches floating
//! point or rounds before the final division.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Reserve and share balances from the exchange core
//! - **Output Destinations**: Operation staging in `exchange-core`, read-only
//!   quotes for callers
//! - **Precision**: Raw smallest-unit `u128` for settlement; `Decimal` only
//!   for `spot_price` / `price_impact` readouts
//! - **Overflow**: Every intermediate multiply/add is checked and surfaces
//!   as [`MathError::Overflow`] rather than wrapping

pub mod cpmm;
pub mod price;

pub use cpmm::{CpmmMath, BPS_DENOMINATOR};
pub use price::{price_impact, spot_price};

use thiserror::Error;

/// Errors from pricing and liquidity math.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// An intermediate computation exceeded the representable u128 range.
    #[error("Arithmetic overflow in pricing computation")]
    Overflow,

    /// A formula was evaluated against a pool with an empty reserve.
    #[error("Reserves must be positive")]
    EmptyReserves,

    /// The supplied input amount was zero.
    #[error("Input amount must be positive")]
    ZeroInput,

    /// A reverse quote asked for more output than the pool holds.
    #[error("Requested output {requested} exceeds reserve {reserve}")]
    OutputExceedsReserves { requested: u128, reserve: u128 },
}

pub type Result<T> = std::result::Result<T, MathError>;
