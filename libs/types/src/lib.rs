//! # AuraSwap Shared Types
//!
//! Primitives shared by the pricing library, the exchange core and the
//! service binary: raw fixed-point amounts, provider identity, asset sides,
//! swap quotes and operation receipts.
//!
//! ## Precision Rules
//!
//! All settlement amounts are `u128` values denominated in the smallest
//! indivisible unit of their asset (wei-style). Floating point is never
//! used for anything that settles; decimal rendering exists for display
//! only.

pub mod amount;
pub mod identity;
pub mod receipts;

pub use amount::{AssetSide, DisplayAmount, RawAmount};
pub use identity::{AccountId, IdentityError};
pub use receipts::{LiquidityAdded, LiquidityRemoved, SwapExecuted, SwapQuote};
