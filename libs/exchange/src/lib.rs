//! # AuraSwap Exchange Core
//!
//! ## Purpose
//!
//! The economic/state engine of the exchange: paired reserve accounting,
//! liquidity-share issuance, constant-product swap execution and invariant
//! enforcement, packaged as a plain owned [`Pool`] value plus a concurrent
//! [`PoolRegistry`] for shared access.
//!
//! ## Operation Model
//!
//! Every public operation executes as one logical transaction: read current
//! state, compute deltas against a staged copy, validate guards and the
//! reserve-product invariant, instruct the custody ledger atomically, then
//! commit everything or nothing. Custody is an external collaborator behind
//! the [`Custody`] trait; the core never observes a half-applied transfer.
//!
//! ## Concurrency
//!
//! Pools carry no interior locking themselves. [`PoolRegistry`] wraps each
//! pool in `Arc<RwLock<_>>` and operations hold the write lock for their
//! whole read-compute-commit span, which makes concurrent submissions
//! linearizable without any background work.

pub mod custody;
pub mod error;
pub mod ledger;
pub mod pool;
pub mod registry;

pub use custody::{Custody, CustodyError, InMemoryCustody, Transfer, TransferKind};
pub use error::ExchangeError;
pub use ledger::ShareLedger;
pub use pool::{Pool, DEFAULT_FEE_BPS};
pub use registry::{PoolId, PoolRegistry};
