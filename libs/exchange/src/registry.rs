//! Concurrent pool registry
//!
//! Pools are shared as `Arc<RwLock<Pool>>`. Each operation takes the write
//! lock for its whole read-compute-commit span, so operations submitted
//! concurrently against the same pool are linearizable; reads take the read
//! lock and never block each other.

use crate::pool::Pool;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Identity of a pool instance. Stable across snapshot/restore.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PoolId(pub u64);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool-{}", self.0)
    }
}

/// Registry of live pools, one entry per trading pair.
#[derive(Debug, Default)]
pub struct PoolRegistry {
    pools: DashMap<PoolId, Arc<RwLock<Pool>>>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pool under `id`. Returns the existing handle if the id is
    /// already taken, so provisioning is idempotent.
    pub fn create_pool(&self, id: PoolId, fee_bps: u32) -> Arc<RwLock<Pool>> {
        let entry = self
            .pools
            .entry(id)
            .or_insert_with(|| {
                info!(%id, fee_bps, "Provisioned pool");
                Arc::new(RwLock::new(Pool::new(fee_bps)))
            });
        entry.clone()
    }

    pub fn pool(&self, id: &PoolId) -> Option<Arc<RwLock<Pool>>> {
        self.pools.get(id).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Pool ids currently registered, for rendering.
    pub fn pool_ids(&self) -> Vec<PoolId> {
        self.pools.iter().map(|entry| *entry.key()).collect()
    }
}
