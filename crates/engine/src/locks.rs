//! Per-simulation write serialization.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Hands out one async mutex per simulation id, shared between the scheduled
/// sweep and the on-demand entry points, so two tasks never interleave on the
/// same simulation's balance.
#[derive(Clone, Default)]
pub struct SimulationLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl SimulationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one simulation, creating it on first use.
    pub async fn acquire(&self, id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(id).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
        };
        lock.lock_owned().await
    }
}
