//! Reset signalling between queue mutations and the auto-call scheduler.
//!
//! Every mutation that changes what the scheduler would decide (a seat
//! flip, a manual call, a fresh ticket) raises the owning counter's
//! signal. The scheduler waits on the registry-wide signal; a wake-up
//! means "the queue just moved, restart your timer".

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::Notify;
use uuid::Uuid;

type CounterKey = (Uuid, i64);

/// One counter's reset signal.
///
/// `set` is idempotent while unconsumed: any number of sets before a
/// waiter observes the signal collapse into a single wake-up.
#[derive(Default)]
pub struct ResetSignal {
    notify: Notify,
}

impl ResetSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        // notify_one stores a single permit when nobody is waiting.
        self.notify.notify_one();
    }

    /// Wait until the signal is set or the timeout elapses, consuming
    /// the signal. Returns `true` when woken by a set.
    pub async fn wait_with_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.notify.notified())
            .await
            .is_ok()
    }
}

/// Owns one [`ResetSignal`] per (tenant, counter), created lazily.
///
/// A single registry instance is constructed at module init and shared
/// by the service (which sets signals) and the scheduler (which waits).
#[derive(Default)]
pub struct ResetRegistry {
    signals: RwLock<HashMap<CounterKey, Arc<ResetSignal>>>,
    /// Registry-wide signal: set whenever any counter's signal is set.
    any: ResetSignal,
}

impl ResetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The signal for one counter, creating it on first use.
    pub fn signal(&self, tenant_id: Uuid, counter_id: i64) -> Arc<ResetSignal> {
        let key = (tenant_id, counter_id);
        if let Some(signal) = self.signals.read().get(&key) {
            return signal.clone();
        }
        self.signals
            .write()
            .entry(key)
            .or_insert_with(|| Arc::new(ResetSignal::new()))
            .clone()
    }

    /// Raise a counter's signal and the registry-wide one.
    pub fn set(&self, tenant_id: Uuid, counter_id: i64) {
        self.signal(tenant_id, counter_id).set();
        self.any.set();
    }

    /// Wait until any counter's signal is raised or the timeout elapses.
    /// Returns `true` when woken by a set.
    pub async fn wait_any(&self, timeout: Duration) -> bool {
        self.any.wait_with_timeout(timeout).await
    }
}
