//! Background auto-call loop.
//!
//! One task per process: sleeps for the configured interval, then
//! evaluates every active counter. A reset signal raised during the
//! sleep means a manual action just advanced the queue; the loop then
//! restarts its timer without evaluating, so the automatic path never
//! races a fresh manual call.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::reset::ResetRegistry;
use super::service::Service;

pub struct AutoCallScheduler {
    service: Arc<Service>,
    resets: Arc<ResetRegistry>,
    interval: Duration,
}

impl AutoCallScheduler {
    pub fn new(service: Arc<Service>, resets: Arc<ResetRegistry>, interval: Duration) -> Self {
        Self {
            service,
            resets,
            interval,
        }
    }

    /// Run until the token is cancelled. Evaluations themselves commit
    /// inside repository transactions, so cancellation between loop
    /// iterations never leaves a ticket half-transitioned.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "auto-call scheduler started"
        );
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("auto-call scheduler stopped");
                    return;
                }
                signalled = self.resets.wait_any(self.interval) => {
                    if signalled {
                        tracing::debug!("reset signal observed, rearming auto-call timer");
                        continue;
                    }
                    tracing::debug!("auto-call tick");
                    self.service.evaluate_all().await;
                }
            }
        }
    }
}
