use std::{sync::Arc, time::Duration};

use shared::{domain::QuotaSnapshot, protocol::Endpoint};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::{
    error::TransportError,
    transport::{fetch, Transport},
};

pub const DEFAULT_QUOTA_INTERVAL: Duration = Duration::from_secs(60);

pub async fn poll_quota(transport: &dyn Transport) -> Result<QuotaSnapshot, TransportError> {
    fetch(transport, Endpoint::UsageQuota, None).await
}

/// Background poller. Failures are logged and swallowed; the last good
/// snapshot stays published. The task stops when the monitor is dropped.
pub struct QuotaMonitor {
    latest: watch::Receiver<Option<QuotaSnapshot>>,
    task: JoinHandle<()>,
}

impl QuotaMonitor {
    pub fn spawn(transport: Arc<dyn Transport>, interval: Duration) -> Self {
        let (tx, latest) = watch::channel(None);
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match poll_quota(transport.as_ref()).await {
                    Ok(snapshot) => {
                        debug!(services = snapshot.len(), "quota refreshed");
                        tx.send_replace(Some(snapshot));
                    }
                    Err(err) => warn!(error = %err, "quota refresh failed"),
                }
            }
        });
        Self { latest, task }
    }

    pub fn latest(&self) -> Option<QuotaSnapshot> {
        self.latest.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<QuotaSnapshot>> {
        self.latest.clone()
    }
}

impl Drop for QuotaMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "tests/quota_tests.rs"]
mod tests;
