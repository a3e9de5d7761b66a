use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::remote::RemoteStore;
use crate::store::HospitalStore;

/// Subscribes to the remote change feed and forces a full refresh on every
/// event, whatever table or row it touched. No row-level patching.
pub struct ChangeListener {
    store: Arc<HospitalStore>,
    remote: Arc<dyn RemoteStore>,
    retry_interval: Duration,
}

impl ChangeListener {
    pub fn new(store: Arc<HospitalStore>, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            store,
            remote,
            retry_interval: Duration::from_secs(5),
        }
    }

    /// Runs until the process exits; a dropped feed is re-subscribed after a
    /// short wait.
    pub async fn start(self) {
        info!("starting change listener");

        loop {
            match self.remote.subscribe_changes().await {
                Ok(mut events) => {
                    while let Some(event) = events.recv().await {
                        info!("change detected in {}, refreshing...", event.table);
                        self.store.refresh_forced().await;
                    }
                    warn!("change feed closed, reconnecting");
                }
                Err(e) => {
                    warn!("change feed subscribe failed: {}", e);
                }
            }

            tokio::time::sleep(self.retry_interval).await;
        }
    }
}
