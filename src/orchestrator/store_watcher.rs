//! Periodic reconciliation of advance timers with the mission store.
//!
//! Missions can be accepted or cancelled by any process sharing the
//! database, so the watcher re-reads the store on a fixed interval and
//! lets [`AdvanceTimers::sync`] arm or cancel timers to match.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::lifecycle::MissionService;

use super::advance_timer::AdvanceTimers;

/// Spawn the polling task. It runs until `cancel` fires.
#[must_use]
pub fn spawn_store_watcher(
    service: MissionService,
    timers: AdvanceTimers,
    poll_interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("store watcher shutting down");
                    break;
                }
                _ = ticker.tick() => {}
            }

            match service.records().await {
                Ok(records) => {
                    let armed = timers.sync(&records).await;
                    if armed > 0 {
                        debug!(armed, "advance timers armed from store");
                    }
                }
                Err(err) => warn!(%err, "failed to read missions for timer sync"),
            }
        }
    })
}
