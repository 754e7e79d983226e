//! Advance event consumer.
//!
//! Reads [`AdvanceDue`] events from the timer channel, applies them
//! through [`MissionService::advance`], and arms the follow-up timer when
//! the mission lands in another auto-advancing status.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::lifecycle::{AdvanceOutcome, MissionService};

use super::advance_timer::{AdvanceDue, AdvanceTimers};

/// Spawn a background task that applies due advances.
///
/// The task runs until `cancel` fires or the channel closes.
#[must_use]
pub fn spawn_advance_consumer(
    mut rx: mpsc::Receiver<AdvanceDue>,
    service: MissionService,
    timers: AdvanceTimers,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let due = tokio::select! {
                () = cancel.cancelled() => {
                    info!("advance consumer shutting down");
                    break;
                }
                maybe_due = rx.recv() => {
                    if let Some(due) = maybe_due { due } else {
                        info!("advance channel closed");
                        break;
                    }
                }
            };

            apply(&service, &timers, due).await;
        }
    })
}

async fn apply(service: &MissionService, timers: &AdvanceTimers, due: AdvanceDue) {
    let AdvanceDue {
        mission_id,
        expected,
    } = due;

    match service.advance(mission_id, expected).await {
        Ok(AdvanceOutcome::Advanced(mission)) => {
            let next = mission.status();
            if next.auto_advances() {
                timers.schedule(mission_id, next).await;
            } else {
                timers.disarm_if(mission_id, expected).await;
            }
        }
        Ok(AdvanceOutcome::Stale) => timers.disarm_if(mission_id, expected).await,
        Err(err) => {
            warn!(mission_id, %expected, %err, "failed to advance mission");
            timers.disarm_if(mission_id, expected).await;
        }
    }
}
