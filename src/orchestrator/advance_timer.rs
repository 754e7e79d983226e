//! Per-mission advance timers.
//!
//! A mission in `In queue` or `Active` gets exactly one armed timer keyed
//! by its id and the status it is expected to still hold when the delay
//! elapses. When the delay elapses an [`AdvanceDue`] is delivered over a
//! `tokio::sync::mpsc` channel; the timer does not touch the store itself.
//!
//! Timers are cancelled when the mission disappears or leaves the expected
//! status, and a timer whose mission has moved on by the time it fires is
//! discarded by the consumer as stale.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, Instrument};

use crate::config::TimerConfig;
use crate::models::{MissionId, MissionRecord, MissionStatus};

/// A mission whose delay in `expected` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceDue {
    /// Mission to advance.
    pub mission_id: MissionId,
    /// Status the mission must still hold for the transition to apply.
    pub expected: MissionStatus,
}

struct Armed {
    expected: MissionStatus,
    cancel: CancellationToken,
}

/// Registry of armed advance timers.
///
/// Cloning is cheap; every clone shares the same timers.
#[derive(Clone)]
pub struct AdvanceTimers {
    armed: Arc<Mutex<HashMap<MissionId, Armed>>>,
    in_queue_delay: Duration,
    active_delay: Duration,
    event_tx: mpsc::Sender<AdvanceDue>,
    shutdown: CancellationToken,
}

impl AdvanceTimers {
    /// Create an empty registry.
    ///
    /// Cancelling `shutdown` cancels every timer armed through it.
    #[must_use]
    pub fn new(
        timers: &TimerConfig,
        event_tx: mpsc::Sender<AdvanceDue>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            armed: Arc::new(Mutex::new(HashMap::new())),
            in_queue_delay: timers.in_queue_to_active(),
            active_delay: timers.active_to_completed(),
            event_tx,
            shutdown,
        }
    }

    fn delay_for(&self, status: MissionStatus) -> Option<Duration> {
        match status {
            MissionStatus::InQueue => Some(self.in_queue_delay),
            MissionStatus::Active => Some(self.active_delay),
            MissionStatus::Pending | MissionStatus::Completed => None,
        }
    }

    /// Arm the timer for `mission_id` in `status`.
    ///
    /// Returns `true` when a new timer was started. A timer already armed
    /// for the same or a later status is left running, since statuses only
    /// move forward and the caller's view is then out of date; one armed
    /// for an earlier status is replaced. Statuses that never auto-advance
    /// disarm instead.
    pub async fn schedule(&self, mission_id: MissionId, status: MissionStatus) -> bool {
        let Some(delay) = self.delay_for(status) else {
            self.cancel(mission_id).await;
            return false;
        };

        let mut armed = self.armed.lock().await;
        if armed
            .get(&mission_id)
            .is_some_and(|timer| timer.expected >= status)
        {
            return false;
        }
        if let Some(previous) = armed.remove(&mission_id) {
            previous.cancel.cancel();
        }

        let cancel = self.shutdown.child_token();
        armed.insert(
            mission_id,
            Armed {
                expected: status,
                cancel: cancel.clone(),
            },
        );
        drop(armed);

        let event_tx = self.event_tx.clone();
        tokio::spawn(
            async move {
                tokio::select! {
                    () = cancel.cancelled() => {
                        debug!("advance timer cancelled");
                    }
                    () = tokio::time::sleep(delay) => {
                        let due = AdvanceDue { mission_id, expected: status };
                        if event_tx.send(due).await.is_err() {
                            debug!("advance channel closed before timer fired");
                        }
                    }
                }
            }
            .instrument(info_span!("advance_timer", mission_id, expected = %status)),
        );
        debug!(mission_id, %status, delay_ms = delay.as_millis(), "advance timer armed");
        true
    }

    /// Cancel the timer for `mission_id`, if any.
    pub async fn cancel(&self, mission_id: MissionId) {
        if let Some(timer) = self.armed.lock().await.remove(&mission_id) {
            timer.cancel.cancel();
            debug!(mission_id, "advance timer disarmed");
        }
    }

    /// Forget the timer for `mission_id` only if it is still the one armed
    /// for `expected`.
    pub async fn disarm_if(&self, mission_id: MissionId, expected: MissionStatus) {
        let mut armed = self.armed.lock().await;
        if armed
            .get(&mission_id)
            .is_some_and(|timer| timer.expected == expected)
        {
            if let Some(timer) = armed.remove(&mission_id) {
                timer.cancel.cancel();
            }
        }
    }

    /// Reconcile armed timers with the current mission records.
    ///
    /// Every queued or active mission ends up with a timer for its current
    /// status; timers for deleted missions or missions that left those
    /// statuses are cancelled. Returns how many timers were newly armed.
    pub async fn sync(&self, records: &[MissionRecord]) -> usize {
        let live: HashSet<MissionId> = records
            .iter()
            .filter(|record| record.status.auto_advances())
            .map(|record| record.id)
            .collect();

        let orphaned: Vec<MissionId> = self
            .armed
            .lock()
            .await
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        for mission_id in orphaned {
            self.cancel(mission_id).await;
        }

        let mut started = 0;
        for record in records.iter().filter(|record| live.contains(&record.id)) {
            if self.schedule(record.id, record.status).await {
                started += 1;
            }
        }
        started
    }

    /// Status the armed timer for `mission_id` expects, if any.
    pub async fn armed_for(&self, mission_id: MissionId) -> Option<MissionStatus> {
        self.armed
            .lock()
            .await
            .get(&mission_id)
            .map(|timer| timer.expected)
    }

    /// Number of armed timers.
    pub async fn len(&self) -> usize {
        self.armed.lock().await.len()
    }

    /// Whether no timer is armed.
    pub async fn is_empty(&self) -> bool {
        self.armed.lock().await.is_empty()
    }
}
