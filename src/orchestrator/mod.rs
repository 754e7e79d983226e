//! Background orchestration of timer-driven mission transitions.
//!
//! [`advance_timer::AdvanceTimers`] arms one timer per queued or active
//! mission and emits [`advance_timer::AdvanceDue`] events when a delay
//! elapses; [`advance_consumer`] applies those events through the mission
//! service and re-arms the next stage; [`store_watcher`] keeps the timers
//! in step with missions changed by other processes.

pub mod advance_consumer;
pub mod advance_timer;
pub mod store_watcher;
