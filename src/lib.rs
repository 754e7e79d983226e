#![forbid(unsafe_code)]

//! Warehouse transport mission board.
//!
//! Panels (operator stations bound to physical areas) create transport
//! missions, accept missions offered by other panels, and watch them
//! advance through `Pending → In queue → Active → Completed`. The
//! [`projection`] module decides how each mission looks from a given
//! panel; [`lifecycle`] owns the state machine and the caller-facing
//! operations.

pub mod config;
pub mod errors;
pub mod lifecycle;
pub mod models;
pub mod orchestrator;
pub mod persistence;
pub mod projection;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
