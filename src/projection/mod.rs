//! Per-panel views of the shared mission set.

pub mod board;
pub mod projector;

pub use projector::{display_type, project, PanelMission};
