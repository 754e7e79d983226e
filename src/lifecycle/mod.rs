//! Mission lifecycle: pure transition rules, the service that applies
//! them against the stores, and the panel registry.

pub mod registry;
pub mod service;
pub mod transitions;

pub use registry::PanelRegistry;
pub use service::{AdvanceOutcome, MissionService};
pub use transitions::{CargoCatalog, RobotPool};
