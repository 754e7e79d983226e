//! Domain model module declarations.

pub mod area;
pub mod mission;
pub mod panel;

pub use area::Area;
pub use mission::{
    Endpoint, Leg, Mission, MissionId, MissionRecord, MissionStatus, MissionType, Stage,
};
pub use panel::PanelConfig;
