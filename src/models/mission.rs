//! Transport mission model.
//!
//! Two shapes exist. [`MissionRecord`] is the flat, nullable form held by
//! the mission store and exchanged on the wire; it can represent legacy
//! rows (no creator, inconsistent endpoints). [`Mission`] is the
//! validated entity the lifecycle and projector work with: endpoints are
//! carried by a [`Stage`] so a pending mission holds exactly one known
//! endpoint and every later stage holds a complete [`Leg`].

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::area::{point_ref, Area};
use crate::{AppError, Result};

/// Mission identifier, assigned monotonically by the mission store.
pub type MissionId = i64;

/// Lifecycle status for a mission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MissionStatus {
    /// Created, waiting for another panel to accept it.
    Pending,
    /// Accepted and dispatched; waiting for the robot to depart.
    #[serde(rename = "In queue")]
    InQueue,
    /// Robot is moving the cargo.
    Active,
    /// Delivered; immutable from here on.
    Completed,
}

impl MissionStatus {
    /// Stored string form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InQueue => "In queue",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Parse the stored string form.
    ///
    /// # Errors
    ///
    /// Returns `AppError::DataIntegrity` for unknown values.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "Pending" => Ok(Self::Pending),
            "In queue" => Ok(Self::InQueue),
            "Active" => Ok(Self::Active),
            "Completed" => Ok(Self::Completed),
            other => Err(AppError::DataIntegrity(format!(
                "invalid mission status: {other}"
            ))),
        }
    }

    /// Whether a timer moves missions out of this status.
    #[must_use]
    pub fn auto_advances(self) -> bool {
        matches!(self, Self::InQueue | Self::Active)
    }
}

impl Display for MissionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directional intent of a mission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MissionType {
    /// Cargo leaves the panel's area.
    Send,
    /// Cargo arrives at the panel's area.
    Receive,
}

impl MissionType {
    /// Stored string form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Send => "Send",
            Self::Receive => "Receive",
        }
    }

    /// Parse the stored string form.
    ///
    /// # Errors
    ///
    /// Returns `AppError::DataIntegrity` for unknown values.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "Send" => Ok(Self::Send),
            "Receive" => Ok(Self::Receive),
            other => Err(AppError::DataIntegrity(format!(
                "invalid mission type: {other}"
            ))),
        }
    }

    /// The role on the other side of the transport.
    #[must_use]
    pub fn counterpart(self) -> Self {
        match self {
            Self::Send => Self::Receive,
            Self::Receive => Self::Send,
        }
    }
}

impl Display for MissionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single endpoint a pending mission knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Pickup area is known; the destination is supplied on acceptance.
    Start(Area),
    /// Drop-off area is known; the start point is supplied on acceptance.
    Destination(Area),
}

impl Endpoint {
    /// Area of the known endpoint regardless of its slot.
    #[must_use]
    pub fn area(&self) -> &Area {
        match self {
            Self::Start(area) | Self::Destination(area) => area,
        }
    }
}

/// Fully resolved route of an accepted mission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    /// Pickup area.
    pub start: Area,
    /// Drop-off area.
    pub destination: Area,
}

/// Lifecycle stage with the endpoints valid for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Waiting for acceptance; only the creator's endpoint is known.
    Pending(Endpoint),
    /// Accepted and queued for dispatch.
    InQueue(Leg),
    /// In transit.
    Active(Leg),
    /// Delivered.
    Completed(Leg),
}

impl Stage {
    /// Status corresponding to this stage.
    #[must_use]
    pub fn status(&self) -> MissionStatus {
        match self {
            Self::Pending(_) => MissionStatus::Pending,
            Self::InQueue(_) => MissionStatus::InQueue,
            Self::Active(_) => MissionStatus::Active,
            Self::Completed(_) => MissionStatus::Completed,
        }
    }

    /// Resolved route, once the mission has been accepted.
    #[must_use]
    pub fn leg(&self) -> Option<&Leg> {
        match self {
            Self::Pending(_) => None,
            Self::InQueue(leg) | Self::Active(leg) | Self::Completed(leg) => Some(leg),
        }
    }

    /// Next stage reached by the dispatch timer, if any.
    #[must_use]
    pub fn advanced(&self) -> Option<Self> {
        match self {
            Self::InQueue(leg) => Some(Self::Active(leg.clone())),
            Self::Active(leg) => Some(Self::Completed(leg.clone())),
            Self::Pending(_) | Self::Completed(_) => None,
        }
    }
}

/// Validated transport mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "MissionRecord", try_from = "MissionRecord")]
pub struct Mission {
    /// Unique identifier; immutable.
    pub id: MissionId,
    /// Original directional intent set by the creator; immutable.
    pub mission_type: MissionType,
    /// Lifecycle stage and endpoints.
    pub stage: Stage,
    /// Kind of goods; immutable after creation.
    pub cargo_type: Option<String>,
    /// Quantity; informational only.
    pub number_of_pieces: Option<u32>,
    /// Robot assigned at dispatch.
    pub robot_name: Option<String>,
    /// Panel that authored the mission.
    pub created_by_panel_id: String,
    /// Panel that accepted the mission; set once.
    pub assigned_to_panel_id: Option<String>,
}

impl Mission {
    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> MissionStatus {
        self.stage.status()
    }

    /// Start point as stored, if known.
    #[must_use]
    pub fn start_point(&self) -> Option<&Area> {
        match &self.stage {
            Stage::Pending(Endpoint::Start(area)) => Some(area),
            Stage::Pending(Endpoint::Destination(_)) => None,
            Stage::InQueue(leg) | Stage::Active(leg) | Stage::Completed(leg) => Some(&leg.start),
        }
    }

    /// Destination as stored, if known.
    #[must_use]
    pub fn destination(&self) -> Option<&Area> {
        match &self.stage {
            Stage::Pending(Endpoint::Destination(area)) => Some(area),
            Stage::Pending(Endpoint::Start(_)) => None,
            Stage::InQueue(leg) | Stage::Active(leg) | Stage::Completed(leg) => {
                Some(&leg.destination)
            }
        }
    }

    /// Whether `panel_id` authored this mission.
    #[must_use]
    pub fn is_created_by(&self, panel_id: &str) -> bool {
        self.created_by_panel_id == panel_id
    }

    /// Whether `panel_id` accepted this mission.
    #[must_use]
    pub fn is_assigned_to(&self, panel_id: &str) -> bool {
        self.assigned_to_panel_id.as_deref() == Some(panel_id)
    }
}

/// Flat mission representation held by the store and used on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionRecord {
    /// Unique identifier.
    pub id: MissionId,
    /// Robot assigned at dispatch.
    #[serde(default)]
    pub robot_name: Option<String>,
    /// Pickup area in `"Point <code>"` form.
    #[serde(default, with = "point_ref")]
    pub start_point: Option<Area>,
    /// Drop-off area in `"Point <code>"` form.
    #[serde(default, with = "point_ref")]
    pub destination: Option<Area>,
    /// Lifecycle status.
    pub status: MissionStatus,
    /// Original directional intent.
    #[serde(rename = "type")]
    pub mission_type: MissionType,
    /// Kind of goods.
    #[serde(default)]
    pub cargo_type: Option<String>,
    /// Quantity.
    #[serde(default)]
    pub number_of_pieces: Option<u32>,
    /// Authoring panel; absent on legacy records.
    #[serde(default)]
    pub created_by_panel_id: Option<String>,
    /// Accepting panel.
    #[serde(default)]
    pub assigned_to_panel_id: Option<String>,
}

impl TryFrom<MissionRecord> for Mission {
    type Error = AppError;

    fn try_from(record: MissionRecord) -> Result<Self> {
        let id = record.id;
        let created_by_panel_id = record
            .created_by_panel_id
            .filter(|creator| !creator.is_empty())
            .ok_or_else(|| AppError::DataIntegrity(format!("mission {id} has no creator panel")))?;

        let stage = match (record.status, record.start_point, record.destination) {
            (MissionStatus::Pending, Some(start), None) => Stage::Pending(Endpoint::Start(start)),
            (MissionStatus::Pending, None, Some(destination)) => {
                Stage::Pending(Endpoint::Destination(destination))
            }
            (MissionStatus::Pending, _, _) => {
                return Err(AppError::DataIntegrity(format!(
                    "pending mission {id} must have exactly one endpoint"
                )));
            }
            (status, Some(start), Some(destination)) => {
                let leg = Leg { start, destination };
                match status {
                    MissionStatus::InQueue => Stage::InQueue(leg),
                    MissionStatus::Active => Stage::Active(leg),
                    _ => Stage::Completed(leg),
                }
            }
            (status, _, _) => {
                return Err(AppError::DataIntegrity(format!(
                    "mission {id} in status {status} is missing an endpoint"
                )));
            }
        };

        Ok(Self {
            id,
            mission_type: record.mission_type,
            stage,
            cargo_type: record.cargo_type,
            number_of_pieces: record.number_of_pieces,
            robot_name: record.robot_name,
            created_by_panel_id,
            assigned_to_panel_id: record.assigned_to_panel_id,
        })
    }
}

impl From<&Mission> for MissionRecord {
    fn from(mission: &Mission) -> Self {
        Self {
            id: mission.id,
            robot_name: mission.robot_name.clone(),
            start_point: mission.start_point().cloned(),
            destination: mission.destination().cloned(),
            status: mission.status(),
            mission_type: mission.mission_type,
            cargo_type: mission.cargo_type.clone(),
            number_of_pieces: mission.number_of_pieces,
            created_by_panel_id: Some(mission.created_by_panel_id.clone()),
            assigned_to_panel_id: mission.assigned_to_panel_id.clone(),
        }
    }
}

impl From<Mission> for MissionRecord {
    fn from(mission: Mission) -> Self {
        Self::from(&mission)
    }
}
