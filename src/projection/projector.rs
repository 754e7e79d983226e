//! Mission projector: which missions a panel sees, and in which role.
//!
//! The projector is a pure read over the full mission set and the
//! requesting panel's configuration. It never writes endpoints; a pending
//! mission is shown with only the endpoint its creator supplied.

use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{Leg, Mission, MissionRecord, MissionType, PanelConfig, Stage};

/// A mission as seen from one panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelMission {
    /// The mission, unmodified.
    #[serde(flatten)]
    pub mission: Mission,
    /// Role the mission plays for this panel.
    pub display_type: MissionType,
    /// Whether this panel authored the mission.
    pub is_created_by_this_panel: bool,
}

/// Project every stored mission onto `panel`.
///
/// Records that do not form a valid mission (no creator, inconsistent
/// endpoints) are skipped with a warning. Output order follows the
/// store's order.
#[must_use]
pub fn project(records: &[MissionRecord], panel: &PanelConfig) -> Vec<PanelMission> {
    let projected: Vec<PanelMission> = records
        .iter()
        .filter_map(|record| match Mission::try_from(record.clone()) {
            Ok(mission) => Some(mission),
            Err(err) => {
                warn!(mission_id = record.id, %err, "skipping invalid mission record");
                None
            }
        })
        .filter_map(|mission| {
            let display_type = display_type(&mission, panel)?;
            let is_created_by_this_panel = mission.is_created_by(&panel.user_id);
            Some(PanelMission {
                mission,
                display_type,
                is_created_by_this_panel,
            })
        })
        .collect();

    debug!(
        panel_id = %panel.user_id,
        visible = projected.len(),
        total = records.len(),
        "missions projected"
    );
    projected
}

/// Role `mission` plays for `panel`, or `None` if the panel cannot see it.
///
/// The creator always sees its mission in the original role. Once a
/// mission is claimed, only the creator and the claiming panel see it.
#[must_use]
pub fn display_type(mission: &Mission, panel: &PanelConfig) -> Option<MissionType> {
    let panel_id = panel.user_id.as_str();
    if mission.is_created_by(panel_id) {
        return Some(mission.mission_type);
    }

    let assigned_elsewhere = mission
        .assigned_to_panel_id
        .as_deref()
        .is_some_and(|assignee| assignee != panel_id);
    if assigned_elsewhere {
        return None;
    }

    match &mission.stage {
        Stage::Pending(known) => {
            if mission.assigned_to_panel_id.is_some() {
                return None;
            }
            let area = known.area();
            match mission.mission_type {
                MissionType::Send if panel.can_receive_from(area) => Some(MissionType::Receive),
                MissionType::Receive if panel.can_send_to(area) => Some(MissionType::Send),
                _ => None,
            }
        }
        Stage::InQueue(leg) | Stage::Active(leg) | Stage::Completed(leg) => {
            resolved_role(leg, panel)
        }
    }
}

/// Role of a panel on a resolved leg; receiving wins over sending.
fn resolved_role(leg: &Leg, panel: &PanelConfig) -> Option<MissionType> {
    if panel.can_receive_from(&leg.start) {
        Some(MissionType::Receive)
    } else if panel.can_send_to(&leg.destination) {
        Some(MissionType::Send)
    } else {
        None
    }
}
