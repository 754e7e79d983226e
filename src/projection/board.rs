//! Operator-facing presentation of projected missions.

use serde::Serialize;

use super::projector::PanelMission;
use crate::models::{Area, MissionStatus, MissionType, Stage};

/// Status tab on a panel's board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardTab {
    /// Missions waiting for acceptance or departure.
    Pending,
    /// Missions in transit.
    Active,
    /// Delivered missions.
    Completed,
}

impl BoardTab {
    /// Whether a mission in `status` is listed under this tab.
    ///
    /// The pending tab also lists queued missions.
    #[must_use]
    pub fn includes(self, status: MissionStatus) -> bool {
        match self {
            Self::Pending => matches!(status, MissionStatus::Pending | MissionStatus::InQueue),
            Self::Active => status == MissionStatus::Active,
            Self::Completed => status == MissionStatus::Completed,
        }
    }

    /// Tab heading.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Pending => "Ordered Missions",
            Self::Active => "Active Missions",
            Self::Completed => "Completed Missions",
        }
    }
}

/// Missions of `missions` listed under `tab`, in input order.
#[must_use]
pub fn filter_tab(missions: &[PanelMission], tab: BoardTab) -> Vec<&PanelMission> {
    missions
        .iter()
        .filter(|item| tab.includes(item.mission.status()))
        .collect()
}

/// Operator label for a status.
#[must_use]
pub fn status_label(status: MissionStatus) -> &'static str {
    match status {
        MissionStatus::Pending => "Ordered",
        MissionStatus::InQueue => "Departure",
        MissionStatus::Active => "Active",
        MissionStatus::Completed => "Completed",
    }
}

/// Endpoints visible on a mission card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedRoute {
    /// Pickup area, when known.
    pub from: Option<Area>,
    /// Drop-off area, when known.
    pub to: Option<Area>,
}

/// Route shown for a projected mission.
///
/// A pending mission shows only the endpoint its creator supplied; the
/// endpoint the acceptor will pick stays hidden until acceptance.
#[must_use]
pub fn displayed_route(item: &PanelMission) -> DisplayedRoute {
    DisplayedRoute {
        from: item.mission.start_point().cloned(),
        to: item.mission.destination().cloned(),
    }
}

/// Action a panel may take on a mission card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CardAction {
    /// Delete the mission.
    Cancel,
    /// Accept as the sending side.
    Send,
    /// Accept as the receiving side.
    Receive,
}

/// Actions available to the viewing panel on `item`.
#[must_use]
pub fn available_actions(item: &PanelMission, panel_id: &str) -> Vec<CardAction> {
    let mission = &item.mission;
    match &mission.stage {
        Stage::Pending(_) if item.is_created_by_this_panel => vec![CardAction::Cancel],
        Stage::Pending(_) => match item.display_type {
            MissionType::Send => vec![CardAction::Send],
            MissionType::Receive => vec![CardAction::Receive],
        },
        Stage::InQueue(_)
            if mission.is_created_by(panel_id) || mission.is_assigned_to(panel_id) =>
        {
            vec![CardAction::Cancel]
        }
        _ => Vec::new(),
    }
}
