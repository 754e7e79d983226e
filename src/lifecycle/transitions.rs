//! Pure mission lifecycle rules.
//!
//! Every function here takes the current records by reference and either
//! returns the next mission value or a validation error; nothing is
//! written until the caller persists the result. Only these functions
//! produce endpoint values, so the projector never invents one.

use std::collections::BTreeMap;

use crate::config::AreaConfig;
use crate::models::{
    Area, Endpoint, Leg, Mission, MissionId, MissionStatus, MissionType, PanelConfig, Stage,
};
use crate::projection::projector;
use crate::{AppError, Result};

/// Cargo capabilities per area, loaded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CargoCatalog {
    areas: BTreeMap<Area, AreaConfig>,
}

impl CargoCatalog {
    /// Register capabilities for an area, replacing any previous entry.
    pub fn insert(&mut self, area: Area, config: AreaConfig) {
        self.areas.insert(area, config);
    }

    /// Whether cargo of `cargo_type` may leave `area`.
    ///
    /// Missions without a cargo type are unconstrained.
    #[must_use]
    pub fn can_send(&self, area: &Area, cargo_type: Option<&str>) -> bool {
        cargo_type.is_none_or(|cargo| {
            self.areas
                .get(area)
                .is_some_and(|cfg| cfg.send.iter().any(|c| c == cargo))
        })
    }

    /// Whether cargo of `cargo_type` may arrive at `area`.
    #[must_use]
    pub fn can_receive(&self, area: &Area, cargo_type: Option<&str>) -> bool {
        cargo_type.is_none_or(|cargo| {
            self.areas
                .get(area)
                .is_some_and(|cfg| cfg.receive.iter().any(|c| c == cargo))
        })
    }

    /// Operator-facing name for an area, falling back to its code.
    #[must_use]
    pub fn display_name<'a>(&'a self, area: &'a Area) -> &'a str {
        self.areas
            .get(area)
            .and_then(|cfg| cfg.label.as_deref())
            .unwrap_or(area.code())
    }
}

/// Robots available for dispatch.
///
/// Selection is a pure function of the mission id so acceptance is
/// reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotPool {
    names: Vec<String>,
}

impl RobotPool {
    /// Build a pool, ignoring blank names.
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names: names
                .into_iter()
                .filter(|name| !name.trim().is_empty())
                .collect(),
        }
    }

    /// Robot dispatched for `mission_id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when the pool is empty.
    pub fn pick(&self, mission_id: MissionId) -> Result<String> {
        if self.names.is_empty() {
            return Err(AppError::Config("no robots configured".into()));
        }
        let len = i64::try_from(self.names.len())
            .map_err(|_| AppError::Config("robot pool too large".into()))?;
        let slot = usize::try_from(mission_id.rem_euclid(len))
            .map_err(|_| AppError::Config("robot slot out of range".into()))?;
        Ok(self.names[slot].clone())
    }
}

/// Input for creating a mission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMission {
    /// Directional intent from the creator's point of view.
    pub mission_type: MissionType,
    /// Kind of goods.
    pub cargo_type: Option<String>,
    /// Optional quantity.
    pub number_of_pieces: Option<u32>,
    /// Creator's origin area the mission starts or ends at.
    pub origin: Area,
}

/// Check a creation request against the creator and the catalog.
///
/// Returns the endpoint the new mission will know: the start point for a
/// `Send` mission, the destination for a `Receive` mission.
///
/// # Errors
///
/// Returns `AppError::Validation` if the origin is not one of the
/// creator's areas, the area cannot handle the cargo type in the
/// requested direction, or the piece count is zero.
pub fn check_new(
    creator: &PanelConfig,
    request: &NewMission,
    catalog: &CargoCatalog,
) -> Result<Endpoint> {
    if !creator.operates_from(&request.origin) {
        return Err(AppError::Validation(format!(
            "area {} is not an origin area of panel {}",
            request.origin, creator.user_id
        )));
    }
    if request.number_of_pieces == Some(0) {
        return Err(AppError::Validation(
            "number of pieces must be positive".into(),
        ));
    }

    let cargo = request.cargo_type.as_deref();
    match request.mission_type {
        MissionType::Send => {
            if !catalog.can_send(&request.origin, cargo) {
                return Err(cargo_rejected(&request.origin, cargo, "send"));
            }
            Ok(Endpoint::Start(request.origin.clone()))
        }
        MissionType::Receive => {
            if !catalog.can_receive(&request.origin, cargo) {
                return Err(cargo_rejected(&request.origin, cargo, "receive"));
            }
            Ok(Endpoint::Destination(request.origin.clone()))
        }
    }
}

/// Build a pending mission for `creator`.
///
/// # Errors
///
/// Returns `AppError::Validation` under the same conditions as
/// [`check_new`].
pub fn create(
    id: MissionId,
    creator: &PanelConfig,
    request: NewMission,
    catalog: &CargoCatalog,
) -> Result<Mission> {
    let endpoint = check_new(creator, &request, catalog)?;

    Ok(Mission {
        id,
        mission_type: request.mission_type,
        stage: Stage::Pending(endpoint),
        cargo_type: request.cargo_type,
        number_of_pieces: request.number_of_pieces,
        robot_name: None,
        created_by_panel_id: creator.user_id.clone(),
        assigned_to_panel_id: None,
    })
}

/// Everything an acceptance needs besides the mission itself.
#[derive(Debug, Clone)]
pub struct Acceptance<'a> {
    /// Panel accepting the mission.
    pub acceptor: &'a PanelConfig,
    /// Role the acceptor takes: `Send` supplies the start point, `Receive`
    /// supplies the destination.
    pub role: MissionType,
    /// Acceptor's area for the endpoint it supplies.
    pub chosen_area: &'a Area,
    /// Creator's configuration, used to resolve the creator's origin area.
    pub creator: Option<&'a PanelConfig>,
    /// Cargo capabilities.
    pub catalog: &'a CargoCatalog,
    /// Robot dispatched for the mission.
    pub robot_name: String,
}

/// Accept a pending mission on behalf of another panel, moving it to
/// `In queue` with both endpoints resolved.
///
/// # Errors
///
/// Returns `AppError::Validation` if the mission is not pending, already
/// assigned, created by the acceptor, not offered to the acceptor in
/// `role`, or if the chosen area is not a cargo-capable origin area of
/// the acceptor.
pub fn accept(mission: &Mission, acceptance: &Acceptance<'_>) -> Result<Mission> {
    let acceptor = acceptance.acceptor;
    let Stage::Pending(known) = &mission.stage else {
        return Err(AppError::Validation(format!(
            "mission {} is {}, only pending missions can be accepted",
            mission.id,
            mission.status()
        )));
    };
    if mission.assigned_to_panel_id.is_some() {
        return Err(AppError::Validation(format!(
            "mission {} is already assigned",
            mission.id
        )));
    }
    if mission.is_created_by(&acceptor.user_id) {
        return Err(AppError::Validation(format!(
            "panel {} cannot accept its own mission {}",
            acceptor.user_id, mission.id
        )));
    }
    if projector::display_type(mission, acceptor) != Some(acceptance.role) {
        return Err(AppError::Validation(format!(
            "mission {} is not offered to panel {} as {}",
            mission.id, acceptor.user_id, acceptance.role
        )));
    }
    if acceptor.selected_areas.is_empty() {
        return Err(AppError::Validation(format!(
            "panel {} has no origin areas",
            acceptor.user_id
        )));
    }
    if !acceptor.operates_from(acceptance.chosen_area) {
        return Err(AppError::Validation(format!(
            "area {} is not an origin area of panel {}",
            acceptance.chosen_area, acceptor.user_id
        )));
    }

    let cargo = mission.cargo_type.as_deref();
    let creator_origin = resolve_creator_origin(known, acceptance.creator);
    let leg = match acceptance.role {
        MissionType::Send => {
            if !acceptance.catalog.can_send(acceptance.chosen_area, cargo) {
                return Err(cargo_rejected(acceptance.chosen_area, cargo, "send"));
            }
            Leg {
                start: acceptance.chosen_area.clone(),
                destination: creator_origin,
            }
        }
        MissionType::Receive => {
            if !acceptance.catalog.can_receive(acceptance.chosen_area, cargo) {
                return Err(cargo_rejected(acceptance.chosen_area, cargo, "receive"));
            }
            Leg {
                start: creator_origin,
                destination: acceptance.chosen_area.clone(),
            }
        }
    };

    let mut accepted = mission.clone();
    accepted.stage = Stage::InQueue(leg);
    accepted.robot_name = Some(acceptance.robot_name.clone());
    accepted.assigned_to_panel_id = Some(acceptor.user_id.clone());
    Ok(accepted)
}

/// The creator's origin area for the counterpart endpoint.
///
/// The known endpoint is used when it is one of the creator's origin
/// areas (or the creator is no longer registered); otherwise the
/// creator's first origin area wins.
#[must_use]
pub fn resolve_creator_origin(known: &Endpoint, creator: Option<&PanelConfig>) -> Area {
    let known_area = known.area();
    match creator {
        Some(panel) if !panel.operates_from(known_area) => panel
            .selected_areas
            .first()
            .cloned()
            .unwrap_or_else(|| known_area.clone()),
        _ => known_area.clone(),
    }
}

/// Check that `panel_id` may cancel `mission`.
///
/// Pending missions may be cancelled by their creator; queued missions by
/// the creator or the assignee. Active and completed missions cannot be
/// cancelled.
///
/// # Errors
///
/// Returns `AppError::Validation` when the cancel is not permitted.
pub fn ensure_can_cancel(mission: &Mission, panel_id: &str) -> Result<()> {
    let permitted = match mission.status() {
        MissionStatus::Pending => mission.is_created_by(panel_id),
        MissionStatus::InQueue => {
            mission.is_created_by(panel_id) || mission.is_assigned_to(panel_id)
        }
        MissionStatus::Active | MissionStatus::Completed => {
            return Err(AppError::Validation(format!(
                "mission {} is {} and can no longer be cancelled",
                mission.id,
                mission.status()
            )));
        }
    };

    if permitted {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "panel {panel_id} may not cancel mission {}",
            mission.id
        )))
    }
}

/// Apply the timer-driven transition if `mission` is still in `expected`.
///
/// Returns `None` when the precondition no longer holds.
#[must_use]
pub fn advance(mission: &Mission, expected: MissionStatus) -> Option<Mission> {
    if mission.status() != expected {
        return None;
    }
    let stage = mission.stage.advanced()?;
    Some(Mission {
        stage,
        ..mission.clone()
    })
}

fn cargo_rejected(area: &Area, cargo: Option<&str>, direction: &str) -> AppError {
    AppError::Validation(format!(
        "area {area} cannot {direction} cargo type {}",
        cargo.unwrap_or("-")
    ))
}
