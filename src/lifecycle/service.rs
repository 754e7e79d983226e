//! Caller-facing mission operations.
//!
//! [`MissionService`] loads the records an operation needs from the
//! injected stores, applies the pure rules in
//! [`transitions`](super::transitions), and writes the single resulting
//! record back. Validation happens before any write, so a rejected
//! operation leaves the store untouched.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::transitions::{self, Acceptance, CargoCatalog, NewMission, RobotPool};
use crate::models::{
    Area, Mission, MissionId, MissionRecord, MissionStatus, MissionType, PanelConfig,
};
use crate::persistence::{MissionStore, PanelStore};
use crate::projection::{self, PanelMission};
use crate::{AppError, Result};

/// Result of a timer-driven transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The mission moved to its next status.
    Advanced(Mission),
    /// The mission is gone or no longer in the expected status.
    Stale,
}

/// Mission lifecycle operations over the shared stores.
#[derive(Clone)]
pub struct MissionService {
    missions: Arc<dyn MissionStore>,
    panels: Arc<dyn PanelStore>,
    catalog: Arc<CargoCatalog>,
    robots: RobotPool,
}

impl MissionService {
    /// Create a new service over the given stores.
    #[must_use]
    pub fn new(
        missions: Arc<dyn MissionStore>,
        panels: Arc<dyn PanelStore>,
        catalog: CargoCatalog,
        robots: RobotPool,
    ) -> Self {
        Self {
            missions,
            panels,
            catalog: Arc::new(catalog),
            robots,
        }
    }

    /// Cargo capability catalog in use.
    #[must_use]
    pub fn catalog(&self) -> &CargoCatalog {
        &self.catalog
    }

    /// Create a pending mission on behalf of `panel_id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the panel is not registered and
    /// `AppError::Validation` if the origin area or cargo type is rejected.
    pub async fn create_mission(
        &self,
        panel_id: &str,
        mission_type: MissionType,
        cargo_type: Option<String>,
        number_of_pieces: Option<u32>,
        origin: &Area,
    ) -> Result<Mission> {
        let creator = self.panel(panel_id).await?;
        let request = NewMission {
            mission_type,
            cargo_type,
            number_of_pieces,
            origin: origin.clone(),
        };
        transitions::check_new(&creator, &request, &self.catalog)?;

        let id = self.missions.next_id().await?;
        let mission = transitions::create(id, &creator, request, &self.catalog)?;

        self.missions.put(&MissionRecord::from(&mission)).await?;
        info!(
            mission_id = mission.id,
            panel_id,
            mission_type = %mission.mission_type,
            origin = %origin,
            "mission created"
        );
        Ok(mission)
    }

    /// Cancel (delete) a mission.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the mission does not exist and
    /// `AppError::Validation` if `panel_id` may not cancel it.
    pub async fn cancel_mission(&self, mission_id: MissionId, panel_id: &str) -> Result<()> {
        let mission = self.mission(mission_id).await?;
        transitions::ensure_can_cancel(&mission, panel_id)?;

        self.missions.delete(mission_id).await?;
        info!(mission_id, panel_id, status = %mission.status(), "mission cancelled");
        Ok(())
    }

    /// Accept a pending mission as its sending side.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown mission or panel and
    /// `AppError::Validation` when the acceptance is not permitted.
    pub async fn accept_as_send(
        &self,
        mission_id: MissionId,
        panel_id: &str,
        chosen_area: &Area,
    ) -> Result<Mission> {
        self.accept(mission_id, panel_id, MissionType::Send, chosen_area)
            .await
    }

    /// Accept a pending mission as its receiving side.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown mission or panel and
    /// `AppError::Validation` when the acceptance is not permitted.
    pub async fn accept_as_receive(
        &self,
        mission_id: MissionId,
        panel_id: &str,
        chosen_area: &Area,
    ) -> Result<Mission> {
        self.accept(mission_id, panel_id, MissionType::Receive, chosen_area)
            .await
    }

    async fn accept(
        &self,
        mission_id: MissionId,
        panel_id: &str,
        role: MissionType,
        chosen_area: &Area,
    ) -> Result<Mission> {
        let mission = self.mission(mission_id).await?;
        let acceptor = self.panel(panel_id).await?;
        let creator = self
            .panels
            .get_by_user_id(&mission.created_by_panel_id)
            .await?;
        if creator.is_none() {
            debug!(
                creator = %mission.created_by_panel_id,
                "creator panel no longer registered, keeping stated endpoint"
            );
        }

        let acceptance = Acceptance {
            acceptor: &acceptor,
            role,
            chosen_area,
            creator: creator.as_ref(),
            catalog: &self.catalog,
            robot_name: self.robots.pick(mission_id)?,
        };
        let accepted = transitions::accept(&mission, &acceptance)?;

        self.missions.put(&MissionRecord::from(&accepted)).await?;
        info!(
            mission_id,
            panel_id,
            role = %role,
            robot = accepted.robot_name.as_deref().unwrap_or_default(),
            "mission accepted"
        );
        Ok(accepted)
    }

    /// Missions visible to `panel_id`, annotated with their display role.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the panel is not registered.
    pub async fn project_for_panel(&self, panel_id: &str) -> Result<Vec<PanelMission>> {
        let panel = self.panel(panel_id).await?;
        let records = self.missions.list_all().await?;
        Ok(projection::project(&records, &panel))
    }

    /// Apply a timer-driven transition if `mission_id` is still `expected`.
    ///
    /// Deleted missions, missions whose status has moved on, and records
    /// that no longer form a valid mission all yield
    /// [`AdvanceOutcome::Stale`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store fails.
    pub async fn advance(
        &self,
        mission_id: MissionId,
        expected: MissionStatus,
    ) -> Result<AdvanceOutcome> {
        let Some(record) = self.missions.get(mission_id).await? else {
            debug!(mission_id, %expected, "timer fired for deleted mission");
            return Ok(AdvanceOutcome::Stale);
        };
        let mission = match Mission::try_from(record) {
            Ok(mission) => mission,
            Err(err) => {
                warn!(mission_id, %err, "timer fired for invalid mission record");
                return Ok(AdvanceOutcome::Stale);
            }
        };
        let Some(advanced) = transitions::advance(&mission, expected) else {
            debug!(mission_id, %expected, actual = %mission.status(), "stale timer ignored");
            return Ok(AdvanceOutcome::Stale);
        };

        self.missions.put(&MissionRecord::from(&advanced)).await?;
        info!(mission_id, from = %expected, to = %advanced.status(), "mission advanced");
        Ok(AdvanceOutcome::Advanced(advanced))
    }

    /// Every stored record, including ones that fail validation.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store fails.
    pub async fn records(&self) -> Result<Vec<MissionRecord>> {
        self.missions.list_all().await
    }

    /// Delete stored records that have no creator panel.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store fails.
    pub async fn purge_invalid(&self) -> Result<usize> {
        let records = self.missions.list_all().await?;
        let mut purged = 0usize;
        for record in records
            .iter()
            .filter(|record| record.created_by_panel_id.as_deref().is_none_or(str::is_empty))
        {
            self.missions.delete(record.id).await?;
            purged += 1;
        }
        if purged > 0 {
            warn!(purged, "purged mission records without a creator panel");
        }
        Ok(purged)
    }

    /// Delete every mission.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store fails.
    pub async fn reset(&self) -> Result<usize> {
        let records = self.missions.list_all().await?;
        for record in &records {
            self.missions.delete(record.id).await?;
        }
        info!(deleted = records.len(), "mission store reset");
        Ok(records.len())
    }

    async fn panel(&self, panel_id: &str) -> Result<PanelConfig> {
        self.panels
            .get_by_user_id(panel_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("panel {panel_id} not found")))
    }

    async fn mission(&self, mission_id: MissionId) -> Result<Mission> {
        let record = self
            .missions
            .get(mission_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("mission {mission_id} not found")))?;
        Mission::try_from(record)
    }
}
