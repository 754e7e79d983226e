//! Panel configuration model.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::area::Area;
use crate::{AppError, Result};

/// Operator station configuration; read-only to the mission lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PanelConfig {
    /// Unique, operator-facing panel identifier.
    pub user_id: String,
    /// Origin areas the panel operates from.
    pub selected_areas: Vec<Area>,
    /// Areas the panel may send cargo to.
    pub send_to_locations: Vec<Area>,
    /// Areas the panel may receive cargo from.
    pub receive_from_locations: Vec<Area>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl PanelConfig {
    /// Construct a panel configuration stamped with the current time.
    ///
    /// The timestamp is kept at microsecond precision, the precision it is
    /// stored with.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        selected_areas: Vec<Area>,
        send_to_locations: Vec<Area>,
        receive_from_locations: Vec<Area>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            selected_areas,
            send_to_locations,
            receive_from_locations,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Whether `area` is one of the panel's origin areas.
    #[must_use]
    pub fn operates_from(&self, area: &Area) -> bool {
        self.selected_areas.contains(area)
    }

    /// Whether the panel may send cargo to `area`.
    #[must_use]
    pub fn can_send_to(&self, area: &Area) -> bool {
        self.send_to_locations.contains(area)
    }

    /// Whether the panel may receive cargo from `area`.
    #[must_use]
    pub fn can_receive_from(&self, area: &Area) -> bool {
        self.receive_from_locations.contains(area)
    }

    /// Check the fields an operator must fill in before the panel is saved.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when the identifier is blank or either
    /// permission list is empty.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(AppError::Validation("userId is required".into()));
        }
        if self.send_to_locations.is_empty() {
            return Err(AppError::Validation(
                "select at least one send-to location".into(),
            ));
        }
        if self.receive_from_locations.is_empty() {
            return Err(AppError::Validation(
                "select at least one receive-from location".into(),
            ));
        }
        Ok(())
    }
}
