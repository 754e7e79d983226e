//! Panel repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};

use crate::models::{Area, PanelConfig};
use crate::{AppError, Result};

use super::db::Database;
use super::{PanelStore, StoreFuture};

/// Repository wrapper around `SQLite` for panel configurations.
#[derive(Clone)]
pub struct PanelRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct PanelRow {
    user_id: String,
    selected_areas: String,
    send_to_locations: String,
    receive_from_locations: String,
    created_at: String,
}

impl PanelRow {
    /// Convert a database row into the domain model.
    fn into_panel(self) -> Result<PanelConfig> {
        let created_at = chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| AppError::Db(format!("invalid created_at: {e}")))?
            .with_timezone(&Utc);

        Ok(PanelConfig {
            user_id: self.user_id,
            selected_areas: serde_json::from_str(&self.selected_areas)?,
            send_to_locations: serde_json::from_str(&self.send_to_locations)?,
            receive_from_locations: serde_json::from_str(&self.receive_from_locations)?,
            created_at,
        })
    }
}

fn areas_json(areas: &[Area]) -> Result<String> {
    serde_json::to_string(areas).map_err(AppError::from)
}

impl PanelRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert or replace a panel configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if serialization or the write fails.
    pub async fn upsert(&self, panel: &PanelConfig) -> Result<()> {
        let selected = areas_json(&panel.selected_areas)?;
        let send_to = areas_json(&panel.send_to_locations)?;
        let receive_from = areas_json(&panel.receive_from_locations)?;
        let created_at = panel.created_at.to_rfc3339_opts(SecondsFormat::Micros, true);

        sqlx::query(
            "INSERT INTO panel (user_id, selected_areas, send_to_locations,
             receive_from_locations, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
                selected_areas = excluded.selected_areas,
                send_to_locations = excluded.send_to_locations,
                receive_from_locations = excluded.receive_from_locations,
                created_at = excluded.created_at",
        )
        .bind(&panel.user_id)
        .bind(&selected)
        .bind(&send_to)
        .bind(&receive_from)
        .bind(&created_at)
        .execute(self.db.as_ref())
        .await?;

        Ok(())
    }

    /// Retrieve a panel by its user identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get(&self, user_id: &str) -> Result<Option<PanelConfig>> {
        let row: Option<PanelRow> = sqlx::query_as("SELECT * FROM panel WHERE user_id = ?1")
            .bind(user_id)
            .fetch_optional(self.db.as_ref())
            .await?;

        row.map(PanelRow::into_panel).transpose()
    }

    /// List all panels, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list(&self) -> Result<Vec<PanelConfig>> {
        let rows: Vec<PanelRow> =
            sqlx::query_as("SELECT * FROM panel ORDER BY created_at, user_id")
                .fetch_all(self.db.as_ref())
                .await?;

        rows.into_iter().map(PanelRow::into_panel).collect()
    }

    /// Delete a panel.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the delete fails.
    pub async fn remove(&self, user_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM panel WHERE user_id = ?1")
            .bind(user_id)
            .execute(self.db.as_ref())
            .await?;
        Ok(())
    }
}

impl PanelStore for PanelRepo {
    fn list_all(&self) -> StoreFuture<'_, Vec<PanelConfig>> {
        Box::pin(self.list())
    }

    fn get_by_user_id<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, Option<PanelConfig>> {
        Box::pin(self.get(user_id))
    }

    fn put<'a>(&'a self, panel: &'a PanelConfig) -> StoreFuture<'a, ()> {
        Box::pin(self.upsert(panel))
    }

    fn delete<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(self.remove(user_id))
    }
}
