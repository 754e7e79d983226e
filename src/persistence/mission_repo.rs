//! Mission repository for `SQLite` persistence.

use std::sync::Arc;

use tracing::warn;

use crate::models::{Area, MissionId, MissionRecord, MissionStatus, MissionType};
use crate::{AppError, Result};

use super::db::Database;
use super::{MissionStore, StoreFuture};

/// Repository wrapper around `SQLite` for mission records.
#[derive(Clone)]
pub struct MissionRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct MissionRow {
    id: i64,
    robot_name: Option<String>,
    start_point: Option<String>,
    destination: Option<String>,
    status: String,
    mission_type: String,
    cargo_type: Option<String>,
    number_of_pieces: Option<i64>,
    created_by_panel_id: Option<String>,
    assigned_to_panel_id: Option<String>,
}

impl MissionRow {
    /// Convert a database row into the flat record.
    fn into_record(self) -> Result<MissionRecord> {
        let start_point = parse_endpoint(self.start_point.as_deref(), "start_point")?;
        let destination = parse_endpoint(self.destination.as_deref(), "destination")?;
        let number_of_pieces = self
            .number_of_pieces
            .map(|n| {
                u32::try_from(n)
                    .map_err(|_| AppError::Db(format!("invalid number_of_pieces: {n}")))
            })
            .transpose()?;

        Ok(MissionRecord {
            id: self.id,
            robot_name: self.robot_name,
            start_point,
            destination,
            status: MissionStatus::parse(&self.status)?,
            mission_type: MissionType::parse(&self.mission_type)?,
            cargo_type: self.cargo_type,
            number_of_pieces,
            created_by_panel_id: self.created_by_panel_id,
            assigned_to_panel_id: self.assigned_to_panel_id,
        })
    }
}

/// Blank endpoints are treated as absent.
fn parse_endpoint(raw: Option<&str>, column: &str) -> Result<Option<Area>> {
    raw.filter(|value| !value.trim().is_empty()).map(|value| {
        Area::parse(value).map_err(|err| AppError::Db(format!("invalid {column}: {err}")))
    })
    .transpose()
}

impl MissionRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert or replace a mission record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the write fails.
    pub async fn upsert(&self, record: &MissionRecord) -> Result<()> {
        let start_point = record.start_point.as_ref().map(Area::to_point_ref);
        let destination = record.destination.as_ref().map(Area::to_point_ref);
        let pieces = record.number_of_pieces.map(i64::from);

        sqlx::query(
            "INSERT INTO mission (id, robot_name, start_point, destination, status,
             mission_type, cargo_type, number_of_pieces, created_by_panel_id, assigned_to_panel_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(id) DO UPDATE SET
                robot_name = excluded.robot_name,
                start_point = excluded.start_point,
                destination = excluded.destination,
                status = excluded.status,
                mission_type = excluded.mission_type,
                cargo_type = excluded.cargo_type,
                number_of_pieces = excluded.number_of_pieces,
                created_by_panel_id = excluded.created_by_panel_id,
                assigned_to_panel_id = excluded.assigned_to_panel_id",
        )
        .bind(record.id)
        .bind(&record.robot_name)
        .bind(&start_point)
        .bind(&destination)
        .bind(record.status.as_str())
        .bind(record.mission_type.as_str())
        .bind(&record.cargo_type)
        .bind(pieces)
        .bind(&record.created_by_panel_id)
        .bind(&record.assigned_to_panel_id)
        .execute(self.db.as_ref())
        .await?;

        Ok(())
    }

    /// Retrieve a mission record by identifier.
    ///
    /// Returns `Ok(None)` if the mission does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get_by_id(&self, id: MissionId) -> Result<Option<MissionRecord>> {
        let row: Option<MissionRow> = sqlx::query_as("SELECT * FROM mission WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.db.as_ref())
            .await?;

        row.map(MissionRow::into_record).transpose()
    }

    /// List every mission record ordered by id.
    ///
    /// Rows that cannot be read back into a record are skipped.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list(&self) -> Result<Vec<MissionRecord>> {
        let rows: Vec<MissionRow> = sqlx::query_as("SELECT * FROM mission ORDER BY id")
            .fetch_all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                match row.into_record() {
                    Ok(record) => Some(record),
                    Err(err) => {
                        warn!(mission_id = id, %err, "skipping unreadable mission row");
                        None
                    }
                }
            })
            .collect())
    }

    /// Delete a mission record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the delete fails.
    pub async fn remove(&self, id: MissionId) -> Result<()> {
        sqlx::query("DELETE FROM mission WHERE id = ?1")
            .bind(id)
            .execute(self.db.as_ref())
            .await?;
        Ok(())
    }

    /// Allocate the next mission identifier from the persistent sequence.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the sequence update fails.
    pub async fn allocate_id(&self) -> Result<MissionId> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO id_sequence (name, value)
             VALUES ('mission', (SELECT COALESCE(MAX(id), 0) + 1 FROM mission))
             ON CONFLICT(name) DO UPDATE SET
                value = MAX(value + 1, (SELECT COALESCE(MAX(id), 0) + 1 FROM mission))
             RETURNING value",
        )
        .fetch_one(self.db.as_ref())
        .await?;
        Ok(row.0)
    }
}

impl MissionStore for MissionRepo {
    fn list_all(&self) -> StoreFuture<'_, Vec<MissionRecord>> {
        Box::pin(self.list())
    }

    fn get(&self, id: MissionId) -> StoreFuture<'_, Option<MissionRecord>> {
        Box::pin(self.get_by_id(id))
    }

    fn put<'a>(&'a self, record: &'a MissionRecord) -> StoreFuture<'a, ()> {
        Box::pin(self.upsert(record))
    }

    fn delete(&self, id: MissionId) -> StoreFuture<'_, ()> {
        Box::pin(self.remove(id))
    }

    fn next_id(&self) -> StoreFuture<'_, MissionId> {
        Box::pin(self.allocate_id())
    }
}
