//! `SQLite` schema bootstrap logic.
//!
//! All table definitions use `CREATE TABLE IF NOT EXISTS`, so this is
//! safe to re-run on every startup.

use sqlx::SqlitePool;

use crate::Result;

/// Apply all table definitions to the connected `SQLite` database.
///
/// # Errors
///
/// Returns `AppError::Db` if any DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS mission (
    id                   INTEGER PRIMARY KEY NOT NULL,
    robot_name           TEXT,
    start_point          TEXT,
    destination          TEXT,
    status               TEXT NOT NULL CHECK(status IN ('Pending','In queue','Active','Completed')),
    mission_type         TEXT NOT NULL CHECK(mission_type IN ('Send','Receive')),
    cargo_type           TEXT,
    number_of_pieces     INTEGER,
    created_by_panel_id  TEXT,
    assigned_to_panel_id TEXT
);

CREATE TABLE IF NOT EXISTS panel (
    user_id                TEXT PRIMARY KEY NOT NULL,
    selected_areas         TEXT NOT NULL,
    send_to_locations      TEXT NOT NULL,
    receive_from_locations TEXT NOT NULL,
    created_at             TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS id_sequence (
    name  TEXT PRIMARY KEY NOT NULL,
    value INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_mission_status ON mission(status);
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}
