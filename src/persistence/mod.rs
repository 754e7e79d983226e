//! Persistence layer modules and the store contracts the lifecycle uses.
//!
//! The mission lifecycle never touches a database directly; it is handed
//! a [`MissionStore`] and a [`PanelStore`]. The `SQLite` repositories in
//! this module are the production implementations.

pub mod db;
pub mod mission_repo;
pub mod panel_repo;
pub mod schema;

use std::future::Future;
use std::pin::Pin;

use crate::models::{MissionId, MissionRecord, PanelConfig};
use crate::Result;

/// Re-export the database pool type for convenience.
pub use sqlx::SqlitePool;

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// System-wide mission collection; last write wins.
pub trait MissionStore: Send + Sync {
    /// Every stored record, ordered by id.
    fn list_all(&self) -> StoreFuture<'_, Vec<MissionRecord>>;

    /// Record with `id`, if present.
    fn get(&self, id: MissionId) -> StoreFuture<'_, Option<MissionRecord>>;

    /// Insert or replace the record with the same id.
    fn put<'a>(&'a self, record: &'a MissionRecord) -> StoreFuture<'a, ()>;

    /// Remove the record with `id`; absent ids are ignored.
    fn delete(&self, id: MissionId) -> StoreFuture<'_, ()>;

    /// Allocate the next mission id. Ids are never reused.
    fn next_id(&self) -> StoreFuture<'_, MissionId>;
}

/// Panel registry keyed by `user_id`.
pub trait PanelStore: Send + Sync {
    /// Every panel, oldest first.
    fn list_all(&self) -> StoreFuture<'_, Vec<PanelConfig>>;

    /// Panel registered under `user_id`, if present.
    fn get_by_user_id<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, Option<PanelConfig>>;

    /// Insert or replace the panel with the same `user_id`.
    fn put<'a>(&'a self, panel: &'a PanelConfig) -> StoreFuture<'a, ()>;

    /// Remove the panel registered under `user_id`; absent ids are ignored.
    fn delete<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, ()>;
}
