//! Panel configuration management.

use std::sync::Arc;

use tracing::info;

use crate::models::PanelConfig;
use crate::persistence::PanelStore;
use crate::{AppError, Result};

/// Registers and edits operator panels.
#[derive(Clone)]
pub struct PanelRegistry {
    panels: Arc<dyn PanelStore>,
}

impl PanelRegistry {
    /// Create a registry over the given store.
    #[must_use]
    pub fn new(panels: Arc<dyn PanelStore>) -> Self {
        Self { panels }
    }

    /// Register a new panel.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the configuration is incomplete or
    /// a panel with the same identifier already exists.
    pub async fn register(&self, panel: PanelConfig) -> Result<PanelConfig> {
        panel.validate()?;
        if self.panels.get_by_user_id(&panel.user_id).await?.is_some() {
            return Err(AppError::Validation(format!(
                "panel {} already exists",
                panel.user_id
            )));
        }

        self.panels.put(&panel).await?;
        info!(panel_id = %panel.user_id, "panel registered");
        Ok(panel)
    }

    /// Replace the area lists of an existing panel.
    ///
    /// The original registration time is kept.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the panel is unknown and
    /// `AppError::Validation` if the new configuration is incomplete.
    pub async fn update(&self, panel: PanelConfig) -> Result<PanelConfig> {
        panel.validate()?;
        let existing = self.get(&panel.user_id).await?;
        let updated = PanelConfig {
            created_at: existing.created_at,
            ..panel
        };

        self.panels.put(&updated).await?;
        info!(panel_id = %updated.user_id, "panel updated");
        Ok(updated)
    }

    /// Delete a panel. Missions it created or accepted are left as they are.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the panel is unknown.
    pub async fn remove(&self, user_id: &str) -> Result<()> {
        self.get(user_id).await?;
        self.panels.delete(user_id).await?;
        info!(panel_id = user_id, "panel removed");
        Ok(())
    }

    /// All registered panels, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store fails.
    pub async fn list(&self) -> Result<Vec<PanelConfig>> {
        self.panels.list_all().await
    }

    /// Look up a panel.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the panel is unknown.
    pub async fn get(&self, user_id: &str) -> Result<PanelConfig> {
        self.panels
            .get_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("panel {user_id} not found")))
    }
}
