use std::sync::Arc;

use meter_core::player::{CommandResult, PlayerMetadata, PlayerMetadataCommands, PlayerMetadataUpdate};

/// Reads and edits player metadata through the backend.
///
/// Every failure is logged and reported as `None`/`false`; nothing here
/// returns an error to the UI.
#[derive(Clone)]
pub struct PlayerMetadataService {
    commands: Arc<dyn PlayerMetadataCommands>,
}

impl PlayerMetadataService {
    pub fn new(commands: Arc<dyn PlayerMetadataCommands>) -> Self {
        Self { commands }
    }

    pub async fn get(&self, player_uid: i64) -> Option<PlayerMetadata> {
        match self.commands.get_player_metadata(player_uid).await {
            Ok(CommandResult::Ok { data }) => data,
            Ok(CommandResult::Error { error }) => {
                tracing::warn!(player_uid, error = %error, "get_player_metadata failed");
                None
            }
            Err(e) => {
                tracing::warn!(player_uid, error = %e, "get_player_metadata invoke failed");
                None
            }
        }
    }

    /// Updates the live encounter, then persists the change.
    ///
    /// Returns `false` when the live update fails or the persist command
    /// cannot be invoked. A persist that runs and reports an error is only
    /// logged since the live data is already updated.
    pub async fn update_live(&self, player_uid: i64, update: &PlayerMetadataUpdate) -> bool {
        match self.commands.update_player_metadata(player_uid, update).await {
            Ok(CommandResult::Ok { .. }) => {
                tracing::info!(player_uid, "Updated player metadata in live encounter");
            }
            Ok(CommandResult::Error { error }) => {
                tracing::warn!(player_uid, error = %error, "Failed to update player metadata");
                return false;
            }
            Err(e) => {
                tracing::warn!(player_uid, error = %e, "update_player_metadata invoke failed");
                return false;
            }
        }

        match self.commands.persist_player_metadata(player_uid, update).await {
            Ok(CommandResult::Ok { .. }) => {
                tracing::info!(player_uid, "Persisted player metadata to database");
                true
            }
            Ok(CommandResult::Error { error }) => {
                tracing::warn!(player_uid, error = %error, "Failed to persist player metadata");
                true
            }
            Err(e) => {
                tracing::warn!(player_uid, error = %e, "persist_player_metadata invoke failed");
                false
            }
        }
    }

    pub async fn persist(&self, player_uid: i64, update: &PlayerMetadataUpdate) -> bool {
        match self.commands.persist_player_metadata(player_uid, update).await {
            Ok(CommandResult::Ok { .. }) => {
                tracing::info!(player_uid, "Persisted player metadata to database");
                true
            }
            Ok(CommandResult::Error { error }) => {
                tracing::warn!(player_uid, error = %error, "Failed to persist player metadata");
                false
            }
            Err(e) => {
                tracing::warn!(player_uid, error = %e, "persist_player_metadata invoke failed");
                false
            }
        }
    }
}
