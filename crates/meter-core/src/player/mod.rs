//! Player metadata domain.

pub mod model;

use async_trait::async_trait;

use crate::error::Result;

pub use model::{CommandResult, PlayerMetadata, PlayerMetadataUpdate};

/// Player metadata commands served by the native backend.
///
/// `Err` means the command could not be invoked at all; a command that ran
/// and failed comes back as [`CommandResult::Error`].
#[async_trait]
pub trait PlayerMetadataCommands: Send + Sync {
    async fn get_player_metadata(
        &self,
        player_uid: i64,
    ) -> Result<CommandResult<Option<PlayerMetadata>>>;

    /// Updates the backend's in-memory live encounter.
    async fn update_player_metadata(
        &self,
        player_uid: i64,
        update: &PlayerMetadataUpdate,
    ) -> Result<CommandResult<()>>;

    /// Writes the metadata to the backend database.
    async fn persist_player_metadata(
        &self,
        player_uid: i64,
        update: &PlayerMetadataUpdate,
    ) -> Result<CommandResult<()>>;
}
