//! Player metadata and the command result envelope used by the backend.

use serde::{Deserialize, Serialize};

/// Identity details the backend keeps per player uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMetadata {
    pub name: String,
    pub class: Option<String>,
    pub class_spec: Option<String>,
    pub ability_score: Option<i32>,
}

/// Fields to overwrite on a player. `None` leaves the backend value alone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerMetadataUpdate {
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub class_spec: Option<String>,
    pub ability_score: Option<i32>,
}

/// Tagged result returned by backend commands.
///
/// Serialized as `{"status":"ok","data":...}` or
/// `{"status":"error","error":...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CommandResult<T> {
    Ok { data: T },
    Error { error: String },
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self::Ok { data }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Ok { data } => Ok(data),
            Self::Error { error } => Err(error),
        }
    }
}
