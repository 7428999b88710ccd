//! Response bodies of the HTTP API.

use serde::{Deserialize, Serialize};

use crate::item::ItemId;

/// Outcome code carried in every status response.
pub const STATUS_SUCCESS: u8 = 0;
pub const STATUS_FAILURE: u8 = 1;

/// `{status, msg?, id?}` body returned by mutation endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Id assigned to an item added without an explicit one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: STATUS_SUCCESS,
            msg: None,
            id: None,
        }
    }

    pub fn assigned(id: ItemId) -> Self {
        Self {
            id: Some(id),
            ..Self::success()
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            status: STATUS_FAILURE,
            msg: Some(msg.into()),
            id: None,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub users: usize,
    pub sessions: usize,
}
