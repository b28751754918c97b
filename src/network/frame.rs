use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gói tin JSON lan truyền qua gossipsub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireFrame {
    Announce {
        username: String,
    },
    Leave {
        username: String,
    },
    Chat {
        id: Uuid,
        username: String,
        message: String,
        timestamp: DateTime<Utc>,
    },
    /// Chỉ peer có `to_id` trùng PeerId của mình mới nhận.
    Private {
        id: Uuid,
        username: String,
        to_id: String,
        message: String,
        timestamp: DateTime<Utc>,
    },
    Typing {
        username: String,
        is_typing: bool,
    },
}

impl WireFrame {
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn decode(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
