use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SYSTEM_SENDER: &str = "System";

/// Một người dùng đang online, do tầng mạng cấp `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}

impl User {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

/// Domain model đại diện một tin nhắn chat (global, private hoặc system).
///
/// `is_private` implies `to` is set. System messages are never private.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub sender: String,
    #[serde(default)]
    pub to: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub system: bool,
}

impl ChatMessage {
    pub fn global(sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: None,
            sender: sender.into(),
            to: None,
            message: message.into(),
            timestamp: Utc::now(),
            is_private: false,
            system: false,
        }
    }

    pub fn private(
        sender: impl Into<String>,
        to: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            sender: sender.into(),
            to: Some(to.into()),
            message: message.into(),
            timestamp: Utc::now(),
            is_private: true,
            system: false,
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self {
            id: None,
            sender: SYSTEM_SENDER.to_string(),
            to: None,
            message: message.into(),
            timestamp: Utc::now(),
            is_private: false,
            system: true,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Giờ hiển thị (HH:MM theo múi giờ máy). Chỉ dùng để hiển thị, không dùng để sắp xếp.
    pub fn display_time(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M").to_string()
    }
}

/// Trạng thái kết nối của phiên chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connected,
}

impl ConnectionStatus {
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_message_carries_recipient() {
        let msg = ChatMessage::private("bob", "alice", "yo");
        assert!(msg.is_private);
        assert_eq!(msg.to.as_deref(), Some("alice"));
        assert!(!msg.system);
    }

    #[test]
    fn system_message_is_never_private() {
        let msg = ChatMessage::system("alice joined the chat");
        assert!(msg.system);
        assert!(!msg.is_private);
        assert_eq!(msg.sender, SYSTEM_SENDER);
        assert!(msg.to.is_none());
    }

    #[test]
    fn display_time_is_hours_and_minutes() {
        let msg = ChatMessage::global("alice", "hi");
        let shown = msg.display_time();
        assert_eq!(shown.len(), 5);
        assert_eq!(&shown[2..3], ":");
    }

    #[test]
    fn message_without_optional_fields_deserializes() {
        let json = r#"{"sender":"alice","message":"hi","timestamp":"2026-01-01T10:00:00Z"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert!(msg.id.is_none());
        assert!(!msg.is_private);
        assert!(!msg.system);
    }
}
