use super::types::{ChatMessage, ConnectionStatus, User};

/// Sự kiện từ tầng mạng gửi lên UI.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    MessageReceived(ChatMessage),
    /// Thông báo hệ thống (ai đó vào/rời phòng).
    SystemAnnouncement(String),
    /// Danh sách đầy đủ người dùng đang online, thay thế danh sách cũ.
    PresenceSnapshot(Vec<User>),
    TypingChanged {
        username: String,
        is_typing: bool,
    },
    StatusChanged(ConnectionStatus),
}
