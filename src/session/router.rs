//! Lọc tin nhắn theo cuộc trò chuyện đang mở và phân loại tin gửi đi.

use crate::common::{ChatMessage, TransportCommand, User};

/// Messages of the open conversation, in log order.
///
/// `None` selects the global room (every non-private message). `Some(peer)`
/// selects the private messages exchanged between `local` and `peer`.
pub fn filtered_view<'a>(
    messages: &'a [ChatMessage],
    selected: Option<&User>,
    local: &str,
) -> Vec<&'a ChatMessage> {
    messages
        .iter()
        .filter(|msg| belongs_to(msg, selected, local))
        .collect()
}

pub fn belongs_to(msg: &ChatMessage, selected: Option<&User>, local: &str) -> bool {
    let Some(peer) = selected else {
        return !msg.is_private;
    };
    if !msg.is_private {
        return false;
    }
    let to = msg.to.as_deref();
    (msg.sender == local && to == Some(peer.username.as_str()))
        || (msg.sender == peer.username && to == Some(local))
}

/// Builds the outbound command for `text`, or `None` for blank input.
pub fn route_outbound(text: &str, selected: Option<&User>) -> Option<TransportCommand> {
    if text.trim().is_empty() {
        return None;
    }
    let text = text.to_string();
    Some(match selected {
        Some(peer) => TransportCommand::SendPrivate {
            recipient_id: peer.id.clone(),
            text,
        },
        None => TransportCommand::SendGlobal(text),
    })
}
