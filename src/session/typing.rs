use serde::{Deserialize, Serialize};

use crate::common::User;

/// Phạm vi hiển thị "đang gõ".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypingScope {
    /// Hiện mọi người đang gõ ở mọi cuộc trò chuyện.
    #[default]
    Global,
    /// Trong chat riêng chỉ hiện người đang được chọn.
    Conversation,
}

/// Tập username của những người *khác* đang gõ, giữ thứ tự xuất hiện.
#[derive(Debug, Clone, Default)]
pub struct TypingAggregator {
    users: Vec<String>,
}

impl TypingAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_typing(&mut self, username: &str, is_typing: bool) {
        let present = self.users.iter().any(|name| name == username);
        match (is_typing, present) {
            (true, false) => self.users.push(username.to_string()),
            (false, true) => self.users.retain(|name| name != username),
            _ => {}
        }
    }

    pub fn list(&self) -> &[String] {
        &self.users
    }

    /// Drops entries for users that are no longer online.
    pub fn retain_present(&mut self, present: &[User]) {
        self.users
            .retain(|name| present.iter().any(|user| &user.username == name));
    }

    /// Names to show for the open conversation under `scope`.
    pub fn visible(&self, scope: TypingScope, selected: Option<&User>) -> Vec<String> {
        match (scope, selected) {
            (TypingScope::Conversation, Some(peer)) => self
                .users
                .iter()
                .filter(|name| **name == peer.username)
                .cloned()
                .collect(),
            _ => self.users.clone(),
        }
    }
}

/// "alice is typing..." / "alice, bob are typing...", hoặc `None` khi không ai gõ.
pub fn typing_phrase(names: &[String]) -> Option<String> {
    match names.len() {
        0 => None,
        1 => Some(format!("{} is typing...", names[0])),
        _ => Some(format!("{} are typing...", names.join(", "))),
    }
}
