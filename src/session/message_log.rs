use std::collections::HashSet;

use uuid::Uuid;

use crate::common::ChatMessage;

/// Kho tin nhắn chỉ-ghi-thêm của một phiên. Thứ tự chèn cũng là thứ tự hiển thị.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<ChatMessage>,
    seen_ids: HashSet<Uuid>,
    dedup_by_id: bool,
}

impl MessageLog {
    pub fn new(dedup_by_id: bool) -> Self {
        Self {
            messages: Vec::new(),
            seen_ids: HashSet::new(),
            dedup_by_id,
        }
    }

    /// Appends `message` and returns it, or `None` when it was a replay of an
    /// id already in the log. Messages without an id are always appended.
    pub fn append(&mut self, message: ChatMessage) -> Option<&ChatMessage> {
        if let Some(id) = message.id {
            if !self.seen_ids.insert(id) && self.dedup_by_id {
                log::debug!("Dropping duplicate delivery of message {id}");
                return None;
            }
        }
        self.messages.push(message);
        self.messages.last()
    }

    pub fn all(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
