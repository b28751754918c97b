use std::io::{self, Write};

use thiserror::Error;

use crate::common::ChatMessage;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("alert playback failed: {0}")]
    Playback(#[from] io::Error),
    #[error("alert unavailable: {0}")]
    Unavailable(String),
}

/// Phát cảnh báo (âm thanh / hình ảnh) khi có tin nhắn mới.
pub trait Notifier {
    fn play_alert(&self, message: &ChatMessage) -> Result<(), NotifyError>;
}

/// Decides, per appended message, whether an alert is due.
#[derive(Debug, Clone, Copy)]
pub struct NotificationTrigger {
    enabled: bool,
}

impl NotificationTrigger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn should_fire(&self, appended: &ChatMessage, local: &str) -> bool {
        self.enabled && appended.sender != local
    }
}

/// Best-effort: failures are logged and never propagate.
pub fn fire(notifier: &dyn Notifier, message: &ChatMessage) {
    if let Err(err) = notifier.play_alert(message) {
        log::warn!("Notification for message from {} failed: {err}", message.sender);
    }
}

/// Rings the terminal bell.
pub struct TerminalBell;

impl Notifier for TerminalBell {
    fn play_alert(&self, _message: &ChatMessage) -> Result<(), NotifyError> {
        let mut out = io::stderr().lock();
        out.write_all(b"\x07")?;
        out.flush()?;
        Ok(())
    }
}
