use eframe::egui;

use crate::common::ChatMessage;
use crate::session::{Notifier, NotifyError, TerminalBell};

/// Nháy cửa sổ (xin chú ý từ window manager) rồi rung chuông terminal.
pub struct ViewportAlert {
    ctx: egui::Context,
    bell: TerminalBell,
}

impl ViewportAlert {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            bell: TerminalBell,
        }
    }
}

impl Notifier for ViewportAlert {
    fn play_alert(&self, message: &ChatMessage) -> Result<(), NotifyError> {
        self.ctx.send_viewport_cmd(egui::ViewportCommand::RequestUserAttention(
            egui::UserAttentionType::Informational,
        ));
        self.bell.play_alert(message)
    }
}
