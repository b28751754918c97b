use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{TransportCommand, TransportEvent};
use crate::config::SessionSettings;
use crate::session::{SessionController, SessionView};

use super::alert::ViewportAlert;
use super::components::{chat_area, input_bar, login, sidebar};

type Controller = SessionController<mpsc::Sender<TransportCommand>, ViewportAlert>;

pub struct ChatApp {
    controller: Controller,
    event_receiver: mpsc::Receiver<TransportEvent>,
    login_input: String,
    max_username_len: usize,
}

impl ChatApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: SessionSettings,
        command_sender: mpsc::Sender<TransportCommand>,
        event_receiver: mpsc::Receiver<TransportEvent>,
        username_hint: Option<String>,
    ) -> Self {
        let max_username_len = settings.max_username_len;
        let notifier = ViewportAlert::new(cc.egui_ctx.clone());
        Self {
            controller: SessionController::new(settings, command_sender, notifier),
            event_receiver,
            login_input: username_hint.unwrap_or_default(),
            max_username_len,
        }
    }

    fn handle_transport_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.controller.handle_event(event);
        }
    }

    fn render_login(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(username) = login::render(ui, &mut self.login_input, self.max_username_len)
            {
                self.controller.connect(&username);
            }
        });
    }

    fn render_chat(&mut self, ctx: &egui::Context, view: &SessionView) {
        egui::SidePanel::left("user_sidebar")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| {
                let actions = sidebar::render(ui, view);
                if let Some(selection) = actions.select {
                    self.controller.select_conversation(selection);
                }
                if actions.leave {
                    self.controller.disconnect();
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&view.header);
            if let Some(phrase) = &view.typing_phrase {
                ui.label(egui::RichText::new(phrase).italics().weak());
            }
            ui.separator();

            let input_height: f32 = 36.0;
            ui.allocate_ui(
                egui::vec2(
                    ui.available_width(),
                    (ui.available_height() - input_height).max(0.0),
                ),
                |ui| chat_area::render(ui, view),
            );

            ui.separator();
            let mut draft = view.draft.clone();
            let input = input_bar::render(ui, &mut draft, &view.input_hint());
            if input.edited {
                self.controller.edit_draft(draft.clone());
            }
            if input.submitted {
                self.controller.send_text(&draft);
            }
        });
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_transport_events();

        let view = self.controller.view();
        if view.status.is_connected() {
            self.render_chat(ctx, &view);
        } else {
            self.render_login(ctx);
        }

        ctx.request_repaint();
    }
}
