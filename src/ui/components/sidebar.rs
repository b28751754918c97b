use eframe::egui;

use crate::common::User;
use crate::session::SessionView;

#[derive(Default)]
pub struct SidebarActions {
    /// `Some(None)` = quay về Global Chat.
    pub select: Option<Option<User>>,
    pub leave: bool,
}

pub fn render(ui: &mut egui::Ui, view: &SessionView) -> SidebarActions {
    let mut actions = SidebarActions::default();

    ui.heading(format!("Users ({})", view.user_count));
    ui.separator();

    if ui
        .selectable_label(view.selected.is_none(), "🌐 Global Chat")
        .clicked()
    {
        actions.select = Some(None);
    }
    ui.separator();

    for user in view.peers() {
        ui.horizontal(|ui| {
            // Chấm xanh = đang online
            ui.colored_label(egui::Color32::GREEN, "●");
            if ui
                .selectable_label(view.is_selected(user), &user.username)
                .clicked()
            {
                actions.select = Some(Some(user.clone()));
            }
        });
    }

    ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
        if ui.button("Logout").clicked() {
            actions.leave = true;
        }
        if let Some(username) = &view.username {
            ui.horizontal(|ui| {
                ui.label("Logged in as:");
                ui.strong(username);
            });
        }
    });

    actions
}
