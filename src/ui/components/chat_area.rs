use eframe::egui;

use crate::session::SessionView;

pub fn render(ui: &mut egui::Ui, view: &SessionView) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if view.messages.is_empty() {
                ui.label(egui::RichText::new("No messages here yet. Say hi!").weak());
                return;
            }

            for message in &view.messages {
                if message.system {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "{} · {}",
                                message.message,
                                message.display_time()
                            ))
                            .italics()
                            .weak(),
                        );
                    });
                    continue;
                }

                let (align, color) = if view.is_own(message) {
                    (egui::Align::Max, egui::Color32::LIGHT_BLUE)
                } else {
                    (egui::Align::Min, egui::Color32::LIGHT_GRAY)
                };

                ui.with_layout(egui::Layout::top_down(align), |ui| {
                    ui.label(egui::RichText::new(&message.sender).small().strong());
                    ui.label(egui::RichText::new(&message.message).color(color));
                    ui.label(egui::RichText::new(message.display_time()).small().weak());
                });
                ui.add_space(4.0);
            }
        });
}
