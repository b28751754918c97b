use eframe::egui;

#[derive(Default)]
pub struct InputActions {
    pub edited: bool,
    pub submitted: bool,
}

pub fn render(ui: &mut egui::Ui, draft: &mut String, hint: &str) -> InputActions {
    let mut actions = InputActions::default();
    ui.horizontal(|ui| {
        let response = ui.add(egui::TextEdit::singleline(draft).hint_text(hint));
        if response.changed() {
            actions.edited = true;
        }
        if ui.button("Send").clicked() {
            actions.submitted = true;
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            actions.submitted = true;
            response.request_focus();
        }
    });

    actions
}
