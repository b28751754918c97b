use eframe::egui;

/// Màn hình đăng nhập. Trả về username khi người dùng bấm "Join Chat" hoặc Enter.
pub fn render(ui: &mut egui::Ui, username: &mut String, max_len: usize) -> Option<String> {
    let mut submit = false;

    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.heading("FaceHome");
        ui.add_space(16.0);

        let response = ui.add(
            egui::TextEdit::singleline(username)
                .hint_text("Enter your username...")
                .char_limit(max_len),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submit = true;
        }

        ui.add_space(8.0);
        if ui.button("Join Chat").clicked() {
            submit = true;
        }
    });

    if submit && !username.trim().is_empty() {
        return Some(username.trim().to_string());
    }

    None
}
