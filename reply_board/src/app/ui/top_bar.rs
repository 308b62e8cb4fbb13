use eframe::egui;

use crate::permissions::Viewer;

use super::super::ReplyBoardApp;

impl ReplyBoardApp {
    pub(crate) fn render_top_bar(&mut self, ui: &mut egui::Ui) {
        let mut apply_viewer = false;
        let mut refresh = false;
        let mut delete_post = false;

        ui.horizontal(|ui| {
            ui.label(format!("Post #{}", self.post_id));
            ui.separator();
            ui.label("Signed in as");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.viewer_input)
                    .desired_width(220.0)
                    .hint_text("anonymous"),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                apply_viewer = true;
            }
            if ui.button("Apply").clicked() {
                apply_viewer = true;
            }
            ui.separator();
            if ui.button("Refresh").clicked() {
                refresh = true;
            }
            if self.post_deleted.is_none() && ui.button("Delete post").clicked() {
                delete_post = true;
            }
        });

        if apply_viewer {
            self.set_viewer(Viewer::from_email(self.viewer_input.clone()));
        }
        if refresh {
            self.spawn_load_replies();
        }
        if delete_post {
            self.request_delete_post();
        }
    }
}
