use eframe::egui::{self, Color32, RichText};

use crate::compose::ComposeMode;

use super::super::ReplyBoardApp;

impl ReplyBoardApp {
    pub(crate) fn render_compose_box(&mut self, ui: &mut egui::Ui) {
        let mut should_submit = false;
        let mut should_cancel = false;

        ui.add_space(4.0);
        let heading = match self.compose.mode {
            ComposeMode::Idle => "Write a reply".to_string(),
            ComposeMode::Editing(id) => format!("Editing reply #{id}"),
            ComposeMode::ReplyingTo(id) => format!("Answering reply #{id}"),
        };
        ui.label(RichText::new(heading).strong());

        if let Some(err) = &self.compose_error {
            ui.colored_label(Color32::LIGHT_RED, err);
        }

        // Locked while sending: a successful send clears the draft.
        let response = ui
            .add_enabled_ui(self.compose_editable(), |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.compose.draft)
                        .desired_rows(4)
                        .desired_width(f32::INFINITY)
                        .hint_text("Share your thoughts..."),
                )
            })
            .inner;
        if self.compose.focus_requested {
            response.request_focus();
            self.compose.focus_requested = false;
        }

        ui.horizontal(|ui| {
            if self.compose_sending {
                ui.add(egui::Spinner::new());
            } else if ui.button("Save").clicked() {
                should_submit = true;
            }
            if ui.button("Cancel").clicked() {
                should_cancel = true;
            }
        });
        ui.add_space(4.0);

        if should_submit {
            self.submit_compose();
        }
        if should_cancel {
            self.cancel_compose();
        }
    }
}
