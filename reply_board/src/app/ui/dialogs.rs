use eframe::egui::{self, Align2, Context};

use super::super::ReplyBoardApp;

impl ReplyBoardApp {
    pub(crate) fn render_confirmation_dialog(&mut self, ctx: &Context) {
        let Some(confirmation) = self.confirmation else {
            return;
        };

        let mut answer = None;
        egui::Window::new(confirmation.title())
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(confirmation.question());
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        answer = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        answer = Some(false);
                    }
                });
            });

        if let Some(accepted) = answer {
            self.resolve_confirmation(accepted);
        }
    }

    pub(crate) fn render_notice_dialog(&mut self, ctx: &Context) {
        let Some(notice) = &self.notice else {
            return;
        };

        let mut dismiss = false;
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(notice.message.as_str());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismiss = true;
                }
            });

        if dismiss {
            self.dismiss_notice();
        }
    }
}
