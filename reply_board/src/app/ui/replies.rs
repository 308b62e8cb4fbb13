use eframe::egui::{self, Color32, RichText};

use crate::models::ReplyId;
use crate::permissions::ReplyAction;
use crate::render::{ReplyRow, RowBody, PLACEHOLDER_TINT};

use super::super::ReplyBoardApp;

fn placeholder_fill() -> Color32 {
    let [r, g, b, a] = PLACEHOLDER_TINT;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Paints one row and records the control the user clicked, if any.
fn render_row(
    ui: &mut egui::Ui,
    row: &ReplyRow,
    highlighted: bool,
    clicked: &mut Option<(ReplyId, ReplyAction)>,
) {
    ui.horizontal(|ui| {
        ui.add_space(row.indent);
        let mut frame = egui::Frame::group(ui.style());
        if matches!(row.body, RowBody::Placeholder(_)) {
            frame = frame.fill(placeholder_fill());
        }
        if highlighted {
            frame = frame.stroke(egui::Stroke::new(1.5, ui.visuals().selection.bg_fill));
        }
        frame.show(ui, |ui| {
            ui.set_width(ui.available_width());
            match &row.body {
                RowBody::Placeholder(placeholder) => {
                    ui.label(placeholder.message());
                }
                RowBody::Visible(reply) => {
                    ui.label(RichText::new(&reply.author_line).strong());
                    ui.label(RichText::new(&reply.recommend_line).small());
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&reply.created_line).small().weak());
                        if let Some(edited) = &reply.edited_fragment {
                            ui.label(RichText::new(edited).small().italics().weak());
                        }
                    });
                    ui.add_space(4.0);
                    ui.label(RichText::new(&reply.content).monospace());
                    ui.add_space(4.0);
                    ui.horizontal(|ui| {
                        for action in reply.actions.iter() {
                            if ui.small_button(action.label()).clicked() {
                                *clicked = Some((row.reply_id, action));
                            }
                        }
                    });
                }
            }
        });
    });
}

impl ReplyBoardApp {
    pub(crate) fn render_reply_list(&mut self, ui: &mut egui::Ui) {
        if let Some(location) = &self.post_deleted {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.heading("This post has been deleted.");
                ui.label(format!("The forum moved on to {location}."));
            });
            return;
        }

        let mut should_retry = false;
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("Replies ({})", self.replies.count())).heading());
            if self.replies.is_loading {
                ui.add(egui::Spinner::new());
            }
        });

        if let Some(err) = &self.replies.error {
            ui.horizontal(|ui| {
                ui.colored_label(Color32::LIGHT_RED, err);
                if ui.button("Retry").clicked() {
                    should_retry = true;
                }
            });
        }
        ui.separator();

        let target = self.compose.target();
        let mut clicked = None;
        ui.add_enabled_ui(self.confirmation.is_none(), |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if self.replies.rendered.is_empty() && !self.replies.is_loading {
                        ui.label(RichText::new("No replies yet.").weak());
                    }
                    for row in &self.replies.rendered.rows {
                        render_row(ui, row, target == Some(row.reply_id), &mut clicked);
                        ui.add_space(2.0);
                    }
                });
        });

        if should_retry {
            self.spawn_load_replies();
        }
        if let Some((reply_id, action)) = clicked {
            self.on_row_action(reply_id, action);
        }
    }
}
