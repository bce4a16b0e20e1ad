// Reusable UI components
// Message bubbles, result tables, and other chat building blocks

use cricket_chat_client::api::RemainingRequests;
use cricket_chat_client::chat::constants::LOADING_INDICATOR;
use cricket_chat_client::chat::{ChatMessage, MessageBody, ResultTable, Sender};
use eframe::egui;

/// Accent used for user bubbles and primary buttons
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x63, 0x66, 0xf1);

/// Background of bot bubbles
pub const BOT_BUBBLE: egui::Color32 = egui::Color32::from_rgb(0x44, 0x44, 0x44);

/// Something the user asked for from inside a message bubble
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BubbleAction {
    /// Show the generated SQL
    ViewSql(String),
    /// Show every row of the table
    ViewFullTable(ResultTable),
}

/// Render a primary action button
pub fn primary_button(ui: &mut egui::Ui, enabled: bool, text: &str) -> egui::Response {
    ui.add_enabled(
        enabled,
        egui::Button::new(egui::RichText::new(text).strong().color(egui::Color32::WHITE))
            .fill(ACCENT),
    )
}

/// Render one chat message as a bubble
/// User messages are right-aligned, bot messages left-aligned
pub fn message_bubble(
    ui: &mut egui::Ui,
    index: usize,
    message: &ChatMessage,
    preview_rows: usize,
) -> Option<BubbleAction> {
    let (align, fill) = match message.sender {
        Sender::User => (egui::Align::Max, ACCENT),
        Sender::Bot => (egui::Align::Min, BOT_BUBBLE),
    };

    let mut action = None;
    ui.with_layout(egui::Layout::top_down(align), |ui| {
        egui::Frame::none()
            .fill(fill)
            .rounding(egui::Rounding::same(12.0))
            .inner_margin(egui::Margin::symmetric(16.0, 10.0))
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.7);
                ui.label(
                    egui::RichText::new(message.sender.display_name())
                        .strong()
                        .color(egui::Color32::WHITE),
                );
                ui.add_space(4.0);

                match &message.body {
                    MessageBody::Text { text } => {
                        ui.label(egui::RichText::new(text).color(egui::Color32::WHITE));
                    }
                    MessageBody::Table { table } => {
                        result_grid(
                            ui,
                            ui.id().with(("result_table", index)),
                            table.columns(),
                            table.preview(preview_rows),
                        );
                        if table.is_truncated(preview_rows) {
                            ui.add_space(4.0);
                            ui.label(
                                egui::RichText::new(format!(
                                    "Showing {} of {} rows",
                                    preview_rows,
                                    table.row_count()
                                ))
                                .weak()
                                .small(),
                            );
                            if ui.button("View Full Table").clicked() {
                                action = Some(BubbleAction::ViewFullTable(table.clone()));
                            }
                        }
                    }
                }

                if let Some(sql) = &message.sql_query {
                    ui.add_space(4.0);
                    if ui.small_button("View SQL").clicked() {
                        action = Some(BubbleAction::ViewSql(sql.clone()));
                    }
                }

                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new(message.display_time())
                        .small()
                        .color(egui::Color32::from_gray(200)),
                );
            });
    });
    action
}

/// Render rows under a header as a striped grid
pub fn result_grid(ui: &mut egui::Ui, id: egui::Id, columns: &[String], rows: &[Vec<String>]) {
    egui::ScrollArea::horizontal()
        .id_source(id.with("scroll"))
        .auto_shrink([true, true])
        .show(ui, |ui| {
            egui::Grid::new(id)
                .striped(true)
                .spacing(egui::vec2(16.0, 4.0))
                .show(ui, |ui| {
                    for column in columns {
                        ui.label(egui::RichText::new(column).strong().color(egui::Color32::WHITE));
                    }
                    ui.end_row();

                    for row in rows {
                        for cell in row {
                            ui.label(egui::RichText::new(cell).color(egui::Color32::WHITE));
                        }
                        ui.end_row();
                    }
                });
        });
}

/// Render the loading bubble shown while a request is outstanding
pub fn loader_bubble(ui: &mut egui::Ui) {
    ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
        egui::Frame::none()
            .fill(egui::Color32::from_gray(0x55))
            .rounding(egui::Rounding::same(12.0))
            .inner_margin(egui::Margin::symmetric(16.0, 10.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(egui::RichText::new(LOADING_INDICATOR).italics());
                });
            });
    });
}

/// Render the reported quota as weak text
pub fn quota_label(ui: &mut egui::Ui, remaining: Option<RemainingRequests>) {
    if let Some(r) = remaining {
        let color = if r.user_remaining <= 0 || r.global_remaining <= 0 {
            egui::Color32::from_rgb(220, 0, 0)
        } else {
            ui.visuals().weak_text_color()
        };
        ui.colored_label(
            color,
            format!(
                "{} requests left today ({} overall)",
                r.user_remaining, r.global_remaining
            ),
        );
    }
}
