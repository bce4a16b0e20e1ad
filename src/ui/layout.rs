// Main application layout
// Handles header, history sidebar, chat area, input bar, and overlays

use crate::state::{AppState, Modal};
use crate::ui::components::*;
use cricket_chat_client::chat::constants::{INPUT_PLACEHOLDER, SEND_LABEL, SUGGESTED_QUESTIONS};
use eframe::egui;

/// Render the main application layout
/// Includes header, sidebar, chat area, input bar, and any open overlay
pub fn render_app_layout(ctx: &egui::Context, state: &mut AppState) {
    render_header(ctx, state);

    if state.ui_state.sidebar_visible {
        render_sidebar(ctx, state);
    }

    render_input_bar(ctx, state);

    egui::CentralPanel::default().show(ctx, |ui| {
        render_chat_area(ui, state);
    });

    render_modal(ctx, state);
}

/// Render the top bar with sidebar toggle and quota
fn render_header(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("chat_header").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button(egui::RichText::new("☰").size(18.0)).clicked() {
                state.toggle_sidebar();
            }
            ui.add_space(8.0);
            ui.heading("Cricket Chat");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(8.0);
                quota_label(ui, state.session.remaining_requests());
            });
        });
        ui.add_space(6.0);
    });
}

/// Render the left sidebar with saved chats
fn render_sidebar(ctx: &egui::Context, state: &mut AppState) {
    egui::SidePanel::left("history_sidebar")
        .resizable(true)
        .default_width(250.0)
        .min_width(150.0)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.heading("Chat History");
            ui.add_space(8.0);
            if primary_button(ui, state.input_enabled(), "+ New Chat").clicked() {
                state.new_chat();
            }
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            // Apply clicks after the loop; the list borrows the session
            let mut load = None;
            let mut delete = None;
            let active_id = state.session.conversation_id().to_string();

            egui::ScrollArea::vertical()
                .id_source("history_scroll")
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    let items = state.session.history().items();
                    if items.is_empty() {
                        ui.vertical_centered(|ui| {
                            ui.add_space(40.0);
                            ui.label(egui::RichText::new("No saved chats").italics().weak());
                        });
                    }
                    for (index, item) in items.iter().enumerate() {
                        ui.horizontal(|ui| {
                            let selected = item.id == active_id;
                            if ui.selectable_label(selected, item.title.as_str()).clicked() {
                                load = Some(index);
                            }
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.small_button("🗑").on_hover_text("Delete chat").clicked() {
                                        delete = Some(index);
                                    }
                                },
                            );
                        });
                        ui.add_space(2.0);
                    }
                });

            if let Some(index) = load {
                state.load_history(index);
            }
            if let Some(index) = delete {
                state.delete_history(index);
            }
        });
}

/// Render the query input and send button
fn render_input_bar(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::bottom("chat_input").show(ctx, |ui| {
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            let enabled = state.input_enabled();
            let input_width = ui.available_width() - 80.0;

            let input = ui.add_enabled(
                enabled,
                egui::TextEdit::singleline(&mut state.input)
                    .hint_text(INPUT_PLACEHOLDER)
                    .desired_width(input_width),
            );
            let enter_pressed =
                input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let send_clicked = primary_button(ui, enabled, SEND_LABEL).clicked();

            if (enter_pressed || send_clicked) && state.submit_input() {
                input.request_focus();
            }
        });
        ui.add_space(10.0);
    });
}

/// Render the transcript, or the suggestions when it is empty
fn render_chat_area(ui: &mut egui::Ui, state: &mut AppState) {
    if state.session.transcript().is_empty() && !state.session.is_pending() {
        render_empty_state(ui, state);
        return;
    }

    let preview_rows = state.ui_state.preview_rows;
    let mut action = None;

    egui::ScrollArea::vertical()
        .id_source("chat_scroll")
        .auto_shrink([false; 2])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.add_space(12.0);
            for (index, message) in state.session.transcript().iter().enumerate() {
                if let Some(clicked) = message_bubble(ui, index, message, preview_rows) {
                    action = Some(clicked);
                }
                ui.add_space(12.0);
            }
            if state.session.is_pending() {
                loader_bubble(ui);
                ui.add_space(12.0);
            }
        });

    match action {
        Some(BubbleAction::ViewSql(sql)) => state.open_sql(sql),
        Some(BubbleAction::ViewFullTable(table)) => state.open_full_table(table),
        None => {}
    }
}

/// Render the welcome view with suggested questions
fn render_empty_state(ui: &mut egui::Ui, state: &mut AppState) {
    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.heading(egui::RichText::new("Ask anything about IPL cricket").size(24.0));
        ui.add_space(8.0);
        ui.label(
            egui::RichText::new("Questions are answered from the IPL statistics database")
                .weak()
                .size(14.0),
        );
        ui.add_space(24.0);

        let mut chosen = None;
        for (index, question) in SUGGESTED_QUESTIONS.iter().enumerate() {
            if ui.button(*question).clicked() {
                chosen = Some(index);
            }
            ui.add_space(6.0);
        }
        if let Some(index) = chosen {
            state.submit_suggestion(index);
        }
    });
}

/// Render the open overlay, if any
fn render_modal(ctx: &egui::Context, state: &mut AppState) {
    let Some(modal) = state.ui_state.modal.clone() else {
        return;
    };

    let mut open = true;
    let mut close_clicked = false;

    match &modal {
        Modal::Sql(sql) => {
            egui::Window::new("Generated SQL")
                .open(&mut open)
                .collapsible(false)
                .resizable(true)
                .default_width(480.0)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                        ui.add(egui::Label::new(egui::RichText::new(sql).monospace()).wrap(true));
                    });
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui.button("Copy").clicked() {
                            ui.output_mut(|o| o.copied_text = sql.clone());
                        }
                        if ui.button("Close").clicked() {
                            close_clicked = true;
                        }
                    });
                });
        }
        Modal::FullTable(table) => {
            egui::Window::new("Full Table")
                .open(&mut open)
                .collapsible(false)
                .resizable(true)
                .default_size(egui::vec2(640.0, 420.0))
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new(format!("{} rows", table.row_count())).weak());
                    ui.add_space(4.0);
                    egui::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
                        result_grid(
                            ui,
                            egui::Id::new("full_table_modal"),
                            table.columns(),
                            table.rows(),
                        );
                    });
                    ui.add_space(8.0);
                    if ui.button("Close").clicked() {
                        close_clicked = true;
                    }
                });
        }
    }

    if !open || close_clicked {
        state.close_modal();
    }
}
