use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::data::model::WindowBound;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Filter form
// ---------------------------------------------------------------------------

/// Render the input form and the Filter button.
pub fn filter_form(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(6.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("CSV Time Filter Tool");
    });
    ui.add_space(6.0);

    egui::Grid::new("filter_form_grid")
        .num_columns(3)
        .spacing([12.0, 8.0])
        .show(ui, |ui: &mut Ui| {
            // ---- Files ----
            ui.label("CSV File:");
            ui.add(egui::TextEdit::singleline(&mut state.csv_path).desired_width(360.0));
            ui.horizontal(|ui: &mut Ui| {
                let idle = !state.busy();
                if ui.add_enabled(idle, egui::Button::new("Browse")).clicked() {
                    open_csv_dialog(state);
                }
                let has_path = !state.csv_path.trim().is_empty();
                if ui
                    .add_enabled(idle && has_path, egui::Button::new("Load"))
                    .on_hover_text("Read the column names of the typed path")
                    .clicked()
                {
                    let path = PathBuf::from(state.csv_path.trim());
                    state.select_input(path);
                }
            });
            ui.end_row();

            ui.label("Output File:");
            ui.add(egui::TextEdit::singleline(&mut state.output_path).desired_width(360.0));
            if ui.button("Save As").clicked() {
                save_csv_dialog(state);
            }
            ui.end_row();

            // ---- Window ----
            ui.label("Start Date:");
            ui.add(DatePickerButton::new(&mut state.start.date).id_salt("start_date"));
            ui.end_row();

            ui.label("Start Time:");
            clock_picker(ui, "start", &mut state.start);
            ui.end_row();

            ui.label("End Date:");
            ui.add(DatePickerButton::new(&mut state.end.date).id_salt("end_date"));
            ui.end_row();

            ui.label("End Time:");
            clock_picker(ui, "end", &mut state.end);
            ui.end_row();

            // ---- Column ----
            ui.label("Time and Date Column:");
            column_picker(ui, state);
            ui.end_row();
        });

    ui.add_space(12.0);
    ui.vertical_centered(|ui: &mut Ui| {
        let button = egui::Button::new(RichText::new("Filter CSV").strong().size(16.0))
            .min_size(egui::vec2(160.0, 32.0));
        if ui.add_enabled(!state.busy(), button).clicked() {
            state.start_filter();
        }
    });
    ui.add_space(8.0);
}

/// Hour / minute / second combo boxes for one window bound.
fn clock_picker(ui: &mut Ui, id: &str, bound: &mut WindowBound) {
    ui.horizontal(|ui: &mut Ui| {
        two_digit_combo(ui, &format!("{id}_hour"), &mut bound.hour, 24);
        ui.label(":");
        two_digit_combo(ui, &format!("{id}_minute"), &mut bound.minute, 60);
        ui.label(":");
        two_digit_combo(ui, &format!("{id}_second"), &mut bound.second, 60);
    });
}

fn two_digit_combo(ui: &mut Ui, id: &str, value: &mut u32, upper: u32) {
    egui::ComboBox::from_id_salt(id)
        .width(48.0)
        .selected_text(format!("{:02}", *value))
        .show_ui(ui, |ui: &mut Ui| {
            for v in 0..upper {
                ui.selectable_value(value, v, format!("{v:02}"));
            }
        });
}

fn column_picker(ui: &mut Ui, state: &mut AppState) {
    let columns = state.columns.clone();
    let current = state.selected_column.clone().unwrap_or_default();

    ui.add_enabled_ui(!columns.is_empty(), |ui: &mut Ui| {
        egui::ComboBox::from_id_salt("time_column")
            .width(220.0)
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                for col in &columns {
                    ui.selectable_value(&mut state.selected_column, Some(col.clone()), col);
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui
                .add_enabled(!state.busy(), egui::Button::new("Open CSV…"))
                .clicked()
            {
                open_csv_dialog(state);
                ui.close_menu();
            }
            if ui.button("Save As…").clicked() {
                save_csv_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if !state.columns.is_empty() {
            ui.label(format!("{} columns loaded", state.columns.len()));
        }

        if state.busy() {
            ui.separator();
            ui.spinner();
            ui.label("Working…");
        }
    });
}

// ---------------------------------------------------------------------------
// Notice dialog
// ---------------------------------------------------------------------------

/// Modal-style window for the pending notice, closed with OK.
pub fn notice_dialog(ctx: &egui::Context, state: &mut AppState) {
    let Some(notice) = &state.notice else {
        return;
    };

    let color = if notice.is_error() {
        Some(Color32::RED)
    } else if matches!(notice, crate::job::Notice::NoMatches) {
        Some(Color32::from_rgb(200, 140, 0))
    } else {
        None
    };
    let mut text = RichText::new(notice.message());
    if let Some(c) = color {
        text = text.color(c);
    }

    let mut acknowledged = false;
    egui::Window::new(notice.title())
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            ui.label(text);
            ui.add_space(8.0);
            ui.vertical_centered(|ui: &mut Ui| {
                if ui.button("OK").clicked() {
                    acknowledged = true;
                }
            });
        });

    if acknowledged {
        state.notice = None;
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_csv_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CSV file")
        .add_filter("CSV Files", &["csv"])
        .pick_file();

    match file {
        Some(path) => state.select_input(path),
        None => state.dialog_cancelled("file"),
    }
}

pub fn save_csv_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save filtered CSV")
        .add_filter("CSV Files", &["csv"])
        .set_file_name(state.settings.default_output_name.clone())
        .save_file();

    match file {
        Some(path) if path.extension().is_none() => state.select_output(path.with_extension("csv")),
        Some(path) => state.select_output(path),
        None => state.dialog_cancelled("output file"),
    }
}
