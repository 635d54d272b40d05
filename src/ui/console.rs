use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Log console (central panel)
// ---------------------------------------------------------------------------

/// Render the read-only log console, scrolled to the newest line.
pub fn log_console(ui: &mut Ui, state: &AppState) {
    ui.strong("Log Console:");
    ui.add_space(4.0);

    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui: &mut Ui| {
                if state.log_lines.is_empty() {
                    ui.weak("Open a CSV file to begin  (File → Open CSV…)");
                }
                for line in &state.log_lines {
                    ui.monospace(line);
                }
            });
    });
}
