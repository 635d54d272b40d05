use eframe::egui;

use crate::config::Settings;
use crate::state::AppState;
use crate::ui::{console, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CsvTimeFilterApp {
    pub state: AppState,
}

impl CsvTimeFilterApp {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: AppState::new(settings),
        }
    }
}

impl eframe::App for CsvTimeFilterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Worker output first so this frame shows it.
        self.state.drain_messages();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Form: files, window, column ----
        egui::TopBottomPanel::top("filter_form")
            .resizable(false)
            .show(ctx, |ui| {
                panels::filter_form(ui, &mut self.state);
            });

        // ---- Central panel: log console ----
        egui::CentralPanel::default().show(ctx, |ui| {
            console::log_console(ui, &self.state);
        });

        panels::notice_dialog(ctx, &mut self.state);

        // Keep polling the worker channel even without input events.
        ctx.request_repaint_after(self.state.settings.poll_interval());
    }
}
