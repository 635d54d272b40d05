mod app;
mod config;
mod data;
mod job;
mod state;
mod ui;

use app::CsvTimeFilterApp;
use config::Settings;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load().unwrap_or_else(|e| {
        log::warn!("Using default settings: {e:#}");
        Settings::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([600.0, 700.0])
            .with_min_inner_size([520.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CSV Time Filter Tool",
        options,
        Box::new(|_cc| Ok(Box::new(CsvTimeFilterApp::new(settings)))),
    )
}
