mod app;
mod config;
mod data;
mod processing;
mod state;
mod ui;

use app::AnglePlotApp;
use config::AppConfig;
use eframe::egui;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("AnglePlot")
            .with_inner_size([1300.0, 850.0])
            .with_min_inner_size([800.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "AnglePlot",
        options,
        Box::new(|cc| Ok(Box::new(AnglePlotApp::new(cc, config)))),
    )
}
