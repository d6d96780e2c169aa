mod app;
mod state;
mod ui;

use app::WiggleViewApp;
use eframe::egui;
use state::AppState;
use wiggle_view::config::WiggleOptions;

fn main() -> eframe::Result {
    env_logger::init();

    let options = WiggleOptions::from_env().unwrap_or_else(|e| {
        log::warn!("Falling back to default display options: {e:#}");
        WiggleOptions::default()
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Wiggle View – Seismic Section Viewer",
        native_options,
        Box::new(move |_cc| Ok(Box::new(WiggleViewApp::new(AppState::with_options(options))))),
    )
}
