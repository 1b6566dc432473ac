mod app;
mod color;
mod state;
mod ui;

use app::DashboardApp;
use eframe::egui;
use rbi_dashboard::settings::Settings;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::load().unwrap_or_else(|e| {
        log::error!("{e}; using default settings");
        Settings::default()
    });
    log::debug!("{settings:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "RBI Monetary Policy Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(&settings)))),
    )
}
