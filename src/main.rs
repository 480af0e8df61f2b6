use eframe::egui;
use anyhow::Result;

mod app;
mod audio;
mod config;
mod core;
mod messaging;
mod ui;
mod utils;

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Starting virtual piano");

    let config = config::Config::load();

    // Audio is opened up front; without an output device there is nothing to play
    let app = app::PianoApp::new(config.clone()).map_err(|e| {
        log::error!("Failed to start audio: {:#}", e);
        e
    })?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height]),
        ..Default::default()
    };

    eframe::run_native(
        "Virtual Piano",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    ).map_err(|e| anyhow::anyhow!("Application error: {}", e))
}
