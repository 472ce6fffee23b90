//! # Gym Coach Frontend
//!
//! Desktop presenter for the coach. The producer runs on its own thread inside
//! this process; the egui `update()` loop is the consumer, reading the published
//! snapshot on every repaint and forwarding the user's controls to the shared state.
//!
use clap::Parser;

use env_logger::Env;
use gym_coach::{launch::CoachRuntime, settings::Cli};
use log::{debug, error};
use model::Model;

mod model;
mod ui;

fn main() -> Result<(), eframe::Error> {
    let cli = Cli::parse();

    // Initialize the logger from the environment

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level))
        .filter_module("winit", log::LevelFilter::Warn)
        .filter_module("eframe", log::LevelFilter::Warn)
        .init();

    debug!("Started; args: {:?}", cli);

    let runtime = match CoachRuntime::start(&cli) {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start: {:#}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(1100.0, 800.0)),
        ..Default::default()
    };
    eframe::run_native(
        "Gym Coach",
        options,
        Box::new(|_cc| Box::new(Model::new(runtime))),
    )
}
