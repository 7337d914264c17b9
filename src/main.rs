#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::PathBuf;

use clap::Parser;
use eframe::NativeOptions;

use stock_trend::config::PERSISTENCE;
use stock_trend::ui::config::UI_TEXT;
use stock_trend::{Cli, run_app};

fn main() -> eframe::Result {
    // A. Init Logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    let options = args.launch_options();

    // C. Run Native App
    let native_options = NativeOptions {
        persistence_path: Some(PathBuf::from(PERSISTENCE.app_state_path)),
        ..Default::default()
    };

    eframe::run_native(
        UI_TEXT.app_title,
        native_options,
        Box::new(move |cc| Ok(run_app(cc, options))),
    )
}
