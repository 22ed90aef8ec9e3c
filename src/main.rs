#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::{Path, PathBuf};

// When compiling natively:
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let mut args = std::env::args().skip(1);
    let (Some(original), Some(cutout)) = (args.next(), args.next()) else {
        log::error!("usage: cutout_editor <original-image> <cutout-image> [config.json]");
        std::process::exit(2);
    };
    let config_path = args.next();
    let config = cutout_editor::EditorConfig::load_or_default(config_path.as_deref().map(Path::new));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 560.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Cutout Editor",
        native_options,
        Box::new(|cc| {
            Ok(Box::new(cutout_editor::EditorApp::new(
                cc,
                config,
                PathBuf::from(original),
                PathBuf::from(cutout),
            )))
        }),
    )
}
