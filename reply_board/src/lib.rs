pub mod api;
pub mod app;
pub mod compose;
pub mod config;
pub mod error;
pub mod models;
pub mod permissions;
pub mod render;
pub mod tree;

#[cfg(test)]
mod testing;

use anyhow::{anyhow, Result};
use eframe::{self, egui};

pub use app::ReplyBoardApp;
pub use config::ClientConfig;

/// Launches the reply board window with default window options.
pub fn run_frontend(config: ClientConfig) -> Result<()> {
    run_frontend_with_options(config, default_native_options())
}

/// Launches the reply board with caller-provided options.
pub fn run_frontend_with_options(
    config: ClientConfig,
    options: eframe::NativeOptions,
) -> Result<()> {
    let app = ReplyBoardApp::from_config(&config)?;
    eframe::run_native(
        "Reply Board",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow!("reply board window failed: {err}"))
}

/// Installs the `RUST_LOG`-driven logger; later calls are no-ops.
pub fn init_logging() -> bool {
    env_logger::builder().is_test(false).try_init().is_ok()
}

fn default_native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 720.0])
            .with_min_inner_size([480.0, 400.0]),
        ..Default::default()
    }
}
