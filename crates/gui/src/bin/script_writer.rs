//! Script Writer - desktop editor for visual novel dialogue scripts.
//!
//! Reads `script_writer.toml` from the working directory when present and
//! opens the character registration view, or the script view when portraits
//! already exist in the project directory.

use std::path::Path;

use script_writer_core::{ProjectConfig, CONFIG_FILE_NAME};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ProjectConfig::load_or_default(Path::new(CONFIG_FILE_NAME)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(1);
        }
    };

    if let Err(e) = script_writer_gui::run_app(config) {
        eprintln!("Error running script writer: {e}");
        std::process::exit(1);
    }
}
