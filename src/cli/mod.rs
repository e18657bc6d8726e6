//! Command line entry point.
//!
//! Loads configuration, detects the session, runs the launch and maps the
//! outcome to a process exit code.

mod args;
mod output;

pub use args::Args;
pub use output::{OutputManager, resolve_color_choice};

use crate::config::LaunchConfig;
use crate::error::{LAUNCHER_FAILURE_EXIT_CODE, LaunchError, Result};
use crate::launcher::Launcher;
use crate::process::SystemRunner;
use crate::session::Session;
use termcolor::ColorChoice;

/// Main CLI entry point
pub async fn run() -> i32 {
    let args = Args::from_env();

    let config = match LaunchConfig::load().await {
        Ok(config) => config,
        Err(e) => {
            // Colour preference is unknown until config loads
            report(&OutputManager::new(ColorChoice::Never), &e);
            return LAUNCHER_FAILURE_EXIT_CODE;
        }
    };

    let output = OutputManager::for_mode(config.colour);
    match launch(&config, &args, &output).await {
        Ok(code) => code,
        Err(e) => {
            report(&output, &e);
            e.exit_code()
        }
    }
}

fn report(output: &OutputManager, error: &LaunchError) {
    if output.error(&error.to_string()).is_err() {
        eprintln!("Error: {}", error);
    }
}

/// Runs one launch with an already loaded configuration.
pub async fn launch(config: &LaunchConfig, args: &Args, output: &OutputManager) -> Result<i32> {
    let session = Session::from_env(&config.marker_var, &config.marker_value);
    let mut launcher = Launcher::new(config, SystemRunner, output);
    launcher.run(&session, &args.forwarded).await
}
