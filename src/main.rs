//! Styrene launcher.
//!
//! From an MSYS shell, bundles once per MINGW architecture, each in a fresh
//! login shell with an empty package cache. Anywhere else, runs the bundler
//! directly. All arguments are forwarded to the bundler.

use std::process;

#[tokio::main]
async fn main() {
    // Warnings only unless RUST_LOG asks for more
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let exit_code = styrene_launch::cli::run().await;

    process::exit(exit_code);
}
