//! Launcher library for the Styrene MSYS2 bundler.
//!
//! This library provides:
//! - Session detection from `MSYSTEM`
//! - Execution planning (direct run, or one run per MINGW architecture)
//! - pacman package cache clearing between architectures
//! - Fail-fast process orchestration with exit code passthrough
//!
//! It backs the `styrene-launch` binary and can be used as a library.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod launcher;
pub mod plan;
pub mod process;
pub mod session;

// Re-export commonly used types
pub use config::LaunchConfig;
pub use error::{ConfigError, LaunchError, Result};
pub use launcher::Launcher;
pub use plan::{Arch, ExecutionPlan, Step};
pub use session::Session;
