//! Error types for launcher operations.
//!
//! Every failure is fatal for the run. Errors carry enough context to tell the
//! user which step stopped the launch.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for launcher operations
pub type Result<T> = std::result::Result<T, LaunchError>;

/// Exit code used for launcher failures that are not a child's own exit code
pub const LAUNCHER_FAILURE_EXIT_CODE: i32 = 2;

/// Main error type for all launcher operations
#[derive(Error, Debug)]
pub enum LaunchError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cache directory could not be cleared or listed
    #[error("Cache error at {}: {source}", .path.display())]
    Cache {
        /// Path being operated on
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Program not found on PATH
    #[error("Program not found: {program} ({reason})")]
    ToolNotFound {
        /// Program that was looked up
        program: String,
        /// Why the lookup failed
        reason: String,
    },

    /// Process could not be started or waited on
    #[error("Failed to run {command}: {source}")]
    Spawn {
        /// Rendered command line
        command: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// A launched process exited unsuccessfully
    #[error("Command failed: {command} (exit status: {})", describe_code(.code))]
    StepFailed {
        /// Rendered command line
        command: String,
        /// Exit code the launcher should report
        code: Option<i32>,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML for the launcher
    #[error("Cannot parse {}: {source}", .path.display())]
    Parse {
        /// Config file path
        path: PathBuf,
        /// TOML error
        #[source]
        source: toml::de::Error,
    },

    /// Unknown architecture identifier
    #[error("Unknown architecture: {value} (expected MINGW32 or MINGW64)")]
    UnknownArch {
        /// The rejected value
        value: String,
    },

    /// A field holds a value the launcher cannot use
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for the error
        reason: String,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "terminated by signal".to_string(),
    }
}

impl LaunchError {
    /// Exit code the launcher process should terminate with for this error.
    ///
    /// A failed child passes its own exit code through. Everything else maps
    /// to [`LAUNCHER_FAILURE_EXIT_CODE`].
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::StepFailed {
                code: Some(code), ..
            } => *code,
            _ => LAUNCHER_FAILURE_EXIT_CODE,
        }
    }
}
