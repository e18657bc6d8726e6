//! Command line capture.
//!
//! The launcher owns no flags. Every argument, including `--help` and `--`,
//! belongs to the bundler and is forwarded untouched.

use std::ffi::OsString;

/// Arguments forwarded to the bundler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// Everything after the launcher's own program name, in order
    pub forwarded: Vec<OsString>,
}

impl Args {
    /// Captures the process's command line.
    pub fn from_env() -> Self {
        Self::from_iter_os(std::env::args_os())
    }

    /// Builds from a full argv, whose first element is the program name.
    pub fn from_iter_os<I, T>(argv: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self {
            forwarded: argv.into_iter().skip(1).map(Into::into).collect(),
        }
    }
}
