//! Session detection from the marker environment variable.

use std::ffi::OsStr;

/// Marker variable inspected to detect an MSYS2 session
pub const DEFAULT_MARKER_VAR: &str = "MSYSTEM";

/// Marker value identifying the plain MSYS shell
pub const DEFAULT_MARKER_VALUE: &str = "MSYS";

/// Kind of shell session the launcher was started from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Session {
    /// Marker matched: started from the MSYS shell, bundle every architecture
    Msys,
    /// Marker set to something else, e.g. already inside a MINGW64 shell
    Other(String),
    /// Marker not set at all
    Unset,
}

impl Session {
    /// Classifies a marker value.
    ///
    /// The comparison is exact and case-sensitive. A value that is not valid
    /// Unicode can never match and is reported lossily.
    pub fn detect(marker: Option<&OsStr>, expected: &str) -> Self {
        match marker {
            None => Session::Unset,
            Some(value) if value == OsStr::new(expected) => Session::Msys,
            Some(value) => Session::Other(value.to_string_lossy().into_owned()),
        }
    }

    /// Reads the marker from the process environment and classifies it.
    pub fn from_env(marker_var: &str, expected: &str) -> Self {
        let marker = std::env::var_os(marker_var);
        let session = Self::detect(marker.as_deref(), expected);
        log::debug!("{marker_var} session detected as {session:?}");
        session
    }

    /// Whether the per-architecture branch applies.
    pub fn is_matched(&self) -> bool {
        matches!(self, Session::Msys)
    }
}
