//! MSYS2 target architectures.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// MINGW environment a bundle is built for.
///
/// The identifier is what `MSYSTEM` is set to in the login shell, which makes
/// the MSYS2 profile put the matching toolchain and Python first on `PATH`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
pub enum Arch {
    /// i686 toolchain under `/mingw32`
    Mingw32,
    /// x86_64 toolchain under `/mingw64`
    Mingw64,
}

impl Arch {
    /// Architectures bundled from an MSYS session, in launch order.
    pub const DEFAULT_ORDER: [Arch; 2] = [Arch::Mingw32, Arch::Mingw64];

    /// Value assigned to `MSYSTEM` for this architecture.
    pub fn msystem(self) -> &'static str {
        match self {
            Arch::Mingw32 => "MINGW32",
            Arch::Mingw64 => "MINGW64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.msystem())
    }
}

impl FromStr for Arch {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MINGW32" => Ok(Arch::Mingw32),
            "MINGW64" => Ok(Arch::Mingw64),
            _ => Err(ConfigError::UnknownArch {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Arch {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
