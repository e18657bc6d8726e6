//! Launcher configuration.
//!
//! Built-in defaults reproduce the stock Styrene setup under MSYS2. A TOML
//! file can override any field; it is taken from `STYRENE_LAUNCH_CONFIG` or,
//! failing that, `<config_dir>/styrene/launch.toml` when present.

pub mod msys;

use crate::error::{ConfigError, Result};
use crate::plan::Arch;
use crate::session::{DEFAULT_MARKER_VALUE, DEFAULT_MARKER_VAR};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "STYRENE_LAUNCH_CONFIG";

/// Environment variable selecting colour for status output
pub const COLOUR_ENV_VAR: &str = "STYRENE_COLOUR";

/// pacman's package cache under MSYS2
pub const DEFAULT_CACHE_DIR: &str = "/var/cache/pacman/pkg";

/// A program plus the fixed arguments placed before anything forwarded.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    /// Program name or path
    pub program: String,
    /// Leading arguments
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Renders program and args as one shell-quoted command line.
    pub fn to_shell_command(&self) -> String {
        shell_words::join(std::iter::once(&self.program).chain(&self.args))
    }
}

/// Colour policy for launcher status output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ColourMode {
    /// Always colour
    Yes,
    /// Never colour
    No,
    /// Colour when stderr is a terminal
    #[default]
    Auto,
}

impl ColourMode {
    /// Parses `yes` / `no` case-insensitively; anything else means auto.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" => ColourMode::Yes,
            "no" => ColourMode::No,
            _ => ColourMode::Auto,
        }
    }
}

impl<'de> Deserialize<'de> for ColourMode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(ColourMode::parse_lenient(&value))
    }
}

/// Complete launcher configuration.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchConfig {
    /// Environment variable holding the session marker
    pub marker_var: String,
    /// Marker value that selects the per-architecture branch
    pub marker_value: String,
    /// Architectures to launch, in order
    pub arches: Vec<Arch>,
    /// Package cache cleared before each architecture
    pub cache_dir: PathBuf,
    /// Colour policy for status output
    pub colour: ColourMode,
    /// Login shell used for each architecture
    pub shell: CommandSpec,
    /// The bundler itself
    pub tool: CommandSpec,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            marker_var: DEFAULT_MARKER_VAR.to_string(),
            marker_value: DEFAULT_MARKER_VALUE.to_string(),
            arches: Arch::DEFAULT_ORDER.to_vec(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            colour: ColourMode::Auto,
            shell: CommandSpec::new("bash", &["-l", "-c"]),
            tool: CommandSpec::new("python3", &["-m", "styrene"]),
        }
    }
}

impl LaunchConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self> {
        let config: LaunchConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a config file.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml(&text, path)
    }

    /// Loads the effective configuration for this process.
    ///
    /// An explicit `STYRENE_LAUNCH_CONFIG` must point at a readable file. The
    /// per-user file is optional. `STYRENE_COLOUR` overrides `colour`.
    pub async fn load() -> Result<Self> {
        let mut config = Self::load_from(
            std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
            dirs::config_dir(),
            std::env::var(COLOUR_ENV_VAR).ok(),
        )
        .await?;

        if cfg!(windows) {
            config.localize_cache_dir().await;
        }

        Ok(config)
    }

    /// Loads configuration from explicit sources.
    ///
    /// `explicit` wins over `<user_config_dir>/styrene/launch.toml`, which is
    /// used only when it exists. `colour` overrides the file's `colour`.
    pub async fn load_from(
        explicit: Option<PathBuf>,
        user_config_dir: Option<PathBuf>,
        colour: Option<String>,
    ) -> Result<Self> {
        let mut config = match config_path(explicit, user_config_dir) {
            Some(path) => {
                log::debug!("Loading launcher config from {}", path.display());
                Self::from_file(&path).await?
            }
            None => Self::default(),
        };

        if let Some(value) = colour {
            config.colour = ColourMode::parse_lenient(&value);
        }

        Ok(config)
    }

    /// Roots the built-in cache directory at the MSYS2 installation.
    ///
    /// Only the default value is translated; any other configured path is
    /// used as given. Leaves the path unchanged if no root can be found.
    pub async fn localize_cache_dir(&mut self) {
        if self.cache_dir != Path::new(DEFAULT_CACHE_DIR) {
            return;
        }

        match msys::native_path(&self.shell, DEFAULT_CACHE_DIR).await {
            Some(native) => {
                log::debug!("Package cache resolved to {}", native.display());
                self.cache_dir = native;
            }
            None => log::warn!(
                "Cannot locate the MSYS2 root for {}; using {DEFAULT_CACHE_DIR} as is",
                self.shell.program
            ),
        }
    }

    /// Checks values that deserialize fine but cannot drive a launch.
    pub fn validate(&self) -> Result<()> {
        let require = |field: &str, value: &str| {
            if value.trim().is_empty() {
                Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                })
            } else {
                Ok(())
            }
        };

        require("marker_var", &self.marker_var)?;
        require("shell.program", &self.shell.program)?;
        require("tool.program", &self.tool.program)?;

        if self.marker_var.contains('=') {
            return Err(ConfigError::InvalidValue {
                field: "marker_var".to_string(),
                reason: "must not contain '='".to_string(),
            }
            .into());
        }

        if self.arches.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "arches".to_string(),
                reason: "at least one architecture is required".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

fn config_path(explicit: Option<PathBuf>, user_config_dir: Option<PathBuf>) -> Option<PathBuf> {
    if explicit.is_some() {
        return explicit;
    }

    user_config_dir
        .map(|dir| dir.join("styrene").join("launch.toml"))
        .filter(|path| path.is_file())
}
