//! Coloured status output on stderr.
//!
//! stdout belongs to the bundler; the launcher only ever writes to stderr.

use crate::config::ColourMode;
use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Resolves the termcolor choice for stderr.
///
/// Priority: `NO_COLOR` env > configured mode > TTY detection.
pub fn resolve_color_choice(mode: ColourMode) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match mode {
        ColourMode::Yes => ColorChoice::Always,
        ColourMode::No => ColorChoice::Never,
        ColourMode::Auto if io::stderr().is_terminal() => ColorChoice::Auto,
        ColourMode::Auto => ColorChoice::Never,
    }
}

/// Writes launcher status lines to stderr.
pub struct OutputManager {
    stderr: StandardStream,
}

impl std::fmt::Debug for OutputManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputManager").finish_non_exhaustive()
    }
}

impl OutputManager {
    /// Creates an output manager with the given colour choice.
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stderr: StandardStream::stderr(choice),
        }
    }

    /// Creates an output manager for a configured colour mode.
    pub fn for_mode(mode: ColourMode) -> Self {
        Self::new(resolve_color_choice(mode))
    }

    fn write_line(&self, prefix: &str, color: Option<Color>, bold: bool, message: &str) -> io::Result<()> {
        let mut out = self.stderr.lock();
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        out.set_color(&spec)?;
        write!(out, "{prefix}")?;
        out.reset()?;
        writeln!(out, "{message}")?;
        out.flush()
    }

    /// Section header, e.g. the architecture being bundled.
    pub fn section(&self, title: &str) -> io::Result<()> {
        self.write_line("==> ", Some(Color::Cyan), true, title)
    }

    /// Progress message.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        self.write_line("  -> ", Some(Color::Blue), true, message)
    }

    /// Indented detail line, used for cache listings.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        self.write_line("     ", None, false, message)
    }

    /// Success message.
    pub fn success(&self, message: &str) -> io::Result<()> {
        self.write_line("  ✓ ", Some(Color::Green), true, message)
    }

    /// Error message.
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.write_line("Error: ", Some(Color::Red), true, message)
    }
}
