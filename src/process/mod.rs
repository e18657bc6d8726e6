//! External process invocation.
//!
//! An [`Invocation`] is a fully resolved command: program, argument vector and
//! environment overrides. A [`ProcessRunner`] turns one into an exit status.
//! Stdio is inherited, so the bundler's own output reaches the user unchanged.

use crate::config::CommandSpec;
use crate::error::{LaunchError, Result};
use crate::plan::Arch;
use std::ffi::{OsStr, OsString};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

/// Variable that keeps the MSYS2 login profile in the current directory
pub const CHERE_INVOKING: &str = "CHERE_INVOKING";

/// `$0` of the login shell's command string
const SHELL_ARGV0: &str = "styrene-launch";

/// A command ready to be spawned.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invocation {
    /// Program to execute
    pub program: OsString,
    /// Arguments, excluding the program itself
    pub args: Vec<OsString>,
    /// Environment variables set on top of the inherited environment
    pub env: Vec<(OsString, OsString)>,
}

impl Invocation {
    /// Runs the tool directly: `<tool> <tool args> <forwarded...>`.
    pub fn direct(tool: &CommandSpec, forwarded: &[OsString]) -> Self {
        let args = tool
            .args
            .iter()
            .map(OsString::from)
            .chain(forwarded.iter().cloned())
            .collect();

        Self {
            program: OsString::from(&tool.program),
            args,
            env: Vec::new(),
        }
    }

    /// Runs the tool inside a login shell selecting `arch`.
    ///
    /// Produces `<shell> <shell args> '<tool> "$@"' styrene-launch <forwarded...>`.
    /// The forwarded arguments become the shell's positional parameters and
    /// are expanded by `"$@"`, so they reach the tool byte for byte.
    pub fn login_shell(
        shell: &CommandSpec,
        tool: &CommandSpec,
        marker_var: &str,
        arch: Arch,
        forwarded: &[OsString],
    ) -> Self {
        let script = format!("{} \"$@\"", tool.to_shell_command());

        let args = shell
            .args
            .iter()
            .map(OsString::from)
            .chain([OsString::from(script), OsString::from(SHELL_ARGV0)])
            .chain(forwarded.iter().cloned())
            .collect();

        Self {
            program: OsString::from(&shell.program),
            args,
            env: vec![
                (OsString::from(marker_var), OsString::from(arch.msystem())),
                (OsString::from(CHERE_INVOKING), OsString::from("1")),
            ],
        }
    }

    /// Value this invocation assigns to `key`, if any.
    pub fn env_value(&self, key: &str) -> Option<&OsStr> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }

    /// Human-readable command line for status output and errors.
    pub fn display(&self) -> String {
        let words = std::iter::once(&self.program)
            .chain(&self.args)
            .map(|word| word.to_string_lossy().into_owned());
        let command = shell_words::join(words);

        let overrides: Vec<String> = self
            .env
            .iter()
            .map(|(k, v)| format!("{}={}", k.to_string_lossy(), v.to_string_lossy()))
            .collect();

        if overrides.is_empty() {
            command
        } else {
            format!("{} {}", overrides.join(" "), command)
        }
    }
}

/// Runs invocations to completion.
#[allow(async_fn_in_trait)]
pub trait ProcessRunner {
    /// Spawns the invocation, waits for it and returns its exit status.
    async fn run(&mut self, invocation: &Invocation) -> Result<ExitStatus>;
}

/// Runner that spawns real processes with inherited stdio.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    async fn run(&mut self, invocation: &Invocation) -> Result<ExitStatus> {
        tool_available(&invocation.program)?;

        log::debug!("Spawning: {}", invocation.display());

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                command: invocation.display(),
                source,
            })?;

        child.wait().await.map_err(|source| LaunchError::Spawn {
            command: invocation.display(),
            source,
        })
    }
}

/// Confirms that `program` resolves to an executable.
///
/// Paths are checked as given; bare names are searched on `PATH`.
pub fn tool_available(program: &OsStr) -> Result<()> {
    match which::which(program) {
        Ok(path) => {
            log::debug!("Found {} at: {}", program.to_string_lossy(), path.display());
            Ok(())
        }
        Err(e) => Err(LaunchError::ToolNotFound {
            program: program.to_string_lossy().into_owned(),
            reason: e.to_string(),
        }),
    }
}

/// Exit code the launcher reports for a finished child.
///
/// On unix a child killed by a signal maps to `128 + signal`, as shells do.
pub fn exit_code_of(status: ExitStatus) -> Option<i32> {
    status.code().or_else(|| signal_exit_code(status))
}

#[cfg(unix)]
fn signal_exit_code(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(|signal| 128 + signal)
}

#[cfg(not(unix))]
fn signal_exit_code(_status: ExitStatus) -> Option<i32> {
    None
}
