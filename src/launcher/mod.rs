//! Launch orchestration.
//!
//! The [`Launcher`] walks a plan's steps in order and stops at the first
//! failure. The exit code of a successful launch is that of the last process
//! it ran.

use crate::cache;
use crate::cli::OutputManager;
use crate::config::LaunchConfig;
use crate::error::{LaunchError, Result};
use crate::plan::{ExecutionPlan, Step};
use crate::process::{self, ProcessRunner};
use crate::session::Session;
use std::ffi::OsString;

/// Drives one launch.
pub struct Launcher<'a, R> {
    config: &'a LaunchConfig,
    runner: R,
    output: &'a OutputManager,
}

impl<'a, R: ProcessRunner> Launcher<'a, R> {
    /// Creates a launcher.
    pub fn new(config: &'a LaunchConfig, runner: R, output: &'a OutputManager) -> Self {
        Self {
            config,
            runner,
            output,
        }
    }

    /// Plans and runs a launch for `session`.
    pub async fn run(&mut self, session: &Session, forwarded: &[OsString]) -> Result<i32> {
        let plan = ExecutionPlan::for_session(session, &self.config.arches);
        match plan.arches() {
            [] => log::info!("Running {} directly", self.config.tool.program),
            arches => log::info!("Running {} once for each of {arches:?}", self.config.tool.program),
        }

        if let Session::Other(value) = session {
            log::debug!(
                "{}={} does not select the multi-architecture launch",
                self.config.marker_var,
                value
            );
        }

        let steps = plan.steps(self.config, forwarded);
        self.execute(&steps).await
    }

    /// Executes steps in order, stopping at the first failure.
    pub async fn execute(&mut self, steps: &[Step]) -> Result<i32> {
        let mut last_code = 0;

        for step in steps {
            match step {
                Step::ClearCache { dir } => {
                    let removed = cache::clear_contents(dir).await?;
                    self.output.progress(&format!(
                        "Cleared {} ({removed} entries removed)",
                        dir.display()
                    ))?;
                }
                Step::ListCache { dir } => {
                    let listing = cache::list(dir).await?;
                    self.output
                        .progress(&format!("{}: {} entries", dir.display(), listing.len()))?;
                    for entry in &listing {
                        self.output.indent(&entry.to_string())?;
                    }
                }
                Step::Run { arch, invocation } => {
                    if let Some(arch) = arch {
                        self.output.section(&format!("Bundling for {arch}"))?;
                    }

                    let status = self.runner.run(invocation).await?;
                    let code = process::exit_code_of(status);

                    if !status.success() {
                        return Err(LaunchError::StepFailed {
                            command: invocation.display(),
                            code,
                        });
                    }

                    last_code = code.unwrap_or(0);
                    if let Some(arch) = arch {
                        self.output.success(&format!("{arch} finished"))?;
                    }
                }
            }
        }

        Ok(last_code)
    }

    /// Consumes the launcher, returning its runner.
    pub fn into_runner(self) -> R {
        self.runner
    }
}
