//! Execution planning.
//!
//! A launch is either a single direct run of the bundler, or one login shell
//! per architecture with a cache reset before each. Both are expressed as an
//! ordered list of [`Step`]s so the launcher only needs one loop.

mod arch;

pub use arch::Arch;

use crate::config::LaunchConfig;
use crate::process::Invocation;
use crate::session::Session;
use std::ffi::OsString;
use std::path::PathBuf;

/// What a launch will do.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExecutionPlan {
    /// Run the tool once, as is
    Direct,
    /// Run the tool once per architecture, in order
    PerArch(Vec<Arch>),
}

/// One unit of work, executed strictly in sequence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Step {
    /// Empty the package cache
    ClearCache {
        /// Cache directory
        dir: PathBuf,
    },
    /// Print the package cache contents to stderr
    ListCache {
        /// Cache directory
        dir: PathBuf,
    },
    /// Run a process; a non-zero exit stops the launch
    Run {
        /// Architecture selected by this run, if any
        arch: Option<Arch>,
        /// The process to run
        invocation: Invocation,
    },
}

impl ExecutionPlan {
    /// Picks the plan for a detected session.
    pub fn for_session(session: &Session, arches: &[Arch]) -> Self {
        if session.is_matched() {
            ExecutionPlan::PerArch(arches.to_vec())
        } else {
            ExecutionPlan::Direct
        }
    }

    /// Target configurations in this plan; empty for a direct run.
    pub fn arches(&self) -> &[Arch] {
        match self {
            ExecutionPlan::Direct => &[],
            ExecutionPlan::PerArch(arches) => arches,
        }
    }

    /// Expands the plan into concrete steps.
    pub fn steps(&self, config: &LaunchConfig, forwarded: &[OsString]) -> Vec<Step> {
        match self {
            ExecutionPlan::Direct => vec![Step::Run {
                arch: None,
                invocation: Invocation::direct(&config.tool, forwarded),
            }],
            ExecutionPlan::PerArch(arches) => arches
                .iter()
                .flat_map(|&arch| {
                    [
                        Step::ClearCache {
                            dir: config.cache_dir.clone(),
                        },
                        Step::ListCache {
                            dir: config.cache_dir.clone(),
                        },
                        Step::Run {
                            arch: Some(arch),
                            invocation: Invocation::login_shell(
                                &config.shell,
                                &config.tool,
                                &config.marker_var,
                                arch,
                                forwarded,
                            ),
                        },
                    ]
                })
                .collect(),
        }
    }
}
