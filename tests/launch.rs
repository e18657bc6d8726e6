//! End-to-end launches of the `styrene-launch` binary.
//!
//! `/bin/sh` stands in for both the login shell and the bundler. The fake
//! bundler logs its environment and arguments, then drops a package into the
//! cache so the next architecture's clear has something to remove.

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

const FAKE_BUNDLER: &str = r#"
{
  printf 'run MSYSTEM=%s CHERE=%s cache=%s\n' "${MSYSTEM:-unset}" "${CHERE_INVOKING:-unset}" "$(ls -A "$CACHE" | wc -l | tr -d ' ')"
  for a in "$@"; do printf 'arg[%s]\n' "$a"; done
} >> "$TOOL_LOG"
touch "$CACHE/pkg-$$.pkg.tar.xz"
if [ -n "$TOOL_SIGNAL" ]; then kill -"$TOOL_SIGNAL" $$; fi
exit "${TOOL_EXIT:-0}"
"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self::with_tool("/bin/sh")
    }

    fn with_tool(program: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg/stale.pkg.tar.xz"), b"stale").unwrap();
        fs::write(dir.path().join("bundler.sh"), FAKE_BUNDLER).unwrap();

        let config = format!(
            "cache_dir = '{cache}'\n\
             colour = 'no'\n\
             \n\
             [shell]\n\
             program = '/bin/sh'\n\
             args = ['-c']\n\
             \n\
             [tool]\n\
             program = '{program}'\n\
             args = ['{script}']\n",
            cache = dir.path().join("pkg").display(),
            script = dir.path().join("bundler.sh").display(),
        );
        fs::write(dir.path().join("launch.toml"), config).unwrap();

        Self { dir }
    }

    fn cache(&self) -> PathBuf {
        self.dir.path().join("pkg")
    }

    fn log_path(&self) -> PathBuf {
        self.dir.path().join("tool.log")
    }

    fn log(&self) -> String {
        fs::read_to_string(self.log_path()).unwrap_or_default()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("styrene-launch").unwrap();
        cmd.env("STYRENE_LAUNCH_CONFIG", self.dir.path().join("launch.toml"))
            .env("TOOL_LOG", self.log_path())
            .env("CACHE", self.cache())
            .env("NO_COLOR", "1")
            .env_remove("CHERE_INVOKING")
            .env_remove("TOOL_EXIT")
            .env_remove("TOOL_SIGNAL")
            .env_remove("STYRENE_COLOUR")
            .env_remove("RUST_LOG");
        cmd
    }

    fn runs(&self) -> Vec<String> {
        self.log()
            .lines()
            .filter(|l| l.starts_with("run "))
            .map(str::to_string)
            .collect()
    }
}

fn count_entries(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

const FORWARDED: [&str; 6] = ["--help", "--", "-o", "out dir", "$HOME", "gimp.cfg"];

fn expected_args() -> String {
    FORWARDED.iter().map(|a| format!("arg[{a}]\n")).collect()
}

#[test]
fn msys_session_bundles_both_arches_in_order() {
    let fx = Fixture::new();

    fx.command()
        .env("MSYSTEM", "MSYS")
        .args(FORWARDED)
        .assert()
        .success()
        .stderr(predicate::str::contains("Bundling for MINGW32"))
        .stderr(predicate::str::contains("Bundling for MINGW64"));

    assert_eq!(
        fx.runs(),
        [
            "run MSYSTEM=MINGW32 CHERE=1 cache=0",
            "run MSYSTEM=MINGW64 CHERE=1 cache=0",
        ]
    );

    let log = fx.log();
    let expected = expected_args();
    assert_eq!(log.matches(expected.as_str()).count(), 2);

    // The last architecture's package is left behind; the stale one is gone
    assert!(!fx.cache().join("stale.pkg.tar.xz").exists());
    assert_eq!(count_entries(&fx.cache()), 1);
}

#[test]
fn other_session_runs_bundler_once_directly() {
    let fx = Fixture::new();

    fx.command()
        .env("MSYSTEM", "MINGW64")
        .args(FORWARDED)
        .assert()
        .success()
        .stderr(predicate::str::contains("Bundling for").not());

    assert_eq!(fx.runs(), ["run MSYSTEM=MINGW64 CHERE=unset cache=1"]);
    assert!(fx.log().ends_with(&expected_args()));
    assert!(fx.cache().join("stale.pkg.tar.xz").exists());
}

#[test]
fn unset_marker_runs_bundler_once_directly() {
    let fx = Fixture::new();

    fx.command()
        .env_remove("MSYSTEM")
        .arg("spec.cfg")
        .assert()
        .success();

    assert_eq!(fx.runs(), ["run MSYSTEM=unset CHERE=unset cache=1"]);
    assert!(fx.cache().join("stale.pkg.tar.xz").exists());
}

#[test]
fn failing_arch_stops_the_launch_with_its_exit_code() {
    let fx = Fixture::new();

    fx.command()
        .env("MSYSTEM", "MSYS")
        .env("TOOL_EXIT", "4")
        .arg("spec.cfg")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Command failed"))
        .stderr(predicate::str::contains("Bundling for MINGW64").not());

    assert_eq!(fx.runs(), ["run MSYSTEM=MINGW32 CHERE=1 cache=0"]);
}

#[test]
fn direct_exit_code_is_passed_through() {
    let fx = Fixture::new();

    fx.command()
        .env_remove("MSYSTEM")
        .env("TOOL_EXIT", "3")
        .assert()
        .code(3);
}

#[test]
fn missing_bundler_is_reported() {
    let fx = Fixture::with_tool("styrene-launch-missing-python");

    fx.command()
        .env_remove("MSYSTEM")
        .arg("spec.cfg")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Program not found"));

    assert!(fx.runs().is_empty());
}

#[test]
fn invalid_config_is_reported() {
    let fx = Fixture::new();
    fs::write(fx.dir.path().join("launch.toml"), "arches = ['ucrt64']\n").unwrap();

    fx.command()
        .env("MSYSTEM", "MSYS")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));

    assert!(fx.runs().is_empty());
    assert!(fx.cache().join("stale.pkg.tar.xz").exists());
}

#[test]
fn bundler_killed_by_signal_exits_like_a_shell() {
    let fx = Fixture::new();

    fx.command()
        .env_remove("MSYSTEM")
        .env("TOOL_SIGNAL", "TERM")
        .arg("spec.cfg")
        .assert()
        .code(143)
        .stderr(predicate::str::contains("Command failed"));

    assert_eq!(fx.runs().len(), 1);
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn colour_env_overrides_config_file() {
    let fx = Fixture::new();

    let output = fx
        .command()
        .env_remove("NO_COLOR")
        .env("STYRENE_COLOUR", "yes")
        .env("MSYSTEM", "MSYS")
        .arg("spec.cfg")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stderr_of(&output).contains("\x1b["));
}

#[test]
fn no_color_beats_requested_colour() {
    let fx = Fixture::new();

    let output = fx
        .command()
        .env("NO_COLOR", "1")
        .env("STYRENE_COLOUR", "yes")
        .env("MSYSTEM", "MSYS")
        .arg("spec.cfg")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("Bundling for MINGW32"));
    assert!(!stderr.contains("\x1b["));
}

#[cfg(target_os = "linux")]
#[test]
fn user_config_dir_is_used_without_explicit_config() {
    let fx = Fixture::new();
    let xdg = TempDir::new().unwrap();
    fs::create_dir(xdg.path().join("styrene")).unwrap();
    fs::copy(
        fx.dir.path().join("launch.toml"),
        xdg.path().join("styrene/launch.toml"),
    )
    .unwrap();

    fx.command()
        .env_remove("STYRENE_LAUNCH_CONFIG")
        .env("XDG_CONFIG_HOME", xdg.path())
        .env("MSYSTEM", "MSYS")
        .arg("spec.cfg")
        .assert()
        .success();

    assert_eq!(fx.runs().len(), 2);
}
