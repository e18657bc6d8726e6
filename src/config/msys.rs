//! MSYS2 path translation.
//!
//! Under MSYS2 the launcher is a native Windows program, so a POSIX path such
//! as `/var/cache/pacman/pkg` has to be rooted at the MSYS2 installation
//! before the filesystem can find it.

use crate::config::CommandSpec;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// MSYS2 installation root for a shell that lives in `<root>/usr/bin`.
pub fn root_from_shell(shell: &Path) -> Option<PathBuf> {
    let bin = shell.parent()?;
    let usr = bin.parent()?;
    let named = |dir: &Path, name: &str| {
        dir.file_name()
            .is_some_and(|n| n.eq_ignore_ascii_case(OsStr::new(name)))
    };

    if named(bin, "bin") && named(usr, "usr") {
        usr.parent().map(Path::to_path_buf)
    } else {
        None
    }
}

/// Joins an absolute POSIX path onto an MSYS2 root.
pub fn under_root(root: &Path, posix: &str) -> PathBuf {
    posix
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Native form of `posix`, located through the configured login shell.
///
/// The root is derived from where the shell resolves on `PATH`; `cygpath -w`
/// is asked when the shell is not in the usual `<root>/usr/bin` place.
pub async fn native_path(shell: &CommandSpec, posix: &str) -> Option<PathBuf> {
    if let Some(root) = which::which(&shell.program)
        .ok()
        .and_then(|path| root_from_shell(&path))
    {
        return Some(under_root(&root, posix));
    }

    let output = Command::new("cygpath").arg("-w").arg(posix).output().await.ok()?;
    if !output.status.success() {
        log::debug!("cygpath -w {posix} failed with {}", output.status);
        return None;
    }

    let converted = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!converted.is_empty()).then(|| PathBuf::from(converted))
}
