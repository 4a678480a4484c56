use anyhow::{Context, Result};
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of `ensure_symlink`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Created { link: PathBuf, target: PathBuf },
    AlreadyLinked(PathBuf),
}

/// Link `<bin_dir>/<name>` to `target`
///
/// A link that already resolves is left untouched; a broken link or a
/// plain file in its place is replaced.
pub fn ensure_symlink(bin_dir: &Path, name: &str, target: &Path) -> Result<LinkOutcome> {
    fs::create_dir_all(bin_dir)
        .with_context(|| format!("Failed to create bin directory {:?}", bin_dir))?;

    let link = bin_dir.join(name);
    let is_symlink = link
        .symlink_metadata()
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);

    if is_symlink && link.exists() {
        return Ok(LinkOutcome::AlreadyLinked(link));
    }

    if link.symlink_metadata().is_ok() {
        fs::remove_file(&link)
            .with_context(|| format!("Failed to remove stale file {:?}", link))?;
    }

    symlink(target, &link)
        .with_context(|| format!("Failed to create symlink {:?}", link))?;

    Ok(LinkOutcome::Created {
        link,
        target: target.to_path_buf(),
    })
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn symlink(_target: &Path, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "symlink installation is only supported on Unix",
    ))
}

/// Whether `dir` is one of the entries in a PATH-style value
pub fn dir_on_path(dir: &Path, path_var: Option<&OsStr>) -> bool {
    path_var
        .map(|value| env::split_paths(value).any(|entry| entry == dir))
        .unwrap_or(false)
}

/// Whether the error chain bottoms out in a permission error
pub fn is_permission_denied(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
        .any(|io| io.kind() == std::io::ErrorKind::PermissionDenied)
}
