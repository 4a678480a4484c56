use anyhow::{Context, Result};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const DEFAULT_PYTHON: &str = "python3";
const DEFAULT_SHELL: &str = "/bin/sh";

/// Runtime settings resolved once at process start
///
/// Every operation receives these explicitly instead of reading globals,
/// so tests can point a whole run at a temporary root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Store root: $REFRACT_HOME or ~/.refract
    pub root: PathBuf,
    /// The user's home directory (rc files and profiles live here)
    pub home: PathBuf,
    /// Local bin directory used for the self-install symlink
    pub bin_dir: PathBuf,
    /// Interpreter used to provision environments (`<python> -m venv`)
    pub python: OsString,
    /// The user's login shell
    pub shell: PathBuf,
}

impl Settings {
    /// Resolve settings from the process environment
    ///
    /// - `REFRACT_HOME` overrides the store root (tilde is expanded)
    /// - `REFRACT_PYTHON` overrides the provisioning interpreter
    /// - `SHELL` selects the shell used by `use` and for rc detection
    pub fn from_env() -> Result<Self> {
        let home = home_dir()?;
        let root = match env::var("REFRACT_HOME") {
            Ok(value) if !value.trim().is_empty() => {
                PathBuf::from(shellexpand::tilde(value.trim()).into_owned())
            }
            _ => default_root(&home),
        };

        let python = env::var_os("REFRACT_PYTHON")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| OsString::from(DEFAULT_PYTHON));

        let shell = env::var_os("SHELL")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SHELL));

        Ok(Self {
            bin_dir: bin_dir(&home),
            root,
            home,
            python,
            shell,
        })
    }

    /// Settings rooted entirely inside `base` (used by tests)
    pub fn isolated(base: &Path) -> Self {
        let home = base.join("home");
        Self {
            root: base.join(".refract"),
            bin_dir: bin_dir(&home),
            home,
            python: OsString::from(DEFAULT_PYTHON),
            shell: PathBuf::from("/bin/bash"),
        }
    }
}

/// Get the home directory
pub fn home_dir() -> Result<PathBuf> {
    directories::BaseDirs::new()
        .context("Failed to get home directory")
        .map(|bd| bd.home_dir().to_path_buf())
}

/// Default store root
///
/// Returns `~/.refract`
pub fn default_root(home: &Path) -> PathBuf {
    home.join(".refract")
}

/// Get the user's local bin directory
///
/// Returns `~/.local/bin`
pub fn bin_dir(home: &Path) -> PathBuf {
    home.join(".local/bin")
}
