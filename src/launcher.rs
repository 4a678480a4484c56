use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::process::{Invocation, ProcessRunner, RunStatus};
use crate::settings::Settings;
use crate::store::Store;

/// Profile files sourced before activation, relative to `$HOME`
const PROFILE_FILES: &[&str] = &[".profile", ".bash_profile", ".zshrc"];

/// Interpreter for the bootstrap script, which is plain POSIX `sh`
const BOOTSTRAP_SHELL: &str = "/bin/sh";

/// Quote a path for POSIX `sh` using single quotes
fn quote(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', r"'\''"))
}

/// Build the bootstrap script for an activated subshell
///
/// Profile files are sourced best-effort so the spawned shell keeps the
/// user's usual setup, then the environment is activated and the script
/// replaces itself with an interactive login shell.
pub fn activation_script(home: &Path, activate: &Path, shell: &Path) -> String {
    let mut script = String::from("#!/bin/sh\n");
    for name in PROFILE_FILES {
        let file = quote(&home.join(name));
        script.push_str(&format!(
            "[ -f {file} ] && . {file} >/dev/null 2>&1 || true\n"
        ));
    }
    script.push_str(&format!(". {}\n", quote(activate)));
    script.push_str(&format!("exec {} -i -l\n", quote(shell)));
    script
}

/// A bootstrap script for one environment, written and ready to run
///
/// The temporary file is removed once the shell exits, or on drop if it
/// never runs.
pub struct ActivatedShell {
    script: NamedTempFile,
}

impl ActivatedShell {
    /// Write the bootstrap script for `name`
    ///
    /// Returns `None` when the environment has no activation script.
    pub fn prepare(settings: &Settings, store: &Store, name: &str) -> Result<Option<Self>> {
        let Some(activate) = store.find_activation_script(name) else {
            return Ok(None);
        };

        let contents = activation_script(&settings.home, &activate, &settings.shell);
        let mut script = tempfile::Builder::new()
            .prefix("refract-")
            .suffix(".sh")
            .tempfile()
            .context("Failed to create temporary activation script")?;
        script
            .write_all(contents.as_bytes())
            .and_then(|_| script.flush())
            .with_context(|| format!("Failed to write activation script {:?}", script.path()))?;

        tracing::debug!(env = name, script = ?script.path(), "prepared activation script");
        Ok(Some(Self { script }))
    }

    pub fn script_path(&self) -> &Path {
        self.script.path()
    }

    /// Run the bootstrap and block until the user's shell exits
    ///
    /// Only the child sees the activation; this process's environment is
    /// left alone.
    pub fn run(self, runner: &dyn ProcessRunner) -> Result<RunStatus> {
        let status = runner.run(&Invocation::new(BOOTSTRAP_SHELL).arg(self.script.path()))?;

        if let Err(err) = self.script.close() {
            tracing::debug!(error = %err, "could not remove activation script");
        }
        Ok(status)
    }
}
