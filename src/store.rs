use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::name::{EnvName, NameError};
use crate::process::{Invocation, ProcessRunner, RunStatus};

const ENVS_DIR: &str = "envs";
const CONFIG_FILE: &str = "refract.json";
const ACTIVATE_SCRIPT: &str = "bin/activate";

/// Store path types
#[derive(Debug, Clone, Copy)]
pub enum StorePath {
    /// Store root: $REFRACT_HOME or ~/.refract
    Root,
    /// Environments directory: root/envs
    Envs,
    /// Config file: root/refract.json
    Config,
}

/// Result of `Store::create`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    AlreadyExists,
    InvalidName(NameError),
    ProvisionFailed(RunStatus),
}

/// Result of `Store::remove`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(PathBuf),
    NotFound,
}

/// Environment store - one directory per named virtualenv
///
/// All state lives on disk; a `Store` is just the resolved root.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get path for a specific store location
    pub fn path(&self, path_type: StorePath) -> PathBuf {
        match path_type {
            StorePath::Root => self.root.clone(),
            StorePath::Envs => self.root.join(ENVS_DIR),
            StorePath::Config => self.root.join(CONFIG_FILE),
        }
    }

    /// Directory for an environment named `name` (validated or not)
    pub fn env_dir(&self, name: &str) -> PathBuf {
        self.path(StorePath::Envs).join(name)
    }

    pub fn activation_script(&self, name: &EnvName) -> PathBuf {
        self.env_dir(name.as_str()).join(ACTIVATE_SCRIPT)
    }

    /// Create the envs directory and default config if missing
    pub fn ensure(&self) -> Result<()> {
        let envs = self.path(StorePath::Envs);
        fs::create_dir_all(&envs)
            .with_context(|| format!("Failed to create store directory {:?}", envs))?;

        if Config::ensure(&self.path(StorePath::Config))? {
            tracing::debug!(root = ?self.root, "initialized refract config");
        }
        Ok(())
    }

    /// Names of all environments, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let envs = self.path(StorePath::Envs);
        if !envs.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&envs)
            .with_context(|| format!("Failed to read store directory {:?}", envs))?
        {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    /// Check that `name` is free and a valid identifier, in that order
    pub fn check_new(&self, name: &str) -> std::result::Result<EnvName, InitOutcome> {
        if self.env_dir(name).exists() {
            return Err(InitOutcome::AlreadyExists);
        }
        EnvName::parse(name).map_err(InitOutcome::InvalidName)
    }

    /// Provision a new environment with `<python> -m venv <dir>`
    ///
    /// The existence check runs before name validation, and neither is
    /// guarded against a concurrent `refract init` of the same name.
    pub fn create(
        &self,
        runner: &dyn ProcessRunner,
        python: &OsStr,
        name: &str,
    ) -> Result<InitOutcome> {
        let name = match self.check_new(name) {
            Ok(name) => name,
            Err(rejected) => return Ok(rejected),
        };

        let env_dir = self.env_dir(name.as_str());
        let invocation = Invocation::new(python)
            .arg("-m")
            .arg("venv")
            .arg(&env_dir);
        tracing::debug!(env = %name, %invocation, "provisioning environment");

        let status = runner.run(&invocation)?;
        if !status.success() {
            tracing::warn!(env = %name, %status, "provisioning failed");
            return Ok(InitOutcome::ProvisionFailed(status));
        }

        Ok(InitOutcome::Created(env_dir))
    }

    /// Recursively delete an environment
    ///
    /// Names that are not identifiers are treated as missing so nothing
    /// outside the envs directory can be removed.
    pub fn remove(&self, name: &str) -> Result<RemoveOutcome> {
        let Ok(name) = EnvName::parse(name) else {
            return Ok(RemoveOutcome::NotFound);
        };

        let env_dir = self.env_dir(name.as_str());
        if !env_dir.is_dir() {
            return Ok(RemoveOutcome::NotFound);
        }

        fs::remove_dir_all(&env_dir)
            .with_context(|| format!("Failed to remove environment {:?}", env_dir))?;
        tracing::debug!(env = %name, "removed environment");
        Ok(RemoveOutcome::Removed(env_dir))
    }

    /// Activation script for `name`, if the environment exists
    pub fn find_activation_script(&self, name: &str) -> Option<PathBuf> {
        let name = EnvName::parse(name).ok()?;
        let script = self.activation_script(&name);
        script.is_file().then_some(script)
    }
}
