use anyhow::{Context, Result};
use std::cell::RefCell;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::process::Command;

/// A program plus its arguments, ready to be spawned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Exit status of a finished child process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    /// `None` when the child was terminated by a signal
    pub code: Option<i32>,
}

impl RunStatus {
    pub fn success(self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// Runs a child process to completion
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunStatus>;
}

/// Spawns real processes with inherited stdio
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunStatus> {
        tracing::debug!(%invocation, "spawning process");
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
            .with_context(|| format!("Failed to run `{}`", invocation))?;
        tracing::debug!(?status, "process exited");
        Ok(RunStatus {
            code: status.code(),
        })
    }
}

type Hook = Box<dyn Fn(&Invocation) -> Result<()>>;

/// Records invocations instead of spawning them
///
/// An optional hook runs for every invocation so callers can simulate the
/// side effects of the real program.
pub struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    status: RunStatus,
    hook: Option<Hook>,
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            status: RunStatus { code: Some(0) },
            hook: None,
        }
    }

    pub fn with_status(mut self, code: Option<i32>) -> Self {
        self.status = RunStatus { code };
        self
    }

    pub fn with_hook(mut self, hook: impl Fn(&Invocation) -> Result<()> + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunStatus> {
        self.calls.borrow_mut().push(invocation.clone());
        if let Some(hook) = &self.hook {
            hook(invocation)?;
        }
        Ok(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display() {
        let invocation = Invocation::new("python3").arg("-m").arg("venv").arg("/tmp/env");
        assert_eq!(invocation.to_string(), "python3 -m venv /tmp/env");
    }

    #[test]
    fn test_run_status_success() {
        assert!(RunStatus { code: Some(0) }.success());
        assert!(!RunStatus { code: Some(1) }.success());
        assert!(!RunStatus { code: None }.success());
    }

    #[test]
    #[cfg(unix)]
    fn test_system_runner_reports_exit_code() {
        let runner = SystemRunner;
        let ok = runner.run(&Invocation::new("sh").arg("-c").arg("exit 0")).unwrap();
        let failed = runner.run(&Invocation::new("sh").arg("-c").arg("exit 3")).unwrap();

        assert!(ok.success());
        assert_eq!(failed.code, Some(3));
    }

    #[test]
    fn test_system_runner_missing_program() {
        let err = SystemRunner
            .run(&Invocation::new("refract-definitely-not-a-program"))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to run"));
    }

    #[test]
    fn test_recording_runner_records_and_hooks() {
        let runner = RecordingRunner::new()
            .with_status(Some(2))
            .with_hook(|invocation| {
                assert_eq!(invocation.program, OsString::from("tool"));
                Ok(())
            });

        let status = runner.run(&Invocation::new("tool").arg("x")).unwrap();

        assert_eq!(status.code, Some(2));
        assert_eq!(runner.calls(), vec![Invocation::new("tool").arg("x")]);
    }
}
