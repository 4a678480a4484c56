use super::App;
use crate::environment::{self, Shell};
use crate::store::InitOutcome;
use crate::ui;
use anyhow::{bail, Result};

pub fn execute(app: &App, name: &str) -> Result<()> {
    if let Err(rejected) = app.store.check_new(name) {
        report_rejection(name, &rejected);
        return Ok(());
    }

    let progress = ui::Progress::start("Creating", format!("virtualenv '{name}'"));
    match app
        .store
        .create(app.runner.as_ref(), &app.settings.python, name)?
    {
        InitOutcome::Created(path) => {
            progress.finish("Created");
            ui::success("Ready", format!("new virtualenv at {}", path.display()));
            integrate_shell(app);
            Ok(())
        }
        InitOutcome::ProvisionFailed(status) => {
            progress.fail(status);
            bail!(
                "`{} -m venv {}` failed with {status}",
                app.settings.python.to_string_lossy(),
                app.store.env_dir(name).display()
            )
        }
        rejected => {
            report_rejection(name, &rejected);
            Ok(())
        }
    }
}

fn report_rejection(name: &str, outcome: &InitOutcome) {
    match outcome {
        InitOutcome::AlreadyExists => {
            ui::warn(format!("Environment '{name}' already exists."));
        }
        InitOutcome::InvalidName(err) => ui::warn(format!(
            "Environment name must be a valid identifier (no spaces or special characters): {err}"
        )),
        _ => {}
    }
}

/// Make sure the user's shell startup file puts the local bin dir on PATH
///
/// Failures only warn; the environment itself was already created.
fn integrate_shell(app: &App) {
    let shell = Shell::detect(&app.settings.shell);
    let rc_file = shell.rc_file(&app.settings.home);
    let line = environment::path_export_line(&app.settings.bin_dir);

    match environment::ensure_line(&rc_file, &line) {
        Ok(true) => ui::status("PATH", format!("added to {}", rc_file.display())),
        Ok(false) => {
            tracing::debug!(shell = shell.as_str(), file = ?rc_file, "PATH export already present")
        }
        Err(err) => {
            tracing::warn!(error = %err, "shell integration failed");
            ui::warn(format!("Could not update {}: {err:#}", rc_file.display()));
        }
    }
}
