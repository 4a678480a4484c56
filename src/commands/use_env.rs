use super::App;
use crate::launcher::ActivatedShell;
use crate::ui;
use anyhow::Result;

pub fn execute(app: &App, name: &str) -> Result<()> {
    let Some(shell) = ActivatedShell::prepare(&app.settings, &app.store, name)? else {
        ui::warn(format!("Environment '{name}' does not exist."));
        return Ok(());
    };

    ui::status("Spawning", format!("shell for environment '{name}'..."));
    let status = shell.run(app.runner.as_ref())?;
    tracing::debug!(env = name, %status, "activated shell exited");
    Ok(())
}
