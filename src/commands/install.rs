use super::App;
use crate::installer::{self, LinkOutcome};
use crate::ui;
use anyhow::{Context, Result};
use std::env;

const LINK_NAME: &str = "refract";

/// Best-effort self-install into the local bin directory
///
/// Never fails the command: problems are reported as warnings.
pub fn execute(app: &App) -> Result<()> {
    let bin_dir = &app.settings.bin_dir;

    let linked = env::current_exe()
        .context("Failed to resolve the running executable")
        .and_then(|exe| installer::ensure_symlink(bin_dir, LINK_NAME, &exe));

    match linked {
        Ok(LinkOutcome::Created { link, target }) => ui::success(
            "Linked",
            format!("Symlink created: {} → {}", link.display(), target.display()),
        ),
        Ok(LinkOutcome::AlreadyLinked(link)) => {
            ui::info(format!("{} is already installed", link.display()))
        }
        Err(err) if installer::is_permission_denied(&err) => ui::warn(format!(
            "Permission denied creating symlink at {}.",
            bin_dir.join(LINK_NAME).display()
        )),
        Err(err) => ui::warn(format!("Could not create symlink: {err:#}")),
    }

    if !installer::dir_on_path(bin_dir, env::var_os("PATH").as_deref()) {
        ui::warn(format!(
            "{} is not in your PATH. Add it to run 'refract' globally.",
            bin_dir.display()
        ));
    }

    Ok(())
}
