use super::App;
use crate::store::RemoveOutcome;
use crate::ui;
use anyhow::Result;

pub fn execute(app: &App, name: &str) -> Result<()> {
    match app.store.remove(name)? {
        RemoveOutcome::Removed(_) => ui::success("Removed", format!("environment '{name}'")),
        RemoveOutcome::NotFound => ui::warn(format!("Environment '{name}' not found.")),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RecordingRunner;
    use crate::settings::Settings;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_rm_missing_is_ok() {
        let temp = TempDir::new().unwrap();
        let app = App::with_runner(
            Settings::isolated(temp.path()),
            Box::new(RecordingRunner::new()),
        );
        app.store.ensure().unwrap();

        execute(&app, "nope").unwrap();
    }

    #[test]
    fn test_rm_deletes_tree() {
        let temp = TempDir::new().unwrap();
        let app = App::with_runner(
            Settings::isolated(temp.path()),
            Box::new(RecordingRunner::new()),
        );
        app.store.ensure().unwrap();
        let lib = app.store.env_dir("old").join("lib/python3/site-packages");
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("mod.py"), "").unwrap();

        execute(&app, "old").unwrap();

        assert!(!app.store.env_dir("old").exists());
    }
}
