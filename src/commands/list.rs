use super::App;
use crate::ui;
use anyhow::Result;

pub fn execute(app: &App) -> Result<()> {
    let names = app.store.list()?;
    if names.is_empty() {
        ui::info("No environments found. Use 'refract init <name>' to create one.");
    } else {
        println!("Available virtualenvs:");
        for name in names {
            println!("  * {name}");
        }
    }
    Ok(())
}
