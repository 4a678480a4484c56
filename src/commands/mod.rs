use crate::cli::{self, Commands, Dispatch, ParsedArgs};
use crate::process::{ProcessRunner, SystemRunner};
use crate::settings::Settings;
use crate::store::{Store, StorePath};
use crate::ui;
use anyhow::Result;

mod init;
mod install;
mod list;
mod rm;
mod use_env;

/// Everything a command needs: resolved settings, the store and a way to
/// run child processes
pub struct App {
    pub settings: Settings,
    pub store: Store,
    pub runner: Box<dyn ProcessRunner>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self::with_runner(settings, Box::new(SystemRunner))
    }

    pub fn with_runner(settings: Settings, runner: Box<dyn ProcessRunner>) -> Self {
        let store = Store::new(&settings.root);
        Self {
            settings,
            store,
            runner,
        }
    }
}

pub fn execute(args: ParsedArgs, app: &App) -> Result<()> {
    // The store and config are created before anything else, even when
    // only usage is printed.
    app.store.ensure()?;
    tracing::debug!(
        root = ?app.store.path(StorePath::Root),
        config = ?app.store.path(StorePath::Config),
        "store ready"
    );

    match args.dispatch {
        Dispatch::Run(command) => run(command, app),
        Dispatch::Usage => {
            println!("{}", cli::usage());
            Ok(())
        }
        Dispatch::Builtin(err) => {
            err.print()?;
            Ok(())
        }
        Dispatch::Invalid(err) => {
            tracing::debug!(error = %err.render(), "rejected command line");
            ui::error("Invalid command or missing arguments.");
            println!();
            println!("{}", cli::usage());
            Ok(())
        }
    }
}

pub fn run(command: Commands, app: &App) -> Result<()> {
    match command {
        Commands::List => list::execute(app),
        Commands::Init { name } => init::execute(app, &name),
        Commands::Use { name } => use_env::execute(app, &name),
        Commands::Rm { name } => rm::execute(app, &name),
        Commands::Install => install::execute(app),
    }
}
