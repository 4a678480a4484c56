use anyhow::Result;
use refract::cli;
use refract::commands;
use refract::{App, Settings};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = cli::parse(std::env::args_os());

    // --debug wins over RUST_LOG
    let env_filter = if args.debug {
        EnvFilter::new("refract=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("refract=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from_env()?;
    if args.debug {
        println!("[DEBUG] REFRACT_HOME is set to: {}", settings.root.display());
    }

    let app = App::new(settings);
    commands::execute(args, &app)
}
