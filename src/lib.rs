// Public API
pub mod cli;
pub mod commands;

// Core domain types
mod config;
mod environment;
mod installer;
mod launcher;
mod name;
mod process;
mod settings;
mod store;
mod ui;

// Re-export main types
pub use commands::App;
pub use config::Config;
pub use environment::{ensure_line, Shell};
pub use launcher::ActivatedShell;
pub use name::{EnvName, NameError};
pub use process::{Invocation, ProcessRunner, RecordingRunner, RunStatus, SystemRunner};
pub use settings::Settings;
pub use store::{InitOutcome, RemoveOutcome, Store, StorePath};
