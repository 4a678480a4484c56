use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use std::ffi::OsString;

const DEBUG_FLAG: &str = "--debug";

const EXAMPLES: &str = "\
Examples:
  refract init myenv
  refract list
  refract use myenv
  refract rm myenv";

/// refract - Lightweight Virtualenv Manager
///
/// Environments live under $REFRACT_HOME/envs (default ~/.refract/envs).
/// Pass --debug anywhere on the command line to print the resolved home.
#[derive(Parser, Debug)]
#[command(name = "refract", author, version, about, long_about = None, after_help = EXAMPLES)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List all existing virtual environments
    List,

    /// Create a new virtual environment
    Init {
        /// Environment name (letters, digits and underscores)
        #[arg(value_name = "ENV_NAME")]
        name: String,
    },

    /// Spawn a shell with the specified environment activated
    Use {
        /// Environment to activate
        #[arg(value_name = "ENV_NAME")]
        name: String,
    },

    /// Delete the specified virtual environment
    Rm {
        /// Environment to delete
        #[arg(value_name = "ENV_NAME")]
        name: String,
    },

    /// Symlink refract into ~/.local/bin
    Install,
}

/// What the command line asked for
#[derive(Debug)]
pub enum Dispatch {
    Run(Commands),
    /// Nothing was requested; show usage
    Usage,
    /// Unknown command or wrong number of arguments
    Invalid(clap::Error),
    /// `--help` or `--version`
    Builtin(clap::Error),
}

#[derive(Debug)]
pub struct ParsedArgs {
    pub debug: bool,
    pub dispatch: Dispatch,
}

/// Parse process arguments (including argv[0])
///
/// `--debug` is accepted at any position and removed before clap sees the
/// rest, so it never counts towards a command's arguments.
pub fn parse<I, T>(args: I) -> ParsedArgs
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut debug = false;
    let args: Vec<OsString> = args
        .into_iter()
        .map(Into::into)
        .filter(|arg| {
            let is_debug = arg == DEBUG_FLAG;
            debug |= is_debug;
            !is_debug
        })
        .collect();

    let dispatch = if args.len() <= 1 {
        Dispatch::Usage
    } else {
        match Cli::try_parse_from(&args) {
            Ok(cli) => Dispatch::Run(cli.command),
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                Dispatch::Builtin(err)
            }
            Err(err) => Dispatch::Invalid(err),
        }
    };

    ParsedArgs { debug, dispatch }
}

/// Full usage text
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("refract")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    fn run(args: &[&str]) -> (bool, Option<Commands>) {
        let parsed = parse(argv(args));
        let command = match parsed.dispatch {
            Dispatch::Run(command) => Some(command),
            _ => None,
        };
        (parsed.debug, command)
    }

    #[rstest]
    #[case(&["list"], Commands::List)]
    #[case(&["init", "web"], Commands::Init { name: "web".into() })]
    #[case(&["use", "web"], Commands::Use { name: "web".into() })]
    #[case(&["rm", "web"], Commands::Rm { name: "web".into() })]
    #[case(&["install"], Commands::Install)]
    fn test_parse_commands(#[case] args: &[&str], #[case] expected: Commands) {
        assert_eq!(run(args), (false, Some(expected)));
    }

    #[rstest]
    #[case(&["--debug", "list"])]
    #[case(&["list", "--debug"])]
    fn test_debug_anywhere(#[case] args: &[&str]) {
        assert_eq!(run(args), (true, Some(Commands::List)));
    }

    #[test]
    fn test_debug_not_counted_as_argument() {
        assert_eq!(
            run(&["init", "--debug", "web"]),
            (true, Some(Commands::Init { name: "web".into() }))
        );
    }

    #[test]
    fn test_no_arguments_is_usage() {
        assert!(matches!(parse(argv(&[])).dispatch, Dispatch::Usage));
        let only_debug = parse(argv(&["--debug"]));
        assert!(only_debug.debug);
        assert!(matches!(only_debug.dispatch, Dispatch::Usage));
    }

    #[rstest]
    #[case(&["init"])]
    #[case(&["init", "a", "b"])]
    #[case(&["use"])]
    #[case(&["rm"])]
    #[case(&["list", "extra"])]
    #[case(&["frobnicate"])]
    fn test_invalid_invocations(#[case] args: &[&str]) {
        assert!(matches!(parse(argv(args)).dispatch, Dispatch::Invalid(_)));
    }

    #[test]
    fn test_help_is_builtin() {
        assert!(matches!(parse(argv(&["--help"])).dispatch, Dispatch::Builtin(_)));
    }

    #[test]
    fn test_usage_lists_commands() {
        let text = usage();
        for command in ["list", "init", "use", "rm", "install", "Examples:"] {
            assert!(text.contains(command), "usage missing {command}");
        }
    }
}
