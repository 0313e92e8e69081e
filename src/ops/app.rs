//! Subcommand dispatch for build host programs.
//!
//! A host program is a small binary that declares its targets in Rust and
//! exposes a handful of subcommands (`configure`, `build`, `clean`, ...).
//! [`App`] wires those subcommands to handler functions, provides the
//! shared `-v <0..3>` verbosity flag and loads the persisted [`Env`]:
//!
//! ```no_run
//! use clap::{Arg, ArgMatches, Command};
//! use tbs::{App, Env, TargetGraph};
//!
//! fn configure(args: &ArgMatches, env: &mut Env) -> anyhow::Result<()> {
//!     tbs::need(["cc"], true)?;
//!     env.insert("cc", args.get_one::<String>("cc").unwrap().as_str());
//!     env.save()
//! }
//!
//! fn build(_: &ArgMatches, env: &mut Env) -> anyhow::Result<()> {
//!     let mut graph = TargetGraph::with_env(env.clone());
//!     graph.add_rule("app", "{cc} main.c -o app", ["main.c"])?;
//!     graph.build("app")?;
//!     Ok(())
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     App::new("build")
//!         .command(
//!             Command::new("configure").arg(Arg::new("cc").long("cc").default_value("cc")),
//!             configure,
//!         )
//!         .command(Command::new("build"), build)
//!         .run()
//! }
//! ```

use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

use crate::util::config::Env;
use crate::util::log::{self, Verbosity};

/// Subcommand handler.
pub type Handler = fn(&ArgMatches, &mut Env) -> Result<()>;

/// Result of dispatching one subcommand.
#[derive(Debug)]
pub enum Outcome {
    Succeeded { command: String },
    Failed { command: String, error: anyhow::Error },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }

    pub fn command(&self) -> &str {
        match self {
            Outcome::Succeeded { command } | Outcome::Failed { command, .. } => command,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Command-line front end for a build host program.
pub struct App {
    cli: Command,
    handlers: Vec<(String, Handler)>,
}

impl App {
    pub fn new(name: impl Into<String>) -> Self {
        let cli = Command::new(name.into())
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("verbose level")
                    .value_name("LEVEL")
                    .value_parser(clap::value_parser!(Verbosity))
                    .default_value("2")
                    .global(true),
            );

        App {
            cli,
            handlers: Vec::new(),
        }
    }

    /// Set the `about` text shown in `--help`.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.cli = self.cli.about(about.into());
        self
    }

    /// Register a subcommand and the handler it dispatches to.
    pub fn command(mut self, command: Command, handler: Handler) -> Self {
        let name = command.get_name().to_string();
        self.handlers.push((name, handler));
        self.cli = self.cli.subcommand(command);
        self
    }

    /// Parse arguments without running anything.
    pub fn try_parse_from<I, T>(&self, args: I) -> Result<ArgMatches, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.cli.clone().try_get_matches_from(args)
    }

    /// Verbosity selected on the command line.
    pub fn verbosity(matches: &ArgMatches) -> Verbosity {
        matches
            .get_one::<Verbosity>("verbose")
            .copied()
            .unwrap_or_default()
    }

    /// Run the subcommand selected in `matches` against `env`.
    ///
    /// Failures are logged as errors and returned in the outcome rather
    /// than propagated.
    pub fn dispatch(&self, matches: &ArgMatches, env: &mut Env) -> Outcome {
        let Some((name, sub)) = matches.subcommand() else {
            return Outcome::Failed {
                command: String::new(),
                error: anyhow::anyhow!("no command given"),
            };
        };

        let Some((_, handler)) = self.handlers.iter().find(|(n, _)| n == name) else {
            return Outcome::Failed {
                command: name.to_string(),
                error: anyhow::anyhow!("{}: no handler registered", name),
            };
        };

        match handler(sub, env) {
            Ok(()) => {
                tracing::info!("{}: succeeded", name);
                Outcome::Succeeded {
                    command: name.to_string(),
                }
            }
            Err(error) => {
                tracing::error!("{:#}", error);
                tracing::error!("{}: failed", name);
                Outcome::Failed {
                    command: name.to_string(),
                    error,
                }
            }
        }
    }

    /// Parse `args` and dispatch against `env`.
    pub fn run_from<I, T>(&self, args: I, env: &mut Env) -> Result<Outcome, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.try_parse_from(args)?;
        Ok(self.dispatch(&matches, env))
    }

    /// Entry point for `main`: parse process arguments, set up logging, load
    /// the env from [`Env::default_path`] and run the selected subcommand.
    pub fn run(self) -> ExitCode {
        let matches = self.cli.clone().get_matches();
        log::init(Self::verbosity(&matches));

        let mut env = match Env::load(Env::default_path()) {
            Ok(env) => env,
            Err(e) => {
                tracing::error!("{:#}", e);
                return ExitCode::FAILURE;
            }
        };

        self.dispatch(&matches, &mut env).exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configure(args: &ArgMatches, env: &mut Env) -> Result<()> {
        let arch = args.get_one::<String>("arch").cloned().unwrap_or_default();
        env.insert("arch", arch);
        Ok(())
    }

    fn build(_: &ArgMatches, env: &mut Env) -> Result<()> {
        if env.is_empty() {
            anyhow::bail!("build: not configured");
        }
        env.insert("built", "yes");
        Ok(())
    }

    fn app() -> App {
        App::new("host")
            .about("test host")
            .command(
                Command::new("configure")
                    .about("Configures build environment.")
                    .arg(Arg::new("arch").short('a').default_value("x86_64")),
                configure,
            )
            .command(Command::new("build"), build)
    }

    #[test]
    fn test_dispatch_runs_handler() {
        let mut env = Env::new();
        let outcome = app()
            .run_from(["host", "configure", "-a", "x86_64"], &mut env)
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.command(), "configure");
        assert_eq!(env.get("arch"), Some("x86_64"));
    }

    #[test]
    fn test_handler_error_is_reported() {
        let mut env = Env::new();
        let outcome = app().run_from(["host", "build"], &mut env).unwrap();

        match outcome {
            Outcome::Failed { command, error } => {
                assert_eq!(command, "build");
                assert_eq!(error.to_string(), "build: not configured");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_env_flows_between_commands() {
        let app = app();
        let mut env = Env::new();
        app.run_from(["host", "configure"], &mut env).unwrap();
        let outcome = app.run_from(["host", "build"], &mut env).unwrap();

        assert!(outcome.is_success());
        assert_eq!(env.get("built"), Some("yes"));
    }

    #[test]
    fn test_verbosity_flag() {
        let app = app();
        let matches = app.try_parse_from(["host", "-v", "3", "build"]).unwrap();
        assert_eq!(App::verbosity(&matches), Verbosity::NOTICE);

        let matches = app.try_parse_from(["host", "build"]).unwrap();
        assert_eq!(App::verbosity(&matches), Verbosity::INFO);
    }

    #[test]
    fn test_name_built_at_runtime() {
        let name = format!("{}-host", "kernel");
        let app = App::new(name).command(Command::new("build"), build);
        let mut env: Env = [("arch", "x86_64")].into_iter().collect();

        let outcome = app.run_from(["kernel-host", "build"], &mut env).unwrap();
        assert!(outcome.is_success());
        assert_eq!(app.cli.get_name(), "kernel-host");
    }

    #[test]
    fn test_invalid_verbosity_rejected() {
        assert!(app().try_parse_from(["host", "-v", "7", "build"]).is_err());
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(app().try_parse_from(["host", "deploy"]).is_err());
    }
}
