//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tbs::util::log::Verbosity;

/// tbs - a tiny make-like build engine
#[derive(Parser)]
#[command(name = "tbs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose level (0 = errors only, 3 = everything)
    #[arg(short, long, global = true, default_value = "2", value_name = "LEVEL")]
    pub verbose: Verbosity,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or edit a persisted build env
    Env(EnvArgs),

    /// Check that tools are available on PATH
    Need(NeedArgs),

    /// List files matching glob patterns
    Files(FilesArgs),
}

#[derive(Args)]
pub struct EnvArgs {
    /// Env file (defaults to .tbs.env)
    #[arg(short, long, env = "TBS_ENV_FILE")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: EnvCommands,
}

#[derive(Subcommand)]
pub enum EnvCommands {
    /// Print every key=value pair
    Show,

    /// Set one or more key=value pairs
    Set {
        /// Pairs in key=value form
        #[arg(required = true)]
        pairs: Vec<String>,
    },

    /// Remove keys
    Unset {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Remove every key (deletes the env file)
    Clear,
}

#[derive(Args)]
pub struct NeedArgs {
    /// Tools to look up
    #[arg(required = true)]
    pub tools: Vec<String>,

    /// Warn about missing tools instead of failing
    #[arg(long)]
    pub optional: bool,
}

#[derive(Args)]
pub struct FilesArgs {
    /// Glob patterns to include
    #[arg(required = true)]
    pub include: Vec<String>,

    /// Glob patterns to exclude
    #[arg(short = 'x', long)]
    pub exclude: Vec<String>,
}
