//! `tbs env` command

use anyhow::{anyhow, Result};

use crate::cli::{EnvArgs, EnvCommands};
use tbs::util::config::{Env, DEFAULT_ENV_FILENAME};

pub fn execute(args: EnvArgs) -> Result<()> {
    let path = args
        .file
        .unwrap_or_else(|| DEFAULT_ENV_FILENAME.into());
    let mut env = Env::load(path)?;

    match args.command {
        EnvCommands::Show => {
            for (key, value) in &env {
                println!("{}={}", key, value);
            }
            return Ok(());
        }
        EnvCommands::Set { pairs } => {
            for pair in pairs {
                let (key, value) = parse_pair(&pair)?;
                env.insert(key, value);
            }
        }
        EnvCommands::Unset { keys } => {
            for key in keys {
                if env.remove(&key).is_none() {
                    tracing::warn!("env: '{}' is not set", key);
                }
            }
        }
        EnvCommands::Clear => env.clear(),
    }

    env.save()
}

fn parse_pair(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(anyhow!("invalid pair `{}`; expected key=value", pair)),
    }
}
