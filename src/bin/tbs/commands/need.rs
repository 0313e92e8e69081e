//! `tbs need` command

use anyhow::Result;

use crate::cli::NeedArgs;
use tbs::ops::need::need;

pub fn execute(args: NeedArgs) -> Result<()> {
    let statuses = need(&args.tools, !args.optional)?;

    for status in statuses {
        match status.path {
            Some(path) => println!("{}: {}", status.tool, path),
            None => println!("{}: not found", status.tool),
        }
    }

    Ok(())
}
