//! `tbs files` command

use anyhow::Result;

use crate::cli::FilesArgs;
use tbs::util::fs::files;

pub fn execute(args: FilesArgs) -> Result<()> {
    let mut found = files(&args.include, &args.exclude)?;
    found.sort();

    for file in found {
        println!("{}", file);
    }

    Ok(())
}
