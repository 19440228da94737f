//! Command-line interface of the `manage` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "manage", version, about = "Run the web API or apply SQL scripts to its database")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the REST API server
    StartWeb,
    /// Apply a SQL script file
    ApplySql {
        /// Path to an existing SQL file
        #[arg(value_parser = existing_file)]
        file_path: PathBuf,
    },
}

fn existing_file(raw: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(raw);
    if path.is_file() {
        Ok(path)
    } else if path.exists() {
        Err(format!("'{}' is not a file", raw))
    } else {
        Err(format!("'{}' does not exist", raw))
    }
}
