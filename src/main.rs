//! # usamplex Entry Point
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Initialize stderr logging (env_logger)
//!   └─> Run the extraction and map the outcome to an exit code
//! ```
//!
//! ```bash
//! usamplex -f emails.txt -n 100 -x picked.txt -r rest.txt -e test example.com
//! usamplex -f inventory.xlsx -n 20 -x picked.csv -r rest.csv -d -v
//! ```
//!
//! Exit codes: `0` success, `2` unreadable input, `3` undecodable text,
//! `4` unparseable spreadsheet, `5` not enough unique records, `6` output not
//! writable, `64` invalid configuration.

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use anyhow::{Context as _, Result};
use clap::Parser as _;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();

    usamplex::logging::init(cli.verbose).context("Failed to initialize logging")?;

    Ok(cli::run(&cli))
}
