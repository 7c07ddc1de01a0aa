//! # Site Modules CLI
//!
//! Binary entry point for the `site-modules` command-line tool. It parses
//! arguments with `clap`, runs the requested command, and lets `anyhow`
//! report failures.
//!
//! The collection logic lives in the `site_modules` library; the binary only
//! wires it to the terminal.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
