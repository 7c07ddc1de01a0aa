//! # List Command Implementation
//!
//! Prints the collected modules in collection order: every module after the
//! modules it imports, with the project last.
//!
//! - **Plain output**: one module per line with version, markers and
//!   directory.
//! - **Active only**: `--active` hides disabled modules.
//! - **JSON output**: `--json` prints the modules as a JSON array.
//!
//! Version-compatibility warnings are printed to stderr after the listing.

use anyhow::Result;
use clap::Args;

use site_modules::module::Module;
use site_modules::output::{module_label, styled, OutputConfig, Tone};

use super::SourceArgs;

/// List the collected modules
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only show modules that are not disabled.
    #[arg(long)]
    pub active: bool,

    /// Print the modules as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the `list` command.
pub fn execute(args: ListArgs, source: &SourceArgs, output: &OutputConfig) -> Result<()> {
    let collected = super::collect(source)?;
    let modules = if args.active {
        &collected.active_modules
    } else {
        &collected.all_modules
    };

    if args.json {
        println!("{}", render_json(modules)?);
    } else {
        for line in render_lines(modules, output) {
            println!("{}", line);
        }
    }

    for warning in &collected.warnings {
        eprintln!("{} {}", styled(output, "warning:", Tone::Warn), warning);
    }
    Ok(())
}

/// One line per module: label followed by its directory.
pub fn render_lines(modules: &[Module], output: &OutputConfig) -> Vec<String> {
    modules
        .iter()
        .map(|module| {
            format!(
                "{} {}",
                module_label(output, module),
                styled(output, module.dir.display(), Tone::Muted)
            )
        })
        .collect()
}

pub fn render_json(modules: &[Module]) -> Result<String> {
    Ok(serde_json::to_string_pretty(modules)?)
}
