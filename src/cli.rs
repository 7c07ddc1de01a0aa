//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use site_modules::output::OutputConfig;

/// Site Modules - Resolve the module-import graph of a site project
#[derive(Parser, Debug)]
#[command(name = "site-modules")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    source: commands::SourceArgs,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "info",
        env = "SITE_MODULES_LOG"
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the collected modules, importers before their imports
    List(commands::list::ListArgs),

    /// Show which module imports which
    Graph(commands::graph::GraphArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::List(args) => commands::list::execute(args, &self.source, &output),
            Commands::Graph(args) => commands::graph::execute(args, &self.source, &output),
        }
    }
}

/// Route `log` records to stderr, filtered by `level` (e.g. `debug` or
/// `site_modules=trace`). `RUST_LOG` takes precedence when set.
fn init_logging(level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.format_timestamp(None).format_target(false).init();
}
