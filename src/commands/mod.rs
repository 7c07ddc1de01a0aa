//! # CLI Command Implementations
//!
//! Each subcommand lives in its own file with an `Args` struct derived with
//! `clap` and an `execute` function. Both commands run the same collection,
//! configured by the global [`SourceArgs`], and differ only in how they print
//! the result.

pub mod graph;
pub mod list;

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use site_modules::collector::{Client, ClientOptions};
use site_modules::config::load_project_config;
use site_modules::decoder::DefaultDecoder;
use site_modules::filesystem::OsFs;
use site_modules::module::ModulesConfig;
use site_modules::suggestions;

/// Where and how to collect modules
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// The project directory.
    ///
    /// Defaults to the current directory. Can also be set with the
    /// `SITE_MODULES_SOURCE` environment variable.
    #[arg(long, global = true, value_name = "DIR", env = "SITE_MODULES_SOURCE")]
    pub source: Option<PathBuf>,

    /// Directory holding theme modules by name.
    ///
    /// Relative paths are resolved against the project directory. Defaults to
    /// `<source>/themes`.
    #[arg(long, global = true, value_name = "DIR", env = "SITE_MODULES_THEMES_DIR")]
    pub themes_dir: Option<PathBuf>,

    /// Ignore `_vendor` directories and resolve every module afresh.
    #[arg(long, global = true, env = "SITE_MODULES_IGNORE_VENDOR")]
    pub ignore_vendor: bool,
}

impl SourceArgs {
    /// Build client options, reading the project's config file.
    pub fn client_options(&self) -> Result<ClientOptions> {
        let working_dir = match &self.source {
            Some(dir) => std::path::absolute(dir)
                .with_context(|| format!("Invalid source directory {}", dir.display()))?,
            None => std::env::current_dir().context("Failed to get current directory")?,
        };

        if !working_dir.is_dir() {
            anyhow::bail!(
                "Source directory not found: {}\n\n\
                 hint: Use --source to point at your site project",
                working_dir.display()
            );
        }

        let (project_config, config_file) = load_project_config(&OsFs, &DefaultDecoder, &working_dir)?;
        match &config_file {
            Some(file) => log::debug!("Using project config {}", file.display()),
            None => log::debug!("No project config in {}", working_dir.display()),
        }

        let mut options = ClientOptions::new(working_dir)
            .with_ignore_vendor(self.ignore_vendor)
            .with_project_config(project_config);
        if let Some(themes_dir) = &self.themes_dir {
            let themes_dir = options.working_dir.join(themes_dir);
            options = options.with_themes_dir(themes_dir);
        }
        Ok(options)
    }
}

/// Run a full collection for the project described by `source`.
pub fn collect(source: &SourceArgs) -> Result<ModulesConfig> {
    let client = Client::new(source.client_options()?);
    client
        .collect()
        .map_err(|e| suggestions::explain(e, client.options()))
}
