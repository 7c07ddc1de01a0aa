//! # Module Collection
//!
//! This module provides the [`Client`], the entry point for resolving a
//! project's module-import graph into a flat, ordered list of modules.
//!
//! ## Design
//!
//! The `Client` owns three pluggable collaborators, each behind a trait so
//! tests can swap them out:
//!
//! - **[`Filesystem`]**: existence checks and file reads.
//! - **[`ConfigDecoder`]**: turns config file bytes into generic trees.
//! - **[`PackageManager`]**: lists, fetches and syncs package-manager modules.
//!
//! A single call to [`Client::collect`] creates a short-lived `Collector`
//! holding the traversal state (seen module keys, the vendor table, the
//! package index) and performs a depth-first walk starting at the project:
//!
//! 1.  Apply the project's mounts.
//! 2.  For each import, in declaration order, skip it if its path key was
//!     already seen, otherwise locate it, append it, and recurse into it.
//! 3.  Append the project module last.
//! 4.  Sync the package manifest, unless the project's vendor snapshot was
//!     used.
//! 5.  Warn about modules that declare an incompatible tool version.
//!
//! The resulting order places every importer before its imports, with the
//! project at the end.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use log::{debug, warn};
use semver::Version;

use crate::config::ModuleConfig;
use crate::decoder::{ConfigDecoder, DefaultDecoder};
use crate::error::{Error, Result};
use crate::filesystem::{Filesystem, OsFs};
use crate::module::{Module, Modules, ModulesConfig, VendoredModule};
use crate::mounts::apply_mounts;
use crate::path::path_key;
use crate::toolchain::{GoToolchain, PackageIndex, PackageManager, ToolchainStatus};
use crate::version;

/// Directory searched for modules that are neither vendored nor known to the
/// package manager.
pub const DEFAULT_THEMES_DIR: &str = "themes";

/// Options for a collection run
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The project directory.
    pub working_dir: PathBuf,
    /// Directory holding theme-style modules by import path.
    pub themes_dir: PathBuf,
    /// Ignore every `_vendor` snapshot.
    pub ignore_vendor: bool,
    /// Version of the running tool, checked against each module's bounds.
    pub tool_version: Version,
    /// The project's own configuration.
    pub project_config: ModuleConfig,
}

impl ClientOptions {
    pub fn new(working_dir: PathBuf) -> Self {
        Self {
            themes_dir: working_dir.join(DEFAULT_THEMES_DIR),
            working_dir,
            ignore_vendor: false,
            tool_version: version::current(),
            project_config: ModuleConfig::default(),
        }
    }

    pub fn with_themes_dir(mut self, themes_dir: PathBuf) -> Self {
        self.themes_dir = themes_dir;
        self
    }

    pub fn with_ignore_vendor(mut self, ignore_vendor: bool) -> Self {
        self.ignore_vendor = ignore_vendor;
        self
    }

    pub fn with_tool_version(mut self, tool_version: Version) -> Self {
        self.tool_version = tool_version;
        self
    }

    pub fn with_project_config(mut self, config: ModuleConfig) -> Self {
        self.project_config = config;
        self
    }
}

/// The main entry point for collecting modules.
pub struct Client {
    pub(crate) options: ClientOptions,
    pub(crate) fs: Box<dyn Filesystem>,
    pub(crate) decoder: Box<dyn ConfigDecoder>,
    pub(crate) packages: Box<dyn PackageManager>,
}

impl Client {
    /// Creates a client that reads the host filesystem and drives the system
    /// `go` binary in the working directory.
    pub fn new(options: ClientOptions) -> Self {
        let packages = GoToolchain::new(options.working_dir.clone());
        Self {
            options,
            fs: Box::new(OsFs),
            decoder: Box::new(DefaultDecoder),
            packages: Box::new(packages),
        }
    }

    /// Creates a client with custom collaborators, e.g. an in-memory
    /// filesystem and a mock package manager.
    pub fn with_operations(
        options: ClientOptions,
        fs: Box<dyn Filesystem>,
        decoder: Box<dyn ConfigDecoder>,
        packages: Box<dyn PackageManager>,
    ) -> Self {
        Self {
            options,
            fs,
            decoder,
            packages,
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Resolve the project's full module graph.
    ///
    /// Collection is all-or-nothing: any error aborts it and no partial
    /// result is returned.
    pub fn collect(&self) -> Result<ModulesConfig> {
        let mut collector = Collector::new(self);
        collector.init()?;
        collector.collect()?;
        Ok(collector.finish())
    }
}

/// Position of a module during the walk
#[derive(Debug, Clone, Copy)]
enum Slot {
    Project,
    Collected(usize),
}

/// Per-run traversal state
pub(crate) struct Collector<'a> {
    pub(crate) client: &'a Client,
    /// Path keys of every module seen so far.
    seen: HashSet<String>,
    /// Vendor entries by exact module path, first manifest wins.
    pub(crate) vendored: HashMap<String, VendoredModule>,
    /// Owner directories whose vendor manifest has been read.
    pub(crate) manifests_read: HashSet<PathBuf>,
    pub(crate) package_index: PackageIndex,
    pub(crate) package_manifest: Option<PathBuf>,
    toolchain: Option<ToolchainStatus>,
    project: Module,
    modules: Modules,
    pub(crate) skip_sync: bool,
    warnings: Vec<String>,
}

impl<'a> Collector<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        let project = Module::project(
            None,
            &client.options.working_dir,
            client.options.project_config.clone(),
        );
        Self {
            client,
            seen: HashSet::new(),
            vendored: HashMap::new(),
            manifests_read: HashSet::new(),
            package_index: PackageIndex::default(),
            package_manifest: None,
            toolchain: None,
            project,
            modules: Vec::new(),
            skip_sync: false,
            warnings: Vec::new(),
        }
    }

    /// Find the package manifest and load the package index.
    pub(crate) fn init(&mut self) -> Result<()> {
        self.package_manifest = self.client.packages.manifest_path();
        self.load_package_index()?;

        let main = self.package_index.main().cloned();
        self.project = Module::project(
            main.as_ref(),
            &self.client.options.working_dir,
            self.client.options.project_config.clone(),
        );
        Ok(())
    }

    /// (Re)load the package index. Without a package manifest it stays empty.
    pub(crate) fn load_package_index(&mut self) -> Result<()> {
        if self.package_manifest.is_none() {
            self.package_index = PackageIndex::default();
            return Ok(());
        }

        match self.client.packages.list() {
            Ok(modules) => {
                debug!("Package manager reports {} modules", modules.len());
                self.package_index = PackageIndex::new(modules);
                Ok(())
            }
            Err(e) if self.toolchain_status() != ToolchainStatus::Ok => {
                // Reported with a hint if a module cannot be found later.
                debug!("Package index unavailable: {}", e);
                self.package_index = PackageIndex::default();
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Toolchain status, queried at most once per run.
    pub(crate) fn toolchain_status(&mut self) -> ToolchainStatus {
        let packages = &self.client.packages;
        *self
            .toolchain
            .get_or_insert_with(|| packages.toolchain_status())
    }

    /// Walk the import graph starting at the project.
    pub(crate) fn collect(&mut self) -> Result<()> {
        apply_mounts(self.client.fs.as_ref(), &[], &mut self.project)?;
        self.walk(Slot::Project, false)?;

        let project = self.project.clone();
        self.modules.push(project);

        if !self.skip_sync {
            self.client
                .packages
                .sync(&self.modules, false)
                .map_err(|e| match e {
                    Error::SyncFailed { .. } => e,
                    other => Error::SyncFailed {
                        message: other.to_string(),
                    },
                })?;
        } else {
            debug!("Project is vendored; leaving the package manifest untouched");
        }

        self.check_tool_versions();
        Ok(())
    }

    fn module(&self, slot: Slot) -> &Module {
        match slot {
            Slot::Project => &self.project,
            Slot::Collected(idx) => &self.modules[idx],
        }
    }

    /// Depth-first walk over the imports of the module in `slot`.
    ///
    /// `disabled` is inherited by everything below a disabled import.
    fn walk(&mut self, slot: Slot, disabled: bool) -> Result<()> {
        let (owner, imports) = {
            let module = self.module(slot);
            (module.as_owner(), module.config.imports.clone())
        };

        for import in &imports {
            let disabled = disabled || import.disable;

            if !self.seen.insert(path_key(&import.path)) {
                debug!("Skipping already collected module {}", import.path);
                continue;
            }

            let module = self.locate(&owner, import, disabled)?;
            self.modules.push(module);
            self.walk(Slot::Collected(self.modules.len() - 1), disabled)?;
        }

        Ok(())
    }

    fn check_tool_versions(&mut self) {
        let current = &self.client.options.tool_version;
        for module in &self.modules {
            if module.config.tool_version.is_valid(current) {
                continue;
            }
            let message = format!(
                "Module {:?} is not compatible with this tool version ({}); run \"site-modules graph\" for more information.",
                module.display_path(),
                current
            );
            warn!("{}", message);
            self.warnings.push(message);
        }
    }

    fn finish(self) -> ModulesConfig {
        let active_modules = self
            .modules
            .iter()
            .filter(|m| !m.disabled)
            .cloned()
            .collect();

        ModulesConfig {
            all_modules: self.modules,
            active_modules,
            package_manifest: self.package_manifest,
            warnings: self.warnings,
        }
    }
}
