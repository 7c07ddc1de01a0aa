//! Collected modules and the result of a collection
//!
//! A [`Module`] is created once when it is located, completed by the
//! theme-config merger and mount normalizer, and then only read. Modules never
//! point at their children; the only link between them is the `owner`
//! back-reference, which is a lookup key and not an owning pointer.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{ModuleConfig, Mount};
use crate::toolchain::PackageModule;

/// Display name of the project pseudo-module when it has no path.
pub const PROJECT_NAME: &str = "project";

/// Identifies the module that imported (or vendored) another module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerRef {
    /// Module path of the owner (empty for a project without a package path).
    pub path: String,
    /// Directory of the owner.
    pub dir: PathBuf,
    /// Whether the owner is the project itself.
    pub is_project: bool,
}

/// A resolved module
#[derive(Debug, Clone, Serialize)]
pub struct Module {
    /// Module path; empty for a project that is not a package-manager module.
    pub path: String,
    /// Absolute directory, always ending with a separator for imported
    /// modules.
    pub dir: PathBuf,
    /// The module that imported this one, or the owner of the vendor snapshot
    /// it came from. `None` for the project.
    pub owner: Option<OwnerRef>,
    /// Resolved version, when known.
    pub version: Option<String>,
    /// Whether the module was taken from a vendor snapshot.
    pub vendored: bool,
    /// Whether the module, or one of its importers, is disabled.
    pub disabled: bool,
    /// Whether this is the project pseudo-module.
    pub is_project: bool,
    /// The config file the module's configuration was read from.
    pub config_file: Option<PathBuf>,
    /// Normalized configuration.
    pub config: ModuleConfig,
    /// Validated mounts.
    pub mounts: Vec<Mount>,
    /// Package-manager metadata, if resolved through the package manager.
    #[serde(skip)]
    pub package: Option<PackageModule>,
}

impl Module {
    /// Create the project pseudo-module rooted at `working_dir`.
    ///
    /// The project is never located: it always lives in the working
    /// directory. Its path is the package manager's main module path, if any.
    pub fn project(main: Option<&PackageModule>, working_dir: &Path, config: ModuleConfig) -> Self {
        Self {
            path: main.map(|m| m.path.clone()).unwrap_or_default(),
            dir: working_dir.to_path_buf(),
            owner: None,
            version: None,
            vendored: false,
            disabled: false,
            is_project: true,
            config_file: None,
            config,
            mounts: Vec::new(),
            package: main.cloned(),
        }
    }

    /// Name for messages: the path, or `project` for a pathless project.
    pub fn display_path(&self) -> &str {
        if self.path.is_empty() && self.is_project {
            PROJECT_NAME
        } else {
            &self.path
        }
    }

    /// Reference to this module for use as an owner.
    pub fn as_owner(&self) -> OwnerRef {
        OwnerRef {
            path: self.path.clone(),
            dir: self.dir.clone(),
            is_project: self.is_project,
        }
    }

    /// Whether this module came from the package manager's module graph.
    pub fn is_package_module(&self) -> bool {
        self.package.is_some()
    }
}

/// A vendor manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendoredModule {
    /// The module whose vendor snapshot supplied this entry.
    pub owner: OwnerRef,
    /// Directory inside the owner's vendor directory.
    pub dir: PathBuf,
    /// Version recorded in the manifest.
    pub version: String,
}

/// An ordered list of modules
pub type Modules = Vec<Module>;

/// Result of a successful collection
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModulesConfig {
    /// All modules in collection order, including disabled ones. The project
    /// module is last.
    pub all_modules: Modules,
    /// The modules that are not disabled, in the same order.
    pub active_modules: Modules,
    /// Path of the package-manager manifest, when the project has one.
    pub package_manifest: Option<PathBuf>,
    /// Non-fatal findings, such as version-incompatible modules.
    pub warnings: Vec<String>,
}

impl ModulesConfig {
    /// The project module, always the last collected module.
    pub fn project(&self) -> Option<&Module> {
        self.all_modules.last().filter(|m| m.is_project)
    }

    /// Find a collected module by path.
    pub fn get(&self, path: &str) -> Option<&Module> {
        self.all_modules.iter().find(|m| m.path == path)
    }

    /// Find the collected module that owns `module`.
    pub fn owner_of(&self, module: &Module) -> Option<&Module> {
        let owner = module.owner.as_ref()?;
        self.all_modules
            .iter()
            .find(|m| m.dir == owner.dir && m.is_project == owner.is_project)
    }

    /// Modules owned directly by `owner`, in collection order.
    pub fn children_of<'a>(&'a self, owner: &'a Module) -> impl Iterator<Item = &'a Module> + 'a {
        self.all_modules.iter().filter(move |m| {
            m.owner
                .as_ref()
                .is_some_and(|o| o.dir == owner.dir && o.is_project == owner.is_project)
        })
    }
}
