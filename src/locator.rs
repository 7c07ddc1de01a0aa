//! # Module Location
//!
//! Turns a single [`Import`] into a [`Module`] by trying a fixed chain of
//! resolution strategies and stopping at the first one that yields a
//! directory:
//!
//! 1. **Vendor** - the importing module tree's `_vendor/modules.txt`.
//! 2. **Package index** - modules the package manager has already resolved.
//! 3. **Fetch** - ask the package manager to download the module, re-list,
//!    and look it up once more.
//! 4. **Themes directory** - `<themesDir>/<import path>` on disk.
//!
//! Once located, the module's configuration is read (unless the import says
//! to ignore it) and its mounts are normalized.

use std::path::PathBuf;

use log::{debug, warn};

use crate::collector::Collector;
use crate::config::Import;
use crate::error::{Error, Result};
use crate::manifest::collect_vendored;
use crate::module::{Module, OwnerRef};
use crate::mounts::apply_mounts;
use crate::path::{is_probably_module, join_under, with_trailing_separator};
use crate::theme::apply_theme_config;
use crate::toolchain::{PackageModule, ToolchainStatus};

/// A way of finding a module's directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Vendor,
    PackageIndex,
    Fetch,
    ThemesDir,
}

/// Strategies in the order they are tried.
pub const STRATEGIES: [Strategy; 4] = [
    Strategy::Vendor,
    Strategy::PackageIndex,
    Strategy::Fetch,
    Strategy::ThemesDir,
];

/// Where a module was found
#[derive(Debug, Clone)]
pub struct Located {
    pub dir: PathBuf,
    pub strategy: Strategy,
    /// The importer, or the owner of the vendor snapshot the module came from.
    pub owner: OwnerRef,
    pub version: Option<String>,
    pub package: Option<PackageModule>,
}

impl Located {
    fn new(dir: PathBuf, strategy: Strategy, owner: &OwnerRef) -> Self {
        Self {
            dir,
            strategy,
            owner: owner.clone(),
            version: None,
            package: None,
        }
    }

    fn from_package(package: &PackageModule, strategy: Strategy, owner: &OwnerRef) -> Self {
        Self {
            dir: package.dir.clone(),
            strategy,
            owner: owner.clone(),
            version: package.version.clone(),
            package: Some(package.clone()),
        }
    }
}

impl Collector<'_> {
    /// Locate the module imported by `owner` and fully prepare it.
    pub(crate) fn locate(&mut self, owner: &OwnerRef, import: &Import, disabled: bool) -> Result<Module> {
        let located = self.resolve(owner, import)?;

        if !self.client.fs.exists(&located.dir) {
            return Err(self.module_not_found(
                &import.path,
                format!("{:?} does not exist", located.dir),
            ));
        }

        let path = match &located.package {
            Some(package) => package.path.clone(),
            None => import.path.clone(),
        };

        let mut module = Module {
            path,
            dir: with_trailing_separator(located.dir),
            owner: Some(located.owner),
            version: located.version,
            vendored: located.strategy == Strategy::Vendor,
            disabled,
            is_project: false,
            config_file: None,
            config: Default::default(),
            mounts: Vec::new(),
            package: located.package,
        };

        if !import.ignore_config {
            apply_theme_config(self.client.fs.as_ref(), self.client.decoder.as_ref(), &mut module)?;
        }
        apply_mounts(self.client.fs.as_ref(), &import.mounts, &mut module)?;

        Ok(module)
    }

    /// Run the strategy chain for one import.
    pub(crate) fn resolve(&mut self, owner: &OwnerRef, import: &Import) -> Result<Located> {
        for strategy in STRATEGIES {
            if let Some(located) = self.try_strategy(strategy, owner, &import.path)? {
                debug!(
                    "Located {} via {:?} at {}",
                    import.path,
                    strategy,
                    located.dir.display()
                );
                return Ok(located);
            }
        }

        Err(self.module_not_found(
            &import.path,
            format!(
                "either add it as a module or store it in {:?}",
                self.client.options.themes_dir
            ),
        ))
    }

    fn try_strategy(&mut self, strategy: Strategy, owner: &OwnerRef, path: &str) -> Result<Option<Located>> {
        match strategy {
            Strategy::Vendor => self.from_vendor(owner, path),
            Strategy::PackageIndex => Ok(self.from_package_index(owner, path)),
            Strategy::Fetch => self.from_fetch(owner, path),
            Strategy::ThemesDir => Ok(self.from_themes_dir(owner, path)),
        }
    }

    fn from_vendor(&mut self, owner: &OwnerRef, path: &str) -> Result<Option<Located>> {
        if self.client.options.ignore_vendor {
            return Ok(None);
        }

        if self.manifests_read.insert(owner.dir.clone()) {
            collect_vendored(self.client.fs.as_ref(), owner, &mut self.vendored)?;
        }

        let vendored = match self.vendored.get(path) {
            Some(vendored) => vendored,
            None => return Ok(None),
        };

        if vendored.owner.is_project {
            // The project's vendor snapshot must stay byte-for-byte intact.
            self.skip_sync = true;
        }

        let mut located = Located::new(vendored.dir.clone(), Strategy::Vendor, &vendored.owner);
        located.version = Some(vendored.version.clone());
        Ok(Some(located))
    }

    fn from_package_index(&self, owner: &OwnerRef, path: &str) -> Option<Located> {
        self.package_index
            .get_by_path(path)
            .filter(|package| !package.dir.as_os_str().is_empty())
            .map(|package| Located::from_package(package, Strategy::PackageIndex, owner))
    }

    fn from_fetch(&mut self, owner: &OwnerRef, path: &str) -> Result<Option<Located>> {
        if self.package_manifest.is_none() || !is_probably_module(path) {
            return Ok(None);
        }

        if let Err(e) = self.client.packages.fetch(path) {
            if self.toolchain_status() == ToolchainStatus::Ok {
                return Err(e);
            }
            // Without a usable toolchain the not-found diagnostic explains more.
            warn!("Could not fetch {}: {}", path, e);
            return Ok(None);
        }
        self.load_package_index()?;

        Ok(self
            .from_package_index(owner, path)
            .map(|mut located| {
                located.strategy = Strategy::Fetch;
                located
            }))
    }

    fn from_themes_dir(&self, owner: &OwnerRef, path: &str) -> Option<Located> {
        let dir = join_under(&self.client.options.themes_dir, path);
        self.client
            .fs
            .exists(&dir)
            .then(|| Located::new(dir, Strategy::ThemesDir, owner))
    }

    /// Build a `ModuleNotFound` error, with a toolchain hint when the project
    /// has a package manifest that could not be used.
    pub(crate) fn module_not_found(&mut self, path: &str, message: String) -> Error {
        let hint = match &self.package_manifest {
            Some(manifest) => {
                let name = manifest
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let base = format!("we found a {} file in your project, but", name);
                match self.toolchain_status() {
                    ToolchainStatus::NotFound => Some(format!(
                        "{} you need to install Go to use it. See https://golang.org/dl/.",
                        base
                    )),
                    ToolchainStatus::TooOld => Some(format!(
                        "{} you need a newer version of Go to use it. See https://golang.org/dl/.",
                        base
                    )),
                    ToolchainStatus::Ok => None,
                }
            }
            None => None,
        };

        Error::ModuleNotFound {
            path: path.to_string(),
            message,
            hint,
        }
    }
}
