//! Mount validation and normalization
//!
//! A mount maps a directory inside a module onto one of the fixed component
//! folders of the site. Mounts are resolved in this order:
//!
//! 1. Mounts given explicitly on the import.
//! 2. Mounts declared in the module's own configuration.
//! 3. For imported modules only: one mount per component folder that exists
//!    in the module.
//!
//! Mounts whose source is missing are dropped silently. Empty fields and
//! targets outside the component folders are errors.

use crate::config::Mount;
use crate::error::{Error, Result};
use crate::filesystem::Filesystem;
use crate::module::Module;
use crate::path::{clean_str, first_segment, join_under};

/// Folders a mount target may start with.
pub const COMPONENT_FOLDERS: &[&str] = &[
    "archetypes",
    "static",
    "layouts",
    "content",
    "data",
    "i18n",
    "assets",
];

/// Returns whether `name` is one of the component folders.
pub fn is_component_folder(name: &str) -> bool {
    COMPONENT_FOLDERS.contains(&name)
}

/// One identity mount for every component folder present in `module`.
pub fn default_mounts(fs: &dyn Filesystem, module: &Module) -> Vec<Mount> {
    COMPONENT_FOLDERS
        .iter()
        .filter(|folder| fs.exists(&module.dir.join(folder)))
        .map(|folder| Mount::new(folder, folder))
        .collect()
}

/// Validate and clean `mounts` for `module`.
pub fn normalize_mounts(fs: &dyn Filesystem, module: &Module, mounts: &[Mount]) -> Result<Vec<Mount>> {
    let mut out = Vec::with_capacity(mounts.len());

    for mount in mounts {
        if mount.source.is_empty() || mount.target.is_empty() {
            return Err(Error::InvalidMountConfig {
                module: module.display_path().to_string(),
            });
        }

        let source = clean_str(&mount.source);
        let target = clean_str(&mount.target);

        if !fs.exists(&join_under(&module.dir, &source)) {
            continue;
        }

        if !is_component_folder(first_segment(&target)) {
            return Err(Error::InvalidMountTarget {
                module: module.display_path().to_string(),
                target,
                valid: COMPONENT_FOLDERS.iter().map(|f| f.to_string()).collect(),
            });
        }

        out.push(Mount { source, target });
    }

    Ok(out)
}

/// Resolve, validate and store the mounts of `module`.
///
/// `import_mounts` are the explicit mounts of the import that brought the
/// module in; they take precedence over everything else.
pub fn apply_mounts(fs: &dyn Filesystem, import_mounts: &[Mount], module: &mut Module) -> Result<()> {
    let mounts = if !import_mounts.is_empty() {
        import_mounts.to_vec()
    } else if !module.config.mounts.is_empty() {
        module.config.mounts.clone()
    } else if module.is_project {
        Vec::new()
    } else {
        default_mounts(fs, module)
    };

    module.mounts = normalize_mounts(fs, module, &mounts)?;
    Ok(())
}
