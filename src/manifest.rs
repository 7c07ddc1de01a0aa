//! Vendor manifest reading
//!
//! A vendored module tree keeps a frozen copy of its dependencies in a
//! `_vendor` directory, described by `_vendor/modules.txt`:
//!
//! ```text
//! # github.com/user/theme v1.2.0
//! # github.com/user/component v0.3.1
//! ```
//!
//! Each line names a module path and its version. Comment markers and
//! surrounding whitespace are stripped; every remaining line must have
//! exactly two fields.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::filesystem::Filesystem;
use crate::module::{OwnerRef, VendoredModule};

/// Name of the vendor directory inside a module.
pub const VENDOR_DIR: &str = "_vendor";

/// Name of the manifest inside the vendor directory.
pub const VENDOR_MANIFEST: &str = "modules.txt";

/// One line of a vendor manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub path: String,
    pub version: String,
}

/// Location of the vendor manifest for a module rooted at `module_dir`.
pub fn manifest_path(module_dir: &Path) -> PathBuf {
    module_dir.join(VENDOR_DIR).join(VENDOR_MANIFEST)
}

/// Parse manifest content. `file` is only used for error reporting.
pub fn parse_manifest(content: &str, file: &Path) -> Result<Vec<ManifestEntry>> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| {
            let line = line.trim_matches(|c: char| c == '#' || c == ' ').trim();
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [path, version] => Ok(ManifestEntry {
                    path: path.to_string(),
                    version: version.to_string(),
                }),
                _ => Err(Error::MalformedManifest {
                    file: file.to_path_buf(),
                    line: idx + 1,
                }),
            }
        })
        .collect()
}

/// Read the vendor manifest of the module rooted at `module_dir`.
///
/// Returns `Ok(None)` when the module has no manifest.
pub fn read_manifest(fs: &dyn Filesystem, module_dir: &Path) -> Result<Option<Vec<ManifestEntry>>> {
    let file = manifest_path(module_dir);
    let data = match fs.read(&file) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    parse_manifest(&String::from_utf8_lossy(&data), &file).map(Some)
}

/// Record the vendored modules listed by `owner`'s manifest.
///
/// Paths already present in `vendored` keep their first entry: the top-most
/// manifest in the module tree wins.
pub fn collect_vendored(
    fs: &dyn Filesystem,
    owner: &OwnerRef,
    vendored: &mut HashMap<String, VendoredModule>,
) -> Result<()> {
    let entries = match read_manifest(fs, &owner.dir)? {
        Some(entries) => entries,
        None => return Ok(()),
    };

    let vendor_dir = owner.dir.join(VENDOR_DIR);
    for entry in entries {
        if vendored.contains_key(&entry.path) {
            continue;
        }
        debug!("Vendored module {} {} from {}", entry.path, entry.version, vendor_dir.display());
        vendored.insert(
            entry.path.clone(),
            VendoredModule {
                owner: owner.clone(),
                dir: vendor_dir.join(&entry.path),
                version: entry.version,
            },
        );
    }
    Ok(())
}
