//! # Package-Manager Integration
//!
//! Modules that are not vendored or stored under the themes directory are
//! resolved through the host package manager. The collector talks to it only
//! through the [`PackageManager`] trait:
//!
//! - **Index**: `list` returns every module the package manager has resolved,
//!   with its on-disk directory. The collector re-lists after a fetch.
//! - **Fetch**: `fetch` downloads a module into the package manager's cache.
//! - **Sync**: `sync` reconciles the project's manifest with the collected
//!   module list once collection succeeds.
//!
//! [`GoToolchain`] implements this with the system `go` binary, the same way
//! repositories elsewhere are driven through the `git` binary: plain
//! `std::process::Command` invocations in the project's working directory.
//! [`NoPackageManager`] is used for projects that do not use one.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};
use semver::Version;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::module::Module;
use crate::version::parse_lenient;

/// Name of the package-manager manifest in the project directory.
pub const MANIFEST_FILENAME: &str = "go.mod";

/// Name of the package-manager checksum file in the project directory.
pub const CHECKSUM_FILENAME: &str = "go.sum";

/// Oldest toolchain that supports modules.
pub const MIN_TOOLCHAIN_VERSION: Version = Version::new(1, 12, 0);

/// A module as reported by the package manager
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageModule {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Version", default)]
    pub version: Option<String>,
    /// Empty until the module has been downloaded.
    #[serde(rename = "Dir", default)]
    pub dir: PathBuf,
    #[serde(rename = "Main", default)]
    pub main: bool,
}

/// Raw `go list -m -json` entry, including replacements
#[derive(Debug, Deserialize)]
struct ListEntry {
    #[serde(flatten)]
    module: PackageModule,
    #[serde(rename = "Replace", default)]
    replace: Option<PackageModule>,
}

/// Lookup over the modules the package manager has resolved
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    modules: Vec<PackageModule>,
}

impl PackageIndex {
    pub fn new(modules: Vec<PackageModule>) -> Self {
        Self { modules }
    }

    /// Find a module by path, ignoring case.
    pub fn get_by_path(&self, path: &str) -> Option<&PackageModule> {
        self.modules
            .iter()
            .find(|m| m.path.eq_ignore_ascii_case(path))
    }

    /// The project's own module, if the package manager reports one.
    pub fn main(&self) -> Option<&PackageModule> {
        self.modules.iter().find(|m| m.main)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Availability of the package-manager binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainStatus {
    Ok,
    NotFound,
    TooOld,
}

/// Trait for package-manager operations - allows mocking in tests
pub trait PackageManager: Send + Sync {
    /// Path of the project's package manifest, if the project has one.
    ///
    /// Without a manifest no package-manager resolution is attempted.
    fn manifest_path(&self) -> Option<PathBuf>;

    /// Whether the package-manager binary is installed and recent enough.
    fn toolchain_status(&self) -> ToolchainStatus;

    /// List all modules the package manager has resolved.
    fn list(&self) -> Result<Vec<PackageModule>>;

    /// Download a module into the package manager's cache.
    fn fetch(&self, path: &str) -> Result<()>;

    /// Reconcile the project's manifest with the collected modules.
    ///
    /// With `write_full_manifest` the checksum file is rewritten too.
    fn sync(&self, modules: &[Module], write_full_manifest: bool) -> Result<()>;
}

/// Package manager for projects that do not use one
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPackageManager;

impl PackageManager for NoPackageManager {
    fn manifest_path(&self) -> Option<PathBuf> {
        None
    }

    fn toolchain_status(&self) -> ToolchainStatus {
        ToolchainStatus::Ok
    }

    fn list(&self) -> Result<Vec<PackageModule>> {
        Ok(Vec::new())
    }

    fn fetch(&self, path: &str) -> Result<()> {
        Err(Error::FetchFailed {
            path: path.to_string(),
            message: "no package manager configured".to_string(),
        })
    }

    fn sync(&self, _modules: &[Module], _write_full_manifest: bool) -> Result<()> {
        Ok(())
    }
}

/// The default implementation of `PackageManager`, which runs the system
/// `go` command in the project directory.
#[derive(Debug, Clone)]
pub struct GoToolchain {
    working_dir: PathBuf,
    binary: String,
}

impl GoToolchain {
    pub fn new(working_dir: PathBuf) -> Self {
        Self {
            working_dir,
            binary: "go".to_string(),
        }
    }

    /// Use a different binary, e.g. a wrapper script.
    pub fn with_binary(mut self, binary: &str) -> Self {
        self.binary = binary.to_string();
        self
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let command = format!("{} {}", self.binary, args.join(" "));
        debug!("Running {}", command);

        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.working_dir)
            .output()
            .map_err(|e| Error::Toolchain {
                command: command.clone(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::Toolchain {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

impl PackageManager for GoToolchain {
    fn manifest_path(&self) -> Option<PathBuf> {
        let manifest = self.working_dir.join(MANIFEST_FILENAME);
        manifest.is_file().then_some(manifest)
    }

    fn toolchain_status(&self) -> ToolchainStatus {
        match self.run(&["version"]) {
            Ok(stdout) => status_from_version_output(&String::from_utf8_lossy(&stdout)),
            Err(_) => ToolchainStatus::NotFound,
        }
    }

    fn list(&self) -> Result<Vec<PackageModule>> {
        let stdout = self.run(&["list", "-m", "-json", "all"])?;
        parse_list_output(&stdout)
    }

    fn fetch(&self, path: &str) -> Result<()> {
        info!("Fetching module {}", path);
        self.run(&["get", path]).map(|_| ()).map_err(|e| match e {
            Error::Toolchain { stderr, .. } => Error::FetchFailed {
                path: path.to_string(),
                message: stderr,
            },
            other => other,
        })
    }

    fn sync(&self, modules: &[Module], write_full_manifest: bool) -> Result<()> {
        if self.manifest_path().is_none() {
            return Ok(());
        }

        let keep = required_versions(modules);
        let mut files = vec![MANIFEST_FILENAME];
        if write_full_manifest {
            files.push(CHECKSUM_FILENAME);
        }

        for name in files {
            rewrite_file(&self.working_dir.join(name), &keep)?;
        }
        Ok(())
    }
}

fn rewrite_file(file: &Path, keep: &HashSet<String>) -> Result<()> {
    let content = match fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    let rewritten = if file.ends_with(CHECKSUM_FILENAME) {
        rewrite_checksums(&content, keep)
    } else {
        rewrite_requires(&content, keep)
    };

    if let Some(rewritten) = rewritten {
        debug!("Rewriting {}", file.display());
        fs::write(file, rewritten).map_err(|e| Error::SyncFailed {
            message: format!("{}: {}", file.display(), e),
        })?;
    }
    Ok(())
}

/// `"path version"` pairs of every collected package-manager module except
/// the project itself.
fn required_versions(modules: &[Module]) -> HashSet<String> {
    modules
        .iter()
        .filter(|m| m.owner.is_some())
        .filter_map(|m| m.package.as_ref())
        .filter_map(|p| p.version.as_ref().map(|v| format!("{} {}", p.path, v)))
        .collect()
}

/// Drop `require` entries whose module is not in `keep`.
///
/// Returns `None` when nothing changes.
pub fn rewrite_requires(content: &str, keep: &HashSet<String>) -> Option<String> {
    let mut out = String::with_capacity(content.len());
    let mut in_block = false;
    let mut dirty = false;

    for line in content.lines() {
        let trimmed = line.trim();
        let entry = if in_block {
            if trimmed == ")" {
                in_block = false;
                None
            } else {
                Some(trimmed)
            }
        } else if trimmed == "require (" {
            in_block = true;
            None
        } else {
            trimmed.strip_prefix("require ")
        };

        let keep_line = match entry {
            Some(entry) => {
                let fields: Vec<&str> = entry.split_whitespace().collect();
                if fields.len() >= 2 && !fields[0].starts_with("//") {
                    keep.contains(&format!("{} {}", fields[0], fields[1]))
                } else {
                    true
                }
            }
            None => true,
        };

        if keep_line {
            out.push_str(line);
            out.push('\n');
        } else {
            dirty = true;
        }
    }

    dirty.then_some(out)
}

/// Drop checksum lines for modules not in `keep`.
///
/// Returns `None` when nothing changes.
pub fn rewrite_checksums(content: &str, keep: &HashSet<String>) -> Option<String> {
    let mut out = String::with_capacity(content.len());
    let mut dirty = false;

    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let keep_line = if fields.len() >= 2 {
            let version = fields[1]
                .strip_suffix(&format!("/{}", MANIFEST_FILENAME))
                .unwrap_or(fields[1]);
            keep.contains(&format!("{} {}", fields[0], version))
        } else {
            true
        };

        if keep_line {
            out.push_str(line);
            out.push('\n');
        } else {
            dirty = true;
        }
    }

    dirty.then_some(out)
}

/// Parse the concatenated JSON objects printed by `go list -m -json`.
pub fn parse_list_output(stdout: &[u8]) -> Result<Vec<PackageModule>> {
    serde_json::Deserializer::from_slice(stdout)
        .into_iter::<ListEntry>()
        .map(|entry| {
            let ListEntry { mut module, replace } = entry?;
            // The requirement keeps its own version; only the files move.
            if let Some(replace) = replace.filter(|r| !r.dir.as_os_str().is_empty()) {
                module.dir = replace.dir;
            }
            Ok(module)
        })
        .collect()
}

/// Classify `go version` output, e.g. `go version go1.21.3 linux/amd64`.
pub fn status_from_version_output(output: &str) -> ToolchainStatus {
    let version = output
        .split_whitespace()
        .find_map(|field| field.strip_prefix("go").filter(|v| v.starts_with(|c: char| c.is_ascii_digit())))
        .and_then(parse_lenient);

    match version {
        Some(version) if version < MIN_TOOLCHAIN_VERSION => ToolchainStatus::TooOld,
        // Unparsable versions such as development builds are assumed recent.
        _ => ToolchainStatus::Ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::OwnerRef;

    #[test]
    fn test_parse_list_output() {
        let stdout = br#"{
    "Path": "example.com/site",
    "Main": true,
    "Dir": "/site"
}
{
    "Path": "example.com/a",
    "Version": "v1.2.0",
    "Dir": "/cache/example.com/a@v1.2.0"
}
{
    "Path": "example.com/b",
    "Version": "v0.1.0",
    "Replace": {
        "Path": "../b",
        "Dir": "/work/b"
    }
}
"#;
        let modules = parse_list_output(stdout).unwrap();
        assert_eq!(modules.len(), 3);
        assert!(modules[0].main);
        assert_eq!(modules[1].version.as_deref(), Some("v1.2.0"));
        assert_eq!(modules[2].dir, PathBuf::from("/work/b"));
        assert_eq!(modules[2].version.as_deref(), Some("v0.1.0"));

        let index = PackageIndex::new(modules);
        assert_eq!(index.main().unwrap().path, "example.com/site");
        assert!(index.get_by_path("Example.com/A").is_some());
        assert!(index.get_by_path("example.com/c").is_none());
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_versioned_replacement_keeps_requirement() {
        let stdout = br#"{
    "Path": "example.com/b",
    "Version": "v0.1.0",
    "Replace": {
        "Path": "example.com/fork",
        "Version": "v0.2.0",
        "Dir": "/cache/example.com/fork@v0.2.0"
    }
}
"#;
        let modules = parse_list_output(stdout).unwrap();
        assert_eq!(modules[0].version.as_deref(), Some("v0.1.0"));
        assert_eq!(modules[0].dir, PathBuf::from("/cache/example.com/fork@v0.2.0"));

        let collected = Module {
            path: "example.com/b".to_string(),
            dir: modules[0].dir.clone(),
            owner: Some(OwnerRef {
                path: String::new(),
                dir: PathBuf::from("/site"),
                is_project: true,
            }),
            version: modules[0].version.clone(),
            vendored: false,
            disabled: false,
            is_project: false,
            config_file: None,
            config: Default::default(),
            mounts: Vec::new(),
            package: Some(modules[0].clone()),
        };
        let keep = required_versions(&[collected]);

        let content = "module example.com/site\n\nrequire example.com/b v0.1.0\n\nreplace example.com/b => example.com/fork v0.2.0\n";
        assert!(rewrite_requires(content, &keep).is_none());
    }

    #[test]
    fn test_parse_list_output_malformed() {
        assert!(parse_list_output(b"{\"Path\": ").is_err());
        assert!(parse_list_output(b"").unwrap().is_empty());
    }

    #[test]
    fn test_status_from_version_output() {
        assert_eq!(
            status_from_version_output("go version go1.21.3 linux/amd64"),
            ToolchainStatus::Ok
        );
        assert_eq!(
            status_from_version_output("go version go1.11 darwin/amd64"),
            ToolchainStatus::TooOld
        );
        assert_eq!(
            status_from_version_output("go version devel +abc123 linux/amd64"),
            ToolchainStatus::Ok
        );
    }

    #[test]
    fn test_rewrite_requires_drops_unused() {
        let content = "module example.com/site\n\ngo 1.21\n\nrequire (\n\texample.com/a v1.2.0\n\texample.com/old v0.1.0 // indirect\n)\n\nrequire example.com/single v0.3.0\n";
        let keep: HashSet<String> = ["example.com/a v1.2.0".to_string()].into_iter().collect();

        let rewritten = rewrite_requires(content, &keep).unwrap();
        assert!(rewritten.contains("module example.com/site"));
        assert!(rewritten.contains("example.com/a v1.2.0"));
        assert!(!rewritten.contains("example.com/old"));
        assert!(!rewritten.contains("example.com/single"));
        assert!(rewritten.contains("go 1.21"));
    }

    #[test]
    fn test_rewrite_requires_unchanged() {
        let content = "module example.com/site\n\nrequire example.com/a v1.2.0\n";
        let keep: HashSet<String> = ["example.com/a v1.2.0".to_string()].into_iter().collect();
        assert!(rewrite_requires(content, &keep).is_none());
    }

    #[test]
    fn test_rewrite_checksums() {
        let content = "example.com/a v1.2.0 h1:abc=\nexample.com/a v1.2.0/go.mod h1:def=\nexample.com/old v0.1.0 h1:ghi=\n";
        let keep: HashSet<String> = ["example.com/a v1.2.0".to_string()].into_iter().collect();

        let rewritten = rewrite_checksums(content, &keep).unwrap();
        assert_eq!(rewritten.lines().count(), 2);
        assert!(!rewritten.contains("example.com/old"));
    }

    #[test]
    fn test_no_package_manager() {
        let pm = NoPackageManager;
        assert!(pm.manifest_path().is_none());
        assert!(pm.list().unwrap().is_empty());
        assert!(matches!(
            pm.fetch("example.com/a"),
            Err(Error::FetchFailed { .. })
        ));
        assert!(pm.sync(&[], true).is_ok());
    }

    #[test]
    fn test_go_toolchain_without_manifest_skips_sync() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = GoToolchain::new(dir.path().to_path_buf());
        assert!(toolchain.manifest_path().is_none());
        assert!(toolchain.sync(&[], true).is_ok());
    }

    #[test]
    fn test_go_toolchain_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = GoToolchain::new(dir.path().to_path_buf())
            .with_binary("definitely-not-a-real-toolchain-binary");
        assert_eq!(toolchain.toolchain_status(), ToolchainStatus::NotFound);
        assert!(matches!(toolchain.list(), Err(Error::Toolchain { .. })));
        assert!(matches!(
            toolchain.fetch("example.com/a"),
            Err(Error::FetchFailed { .. })
        ));
    }
}
