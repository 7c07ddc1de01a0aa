//! # Module Configuration Schema and Decoding
//!
//! This module defines the normalized per-module configuration and the logic
//! that turns a decoded key-value tree into it.
//!
//! ## Schema
//!
//! Keys are matched case-insensitively. A module configuration file looks like:
//!
//! ```toml
//! theme = ["legacy-theme"]
//!
//! [params]
//! color = "red"
//!
//! [module]
//! [module.toolVersion]
//! min = "0.55.0"
//!
//! [[module.imports]]
//! path = "github.com/user/component"
//! disable = false
//! ignoreConfig = false
//!
//! [[module.mounts]]
//! source = "assets/scss"
//! target = "assets/scss"
//! ```
//!
//! Entries in the legacy top-level `theme` key (a string or a list) are
//! appended to the imports declared under `module.imports`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::decoder::{lowercase_keys, ConfigDecoder, Format, CONFIG_EXTENSIONS};
use crate::error::{Error, Result};
use crate::filesystem::Filesystem;
use crate::version::ToolVersion;

/// Base name of a module's configuration file, without extension.
pub const CONFIG_BASENAME: &str = "config";

/// A source directory in a module mapped onto a component folder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    /// Directory relative to the module root.
    #[serde(default)]
    pub source: String,
    /// Destination path; its first segment must be a component folder.
    #[serde(default)]
    pub target: String,
}

impl Mount {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// A dependency declared by one module on another
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// Module path, e.g. `github.com/user/theme` or a directory name under
    /// the themes directory.
    #[serde(default)]
    pub path: String,
    /// Explicit mounts that replace the imported module's own.
    #[serde(default)]
    pub mounts: Vec<Mount>,
    /// Disable the module and everything it imports.
    #[serde(default)]
    pub disable: bool,
    /// Skip reading the imported module's configuration files.
    #[serde(default, rename = "ignoreconfig")]
    pub ignore_config: bool,
}

impl Import {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Default::default()
        }
    }
}

/// Normalized configuration of a single module
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModuleConfig {
    /// Imports in declaration order.
    pub imports: Vec<Import>,
    /// Explicitly declared mounts.
    pub mounts: Vec<Mount>,
    /// Compatible tool versions.
    pub tool_version: ToolVersion,
    /// Free-form parameters.
    pub params: Map<String, Value>,
}

/// The `[module]` section as it appears in a config file
#[derive(Debug, Default, Deserialize)]
struct ModuleSection {
    #[serde(default)]
    imports: Vec<Import>,
    #[serde(default)]
    mounts: Vec<Mount>,
    #[serde(default, rename = "toolversion")]
    tool_version: ToolVersion,
}

/// Build a `ModuleConfig` from a decoded configuration tree.
pub fn decode_config(tree: Map<String, Value>) -> Result<ModuleConfig> {
    let tree = lowercase_keys(tree);

    let section: ModuleSection = match tree.get("module") {
        Some(Value::Null) | None => ModuleSection::default(),
        Some(value) => serde_json::from_value(value.clone())?,
    };

    let mut imports = section.imports;
    if let Some(themes) = tree.get("theme") {
        imports.extend(theme_list(themes).into_iter().map(|t| Import::new(&t)));
    }

    let params = match tree.get("params") {
        Some(Value::Object(params)) => params.clone(),
        _ => Map::new(),
    };

    Ok(ModuleConfig {
        imports,
        mounts: section.mounts,
        tool_version: section.tool_version,
        params,
    })
}

fn theme_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.is_empty() => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Find the first `config.<ext>` file in `dir`, probing extensions in order.
pub fn find_config_file(fs: &dyn Filesystem, dir: &Path) -> Option<(PathBuf, Format)> {
    CONFIG_EXTENSIONS.iter().find_map(|ext| {
        let candidate = dir.join(format!("{}.{}", CONFIG_BASENAME, ext));
        if fs.exists(&candidate) {
            Format::from_extension(ext).map(|format| (candidate, format))
        } else {
            None
        }
    })
}

/// Read and decode a config file into a raw tree, reporting failures as
/// `ConfigDecode` errors attributed to `module`.
pub fn read_tree(
    fs: &dyn Filesystem,
    decoder: &dyn ConfigDecoder,
    module: &str,
    file: &Path,
    format: Format,
) -> Result<Map<String, Value>> {
    let decode_error = |message: String| Error::ConfigDecode {
        module: module.to_string(),
        file: file.to_path_buf(),
        message,
    };

    let data = fs.read(file).map_err(|e| decode_error(e.to_string()))?;
    decoder
        .decode(&data, format)
        .map_err(|e| decode_error(e.to_string()))
}

/// Load the project's own configuration from its working directory.
///
/// A project without a config file gets the default configuration.
pub fn load_project_config(
    fs: &dyn Filesystem,
    decoder: &dyn ConfigDecoder,
    working_dir: &Path,
) -> Result<(ModuleConfig, Option<PathBuf>)> {
    match find_config_file(fs, working_dir) {
        Some((file, format)) => {
            let tree = read_tree(fs, decoder, "project", &file, format)?;
            let config = decode_config(tree).map_err(|e| Error::ConfigDecode {
                module: "project".to_string(),
                file: file.clone(),
                message: e.to_string(),
            })?;
            Ok((config, Some(file)))
        }
        None => Ok((ModuleConfig::default(), None)),
    }
}
