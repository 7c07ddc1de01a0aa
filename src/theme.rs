//! Theme configuration merging
//!
//! A module can describe itself in two ways: a current-format `config.<ext>`
//! file and the older `theme.toml` descriptor. Both are decoded into generic
//! trees and folded into one [`ModuleConfig`]:
//!
//! - The current config is authoritative.
//! - The legacy `min_version` only fills the minimum tool version when the
//!   current config leaves it unset.
//! - Every other legacy top-level key becomes a parameter, unless the current
//!   config already defines a parameter with that name.

use serde_json::{Map, Value};

use crate::config::{decode_config, find_config_file, read_tree, ModuleConfig};
use crate::decoder::{lowercase_keys, value_to_string, ConfigDecoder, Format};
use crate::error::{Error, Result};
use crate::filesystem::Filesystem;
use crate::module::Module;

/// File name of the legacy theme descriptor.
pub const LEGACY_DESCRIPTOR: &str = "theme.toml";

/// Legacy key holding the minimum tool version.
const LEGACY_VERSION_KEY: &str = "min_version";

/// Fold a decoded legacy descriptor into `config`.
pub fn merge_legacy(config: &mut ModuleConfig, legacy: Map<String, Value>) {
    for (key, value) in legacy {
        if key == LEGACY_VERSION_KEY {
            if config.tool_version.min.is_none() {
                config.tool_version.min = value_to_string(&value);
            }
            continue;
        }
        config.params.entry(key).or_insert(value);
    }
}

/// Read the module's configuration files and store the merged result on it.
///
/// Records the current-format config file, if any, on the module.
pub fn apply_theme_config(
    fs: &dyn Filesystem,
    decoder: &dyn ConfigDecoder,
    module: &mut Module,
) -> Result<()> {
    let module_name = module.display_path().to_string();

    let legacy_file = module.dir.join(LEGACY_DESCRIPTOR);
    let legacy = if fs.exists(&legacy_file) {
        let tree = read_tree(fs, decoder, &module_name, &legacy_file, Format::Toml)?;
        Some(lowercase_keys(tree))
    } else {
        None
    };

    let mut config = match find_config_file(fs, &module.dir) {
        Some((file, format)) => {
            let tree = read_tree(fs, decoder, &module_name, &file, format)?;
            let config = decode_config(tree).map_err(|e| Error::ConfigDecode {
                module: module_name.clone(),
                file: file.clone(),
                message: e.to_string(),
            })?;
            module.config_file = Some(file);
            config
        }
        None => ModuleConfig::default(),
    };

    if let Some(legacy) = legacy {
        merge_legacy(&mut config, legacy);
    }

    module.config = config;
    Ok(())
}
