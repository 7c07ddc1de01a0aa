//! # Error Suggestions
//!
//! Helpers that turn collection failures into CLI errors that say what went
//! wrong and how to fix it.
//!
//! ```rust,ignore
//! let collected = client
//!     .collect()
//!     .map_err(|e| suggestions::explain(e, client.options()))?;
//! ```

use std::path::Path;

use crate::collector::ClientOptions;
use crate::error::Error;

/// Generate an error for a module that could not be located anywhere.
///
/// Includes the toolchain hint from the collector, if any, plus hints about
/// the import path and the themes directory.
pub fn module_not_found(path: &str, message: &str, hint: Option<&str>, themes_dir: &Path) -> anyhow::Error {
    let mut hints = Vec::new();
    if let Some(hint) = hint {
        hints.push(format!("hint: {}", hint));
    }
    hints.push("hint: Check the import path in your config file for typos".to_string());
    hints.push(format!(
        "hint: Store the module under {} or use --themes-dir",
        themes_dir.display()
    ));

    anyhow::anyhow!(
        "Module not found: {path}\n{message}\n\n{hints}",
        hints = hints.join("\n")
    )
}

/// Generate an error for an unreadable vendor manifest.
pub fn malformed_manifest(file: &Path, line: usize) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid vendor manifest: {file} (line {line})\n\n\
         hint: Every line must read \"# <module path> <version>\"\n\
         hint: Re-vendor the modules or use --ignore-vendor",
        file = file.display()
    )
}

/// Convert a collection error into a CLI error, adding hints where useful.
pub fn explain(err: Error, options: &ClientOptions) -> anyhow::Error {
    match err {
        Error::ModuleNotFound {
            path,
            message,
            hint,
        } => module_not_found(&path, &message, hint.as_deref(), &options.themes_dir),
        Error::MalformedManifest { file, line } => malformed_manifest(&file, line),
        other => anyhow::Error::new(other),
    }
}
