//! # Error Handling
//!
//! This module defines the centralized error type for module collection. It
//! uses `thiserror` to derive an `Error` enum that covers every failure a
//! collection can end in, with enough context in each variant to produce a
//! helpful message for the user.
//!
//! ## Key Components
//!
//! - **`Error`**: All failure modes. Any of them aborts a collection; no
//!   partial module list is ever returned alongside an error.
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! `Error::ModuleNotFound` is the one kind callers are expected to tell apart
//! from the rest (see [`Error::is_module_not_found`]) so they can print a
//! "module missing" message instead of a generic internal error.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for module collection
#[derive(Error, Debug)]
pub enum Error {
    /// A module could not be located by any resolution strategy.
    ///
    /// The optional hint carries toolchain diagnostics (missing or outdated
    /// package-manager binary) when the project has a package manifest.
    #[error("module {path:?} not found: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ModuleNotFound {
        path: String,
        message: String,
        hint: Option<String>,
    },

    /// A vendor manifest line did not have exactly two fields.
    #[error("invalid modules list: {file:?} (line {line})")]
    MalformedManifest { file: PathBuf, line: usize },

    /// A module configuration or legacy theme descriptor failed to decode.
    #[error("failed to read module config for {module:?} in {file:?}: {message}")]
    ConfigDecode {
        module: String,
        file: PathBuf,
        message: String,
    },

    /// A mount is missing its source or its target.
    #[error("invalid module config for {module:?}: both source and target must be set")]
    InvalidMountConfig { module: String },

    /// A mount target does not start with one of the component folders.
    #[error("invalid module config for {module:?}: mount target {target:?} must be one of: {}", valid.join(", "))]
    InvalidMountTarget {
        module: String,
        target: String,
        valid: Vec<String>,
    },

    /// The package manager failed to fetch a module.
    #[error("failed to fetch module {path:?}: {message}")]
    FetchFailed { path: String, message: String },

    /// The lock-file synchronization after collection failed.
    #[error("failed to sync package manifest: {message}")]
    SyncFailed { message: String },

    /// A package-manager command could not be run or exited non-zero.
    #[error("toolchain command failed: {command} - {stderr}")]
    Toolchain { command: String, stderr: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A TOML parsing error, wrapped from `toml::de::Error`.
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A semantic versioning parsing error, wrapped from `semver::Error`.
    #[error("Semver parsing error: {0}")]
    Semver(#[from] semver::Error),
}

impl Error {
    /// Returns whether this error means that a module could not be found.
    pub fn is_module_not_found(&self) -> bool {
        matches!(self, Error::ModuleNotFound { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
