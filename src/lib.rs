//! # Site Modules Library
//!
//! This library resolves the module-import graph of a static-site project
//! into a flat, ordered list of modules. It backs the `site-modules`
//! command-line tool but can be embedded in any site generator that needs to
//! know which themes and components a project pulls in.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::PathBuf;
//! use site_modules::collector::{Client, ClientOptions};
//! use site_modules::config::{Import, ModuleConfig};
//! use site_modules::decoder::DefaultDecoder;
//! use site_modules::filesystem::MemoryFS;
//! use site_modules::toolchain::NoPackageManager;
//!
//! // A project with one theme in its themes directory
//! let mut fs = MemoryFS::new();
//! fs.add_file_string("/site/themes/hello/layouts/index.html", "<h1>hi</h1>").unwrap();
//!
//! let options = ClientOptions::new(PathBuf::from("/site")).with_project_config(ModuleConfig {
//!     imports: vec![Import::new("hello")],
//!     ..Default::default()
//! });
//! let client = Client::with_operations(
//!     options,
//!     Box::new(fs),
//!     Box::new(DefaultDecoder),
//!     Box::new(NoPackageManager),
//! );
//!
//! let collected = client.collect().unwrap();
//! assert_eq!(collected.all_modules.len(), 2);
//! assert_eq!(collected.all_modules[0].path, "hello");
//! assert!(collected.all_modules[1].is_project);
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`, `decoder`, `theme`)**: Reads `config.<ext>`
//!   files and legacy `theme.toml` descriptors into a [`config::ModuleConfig`].
//! - **Filesystem (`filesystem`)**: A small read-only filesystem trait with a
//!   host implementation and an in-memory one for tests.
//! - **Vendoring (`manifest`)**: Frozen module snapshots under `_vendor`.
//! - **Package manager (`toolchain`)**: Lists, fetches and syncs modules
//!   through the host package manager.
//! - **Location (`locator`)**: The ordered chain of places a module is looked
//!   up in.
//! - **Collection (`collector`)**: The depth-first walk that produces the final
//!   [`module::ModulesConfig`].
//!
//! ## Collection Order
//!
//! Modules are listed in walk order: every importer comes before its
//! imports, and the project module is always last.

pub mod collector;
pub mod config;
pub mod decoder;
pub mod error;
pub mod filesystem;
pub mod locator;
pub mod manifest;
pub mod module;
pub mod mounts;
pub mod output;
pub mod path;
pub mod suggestions;
pub mod theme;
pub mod toolchain;
pub mod version;

#[cfg(test)]
mod path_proptest;
