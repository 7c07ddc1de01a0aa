//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let site = SiteFixture::new()
//!     .with_config(configs::IMPORTS_A)
//!     .with_theme("a", configs::THEME_IMPORTS_B);
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::SiteFixture;
}

/// Config file snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Project importing theme `a`.
    pub const IMPORTS_A: &str = r#"
[[module.imports]]
path = "a"
"#;

    /// Project importing a disabled theme `a` and an enabled theme `c`.
    pub const DISABLED_A: &str = r#"
[[module.imports]]
path = "a"
disable = true

[[module.imports]]
path = "c"
"#;

    /// Project importing a vendored module.
    pub const IMPORTS_VENDORED: &str = r#"
[[module.imports]]
path = "example.com/vendored"
"#;

    /// Project importing a module that exists nowhere.
    pub const IMPORTS_MISSING: &str = r#"
[[module.imports]]
path = "example.com/missing"
"#;

    /// Theme config (YAML) importing theme `b`.
    pub const THEME_IMPORTS_B: &str = "module:\n  imports:\n    - path: b\n";

    /// Legacy descriptor requiring a far-future tool version.
    pub const FUTURE_THEME: &str = "name = \"Future\"\nmin_version = \"999.0.0\"\n";
}

/// A site project in a temporary directory.
pub struct SiteFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl SiteFixture {
    /// Create a new fixture with an empty project directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write the project's `config.toml`.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file("config.toml", content)
    }

    /// Create `themes/<name>` with a `layouts` folder and an optional
    /// `config.yaml`.
    pub fn with_theme(self, name: &str, config: &str) -> Self {
        let fixture = self.with_file(&format!("themes/{}/layouts/_default/single.html", name), "{{ .Content }}");
        if config.is_empty() {
            fixture
        } else {
            fixture.with_file(&format!("themes/{}/config.yaml", name), config)
        }
    }

    /// Vendor `path` at `version` into the project's `_vendor` directory.
    pub fn with_vendored(self, path: &str, version: &str) -> Self {
        let manifest = self.temp_dir.child("_vendor/modules.txt");
        let mut content = std::fs::read_to_string(manifest.path()).unwrap_or_default();
        content.push_str(&format!("# {} {}\n", path, version));
        let fixture = self.with_file("_vendor/modules.txt", &content);
        fixture.with_file(&format!("_vendor/{}/static/style.css", path), "body {}")
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the project directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a command for the site-modules binary running in the project.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("site-modules");
        cmd.current_dir(self.path())
            .env_remove("SITE_MODULES_SOURCE")
            .env_remove("SITE_MODULES_THEMES_DIR")
            .env_remove("SITE_MODULES_IGNORE_VENDOR")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for SiteFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_theme() {
        let site = SiteFixture::new().with_theme("a", configs::THEME_IMPORTS_B);
        assert!(site.path().join("themes/a/layouts").is_dir());
        assert!(site.path().join("themes/a/config.yaml").is_file());
    }

    #[test]
    fn test_fixture_vendors_modules() {
        let site = SiteFixture::new()
            .with_vendored("example.com/x", "v1.0.0")
            .with_vendored("example.com/y", "v2.0.0");
        let manifest = std::fs::read_to_string(site.path().join("_vendor/modules.txt")).unwrap();
        assert_eq!(manifest.lines().count(), 2);
    }

    #[test]
    fn test_configs_are_valid() {
        for config in [
            configs::IMPORTS_A,
            configs::DISABLED_A,
            configs::IMPORTS_VENDORED,
            configs::IMPORTS_MISSING,
            configs::FUTURE_THEME,
        ] {
            toml::from_str::<toml::Value>(config).expect("Config should be valid TOML");
        }
        serde_yaml::from_str::<serde_yaml::Value>(configs::THEME_IMPORTS_B)
            .expect("Config should be valid YAML");
    }
}
