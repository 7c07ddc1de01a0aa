//! # Output Configuration
//!
//! Controls how module listings and graphs are rendered on the terminal.
//!
//! Color is decided once per run from the `--color` flag and the
//! environment:
//! - `--color=never|always|auto`
//! - `NO_COLOR` disables colors when set
//! - `CLICOLOR=0` disables colors
//! - `CLICOLOR_FORCE=1` forces colors even in non-TTY
//! - `TERM=dumb` disables colors
//!
//! ```rust,ignore
//! use site_modules::output::{OutputConfig, styled, Tone};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! println!("{}", styled(&config, "vendored", Tone::Muted));
//! ```

use std::env;
use std::fmt::Display;

use console::Style;

use crate::module::Module;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is `"always"`, `"never"` or anything else for automatic
    /// detection.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Semantic styles used in module output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Module paths
    Name,
    /// Versions and directories
    Muted,
    /// Disabled modules and warnings
    Warn,
    /// The project module
    Project,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Tone::Name => Style::new().bold(),
            Tone::Muted => Style::new().dim(),
            Tone::Warn => Style::new().yellow(),
            Tone::Project => Style::new().green().bold(),
        }
    }
}

/// Render `value` in `tone`, or as plain text when colors are off.
pub fn styled<D: Display>(config: &OutputConfig, value: D, tone: Tone) -> String {
    if config.use_color {
        tone.style().apply_to(value).force_styling(true).to_string()
    } else {
        value.to_string()
    }
}

/// Bracketed markers for a module's flags, e.g. `[vendored] [disabled]`.
pub fn markers(config: &OutputConfig, module: &Module) -> String {
    let mut parts = Vec::new();
    if module.is_project {
        parts.push(styled(config, "[project]", Tone::Project));
    }
    if module.vendored {
        parts.push(styled(config, "[vendored]", Tone::Muted));
    }
    if module.disabled {
        parts.push(styled(config, "[disabled]", Tone::Warn));
    }
    parts.join(" ")
}

/// One-line label for a module: path, version and markers.
pub fn module_label(config: &OutputConfig, module: &Module) -> String {
    let tone = if module.is_project {
        Tone::Project
    } else {
        Tone::Name
    };
    let mut label = styled(config, module.display_path(), tone);

    if let Some(version) = &module.version {
        label.push(' ');
        label.push_str(&styled(config, version, Tone::Muted));
    }

    let markers = markers(config, module);
    if !markers.is_empty() {
        label.push(' ');
        label.push_str(&markers);
    }
    label
}
