//! # Tool Version Compatibility
//!
//! Modules may declare the range of site-tool versions they work with. This
//! module holds those bounds and checks them against the running tool's
//! version using `semver`.
//!
//! Bounds are written loosely in the wild: `"0.55"`, `"v0.60.1"`, or even a
//! bare TOML float `0.55`. [`parse_lenient`] accepts all of those. A bound
//! that still cannot be parsed is ignored rather than treated as a failure,
//! since the compatibility check is advisory only.

use log::debug;
use semver::Version;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::decoder::value_to_string;

/// Minimum and maximum tool versions a module is compatible with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolVersion {
    /// Lowest supported version, inclusive.
    #[serde(default, deserialize_with = "loose_version")]
    pub min: Option<String>,
    /// Highest supported version, inclusive.
    #[serde(default, deserialize_with = "loose_version")]
    pub max: Option<String>,
}

impl ToolVersion {
    /// Returns whether `current` falls within the declared bounds.
    ///
    /// Missing or unparsable bounds do not restrict anything.
    pub fn is_valid(&self, current: &Version) -> bool {
        if let Some(min) = self.min.as_deref().and_then(bound) {
            if *current < min {
                return false;
            }
        }
        if let Some(max) = self.max.as_deref().and_then(bound) {
            if *current > max {
                return false;
            }
        }
        true
    }

    /// Returns whether neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

fn bound(raw: &str) -> Option<Version> {
    let parsed = parse_lenient(raw);
    if parsed.is_none() {
        debug!("Ignoring unparsable tool version bound {:?}", raw);
    }
    parsed
}

/// Parse a version that may lack a patch or minor component or carry a
/// leading `v`.
pub fn parse_lenient(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(version) = Version::parse(trimmed) {
        return Some(version);
    }

    // Pad "0.55" and "1" to three components, keeping any pre-release tail.
    let (core, tail) = match trimmed.find(['-', '+']) {
        Some(idx) => trimmed.split_at(idx),
        None => (trimmed, ""),
    };
    let components = core.split('.').count();
    if components >= 3 {
        return None;
    }
    let padding = ".0".repeat(3 - components);
    Version::parse(&format!("{}{}{}", core, padding, tail)).ok()
}

fn loose_version<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_string))
}

/// The version of this crate, used as the default current tool version.
pub fn current() -> Version {
    Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Version::new(0, 0, 0))
}
