//! Path manipulation utilities for module collection

use regex::Regex;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};
use std::sync::OnceLock;

/// Lexically clean a path: drop `.` components, resolve `..` against
/// preceding normal components and collapse repeated separators.
///
/// An empty result becomes `.`. The filesystem is never consulted.
pub fn clean_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();

    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            _ => out.push(component),
        }
    }

    if out.is_empty() {
        PathBuf::from(".")
    } else {
        out.iter().collect()
    }
}

/// Clean a relative, slash-or-separator delimited string such as a mount
/// source or target.
pub fn clean_str(path: &str) -> String {
    clean_path(path).to_string_lossy().into_owned()
}

/// Return the first path segment of a cleaned relative path.
pub fn first_segment(path: &str) -> &str {
    path.split(['/', MAIN_SEPARATOR])
        .find(|segment| !segment.is_empty())
        .unwrap_or("")
}

/// Join `rel` onto `root`, treating a leading separator in `rel` as
/// relative to `root` rather than as an absolute path.
pub fn join_under(root: &Path, rel: &str) -> PathBuf {
    root.join(rel.trim_start_matches(['/', MAIN_SEPARATOR]))
}

/// Append a trailing separator to a directory path if it lacks one.
pub fn with_trailing_separator(dir: PathBuf) -> PathBuf {
    let mut raw = dir.into_os_string();
    let has_separator = raw
        .to_str()
        .map(|s| s.ends_with(MAIN_SEPARATOR) || s.ends_with('/'))
        .unwrap_or(false);
    if !has_separator {
        raw.push(MAIN_SEPARATOR.to_string());
    }
    PathBuf::from(raw)
}

/// Split a module path into its prefix and major-version suffix.
///
/// `example.com/theme/v2` splits into `("example.com/theme", "/v2")` and
/// `gopkg.in/yaml.v3` into `("gopkg.in/yaml", ".v3")`. Paths without a valid
/// suffix (including `/v1` and `/v0`) return an empty suffix.
pub fn split_path_version(path: &str) -> (&str, &str) {
    if path.starts_with("gopkg.in/") {
        if let Some(idx) = path.rfind(".v") {
            let major = &path[idx + 2..];
            if !major.is_empty() && major.bytes().all(|b| b.is_ascii_digit()) {
                return (&path[..idx], &path[idx..]);
            }
        }
        return (path, "");
    }

    if let Some(idx) = path.rfind("/v") {
        let major = &path[idx + 2..];
        let valid = !major.is_empty()
            && major.bytes().all(|b| b.is_ascii_digit())
            && !major.starts_with('0')
            && major != "1";
        if valid && idx > 0 {
            return (&path[..idx], &path[idx..]);
        }
    }

    (path, "")
}

/// Normalized key used to detect duplicate and circular imports.
///
/// Two imports that differ only in case or in their major-version suffix
/// share a key; only one major version of a module can be active at a time.
pub fn path_key(path: &str) -> String {
    let (prefix, _) = split_path_version(path);
    prefix.to_lowercase()
}

fn first_element_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]*(\.[a-z0-9-]+)+$").unwrap())
}

fn element_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_~+-]+(\.[A-Za-z0-9_~+-]+)*$").unwrap())
}

/// Report whether a path looks like something the package manager can
/// fetch: a host-like first element containing a dot, followed by plain
/// path elements.
///
/// Theme names such as `mytheme` or `themes/local` are not fetchable.
pub fn is_probably_module(path: &str) -> bool {
    if path.is_empty() || path.starts_with('/') || path.ends_with('/') {
        return false;
    }

    let mut elements = path.split('/');
    let first = match elements.next() {
        Some(first) => first,
        None => return false,
    };
    if !first_element_regex().is_match(first) {
        return false;
    }

    elements.all(|element| element_regex().is_match(element))
}
