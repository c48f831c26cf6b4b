//! Mapping model output files to internal variable names.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use crate::error::IoError;

/// Internal variable name → file patterns, as found in the model settings.
pub type Bindings = BTreeMap<String, Vec<String>>;

/// Translate a shell wildcard pattern (`*`, `?`, `[...]`, `[!...]`) into an
/// anchored regular expression.
///
/// # Errors
///
/// Returns [`IoError::InvalidPattern`] on an unterminated character class.
pub fn wildcard_to_regex(pattern: &str) -> Result<Regex, IoError> {
    let invalid = |reason: &str| IoError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    let mut re = String::from("^");
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            '[' => {
                let mut class = String::new();
                if chars.peek() == Some(&'!') {
                    chars.next();
                    class.push('^');
                }
                let mut closed = false;
                let mut first = true;
                while let Some(c) = chars.next() {
                    if c == ']' && !first {
                        closed = true;
                        break;
                    }
                    first = false;
                    if c == '\\' || c == '[' || c == '^' {
                        class.push('\\');
                    }
                    class.push(c);
                }
                if !closed {
                    return Err(invalid("unterminated character class"));
                }
                re.push('[');
                re.push_str(&class);
                re.push(']');
            }
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re).map_err(|e| invalid(&e.to_string()))
}

/// Compiled bindings: matches an output file stem to its variable name.
#[derive(Debug, Clone)]
pub struct BindingMatcher {
    entries: Vec<(String, Regex)>,
}

impl BindingMatcher {
    /// Compile every binding pattern. Only the basename of each pattern is
    /// used, with a trailing `.nc` removed.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidPattern`] for a malformed pattern.
    pub fn new(bindings: &Bindings) -> Result<Self, IoError> {
        let mut entries = Vec::new();
        for (name, patterns) in bindings {
            for pattern in patterns {
                let base = Path::new(pattern)
                    .file_name()
                    .map(|b| b.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let stem = base.strip_suffix(".nc").unwrap_or(&base);
                if stem.is_empty() {
                    continue;
                }
                entries.push((name.clone(), wildcard_to_regex(stem)?));
            }
        }
        Ok(Self { entries })
    }

    /// Variable bound to the file stem `stem`, if any.
    pub fn variable_for(&self, stem: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, re)| re.is_match(stem))
            .map(|(name, _)| name.as_str())
    }
}

/// List the `*.nc` files in `dir` and map them to variable names.
///
/// Files matching no binding, and variables in `ignore`, are dropped. When
/// two files map to the same variable the first in name order wins.
///
/// # Errors
///
/// Returns [`IoError`] if `dir` cannot be read.
pub fn discover_variables(
    dir: &Path,
    matcher: &BindingMatcher,
    ignore: &[String],
) -> Result<BTreeMap<String, PathBuf>, IoError> {
    if !dir.is_dir() {
        return Err(IoError::FileNotFound {
            path: dir.to_path_buf(),
        });
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "nc"))
        .collect();
    files.sort();

    let mut found: BTreeMap<String, PathBuf> = BTreeMap::new();
    for path in files {
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let Some(name) = matcher.variable_for(&stem) else {
            debug!(file = %path.display(), "no binding matches");
            continue;
        };
        if ignore.iter().any(|i| i == name) {
            debug!(variable = name, "ignored");
            continue;
        }
        if let Some(previous) = found.get(name) {
            warn!(
                variable = name,
                kept = %previous.display(),
                dropped = %path.display(),
                "several files bound to one variable"
            );
            continue;
        }
        found.insert(name.to_string(), path);
    }
    Ok(found)
}
