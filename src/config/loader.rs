//! Configuration loading and layering

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DoxyError, DoxyResult};

use super::types::{Config, LineEnding};

/// File name looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "doxytag.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> DoxyResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DoxyError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Pick the first config layer that exists and apply env overrides.
///
/// An explicit path must load; the implicit project and user files are only
/// used when present.
pub fn resolve(explicit: Option<&Path>) -> DoxyResult<(Config, Vec<ConfigWarning>)> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let project = PathBuf::from(PROJECT_CONFIG_FILE);
            if project.is_file() {
                Some(project)
            } else {
                user_config_path().filter(|p| p.is_file())
            }
        }
    };

    let (config, warnings) = match candidate {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            load_with_warnings(&path)?
        }
        None => (Config::default(), Vec::new()),
    };

    Ok((with_env_overrides(config)?, warnings))
}

/// `<config_dir>/doxytag/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("doxytag").join("config.toml"))
}

/// Apply environment variable overrides (DOXYTAG_* prefix)
pub fn with_env_overrides(config: Config) -> DoxyResult<Config> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

pub(crate) fn apply_overrides(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> DoxyResult<Config> {
    if let Some(source) = lookup("DOXYTAG_SOURCE") {
        config.paths.source = Some(PathBuf::from(source));
    }

    if let Some(output) = lookup("DOXYTAG_OUTPUT") {
        config.paths.output = PathBuf::from(output);
    }

    if let Some(include) = lookup("DOXYTAG_INCLUDE") {
        config.filter.include = include;
    }

    if let Some(exclude) = lookup("DOXYTAG_EXCLUDE") {
        config.filter.exclude = exclude;
    }

    if let Some(suffix) = lookup("DOXYTAG_SUFFIX") {
        config.output.suffix = suffix;
    }

    if let Some(ending) = lookup("DOXYTAG_LINE_ENDING") {
        config.output.line_ending = match ending.to_lowercase().as_str() {
            "lf" => LineEnding::Lf,
            "crlf" => LineEnding::Crlf,
            other => {
                return Err(DoxyError::InvalidConfig {
                    file: PathBuf::from("DOXYTAG_LINE_ENDING"),
                    message: format!("unknown line ending '{other}', expected 'lf' or 'crlf'"),
                })
            }
        };
    }

    Ok(config)
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

/// Closest known key within two edits.
fn suggest_key(unknown: &str) -> Option<String> {
    const KNOWN_KEYS: &[&str] = &[
        "paths",
        "source",
        "output",
        "filter",
        "include",
        "exclude",
        "suffix",
        "line_ending",
        "rules",
        "pattern",
        "replacement",
    ];

    KNOWN_KEYS
        .iter()
        .map(|key| (*key, edit_distance(unknown, key)))
        .filter(|(_, dist)| *dist <= 2)
        .min_by_key(|(_, dist)| *dist)
        .map(|(key, _)| key.to_string())
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitute = diagonal + usize::from(ca != *cb);
            diagonal = row[j + 1];
            row[j + 1] = substitute.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_distance_counts_single_edits() {
        assert_eq!(edit_distance("include", "include"), 0);
        assert_eq!(edit_distance("inclide", "include"), 1);
        assert_eq!(edit_distance("sufix", "suffix"), 1);
        assert_eq!(edit_distance("", "rules"), 5);
    }

    #[test]
    fn suggest_key_ignores_distant_names() {
        assert_eq!(suggest_key("exlude").as_deref(), Some("exclude"));
        assert_eq!(suggest_key("colour"), None);
    }
}
