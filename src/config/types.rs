//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DoxyError, DoxyResult};
use crate::rules::RuleTable;
use crate::selector::NameFilter;

use super::loader::{self, ConfigWarning};

/// Source and output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory scanned for candidates. Required before a run.
    #[serde(default)]
    pub source: Option<PathBuf>,

    #[serde(default = "default_output_dir")]
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: None,
            output: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("doxygenFiles")
}

/// Candidate name filter markers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_include")]
    pub include: String,

    #[serde(default = "default_exclude")]
    pub exclude: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: default_exclude(),
        }
    }
}

fn default_include() -> String {
    ".cs".to_string()
}

fn default_exclude() -> String {
    ".meta".to_string()
}

/// Line terminator written after every output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Output artifact naming and format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Appended to the file stem: `Foo.cs` becomes `Foo_doxy.cs`.
    #[serde(default = "default_suffix")]
    pub suffix: String,

    #[serde(default)]
    pub line_ending: LineEnding,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            line_ending: LineEnding::default(),
        }
    }
}

fn default_suffix() -> String {
    "_doxy".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Ordered rules. Empty means the built-in table.
    #[serde(default, skip_serializing_if = "RuleTable::is_empty")]
    pub rules: RuleTable,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> DoxyResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> DoxyResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from an explicit file, the working directory, user config, or defaults
    pub fn resolve(explicit: Option<&Path>) -> DoxyResult<(Self, Vec<ConfigWarning>)> {
        loader::resolve(explicit)
    }

    /// Apply environment variable overrides (DOXYTAG_* prefix)
    pub fn with_env_overrides(self) -> DoxyResult<Self> {
        loader::with_env_overrides(self)
    }

    /// The rule table a run uses.
    pub fn rule_table(&self) -> RuleTable {
        if self.rules.is_empty() {
            RuleTable::builtin()
        } else {
            self.rules.clone()
        }
    }

    pub fn name_filter(&self) -> NameFilter {
        NameFilter::new(&self.filter.include, &self.filter.exclude)
    }

    /// Configured source directory, or an error when none was given.
    pub fn source_dir(&self) -> DoxyResult<&Path> {
        self.paths
            .source
            .as_deref()
            .ok_or_else(|| invalid("no source directory configured (use --source or [paths] source)"))
    }

    pub fn output_dir(&self) -> &Path {
        &self.paths.output
    }

    /// Reject settings that would make a run meaningless.
    pub fn validate(&self) -> DoxyResult<()> {
        self.source_dir()?;

        if self.filter.include.is_empty() {
            return Err(invalid("filter.include must not be empty"));
        }
        if self.output.suffix.is_empty() {
            return Err(invalid(
                "output.suffix must not be empty, outputs would shadow their sources",
            ));
        }
        if let Some(index) = self.rules.first_empty_pattern() {
            return Err(invalid(&format!("rule {} has an empty pattern", index + 1)));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> DoxyError {
    DoxyError::InvalidConfig {
        file: PathBuf::from("<merged settings>"),
        message: message.to_string(),
    }
}
