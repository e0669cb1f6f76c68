//! Configuration module for doxytag
//!
//! Settings are layered, highest priority first:
//! 1. CLI flags
//! 2. Environment variables (DOXYTAG_*)
//! 3. `--config FILE`, or `./doxytag.toml`
//! 4. User config (`<config_dir>/doxytag/config.toml`)
//! 5. Built-in defaults

mod loader;
mod types;

pub use loader::{user_config_path, ConfigWarning, PROJECT_CONFIG_FILE};
pub use types::{Config, FilterConfig, LineEnding, OutputConfig, PathsConfig};
