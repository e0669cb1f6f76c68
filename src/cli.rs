use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use doxytag::{Config, LineEnding};

/// doxytag - convert LPK comment tags to Doxygen tags
#[derive(Parser, Debug)]
#[command(name = "doxytag")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI (one JSON object per line)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert every candidate file into the output directory
    Convert {
        #[command(flatten)]
        run: RunArgs,

        /// Dry run - show what would be written
        #[arg(long)]
        dry_run: bool,
    },

    /// List candidate files and their output names without converting
    List {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Print the active rule table in application order
    Rules {
        /// Config file (defaults to ./doxytag.toml, then the user config)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Settings shared by commands that scan a source directory.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Directory containing the files to convert
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Directory receiving converted copies
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (defaults to ./doxytag.toml, then the user config)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Names must contain this marker
    #[arg(long)]
    pub include: Option<String>,

    /// Names containing this marker are ignored
    #[arg(long)]
    pub exclude: Option<String>,

    /// Appended to each output file stem
    #[arg(long)]
    pub suffix: Option<String>,

    /// Terminate output lines with CRLF
    #[arg(long)]
    pub crlf: bool,
}

impl RunArgs {
    /// Flags win over every other config layer.
    pub fn apply(&self, config: &mut Config) {
        if let Some(source) = &self.source {
            config.paths.source = Some(source.clone());
        }
        if let Some(output) = &self.output {
            config.paths.output = output.clone();
        }
        if let Some(include) = &self.include {
            config.filter.include = include.clone();
        }
        if let Some(exclude) = &self.exclude {
            config.filter.exclude = exclude.clone();
        }
        if let Some(suffix) = &self.suffix {
            config.output.suffix = suffix.clone();
        }
        if self.crlf {
            config.output.line_ending = LineEnding::Crlf;
        }
    }
}
