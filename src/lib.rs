//! doxytag - LPK comment tags to Doxygen tags
//!
//! Scans a source directory for candidate files, rewrites every line through
//! an ordered table of literal substitutions, and writes converted copies to
//! an output directory. Sources are never modified.

pub mod batch;
pub mod config;
pub mod error;
pub mod logging;
pub mod rewriter;
pub mod rules;
pub mod selector;

// Re-exports for convenience
pub use batch::{
    list_candidates, run_batch, run_batch_with_events, BatchEvent, BatchOptions, BatchReport,
    ProcessedFile, SkipReason, SkippedFile,
};
pub use config::{Config, ConfigWarning, LineEnding};
pub use error::{DoxyError, DoxyResult};
pub use rewriter::{RewrittenFile, Rewriter};
pub use rules::{RuleTable, SubstitutionRule};
pub use selector::{select_candidates, Candidate, NameFilter};
