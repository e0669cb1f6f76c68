//! Batch orchestration
//!
//! Selection happens once, up front. Candidates are then rewritten one at a
//! time; a file-level failure is recorded and the batch moves on.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::{DoxyError, DoxyResult};
use crate::rewriter::{RewrittenFile, Rewriter};
use crate::selector::{select_candidates, Candidate};

/// Options for a single run
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub dry_run: bool,
}

/// Why a candidate was not converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Unreadable,
    WriteFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedFile {
    pub name: String,
    pub output: PathBuf,
    pub lines: usize,
    pub changed_lines: usize,
}

impl From<RewrittenFile> for ProcessedFile {
    fn from(file: RewrittenFile) -> Self {
        Self {
            name: file.name,
            output: file.output_path,
            lines: file.lines,
            changed_lines: file.changed_lines,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub name: String,
    pub reason: SkipReason,
    pub message: String,
}

/// Result of a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub processed: Vec<ProcessedFile>,
    pub skipped: Vec<SkippedFile>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no candidate was skipped.
    pub fn is_success(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn total(&self) -> usize {
        self.processed.len() + self.skipped.len()
    }

    /// Number of files skipped because their output could not be written.
    pub fn write_failures(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| s.reason == SkipReason::WriteFailed)
            .count()
    }
}

/// Progress callback event emitted while running a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Started { total: usize },
    FileWritten { index: usize, file: ProcessedFile },
    FileSkipped { index: usize, file: SkippedFile },
    Finished { processed: usize, skipped: usize },
}

/// Run the whole batch described by `config`.
pub fn run_batch(config: &Config, options: BatchOptions) -> DoxyResult<BatchReport> {
    run_batch_with_events(config, options, |_| {})
}

/// Run the batch, reporting each step to `on_event`.
///
/// Returns `Err` only for run-level failures (invalid config, unavailable
/// source directory). Per-file failures land in [`BatchReport::skipped`].
pub fn run_batch_with_events<F>(
    config: &Config,
    options: BatchOptions,
    mut on_event: F,
) -> DoxyResult<BatchReport>
where
    F: FnMut(BatchEvent),
{
    config.validate()?;
    let source_dir = config.source_dir()?;
    let output_dir = config.output_dir();

    let candidates = select_candidates(source_dir, &config.name_filter(), &config.output.suffix)?;

    if !options.dry_run {
        prepare_output_dir(config);
    }

    let rewriter = Rewriter::from_config(config)?.with_dry_run(options.dry_run);
    tracing::debug!(
        source = %source_dir.display(),
        output = %output_dir.display(),
        rules = config.rule_table().len(),
        "starting batch"
    );

    on_event(BatchEvent::Started {
        total: candidates.len(),
    });

    let mut report = BatchReport::new();
    for (index, candidate) in candidates.iter().enumerate() {
        match rewriter.rewrite(candidate) {
            Ok(file) => {
                let file = ProcessedFile::from(file);
                report.processed.push(file.clone());
                on_event(BatchEvent::FileWritten { index, file });
            }
            Err(err) => {
                let file = skipped(candidate, err)?;
                report.skipped.push(file.clone());
                on_event(BatchEvent::FileSkipped { index, file });
            }
        }
    }

    tracing::info!(
        processed = report.processed.len(),
        skipped = report.skipped.len(),
        "batch finished"
    );
    on_event(BatchEvent::Finished {
        processed: report.processed.len(),
        skipped: report.skipped.len(),
    });

    Ok(report)
}

/// Only select, never rewrite.
pub fn list_candidates(config: &Config) -> DoxyResult<Vec<Candidate>> {
    config.validate()?;
    select_candidates(
        config.source_dir()?,
        &config.name_filter(),
        &config.output.suffix,
    )
}

/// Create the output directory if missing.
///
/// A failure here is not fatal: each file will then fail to write and be
/// reported as skipped.
fn prepare_output_dir(config: &Config) {
    let output_dir = config.output_dir();
    if let Err(err) = fs::create_dir_all(output_dir) {
        tracing::error!(
            dir = %output_dir.display(),
            error = %err,
            "cannot create output directory"
        );
        return;
    }

    let same_dir = config
        .source_dir()
        .ok()
        .and_then(|src| fs::canonicalize(src).ok())
        .zip(fs::canonicalize(output_dir).ok())
        .is_some_and(|(src, out)| src == out);
    if same_dir {
        tracing::warn!(
            dir = %output_dir.display(),
            "output directory is the source directory, outputs will be picked up by the next run"
        );
    }
}

fn skipped(candidate: &Candidate, err: DoxyError) -> DoxyResult<SkippedFile> {
    if err.is_fatal() {
        return Err(err);
    }

    let reason = if matches!(err, DoxyError::FileUnreadable { .. }) {
        tracing::warn!(file = %candidate.name, error = %err, "skipping unreadable file");
        SkipReason::Unreadable
    } else {
        tracing::error!(file = %candidate.name, error = %err, "failed to write output");
        SkipReason::WriteFailed
    };

    Ok(SkippedFile {
        name: candidate.name.clone(),
        reason,
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleTable, SubstitutionRule};
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        _root: TempDir,
        config: Config,
    }

    fn fixture(files: &[(&str, &str)]) -> Fixture {
        let root = tempdir().unwrap();
        let source = root.path().join("TestDir");
        fs::create_dir(&source).unwrap();
        for (name, content) in files {
            fs::write(source.join(name), content).unwrap();
        }

        let mut config = Config::default();
        config.paths.source = Some(source);
        config.paths.output = root.path().join("doxygenFiles");
        Fixture {
            _root: root,
            config,
        }
    }

    #[test]
    fn run_converts_and_skips_meta() {
        let fx = fixture(&[
            ("Foo.cs", "File: Foo.cs\n"),
            ("Foo.cs.meta", "File: Foo.cs\n"),
        ]);

        let report = run_batch(&fx.config, BatchOptions::default()).unwrap();

        assert!(report.is_success());
        assert_eq!(report.total(), 1);
        assert_eq!(report.processed[0].name, "Foo.cs");

        let out = fx.config.output_dir();
        assert_eq!(
            fs::read_to_string(out.join("Foo_doxy.cs")).unwrap(),
            "\\file Foo.cs\n"
        );
        assert!(!out.join("Foo.cs_doxy.meta").exists());
    }

    #[test]
    fn run_creates_output_dir() {
        let fx = fixture(&[("A.cs", "x\n")]);
        assert!(!fx.config.output_dir().exists());

        run_batch(&fx.config, BatchOptions::default()).unwrap();

        assert!(fx.config.output_dir().is_dir());
    }

    #[test]
    fn run_missing_source_is_fatal() {
        let mut fx = fixture(&[]);
        fx.config.paths.source = Some(fx.config.output_dir().join("nowhere"));

        let err = run_batch(&fx.config, BatchOptions::default()).unwrap_err();
        assert!(matches!(err, DoxyError::SourceDirectoryUnavailable { .. }));
    }

    #[test]
    fn run_reports_write_failures_and_continues() {
        let fx = fixture(&[("A.cs", "a\n"), ("B.cs", "b\n")]);
        fs::create_dir_all(fx.config.output_dir()).unwrap();
        // a directory squatting on A's output path cannot be removed as a file
        fs::create_dir(fx.config.output_dir().join("A_doxy.cs")).unwrap();

        let mut events = Vec::new();
        let report =
            run_batch_with_events(&fx.config, BatchOptions::default(), |e| events.push(e)).unwrap();

        assert!(!report.is_success());
        assert_eq!(report.write_failures(), 1);
        assert_eq!(report.skipped[0].name, "A.cs");
        assert_eq!(report.processed[0].name, "B.cs");

        assert_eq!(events.first(), Some(&BatchEvent::Started { total: 2 }));
        assert_eq!(
            events.last(),
            Some(&BatchEvent::Finished {
                processed: 1,
                skipped: 1
            })
        );
    }

    #[cfg(unix)]
    #[test]
    fn run_skips_unreadable_file_and_continues() {
        use std::os::unix::fs::PermissionsExt;

        let fx = fixture(&[("A.cs", "File: a\n"), ("B.cs", "File: b\n")]);
        let locked = fx.config.source_dir().unwrap().join("A.cs");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::File::open(&locked).is_ok() {
            // running as root
            return;
        }

        let report = run_batch(&fx.config, BatchOptions::default()).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

        assert!(!report.is_success());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "A.cs");
        assert_eq!(report.skipped[0].reason, SkipReason::Unreadable);
        assert_eq!(report.write_failures(), 0);
        assert_eq!(report.processed[0].name, "B.cs");
        assert_eq!(
            fs::read_to_string(fx.config.output_dir().join("B_doxy.cs")).unwrap(),
            "\\file b\n"
        );
    }

    #[test]
    fn run_twice_is_idempotent() {
        let fx = fixture(&[("Foo.cs", "File: Foo.cs\n* INPUTS       : None\n")]);
        let out = fx.config.output_dir().join("Foo_doxy.cs");

        run_batch(&fx.config, BatchOptions::default()).unwrap();
        let first = fs::read(&out).unwrap();
        run_batch(&fx.config, BatchOptions::default()).unwrap();
        let second = fs::read(&out).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn run_uses_configured_rules() {
        let mut fx = fixture(&[("Foo.cs", "Author: me\nFile: x\n")]);
        fx.config.rules = RuleTable::new(vec![SubstitutionRule::new("Author:", "\\author")]);

        run_batch(&fx.config, BatchOptions::default()).unwrap();

        assert_eq!(
            fs::read_to_string(fx.config.output_dir().join("Foo_doxy.cs")).unwrap(),
            "\\author me\nFile: x\n"
        );
    }

    #[test]
    fn dry_run_leaves_output_dir_absent() {
        let fx = fixture(&[("Foo.cs", "File: Foo.cs\n")]);

        let report = run_batch(&fx.config, BatchOptions { dry_run: true }).unwrap();

        assert_eq!(report.processed.len(), 1);
        assert!(!fx.config.output_dir().exists());
    }

    #[test]
    fn list_candidates_only_selects() {
        let fx = fixture(&[("Foo.cs", ""), ("Foo.cs.meta", ""), ("notes.txt", "")]);

        let names: Vec<_> = list_candidates(&fx.config)
            .unwrap()
            .into_iter()
            .map(|c| c.output_name)
            .collect();

        assert_eq!(names, vec!["Foo_doxy.cs"]);
        assert!(!fx.config.output_dir().exists());
    }
}
