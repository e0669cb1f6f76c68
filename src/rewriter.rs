//! Per-file tag rewriting
//!
//! The source is never opened for writing. Reading happens from a temporary
//! copy in the output directory, and the output is written to a sibling
//! temporary file that is persisted over the final path once complete.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::{Config, LineEnding};
use crate::error::{DoxyError, DoxyResult};
use crate::rules::RuleTable;
use crate::selector::Candidate;

/// Outcome of rewriting one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenFile {
    pub name: String,
    pub output_path: PathBuf,
    /// Lines read, and therefore lines written
    pub lines: usize,
    /// Lines that at least one rule changed
    pub changed_lines: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct LineStats {
    lines: usize,
    changed_lines: usize,
    /// Lines that are not valid UTF-8, passed through byte for byte
    non_utf8_lines: usize,
    /// Match count per rule, indexed like the rule table
    rule_hits: Vec<usize>,
}

#[derive(Debug)]
enum StreamError {
    Read(io::Error),
    Write(io::Error),
}

/// Rewrites candidates from one source directory into one output directory.
#[derive(Debug, Clone)]
pub struct Rewriter {
    source_dir: PathBuf,
    output_dir: PathBuf,
    rules: RuleTable,
    line_ending: LineEnding,
    dry_run: bool,
}

impl Rewriter {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        rules: RuleTable,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            rules,
            line_ending: LineEnding::default(),
            dry_run: false,
        }
    }

    pub fn from_config(config: &Config) -> DoxyResult<Self> {
        Ok(Self::new(config.source_dir()?, config.output_dir(), config.rule_table())
            .with_line_ending(config.output.line_ending))
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Read and transform without touching the output directory.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn output_path(&self, candidate: &Candidate) -> PathBuf {
        self.output_dir.join(&candidate.output_name)
    }

    /// Rewrite one candidate into its output artifact.
    ///
    /// Any file already at the output path is replaced. Errors are always
    /// `FileUnreadable` or `OutputWriteFailure`, both recoverable per file.
    pub fn rewrite(&self, candidate: &Candidate) -> DoxyResult<RewrittenFile> {
        let source_path = self.source_dir.join(&candidate.name);
        let output_path = self.output_path(candidate);
        let unreadable = |source| DoxyError::FileUnreadable {
            path: source_path.clone(),
            source,
        };

        let mut source = File::open(&source_path).map_err(unreadable)?;

        let stats = if self.dry_run {
            self.transform(BufReader::new(source), io::sink(), &source_path, &output_path)?
        } else {
            let temp_copy = self.copy_to_temp(candidate, &mut source, &source_path)?;
            drop(source);

            let reader = BufReader::new(temp_copy.reopen().map_err(unreadable)?);
            remove_existing(&output_path)?;

            let staging = self.staging_file(&output_path)?;
            let mut writer = BufWriter::new(staging);
            let stats = self.transform(reader, &mut writer, &source_path, &output_path)?;

            let staging = writer.into_inner().map_err(|e| DoxyError::OutputWriteFailure {
                path: output_path.clone(),
                source: e.into_error(),
            })?;
            staging
                .persist(&output_path)
                .map_err(|e| DoxyError::OutputWriteFailure {
                    path: output_path.clone(),
                    source: e.error,
                })?;
            // temp_copy is removed here, after both handles are closed
            stats
        };

        if stats.non_utf8_lines > 0 {
            tracing::debug!(
                file = %candidate.name,
                lines = stats.non_utf8_lines,
                "non-UTF-8 lines copied unchanged outside matches"
            );
        }
        for (rule, hits) in self.rules.rules().iter().zip(&stats.rule_hits) {
            if *hits > 0 {
                tracing::debug!(
                    file = %candidate.name,
                    pattern = %rule.pattern,
                    hits,
                    "rule hits"
                );
            }
        }
        tracing::info!(
            file = %candidate.name,
            output = %output_path.display(),
            lines = stats.lines,
            changed = stats.changed_lines,
            dry_run = self.dry_run,
            "rewrote file"
        );

        Ok(RewrittenFile {
            name: candidate.name.clone(),
            output_path,
            lines: stats.lines,
            changed_lines: stats.changed_lines,
        })
    }

    fn copy_to_temp(
        &self,
        candidate: &Candidate,
        source: &mut File,
        source_path: &Path,
    ) -> DoxyResult<NamedTempFile> {
        let mut temp = tempfile::Builder::new()
            .prefix(candidate.temp_prefix())
            .suffix(candidate.extension())
            .tempfile_in(&self.output_dir)
            .map_err(|source| DoxyError::OutputWriteFailure {
                path: self.output_dir.join(&candidate.temp_name),
                source,
            })?;

        io::copy(source, temp.as_file_mut()).map_err(|source| DoxyError::FileUnreadable {
            path: source_path.to_path_buf(),
            source,
        })?;

        tracing::trace!(temp = %temp.path().display(), "copied source");
        Ok(temp)
    }

    fn staging_file(&self, output_path: &Path) -> DoxyResult<NamedTempFile> {
        tempfile::Builder::new()
            .prefix(".doxytag-")
            .tempfile_in(&self.output_dir)
            .map_err(|source| DoxyError::OutputWriteFailure {
                path: output_path.to_path_buf(),
                source,
            })
    }

    fn transform<R: BufRead, W: Write>(
        &self,
        reader: R,
        writer: W,
        source_path: &Path,
        output_path: &Path,
    ) -> DoxyResult<LineStats> {
        rewrite_stream(reader, writer, &self.rules, self.line_ending).map_err(|e| match e {
            StreamError::Read(source) => DoxyError::FileUnreadable {
                path: source_path.to_path_buf(),
                source,
            },
            StreamError::Write(source) => DoxyError::OutputWriteFailure {
                path: output_path.to_path_buf(),
                source,
            },
        })
    }
}

fn remove_existing(output_path: &Path) -> DoxyResult<()> {
    match fs::remove_file(output_path) {
        Ok(()) => {
            tracing::debug!(path = %output_path.display(), "removed previous output");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(DoxyError::OutputWriteFailure {
            path: output_path.to_path_buf(),
            source,
        }),
    }
}

fn rewrite_stream<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    rules: &RuleTable,
    line_ending: LineEnding,
) -> Result<LineStats, StreamError> {
    let mut stats = LineStats {
        rule_hits: vec![0; rules.len()],
        ..LineStats::default()
    };
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).map_err(StreamError::Read)?;
        if n == 0 {
            break;
        }
        strip_terminator(&mut buf);

        if std::str::from_utf8(&buf).is_err() {
            stats.non_utf8_lines += 1;
        }

        let rewritten = rules.rewrite_bytes(&buf, |index| stats.rule_hits[index] += 1);
        if *rewritten != buf[..] {
            stats.changed_lines += 1;
        }
        stats.lines += 1;

        writer
            .write_all(&rewritten)
            .and_then(|()| writer.write_all(line_ending.as_str().as_bytes()))
            .map_err(StreamError::Write)?;
    }

    writer.flush().map_err(StreamError::Write)?;
    Ok(stats)
}

fn strip_terminator(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}
