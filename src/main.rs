//! doxytag CLI - batch LPK to Doxygen tag converter
//!
//! Usage: doxytag <COMMAND>
//!
//! Commands:
//!   convert  Convert every candidate file into the output directory
//!   list     List candidate files without converting
//!   rules    Print the active rule table

mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands, RunArgs};
use doxytag::{BatchEvent, BatchOptions, Config, ConfigWarning};

/// Exit status when the batch finished but skipped files.
const EXIT_PARTIAL: i32 = 2;

fn main() -> Result<()> {
    let cli = Cli::parse();
    doxytag::logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Convert { run, dry_run } => {
            let success = cmd_convert(&run, dry_run, cli.json)?;
            if !success {
                std::process::exit(EXIT_PARTIAL);
            }
            Ok(())
        }
        Commands::List { run } => cmd_list(&run, cli.json),
        Commands::Rules { config } => cmd_rules(config.as_deref(), cli.json),
    }
}

fn load_config(explicit: Option<&Path>, json: bool) -> Result<Config> {
    let (config, warnings) =
        Config::resolve(explicit).context("failed to load doxytag configuration")?;
    for warning in &warnings {
        print_config_warning(warning, json)?;
    }
    Ok(config)
}

fn load_run_config(run: &RunArgs, json: bool) -> Result<Config> {
    let mut config = load_config(run.config.as_deref(), json)?;
    run.apply(&mut config);
    Ok(config)
}

fn print_config_warning(warning: &ConfigWarning, json: bool) -> Result<()> {
    if json {
        let output = serde_json::json!({
            "event": "config_warning",
            "key": warning.key,
            "file": warning.file.display().to_string(),
            "line": warning.line,
            "suggestion": warning.suggestion,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    let location = match warning.line {
        Some(line) => format!("{}:{}", warning.file.display(), line),
        None => warning.file.display().to_string(),
    };
    match &warning.suggestion {
        Some(s) => eprintln!(
            "⚠ unknown config key '{}' in {} (did you mean '{}'?)",
            warning.key, location, s
        ),
        None => eprintln!("⚠ unknown config key '{}' in {}", warning.key, location),
    }
    Ok(())
}

fn cmd_convert(run: &RunArgs, dry_run: bool, json: bool) -> Result<bool> {
    let config = load_run_config(run, json)?;
    config.validate()?;

    if !json {
        println!("📦 doxytag convert");
        println!("Source: {}", config.source_dir()?.display());
        println!("Output: {}", config.output_dir().display());
        if dry_run {
            println!("Mode: Dry run");
        }
        println!();
    }

    let mut json_error = None;
    let report = doxytag::run_batch_with_events(&config, BatchOptions { dry_run }, |event| {
        if json {
            if let Err(e) = print_event_json(&event) {
                json_error.get_or_insert(e);
            }
        } else {
            print_event(&event, dry_run);
        }
    })?;
    if let Some(e) = json_error {
        return Err(e.into());
    }

    if json {
        let output = serde_json::json!({
            "event": "convert",
            "status": if report.is_success() { "success" } else { "partial" },
            "dry_run": dry_run,
            "processed": report.processed.len(),
            "skipped": report.skipped.len(),
            "write_failures": report.write_failures(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!();
        println!(
            "Summary: {} converted, {} skipped",
            report.processed.len(),
            report.skipped.len()
        );
        if report.write_failures() > 0 {
            println!(
                "🔴 {} output file(s) could not be written. Check that '{}' is writable.",
                report.write_failures(),
                config.output_dir().display()
            );
        }
    }

    Ok(report.is_success())
}

fn print_event(event: &BatchEvent, dry_run: bool) {
    match event {
        BatchEvent::Started { total } => {
            println!("✓ Found {} candidate files", total);
        }
        BatchEvent::FileWritten { file, .. } => {
            let verb = if dry_run { "would write" } else { "->" };
            println!(
                "  ✓ {} {} {} ({} lines, {} changed)",
                file.name,
                verb,
                file.output.display(),
                file.lines,
                file.changed_lines
            );
        }
        BatchEvent::FileSkipped { file, .. } => {
            eprintln!("  ✗ {}: {}", file.name, file.message);
        }
        BatchEvent::Finished { .. } => {}
    }
}

fn print_event_json(event: &BatchEvent) -> serde_json::Result<()> {
    let output = match event {
        BatchEvent::Started { total } => serde_json::json!({
            "event": "started",
            "total": total,
        }),
        BatchEvent::FileWritten { index, file } => serde_json::json!({
            "event": "file_written",
            "index": index,
            "file": file,
        }),
        BatchEvent::FileSkipped { index, file } => serde_json::json!({
            "event": "file_skipped",
            "index": index,
            "file": file,
        }),
        BatchEvent::Finished { processed, skipped } => serde_json::json!({
            "event": "finished",
            "processed": processed,
            "skipped": skipped,
        }),
    };
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

fn cmd_list(run: &RunArgs, json: bool) -> Result<()> {
    let config = load_run_config(run, json)?;
    let candidates = doxytag::list_candidates(&config)?;

    if json {
        for candidate in &candidates {
            let output = serde_json::json!({
                "event": "candidate",
                "name": candidate.name,
                "output": config.output_dir().join(&candidate.output_name).display().to_string(),
            });
            println!("{}", serde_json::to_string(&output)?);
        }
    } else {
        println!("🔍 Candidates in {}", config.source_dir()?.display());
        println!();
        for candidate in &candidates {
            println!(
                "  {} -> {}",
                candidate.name,
                config.output_dir().join(&candidate.output_name).display()
            );
        }
        println!();
        println!("Found {} candidate files", candidates.len());
    }

    Ok(())
}

fn cmd_rules(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path, json)?;
    let table = config.rule_table();

    if json {
        for (index, rule) in table.rules().iter().enumerate() {
            let output = serde_json::json!({
                "event": "rule",
                "index": index,
                "pattern": rule.pattern,
                "replacement": rule.replacement,
            });
            println!("{}", serde_json::to_string(&output)?);
        }
        return Ok(());
    }

    let width = table
        .rules()
        .iter()
        .map(|r| r.pattern.len())
        .max()
        .unwrap_or(0);
    for (index, rule) in table.rules().iter().enumerate() {
        println!(
            "{:>3}. {:<width$}  ->  {}",
            index + 1,
            format!("\"{}\"", rule.pattern),
            format!("\"{}\"", rule.replacement),
            width = width + 2
        );
    }

    Ok(())
}
