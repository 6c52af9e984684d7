use anyhow::{Context, Result};
use colored::Colorize;
use explain_core::analyze::{self, FileReport};
use explain_core::prompt::Mode;
use explain_core::runner::ModelRunner;
use std::io::Write;
use std::path::{Path, PathBuf};

/// How a file or directory should be analysed and reported.
pub struct Options<'a> {
    pub instruction: &'a str,
    pub mode: Mode,
    pub json: bool,
}

/// Where results and diagnostics go.
pub struct Output<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
}

pub fn run_file(
    runner: &dyn ModelRunner,
    path: &Path,
    opts: &Options,
    output: Output,
) -> Result<()> {
    match analyze::analyze_file(runner, path, opts.instruction, opts.mode) {
        Ok(answer) => {
            if opts.json {
                let report = FileReport::success(path.to_path_buf(), answer);
                writeln!(output.out, "{}", serde_json::to_string_pretty(&[report])?)?;
            } else {
                writeln!(output.out, "{answer}")?;
            }
            Ok(())
        }
        Err(e) => {
            if opts.json {
                let report = FileReport::failure(path.to_path_buf(), &e);
                writeln!(output.out, "{}", serde_json::to_string_pretty(&[report])?)?;
            } else if let Some(raw) = e.raw_output() {
                writeln!(
                    output.err,
                    "  {} failed to parse model response for {}",
                    "Error".red(),
                    path.display()
                )?;
                print_raw(output.err, raw)?;
            }
            Err(e).with_context(|| format!("analyzing {}", path.display()))
        }
    }
}

pub fn run_dir(runner: &dyn ModelRunner, dir: &Path, opts: &Options, output: Output) -> Result<()> {
    let files = analyze::list_files_in_dir(dir).context("failed to read directory")?;
    if files.is_empty() {
        if opts.json {
            writeln!(output.out, "[]")?;
        } else {
            writeln!(
                output.err,
                "  {} no files found in {}",
                "Warning".yellow(),
                dir.display()
            )?;
        }
        return Ok(());
    }

    report_files(runner, &files, opts, output)
}

/// Analyse `files` in order and print one entry per file.
fn report_files(
    runner: &dyn ModelRunner,
    files: &[PathBuf],
    opts: &Options,
    output: Output,
) -> Result<()> {
    let Output { out, err } = output;

    let reports = analyze::analyze_files(runner, files, opts.instruction, opts.mode, |path| {
        if !opts.json {
            let _ = writeln!(out, "{} {}...", "Analyzing".cyan(), path.display());
        }
    });

    if opts.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?;
        return Ok(());
    }

    let mut failed = 0;
    for report in &reports {
        if let Some(answer) = &report.answer {
            writeln!(out, "{}", report.path.display().to_string().bold())?;
            writeln!(out, "{answer}")?;
            writeln!(out)?;
            continue;
        }
        failed += 1;
        writeln!(
            err,
            "  {} analyzing {}: {}",
            "Error".red(),
            report.path.display(),
            report.error.as_deref().unwrap_or("unknown error")
        )?;
        if let Some(raw) = &report.raw_output {
            print_raw(err, raw)?;
        }
    }

    let summary = format!(
        "{} file{} analyzed, {} failed",
        reports.len(),
        if reports.len() == 1 { "" } else { "s" },
        failed
    );
    if failed == 0 {
        writeln!(out, "{}", summary.green())?;
    } else {
        writeln!(out, "{}", summary.yellow())?;
    }
    Ok(())
}

fn print_raw(err: &mut dyn Write, raw: &str) -> std::io::Result<()> {
    writeln!(err, "{}", "Raw output:".dimmed())?;
    writeln!(err, "{raw}")
}
