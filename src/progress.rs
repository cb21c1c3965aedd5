//! Progress display for batch cropping.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::batch::{BatchSummary, FileReport, FileStatus};

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// No output
    Quiet,
    /// Progress bar and summary
    #[default]
    Normal,
    /// One line per file
    Verbose,
    /// One line per file plus crop diagnostics in the log
    VeryVerbose,
}

impl OutputMode {
    /// Create OutputMode from the `-v` count and `--quiet` flag
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return OutputMode::Quiet;
        }
        match verbose {
            0 => OutputMode::Normal,
            1 => OutputMode::Verbose,
            _ => OutputMode::VeryVerbose,
        }
    }

    /// Check if output should be shown at this mode
    pub fn should_show(&self, required: OutputMode) -> bool {
        use OutputMode::*;
        match (self, required) {
            (Quiet, _) => false,
            (Normal, Quiet | Normal) => true,
            (Verbose, Quiet | Normal | Verbose) => true,
            (VeryVerbose, _) => true,
            _ => false,
        }
    }
}

/// Progress template for the batch bar
const PROGRESS_TEMPLATE: &str = "{bar:40} {pos}/{len} {msg}";

/// Tracks per-file completion during a batch
pub struct ProgressTracker {
    bar: Option<ProgressBar>,
    output_mode: OutputMode,
}

impl ProgressTracker {
    /// Create a tracker for `total_files` files.
    ///
    /// A bar is only drawn in normal mode and for more than one file.
    pub fn new(total_files: usize, output_mode: OutputMode) -> Self {
        let bar = (output_mode == OutputMode::Normal && total_files > 1).then(|| {
            let bar = ProgressBar::new(total_files as u64);
            if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
                bar.set_style(style.progress_chars("=>-"));
            }
            bar
        });
        Self { bar, output_mode }
    }

    /// Record one finished file
    pub fn file_done(&self, report: &FileReport) {
        if let Some(bar) = &self.bar {
            bar.set_message(file_name(&report.source));
            bar.inc(1);
        }
        if self.output_mode.should_show(OutputMode::Verbose) {
            println!("{}", describe(report));
        }
    }

    /// Remove the bar
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    /// Print final summary
    pub fn print_summary(summary: &BatchSummary) {
        println!();
        println!("{}", "=".repeat(60));
        println!("Crop Summary");
        println!("{}", "=".repeat(60));
        println!("  Total files:  {}", summary.total);
        println!("  Cropped:      {}", summary.cropped);
        println!("  Unchanged:    {}", summary.unchanged);
        println!("  Errors:       {}", summary.failed);
        println!("{}", "=".repeat(60));
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One-line description of a file outcome
pub fn describe(report: &FileReport) -> String {
    let name = file_name(&report.source);
    match &report.status {
        FileStatus::Cropped {
            output,
            width,
            height,
        } => format!("{}: cropped to {}x{} -> {}", name, width, height, output.display()),
        FileStatus::Unchanged => format!("{}: no adjustments", name),
        FileStatus::Failed(e) => format!("{}: error: {}", name, e),
    }
}
