//! Operator console output
//!
//! The audit is driven interactively and its console trail is part of the
//! contract: a banner, one progress line per row, diagnostics for rows that
//! need manual follow-up, and a final summary. Messages route through the
//! progress bar's println so they never tear an active bar.

use crate::outcome::{ComplianceBlock, ComplianceCategory, ScrapeOutcome};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum VerbosityLevel {
    Silent = 0,   // Only progress bar and final summary
    Summary = 1,  // Per-row progress, diagnostics, result dumps (default)
    Detailed = 2, // Additional detail lines
}

impl VerbosityLevel {
    pub fn from_verbose_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Summary,
            1.. => VerbosityLevel::Detailed,
        }
    }
}

#[derive(Default)]
struct RunStats {
    rows_processed: usize,
    rows_skipped: usize,
    services_scraped: usize,
    services_failed: usize,
    links_missing: usize,
    javascript_links: usize,
    statements_failed: usize,
    statements_parsed: usize,
    fully_compliant: usize,
    partially_compliant: usize,
    not_compliant: usize,
    non_standard: usize,
    headings_missing: usize,
}

pub struct AuditLogger {
    verbosity: VerbosityLevel,
    progress_bar: Mutex<Option<ProgressBar>>,
    stats: Mutex<RunStats>,
    started: Instant,
}

impl AuditLogger {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            progress_bar: Mutex::new(None),
            stats: Mutex::new(RunStats::default()),
            started: Instant::now(),
        }
    }

    // Core logging functions with consistent timestamp formatting
    pub fn info(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Summary {
            self.print_message("INFO", message);
        }
    }

    pub fn detail(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Detailed {
            self.print_message("INFO", message);
        }
    }

    pub fn warn(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Summary {
            self.print_message("WARN", message);
        }
    }

    /// Errors always show regardless of verbosity
    pub fn error(&self, message: &str) {
        self.print_message("ERROR", message);
    }

    fn print_message(&self, level: &str, message: &str) {
        let timestamp = Utc::now().format("%H:%M:%S%.3f");
        let msg = format!("[{}] {}: {}", timestamp, level, message);

        // Route through an active progress bar to avoid tearing it
        if let Ok(guard) = self.progress_bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.println(msg);
                return;
            }
        }
        eprintln!("{}", msg);
    }

    /// Opening banner: row and distinct-URL counts
    pub fn print_banner(&self, total_rows: usize, distinct_urls: usize) {
        if self.verbosity < VerbosityLevel::Summary {
            return;
        }
        eprintln!("=================================");
        eprintln!("Scraping {} rows", total_rows);
        eprintln!("Scraping {} urls", distinct_urls);
        eprintln!("=================================");
        eprintln!();
    }

    // Progress bar management
    pub fn start_progress(&self, total_rows: u64) {
        let pb = ProgressBar::new(total_rows);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        pb.set_message("Starting audit...");

        if let Ok(mut guard) = self.progress_bar.lock() {
            *guard = Some(pb);
        }
    }

    /// Per-row progress line plus bar message update
    pub fn row_progress(&self, index: usize, total: usize, url: &str) {
        let shown = if url.is_empty() { "(no Service URL)" } else { url };
        self.info(&format!("Scraping {}/{}: {}", index, total, shown));
        if let Ok(guard) = self.progress_bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.set_message(shown.to_string());
            }
        }
    }

    pub fn advance_progress(&self) {
        if let Ok(guard) = self.progress_bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.inc(1);
            }
        }
    }

    pub fn finish_progress(&self, message: &str) {
        if let Ok(mut guard) = self.progress_bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_with_message(message.to_string());
            }
        }
    }

    /// Fold one row's outcome into the running statistics
    pub fn record_outcome(&self, outcome: &ScrapeOutcome) {
        let mut stats = match self.stats.lock() {
            Ok(stats) => stats,
            Err(_) => return,
        };
        stats.rows_processed += 1;

        match outcome {
            ScrapeOutcome::Skipped => stats.rows_skipped += 1,
            ScrapeOutcome::ServiceFetchFailed { .. } => stats.services_failed += 1,
            ScrapeOutcome::NoLinkFound => {
                stats.services_scraped += 1;
                stats.links_missing += 1;
            }
            ScrapeOutcome::JavascriptLink => {
                stats.services_scraped += 1;
                stats.javascript_links += 1;
            }
            ScrapeOutcome::StatementFetchFailed { .. } => {
                stats.services_scraped += 1;
                stats.statements_failed += 1;
            }
            ScrapeOutcome::StatementParsed { block, .. } => {
                stats.services_scraped += 1;
                stats.statements_parsed += 1;
                match block {
                    ComplianceBlock::Found { category, .. } => match category {
                        ComplianceCategory::FullyCompliant => stats.fully_compliant += 1,
                        ComplianceCategory::PartiallyCompliant => stats.partially_compliant += 1,
                        ComplianceCategory::NotCompliant => stats.not_compliant += 1,
                        ComplianceCategory::NonStandardDeclaration => stats.non_standard += 1,
                    },
                    ComplianceBlock::NoHeading | ComplianceBlock::NoContentAfterHeading => {
                        stats.headings_missing += 1;
                    }
                }
            }
        }
    }

    /// Final comprehensive summary, printed after the output file is written
    pub fn print_final_summary(&self) {
        let stats = match self.stats.lock() {
            Ok(stats) => stats,
            Err(_) => return,
        };
        let elapsed = self.started.elapsed();

        eprintln!();
        eprintln!("=== Audit Summary ===");
        eprintln!("Rows processed: {}", stats.rows_processed);
        if stats.rows_skipped > 0 {
            eprintln!("Rows without a Service URL: {}", stats.rows_skipped);
        }
        eprintln!(
            "Service pages scraped: {} ({} failed)",
            stats.services_scraped, stats.services_failed
        );
        eprintln!(
            "Accessibility statements parsed: {} ({} link missing, {} javascript links, {} fetch failures)",
            stats.statements_parsed,
            stats.links_missing,
            stats.javascript_links,
            stats.statements_failed
        );
        if stats.statements_parsed > 0 {
            eprintln!("Declared compliance:");
            eprintln!("  fully-compliant: {}", stats.fully_compliant);
            eprintln!("  partially-compliant: {}", stats.partially_compliant);
            eprintln!("  not-compliant: {}", stats.not_compliant);
            eprintln!("  non-standard-compliance-declaration: {}", stats.non_standard);
            if stats.headings_missing > 0 {
                eprintln!("  compliance heading missing: {}", stats.headings_missing);
            }
        }
        eprintln!("Elapsed: {:.1}s", elapsed.as_secs_f64());
        eprintln!("=====================");
    }
}
