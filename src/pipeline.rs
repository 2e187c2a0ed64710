//! Audit pipeline driver
//!
//! Strictly sequential: rows are processed one at a time in input order, and
//! a row's two fetches happen one after the other. Every input row produces
//! exactly one output row; scrape failures become result fields, never
//! dropped rows.

use crate::config::AppConfig;
use crate::fetcher::Fetcher;
use crate::logger::AuditLogger;
use crate::outcome::{ComplianceBlock, ScrapeOutcome};
use crate::service_page;
use crate::table::{self, merge_row, OutputTable};
use anyhow::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Run the whole audit: load the export, scrape every row, write the
/// augmented CSV. Returns the output path.
pub async fn run(
    config: &AppConfig,
    input_path: &Path,
    output_path: &Path,
    logger: &AuditLogger,
) -> Result<PathBuf> {
    let rows = table::load_input(input_path)?;
    let fetcher = Fetcher::new(&config.http)?;

    let total = rows.len();
    let distinct_urls: HashSet<&str> = rows.iter().filter_map(|row| row.service_url()).collect();
    logger.print_banner(total, distinct_urls.len());
    logger.start_progress(total as u64);

    let mut output = OutputTable::new();
    for (index, row) in rows.iter().enumerate() {
        let url = row.service_url().unwrap_or("");
        logger.row_progress(index + 1, total, url);

        let outcome = scrape_row(&fetcher, url, logger).await;
        log_diagnostics(&outcome, url, logger);
        if !matches!(outcome, ScrapeOutcome::Skipped) {
            logger.info(&outcome.dump_line());
        }
        logger.record_outcome(&outcome);

        output.push(merge_row(row, outcome.to_fields()));
        logger.advance_progress();
    }
    logger.finish_progress("Audit completed");

    output.write_csv(output_path)?;
    Ok(output_path.to_path_buf())
}

async fn scrape_row(fetcher: &Fetcher, url: &str, logger: &AuditLogger) -> ScrapeOutcome {
    if url.is_empty() {
        logger.info("Skipping: No Service URL present");
        return ScrapeOutcome::Skipped;
    }
    service_page::scrape_service(fetcher, url).await
}

/// Operator-visible diagnostics for rows needing manual follow-up
fn log_diagnostics(outcome: &ScrapeOutcome, service_url: &str, logger: &AuditLogger) {
    match outcome {
        ScrapeOutcome::ServiceFetchFailed { message } => {
            logger.warn(&format!("Scraping failed for: {}", service_url));
            logger.warn(message);
        }
        ScrapeOutcome::NoLinkFound => {
            logger.warn(&format!(
                "No link found with text 'Accessibility statement' on: {}",
                service_url
            ));
        }
        ScrapeOutcome::JavascriptLink => {
            logger.warn("Javascript URL detected, needs to be manually checked");
        }
        ScrapeOutcome::StatementFetchFailed { link_url, message } => {
            logger.warn(&format!("Scraping failed for: {}", link_url));
            logger.warn(message);
        }
        ScrapeOutcome::StatementParsed { link_url, block } => match block {
            ComplianceBlock::NoHeading => {
                logger.warn(&format!("Compliance heading not found on: {}", link_url));
            }
            ComplianceBlock::NoContentAfterHeading => {
                logger.warn(&format!(
                    "No content found after compliance status heading on: {}",
                    link_url
                ));
            }
            ComplianceBlock::Found { .. } => {}
        },
        ScrapeOutcome::Skipped => {}
    }
}
