//! Accessibility statement scraping
//!
//! GDS-pattern accessibility statements carry a "Compliance status" heading
//! followed by a block stating the declared category. This module fetches the
//! statement page, finds that heading among h1-h6, and classifies the block
//! immediately after it.

use crate::dom_utils::{element_after, element_text, normalize_label};
use crate::fetcher::Fetcher;
use crate::outcome::{ComplianceBlock, ComplianceCategory};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

// Selector strings are compile-time constants containing valid CSS, so the
// unwrap cannot fail.
static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// Normalized heading text that introduces the compliance declaration
const COMPLIANCE_HEADING: &str = "compliance-status";

/// Result of scraping a statement page
#[derive(Debug, Clone, PartialEq)]
pub enum StatementScrape {
    /// The statement page could not be fetched
    FetchFailed { message: String },
    /// Page fetched; what was found around the compliance heading
    Parsed(ComplianceBlock),
}

/// Fetch a resolved statement URL and extract its compliance declaration
pub async fn scrape_statement(fetcher: &Fetcher, statement_url: &str) -> StatementScrape {
    let page = match fetcher.fetch(statement_url).await {
        Ok(page) => page,
        Err(e) => {
            return StatementScrape::FetchFailed {
                message: e.to_string(),
            }
        }
    };

    StatementScrape::Parsed(extract_compliance_block(&page.body))
}

/// Search h1-h6 in document order for the compliance heading and inspect the
/// element immediately following it.
pub fn extract_compliance_block(body: &str) -> ComplianceBlock {
    let document = Html::parse_document(body);

    let heading = document
        .select(&HEADING_SELECTOR)
        .find(|h| normalize_label(&element_text(*h)) == COMPLIANCE_HEADING);

    let heading = match heading {
        Some(h) => h,
        None => return ComplianceBlock::NoHeading,
    };

    let block = match element_after(heading) {
        Some(element) => element,
        None => {
            debug!("Compliance heading has no following element");
            return ComplianceBlock::NoContentAfterHeading;
        }
    };

    let text = element_text(block).trim().to_string();
    let link = block
        .select(&ANCHOR_SELECTOR)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);
    let category = ComplianceCategory::classify(&text);

    ComplianceBlock::Found {
        text,
        link,
        category,
    }
}
