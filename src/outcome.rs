//! Per-row scrape outcomes
//!
//! Each audited row takes exactly one of a small set of code paths, and each
//! path produces a different set of output columns. The paths are modelled as
//! explicit variants here, with a single flattening function that turns any
//! variant into the column-keyed record merged onto the input row. Keeping
//! the branching in one enum makes every path constructible in tests.

use serde_json::{json, Value};

/// Output column names contributed by the scrape
pub mod fields {
    pub const SERVICE_SCRAPED: &str = "Service Scraped";
    pub const SERVICE_PAGE_ERROR: &str = "Service Page Error Message";
    pub const STATEMENT_LINK_URL: &str = "Accessibility Statement Link URL";
    pub const STATEMENT_SCRAPED: &str = "Accessibility Statement Scraped";
    pub const STATEMENT_ERROR: &str = "Accessibility Statement Error Message";
    pub const STATUS_FOUND: &str = "Accessibility Statement Compliance Status Found";
    pub const STATUS_TEXT: &str = "Accessibility Statement Compliance Status Text";
    pub const COMPLIANCE_LINK: &str = "Accessibility Statement Compliance link";
    pub const COMPLIANCE_CATEGORY: &str = "Accessibility Statement Compliance category";
}

/// Fixed result messages shared between the scrapers and their tests
pub mod messages {
    pub const NO_LINK_FOUND: &str = "No Link found";
    pub const JAVASCRIPT_LINK: &str =
        "Accessibility statement is a javascript link, needs headless scraper upgrade";
    pub const NO_CONTENT_AFTER_HEADING: &str =
        "No content found after compliance status heading";
}

/// Declared compliance category of an accessibility statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceCategory {
    FullyCompliant,
    PartiallyCompliant,
    NotCompliant,
    /// A compliance-status block exists but matches none of the standard
    /// GDS wordings
    NonStandardDeclaration,
}

impl ComplianceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceCategory::FullyCompliant => "fully-compliant",
            ComplianceCategory::PartiallyCompliant => "partially-compliant",
            ComplianceCategory::NotCompliant => "not-compliant",
            ComplianceCategory::NonStandardDeclaration => "non-standard-compliance-declaration",
        }
    }

    /// Classify a compliance-status block by case-insensitive substring
    /// search. Priority order matters: statements sometimes mention several
    /// wordings and the first match wins.
    pub fn classify(block_text: &str) -> Self {
        let lowered = block_text.to_lowercase();
        if lowered.contains("partially compliant") {
            ComplianceCategory::PartiallyCompliant
        } else if lowered.contains("fully compliant") {
            ComplianceCategory::FullyCompliant
        } else if lowered.contains("not compliant") {
            ComplianceCategory::NotCompliant
        } else {
            ComplianceCategory::NonStandardDeclaration
        }
    }
}

/// What was found around the "Compliance status" heading of a statement page
#[derive(Debug, Clone, PartialEq)]
pub enum ComplianceBlock {
    /// Heading located and followed by a content element
    Found {
        /// Trimmed text of the element following the heading
        text: String,
        /// href of the first anchor inside that element, when present
        link: Option<String>,
        category: ComplianceCategory,
    },
    /// No heading with normalized text "compliance-status" on the page
    NoHeading,
    /// Heading present but no element node follows it
    NoContentAfterHeading,
}

/// Terminal outcome of scraping one input row
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutcome {
    /// Row had no Service URL; nothing was fetched
    Skipped,
    /// The service page itself could not be fetched
    ServiceFetchFailed { message: String },
    /// Service page fetched, but no anchor matched the accessibility link text
    NoLinkFound,
    /// The matched anchor is a `javascript:` pseudo-link; needs manual follow-up
    JavascriptLink,
    /// Statement link resolved but the statement page could not be fetched
    StatementFetchFailed { link_url: String, message: String },
    /// Statement page fetched and searched for a compliance status
    StatementParsed {
        link_url: String,
        block: ComplianceBlock,
    },
}

impl ScrapeOutcome {
    /// Flatten the outcome into ordered column/value pairs. Values are
    /// `true`/`false`, strings, or null - nulls render as empty CSV cells.
    pub fn to_fields(&self) -> Vec<(String, Value)> {
        match self {
            ScrapeOutcome::Skipped => Vec::new(),

            ScrapeOutcome::ServiceFetchFailed { message } => vec![
                (fields::SERVICE_SCRAPED.to_string(), json!(false)),
                (fields::SERVICE_PAGE_ERROR.to_string(), json!(message)),
            ],

            ScrapeOutcome::NoLinkFound => vec![
                (fields::SERVICE_SCRAPED.to_string(), json!(true)),
                (fields::STATEMENT_SCRAPED.to_string(), json!(false)),
                (
                    fields::STATEMENT_ERROR.to_string(),
                    json!(messages::NO_LINK_FOUND),
                ),
            ],

            ScrapeOutcome::JavascriptLink => vec![
                (fields::SERVICE_SCRAPED.to_string(), json!(true)),
                (fields::STATEMENT_SCRAPED.to_string(), json!(false)),
                (
                    fields::STATEMENT_ERROR.to_string(),
                    json!(messages::JAVASCRIPT_LINK),
                ),
            ],

            ScrapeOutcome::StatementFetchFailed { link_url, message } => vec![
                (fields::SERVICE_SCRAPED.to_string(), json!(true)),
                (fields::STATEMENT_LINK_URL.to_string(), json!(link_url)),
                (fields::STATEMENT_SCRAPED.to_string(), json!(false)),
                (fields::STATEMENT_ERROR.to_string(), json!(message)),
            ],

            ScrapeOutcome::StatementParsed { link_url, block } => {
                let mut out = vec![
                    (fields::SERVICE_SCRAPED.to_string(), json!(true)),
                    (fields::STATEMENT_LINK_URL.to_string(), json!(link_url)),
                    (fields::STATEMENT_SCRAPED.to_string(), json!(true)),
                ];
                match block {
                    ComplianceBlock::Found {
                        text,
                        link,
                        category,
                    } => {
                        out.push((fields::STATUS_FOUND.to_string(), json!(true)));
                        out.push((fields::STATUS_TEXT.to_string(), json!(text)));
                        out.push((
                            fields::COMPLIANCE_LINK.to_string(),
                            link.as_deref().map_or(Value::Null, |l| json!(l)),
                        ));
                        out.push((
                            fields::COMPLIANCE_CATEGORY.to_string(),
                            json!(category.as_str()),
                        ));
                    }
                    // "Status Found" is tri-state: true when a block was
                    // located, null otherwise - never false.
                    ComplianceBlock::NoHeading => {
                        out.push((fields::STATUS_FOUND.to_string(), Value::Null));
                        out.push((fields::STATUS_TEXT.to_string(), Value::Null));
                        out.push((fields::COMPLIANCE_LINK.to_string(), Value::Null));
                        out.push((fields::COMPLIANCE_CATEGORY.to_string(), Value::Null));
                    }
                    ComplianceBlock::NoContentAfterHeading => {
                        out.push((fields::STATUS_FOUND.to_string(), Value::Null));
                        out.push((fields::STATUS_TEXT.to_string(), Value::Null));
                        out.push((fields::COMPLIANCE_LINK.to_string(), Value::Null));
                        out.push((fields::COMPLIANCE_CATEGORY.to_string(), Value::Null));
                        out.push((
                            fields::STATEMENT_ERROR.to_string(),
                            json!(messages::NO_CONTENT_AFTER_HEADING),
                        ));
                    }
                }
                out
            }
        }
    }

    /// Render the flattened fields as a single JSON-object line for the
    /// operator console dump, preserving field order.
    pub fn dump_line(&self) -> String {
        let parts: Vec<String> = self
            .to_fields()
            .iter()
            .map(|(name, value)| format!("{}: {}", json!(name), value))
            .collect();
        format!("{{{}}}", parts.join(", "))
    }
}
