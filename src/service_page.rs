//! Service page scraping
//!
//! Fetches a service's primary page, locates the accessibility-statement link
//! by normalized anchor text, resolves the href into an absolute URL, and
//! delegates to the statement scraper. Every failure mode collapses into a
//! [`ScrapeOutcome`] variant; nothing here aborts the batch.

use crate::dom_utils::{element_text, normalize_label};
use crate::fetcher::Fetcher;
use crate::outcome::ScrapeOutcome;
use crate::statement_page::{self, StatementScrape};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

// Selector strings are compile-time constants containing valid CSS, so the
// unwrap cannot fail.
static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// Anchor texts accepted as pointing at an accessibility statement, after
/// normalization. Most services label the link "Accessibility statement";
/// a handful use just "Accessibility".
const LINK_LABELS: [&str; 2] = ["accessibility-statement", "accessibility"];

/// Where the accessibility-statement link search landed
#[derive(Debug, Clone, PartialEq)]
enum LinkTarget {
    /// No anchor matched, or the matching anchor carries no href
    NotFound,
    /// The anchor is a `javascript:` pseudo-link
    Javascript,
    /// Resolved absolute URL string (syntactic validity is checked at fetch
    /// time, where failures are recoverable)
    Resolved(String),
}

/// Scrape one service page. `service_url` must be non-empty; the caller
/// skips rows without a URL.
pub async fn scrape_service(fetcher: &Fetcher, service_url: &str) -> ScrapeOutcome {
    let service_uri = match Url::parse(service_url) {
        Ok(url) => url,
        Err(e) => {
            return ScrapeOutcome::ServiceFetchFailed {
                message: format!("Invalid URL '{}': {}", service_url, e),
            }
        }
    };

    debug!("Getting page: {}", service_url);
    let page = match fetcher.fetch_url(service_uri.clone()).await {
        Ok(page) => page,
        Err(e) => {
            return ScrapeOutcome::ServiceFetchFailed {
                message: e.to_string(),
            }
        }
    };

    // The document is parsed and dropped inside this block; only the resolved
    // target survives into the statement fetch.
    let target = find_statement_link(&page.body, &service_uri);

    match target {
        LinkTarget::NotFound => ScrapeOutcome::NoLinkFound,
        LinkTarget::Javascript => ScrapeOutcome::JavascriptLink,
        LinkTarget::Resolved(link_url) => {
            debug!("Scraping {}", link_url);
            match statement_page::scrape_statement(fetcher, &link_url).await {
                StatementScrape::FetchFailed { message } => {
                    ScrapeOutcome::StatementFetchFailed { link_url, message }
                }
                StatementScrape::Parsed(block) => {
                    ScrapeOutcome::StatementParsed { link_url, block }
                }
            }
        }
    }
}

/// Search the page for the first anchor whose normalized text matches one of
/// [`LINK_LABELS`], and resolve its href.
fn find_statement_link(body: &str, service_uri: &Url) -> LinkTarget {
    let document = Html::parse_document(body);

    let anchor = document
        .select(&ANCHOR_SELECTOR)
        .find(|a| LINK_LABELS.contains(&normalize_label(&element_text(*a)).as_str()));

    let anchor = match anchor {
        Some(a) => a,
        None => return LinkTarget::NotFound,
    };

    match anchor.value().attr("href") {
        Some(href) => resolve_statement_href(href, service_uri),
        None => {
            debug!("Matching anchor has no href attribute");
            LinkTarget::NotFound
        }
    }
}

/// Resolve an accessibility-statement href into an absolute URL, reproducing
/// the audit's resolution rules rather than RFC 3986 reference resolution:
/// a path not starting with `/` gets one prefixed, a missing host is taken
/// from the service URL, and a missing scheme becomes `https`.
fn resolve_statement_href(href: &str, service_uri: &Url) -> LinkTarget {
    let href = href.trim();

    match Url::parse(href) {
        Ok(parsed) => {
            if parsed.scheme() == "javascript" {
                LinkTarget::Javascript
            } else {
                LinkTarget::Resolved(parsed.to_string())
            }
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            // Protocol-relative href: host present, scheme missing.
            if let Some(rest) = href.strip_prefix("//") {
                return LinkTarget::Resolved(format!("https://{}", rest));
            }

            let path = if href.starts_with('/') {
                href.to_string()
            } else {
                format!("/{}", href)
            };
            let host = service_uri.host_str().unwrap_or_default();
            LinkTarget::Resolved(format!("https://{}{}", host, path))
        }
        Err(_) => {
            // Leave syntactically hopeless hrefs as-is; the statement fetch
            // reports them as a recoverable InvalidUrl failure.
            LinkTarget::Resolved(href.to_string())
        }
    }
}
