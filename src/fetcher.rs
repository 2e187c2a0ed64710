//! HTTP fetching with manual redirect handling
//!
//! Automatic redirect following is disabled on the underlying client. The
//! fetcher inspects 301/302/303 responses itself and re-issues GET against the
//! `Location` header, up to a configured hop limit, keeping each intermediate
//! status observable.

use crate::config::HttpConfig;
use anyhow::Result;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Per-fetch failure taxonomy. All variants are recoverable at the row level;
/// callers convert them into result fields rather than aborting the batch.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Response code {status} for {url}")]
    ResponseCode { status: StatusCode, url: String },

    #[error("Redirect response from {url} has no Location header")]
    MissingLocation { url: String },

    #[error("Too many redirects ({hops}) following {url}")]
    TooManyRedirects { hops: usize, url: String },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A fetched page: the terminal status, the URL that produced it after any
/// redirect hops, and the body text.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: StatusCode,
    pub url: Url,
    pub body: String,
}

/// GET client with redirect handling done by hand
pub struct Fetcher {
    client: reqwest::Client,
    max_redirect_hops: usize,
}

impl Fetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            max_redirect_hops: config.max_redirect_hops,
        })
    }

    fn is_manual_redirect(status: StatusCode) -> bool {
        matches!(status.as_u16(), 301 | 302 | 303)
    }

    /// Fetch `url`, following 301/302/303 responses manually until a
    /// non-redirect status arrives. Terminal non-2xx statuses are errors.
    pub async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        self.fetch_url(parsed).await
    }

    /// As [`fetch`](Self::fetch), starting from an already-parsed URL
    pub async fn fetch_url(&self, url: Url) -> Result<Page, FetchError> {
        let mut current = url;
        let mut hops = 0usize;

        loop {
            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(|e| FetchError::Request {
                    url: current.to_string(),
                    source: e,
                })?;

            let status = response.status();

            if Self::is_manual_redirect(status) {
                hops += 1;
                if hops > self.max_redirect_hops {
                    return Err(FetchError::TooManyRedirects {
                        hops,
                        url: current.to_string(),
                    });
                }

                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
                    .ok_or_else(|| FetchError::MissingLocation {
                        url: current.to_string(),
                    })?;

                debug!("Status: {} for {}", status.as_u16(), current);
                debug!("Redirecting based on location header: {}", location);

                // Location values are allowed to be relative; resolve against
                // the URL that produced the redirect.
                current = current.join(&location).map_err(|e| FetchError::InvalidUrl {
                    url: location.clone(),
                    reason: e.to_string(),
                })?;
                continue;
            }

            if !status.is_success() {
                return Err(FetchError::ResponseCode {
                    status,
                    url: current.to_string(),
                });
            }

            let final_url = current.clone();
            let body = response.text().await.map_err(|e| FetchError::Request {
                url: final_url.to_string(),
                source: e,
            })?;

            return Ok(Page {
                status,
                url: final_url,
                body,
            });
        }
    }
}
