use super::page::{parse_rows, ResultPage};
use crate::auth::AuthHeader;
use crate::config::ResolvedConfig;
use crate::constants::DEFAULT_PAGE_SIZE;
use crate::errors::{AppError, AppResult};
use crate::models::CertificateRow;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Pagination settings for a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Rows requested per page; a page shorter than this ends the search
    pub page_size: u32,
    /// Caller-imposed cap on page requests. `None` keeps requesting for as
    /// long as the API returns full pages.
    pub max_pages: Option<u32>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: None,
        }
    }
}

impl From<&ResolvedConfig> for FetchOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            page_size: config.page_size,
            max_pages: config.max_pages,
        }
    }
}

/// Builds the HTTP client used for all search requests.
pub fn build_client(config: &ResolvedConfig) -> AppResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| AppError::Network(format!("Failed to build HTTP client: {e}")))
}

/// Everything a search returned for one endpoint.
#[derive(Debug, Default)]
pub struct FetchedCertificates {
    /// Certificate rows in page order
    pub rows: Vec<CertificateRow>,
    /// Entries of `rows` arrays that were not JSON objects and were dropped
    pub skipped: usize,
}

/// Authenticated, paginated client for an EPC search endpoint.
pub struct CertificateFetcher {
    client: reqwest::Client,
    auth: AuthHeader,
    options: FetchOptions,
}

impl CertificateFetcher {
    pub fn new(client: reqwest::Client, auth: AuthHeader, options: FetchOptions) -> Self {
        Self {
            client,
            auth,
            options,
        }
    }

    /// Fetches every certificate for `postcode` from `endpoint_url`.
    ///
    /// Pages are requested from zero upwards. The search ends on the first
    /// empty page or the first page shorter than the page size; a full page
    /// always triggers another request. Rows are returned in page order and
    /// are not deduplicated; entries that are not objects are counted in
    /// [`FetchedCertificates::skipped`].
    ///
    /// # Errors
    ///
    /// Returns `Network` if a request cannot be sent or the API answers with a
    /// non-success status. Nothing is retried and rows from earlier pages are
    /// discarded.
    pub async fn fetch_certificates(
        &self,
        endpoint_url: &Url,
        postcode: &str,
    ) -> AppResult<FetchedCertificates> {
        let page_size = self.options.page_size as usize;
        let mut all_rows = Vec::new();
        let mut skipped = 0;
        let mut page: u32 = 0;
        let mut requests: u32 = 0;

        loop {
            if let Some(max_pages) = self.options.max_pages {
                if page >= max_pages {
                    warn!(
                        max_pages,
                        rows = all_rows.len(),
                        "Page limit reached, stopping before the search was exhausted"
                    );
                    break;
                }
            }

            let ResultPage {
                rows,
                received,
                skipped: page_skipped,
            } = self.fetch_page(endpoint_url, postcode, page).await?;
            requests += 1;
            debug!(page, received, "Fetched page");

            if received == 0 {
                break;
            }
            all_rows.extend(rows);
            skipped += page_skipped;
            if received < page_size {
                break;
            }
            page += 1;
        }

        info!(
            endpoint = endpoint_url.as_str(),
            postcode,
            rows = all_rows.len(),
            skipped,
            pages = requests,
            "Certificates fetched"
        );

        Ok(FetchedCertificates {
            rows: all_rows,
            skipped,
        })
    }

    async fn fetch_page(
        &self,
        endpoint_url: &Url,
        postcode: &str,
        page: u32,
    ) -> AppResult<ResultPage> {
        let response = self
            .client
            .get(endpoint_url.clone())
            .query(&[
                ("postcode", postcode.to_string()),
                ("page", page.to_string()),
                ("size", self.options.page_size.to_string()),
            ])
            .header(AUTHORIZATION, self.auth.as_str())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Failed to fetch page {page}: {e}")))?;

        let status = response.status();
        let response = response.error_for_status().map_err(|e| {
            let status_code = status.as_u16();
            AppError::Network(format!(
                "HTTP {status_code}: Failed to fetch page {page}: {e}"
            ))
        })?;

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read page {page}: {e}")))?;

        Ok(parse_rows(&body))
    }
}
