//! Paginated certificate search against the EPC API.
//!
//! The main entry point is [`CertificateFetcher::fetch_certificates`], which
//! walks the search results for a postcode page by page and returns every row.

mod certificate_fetcher;
mod page;

// Re-export public API
pub use certificate_fetcher::{
    build_client, CertificateFetcher, FetchOptions, FetchedCertificates,
};
pub use page::{parse_rows, ResultPage};
