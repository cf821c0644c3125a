//! epc-fetch library
//!
//! This crate provides the core functionality for the `epc-fetch` binary.
//! Keep the crate root minimal; implementation and tests live in their modules.
//!
//! ## Overview
//!
//! - [`auth`] - Builds the `Basic` authorization header from the account credentials
//! - [`fetcher`] - Paginated certificate search against the EPC API
//! - [`writer`] - Persists each certificate as `<uprn>.json`, isolating per-record failures
//! - [`workflow`] - Runs the fetch-then-write pipeline for one postcode
//! - [`cli`] - Command-line interface and interactive postcode prompt
//! - [`config`] - TOML configuration with defaults
//! - [`models`] - Endpoints and certificate rows
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use epc_fetch::{auth::Credentials, config::ResolvedConfig, errors::AppResult, workflow};
//!
//! # async fn example() -> AppResult<()> {
//! let config = ResolvedConfig::default();
//! let credentials = Credentials::from_env()?;
//!
//! let summary = workflow::run("SW1A 1AA", &config, &credentials).await?;
//! println!("{} certificates written", summary.written);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod fetcher;
pub mod models;
pub mod ui;
pub mod utils;
pub mod workflow;
pub mod writer;
