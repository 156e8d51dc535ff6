//! Fetch entry points for BrowseKit
//!
//! This module provides the main entry points for fetching locators.
//! The per-scheme transports live in the [`fetchers`](crate::fetchers) module.

use crate::error::FetchError;
use crate::fetchers::FetcherRegistry;
use crate::locator::Locator;
use crate::types::{HeaderPolicy, HttpVersion, Page};
use std::path::PathBuf;

/// Fetch options that can be configured via the agent builder
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Custom User-Agent (HTTP/1.1 requests only)
    pub user_agent: Option<String>,
    /// Protocol version for network requests
    pub http_version: HttpVersion,
    /// Treatment of transfer-encoding / content-encoding response headers
    pub header_policy: HeaderPolicy,
    /// Directory `file://` paths are resolved against; the current
    /// directory when unset
    pub file_root: Option<PathBuf>,
}

/// Fetch a locator with default options
///
/// For custom options, use [`fetch_with_options`].
pub async fn fetch(locator: &Locator) -> Result<Page, FetchError> {
    fetch_with_options(locator, &FetchOptions::default()).await
}

/// Fetch a locator with custom options
///
/// Uses the default fetcher registry. For custom transports, use
/// [`FetcherRegistry`] directly.
pub async fn fetch_with_options(
    locator: &Locator,
    options: &FetchOptions,
) -> Result<Page, FetchError> {
    FetcherRegistry::with_defaults().fetch(locator, options).await
}
