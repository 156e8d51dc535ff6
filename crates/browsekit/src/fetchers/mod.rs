//! Per-scheme transports
//!
//! Design: each fetcher handles one family of schemes. FetcherRegistry
//! dispatches with an exhaustive match on [`Scheme`], so a new scheme
//! does not compile until it is routed somewhere.

mod data;
mod file;
mod http;

pub use data::DataFetcher;
pub use file::FileFetcher;
pub use http::HttpFetcher;

use crate::client::FetchOptions;
use crate::error::FetchError;
use crate::locator::{Locator, Scheme};
use crate::types::Page;
use async_trait::async_trait;

/// Trait for scheme transports
///
/// A fetcher retrieves the body behind a locator and returns it as text
/// together with whatever metadata its transport provides.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Unique identifier for this fetcher (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Fetch the body behind `locator`
    ///
    /// Called only for locators whose scheme the registry routes here.
    async fn fetch(&self, locator: &Locator, options: &FetchOptions) -> Result<Page, FetchError>;
}

/// Routes each scheme to its fetcher
pub struct FetcherRegistry {
    network: Box<dyn Fetcher>,
    file: Box<dyn Fetcher>,
    data: Box<dyn Fetcher>,
}

impl Default for FetcherRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl FetcherRegistry {
    /// Create a registry with the built-in fetchers
    ///
    /// - `http`, `https` -> HttpFetcher
    /// - `file` -> FileFetcher
    /// - `data` -> DataFetcher
    pub fn with_defaults() -> Self {
        Self {
            network: Box::new(HttpFetcher::new()),
            file: Box::new(FileFetcher::new()),
            data: Box::new(DataFetcher::new()),
        }
    }

    /// Replace the fetcher used for `http` and `https`
    pub fn network(mut self, fetcher: Box<dyn Fetcher>) -> Self {
        self.network = fetcher;
        self
    }

    /// Replace the fetcher used for `file`
    pub fn file(mut self, fetcher: Box<dyn Fetcher>) -> Self {
        self.file = fetcher;
        self
    }

    /// Replace the fetcher used for `data`
    pub fn data(mut self, fetcher: Box<dyn Fetcher>) -> Self {
        self.data = fetcher;
        self
    }

    /// Fetcher responsible for `scheme`
    pub fn fetcher_for(&self, scheme: Scheme) -> &dyn Fetcher {
        match scheme {
            Scheme::Http | Scheme::Https => self.network.as_ref(),
            Scheme::File => self.file.as_ref(),
            Scheme::Data => self.data.as_ref(),
        }
    }

    /// Fetch a locator using the fetcher for its scheme
    pub async fn fetch(
        &self,
        locator: &Locator,
        options: &FetchOptions,
    ) -> Result<Page, FetchError> {
        let fetcher = self.fetcher_for(locator.scheme());
        tracing::debug!(fetcher = fetcher.name(), locator = %locator, "Using fetcher");
        fetcher.fetch(locator, options).await
    }
}
