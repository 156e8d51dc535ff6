//! Inline `data:` fetcher

use crate::client::FetchOptions;
use crate::error::{FetchError, ParseError};
use crate::fetchers::Fetcher;
use crate::locator::Locator;
use crate::types::Page;
use async_trait::async_trait;

/// The only inline content type that is materialized into a document
const HTML_CONTENT_TYPE: &str = "text/html";

/// Fetcher for `data:` locators
///
/// Wraps a `text/html` payload, unchanged, in a minimal HTML document.
pub struct DataFetcher;

impl DataFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DataFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for DataFetcher {
    fn name(&self) -> &'static str {
        "data"
    }

    async fn fetch(&self, locator: &Locator, _options: &FetchOptions) -> Result<Page, FetchError> {
        let (content_type, payload) = match (locator.content_type(), locator.payload()) {
            (Some(content_type), Some(payload)) => (content_type, payload),
            _ => return Err(ParseError::UnsupportedScheme(locator.scheme().to_string()).into()),
        };

        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        if !media_type.eq_ignore_ascii_case(HTML_CONTENT_TYPE) {
            return Err(FetchError::UnsupportedContentType(content_type.to_string()));
        }

        let content = format!("<html><head></head><body>{}</body></html>", payload);

        Ok(Page {
            locator: locator.to_string(),
            content_type: Some(content_type.to_string()),
            size: content.len() as u64,
            view_source: locator.is_view_source(),
            content,
            ..Default::default()
        })
    }
}
