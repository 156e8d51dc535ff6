//! Local file fetcher

use crate::charset;
use crate::client::FetchOptions;
use crate::error::{FetchError, ParseError};
use crate::fetchers::Fetcher;
use crate::locator::{Locator, Scheme};
use crate::types::Page;
use async_trait::async_trait;
use encoding_rs::UTF_8;
use std::path::PathBuf;

/// Fetcher for `file://` locators
///
/// The locator path loses its leading `/` and is resolved against
/// [`FetchOptions::file_root`]. Contents are returned verbatim.
pub struct FileFetcher;

impl FileFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for FileFetcher {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch(&self, locator: &Locator, options: &FetchOptions) -> Result<Page, FetchError> {
        let path = match (locator.scheme(), locator.path()) {
            (Scheme::File, Some(path)) => resolve_path(path, options),
            _ => return Err(ParseError::UnsupportedScheme(locator.scheme().to_string()).into()),
        };

        tracing::debug!(path = %path.display(), "Reading file");
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| FetchError::ReadFile { path, source })?;
        let content = charset::decode(&bytes, UTF_8)?;

        Ok(Page {
            locator: locator.to_string(),
            size: bytes.len() as u64,
            view_source: locator.is_view_source(),
            content,
            ..Default::default()
        })
    }
}

fn resolve_path(path: &str, options: &FetchOptions) -> PathBuf {
    let relative = path.strip_prefix('/').unwrap_or(path);
    match &options.file_root {
        Some(root) => root.join(relative),
        None => PathBuf::from(relative),
    }
}
