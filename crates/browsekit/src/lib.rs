//! BrowseKit - minimal text-mode user agent
//!
//! This crate parses resource locators, fetches what they point at and
//! renders the result as plain text with markup stripped.
//!
//! ## Pipeline
//!
//! 1. [`Locator::parse`] turns a string into a validated [`Locator`]
//! 2. [`FetcherRegistry`] picks the [`Fetcher`] for the locator's [`Scheme`]
//! 3. The [`Renderer`] writes the body text to any [`std::io::Write`] sink
//!
//! [`Agent`] wires the three steps together.
//!
//! Built-in fetchers:
//! - [`HttpFetcher`] - `http://` and `https://` over a raw HTTP/1.x exchange
//! - [`FileFetcher`] - `file://` paths on the local file system
//! - [`DataFetcher`] - inline `data:text/html,...` documents

pub mod agent;
pub mod charset;
pub mod client;
mod error;
pub mod fetchers;
pub mod http;
mod locator;
mod render;
mod types;

pub use agent::{Agent, AgentBuilder};
pub use client::{fetch, fetch_with_options, FetchOptions};
pub use error::{ErrorKind, FetchError, ParseError};
pub use fetchers::{DataFetcher, Fetcher, FetcherRegistry, FileFetcher, HttpFetcher};
pub use http::{HeaderMap, Response};
pub use locator::{Endpoint, Locator, Scheme};
pub use render::{render, render_to_string, Renderer};
pub use types::{HeaderPolicy, HttpVersion, Page};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "Everruns BrowseKit/1.0";
