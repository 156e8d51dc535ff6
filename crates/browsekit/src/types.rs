//! Core types for BrowseKit

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// HTTP protocol version used for outgoing requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpVersion {
    /// HTTP/1.0, `Host` header only
    #[serde(rename = "1.0")]
    Http10,
    /// HTTP/1.1 with `Connection: close` and `User-Agent`
    #[default]
    #[serde(rename = "1.1")]
    Http11,
}

impl FromStr for HttpVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches("HTTP/") {
            "1.0" => Ok(HttpVersion::Http10),
            "1.1" => Ok(HttpVersion::Http11),
            _ => Err("Invalid HTTP version: must be 1.0 or 1.1".to_string()),
        }
    }
}

impl std::fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpVersion::Http10 => write!(f, "1.0"),
            HttpVersion::Http11 => write!(f, "1.1"),
        }
    }
}

/// How the response parser treats `transfer-encoding` and `content-encoding`
///
/// Neither encoding is ever decoded. `Strict` rejects responses that carry
/// them; `Lenient` logs and ignores the headers, passing the body through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPolicy {
    #[default]
    Strict,
    Lenient,
}

/// Result of fetching a locator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// The fetched locator, re-serialized
    pub locator: String,

    /// HTTP status code (network schemes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// HTTP reason phrase (network schemes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Content-Type header value, or the inline content type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Charset the body was decoded with (network schemes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,

    /// Body size in bytes
    pub size: u64,

    /// True when markup should be shown verbatim
    #[serde(default)]
    pub view_source: bool,

    /// Body text
    pub content: String,
}
