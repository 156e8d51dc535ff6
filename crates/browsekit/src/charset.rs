//! Response charset resolution

use crate::error::FetchError;
use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;

const CHARSET_PARAM: &str = "charset=";

/// Extract the `charset` parameter from a Content-Type header value
///
/// The label runs from `charset=` up to the next `;` or `,`, with
/// surrounding whitespace and quotes removed. Returns `None` when the value
/// carries no charset.
pub fn resolve(content_type: &str) -> Option<String> {
    let idx = content_type.to_ascii_lowercase().find(CHARSET_PARAM)?;
    let after = &content_type[idx + CHARSET_PARAM.len()..];
    let end = after.find([';', ',']).unwrap_or(after.len());

    let label = after[..end].trim().trim_matches(['"', '\'']).trim();
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

/// Pick the decoder for a response, defaulting to UTF-8
pub fn encoding_for(content_type: Option<&str>) -> Result<&'static Encoding, FetchError> {
    match content_type.and_then(resolve) {
        None => Ok(UTF_8),
        Some(label) => {
            Encoding::for_label(label.as_bytes()).ok_or(FetchError::UnknownCharset(label))
        }
    }
}

/// Decode `bytes` strictly; malformed input is an error, never replaced
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> Result<String, FetchError> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
        .ok_or(FetchError::Encoding {
            charset: encoding.name(),
        })
}
