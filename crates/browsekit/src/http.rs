//! HTTP/1.x message codec
//!
//! Composes `GET` requests and parses responses off any buffered async
//! reader. Bodies are read to end of stream; `Content-Length` is not
//! consulted and neither chunked nor compressed bodies are decoded.

use crate::charset;
use crate::error::FetchError;
use crate::locator::Endpoint;
use crate::types::{HeaderPolicy, HttpVersion};
use bytes::Bytes;
use encoding_rs::Encoding;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tracing::{debug, warn};

const CRLF: &str = "\r\n";

/// Response headers that imply a body encoding this codec never decodes
const UNSUPPORTED_HEADERS: &[&str] = &["transfer-encoding", "content-encoding"];

/// Ordered, case-insensitive response header collection
///
/// Names are stored lowercased. A repeated name overwrites the earlier
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    /// Look up a header value by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub(crate) fn insert(&mut self, name: &str, value: &str) {
        let key = name.to_ascii_lowercase();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.entries.push((key, value.to_string())),
        }
    }
}

/// Parsed HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    /// Protocol version from the status line, e.g. `HTTP/1.0`
    pub version: String,
    pub status_code: u16,
    pub reason: String,
    pub headers: HeaderMap,
    /// Raw body bytes, everything after the header block
    pub body: Bytes,
    /// Decoder resolved from the Content-Type charset
    pub encoding: &'static Encoding,
}

impl Response {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type")
    }

    /// Decode the body under the resolved encoding
    pub fn text(&self) -> Result<String, FetchError> {
        charset::decode(&self.body, self.encoding)
    }
}

/// Build the request head for a `GET` of `endpoint`
///
/// HTTP/1.0 sends `Host` only; HTTP/1.1 adds `Connection: close` and
/// `User-Agent`.
pub fn compose_request(
    endpoint: &Endpoint<'_>,
    version: HttpVersion,
    user_agent: &str,
) -> String {
    let mut headers = vec![("Host", endpoint.host_header())];
    if version == HttpVersion::Http11 {
        headers.push(("Connection", "close".to_string()));
        headers.push(("User-Agent", user_agent.to_string()));
    }

    let mut request = format!("GET {} HTTP/{}{}", endpoint.path, version, CRLF);
    for (name, value) in headers {
        request.push_str(&format!("{}: {}{}", name, value, CRLF));
    }
    request.push_str(CRLF);
    request
}

/// Read a status line, header block and body from `reader`
pub async fn parse_response<R>(
    reader: &mut R,
    policy: HeaderPolicy,
) -> Result<Response, FetchError>
where
    R: AsyncBufRead + Unpin,
{
    let status_line = read_line(reader)
        .await?
        .ok_or_else(|| FetchError::protocol("connection closed before status line"))?;
    let (version, status_code, reason) = parse_status_line(&status_line)?;

    let mut headers = HeaderMap::default();
    loop {
        let line = read_line(reader)
            .await?
            .ok_or_else(|| FetchError::protocol("connection closed before end of headers"))?;
        if line == CRLF {
            break;
        }
        let (name, value) = line.split_once(':').ok_or_else(|| {
            FetchError::protocol(format!("malformed header line {:?}", line.trim_end()))
        })?;
        headers.insert(name, value.trim());
    }

    check_headers(&headers, policy)?;
    let encoding = charset::encoding_for(headers.get("content-type"))?;
    let body = read_body(reader).await?;

    debug!(
        status = status_code,
        headers = headers.len(),
        size = body.len(),
        charset = encoding.name(),
        "Parsed response"
    );

    Ok(Response {
        version,
        status_code,
        reason,
        headers,
        body,
        encoding,
    })
}

/// Split `HTTP/x.y code reason`; the reason may contain spaces or be absent
fn parse_status_line(line: &str) -> Result<(String, u16, String), FetchError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut parts = line.splitn(3, ' ');

    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(FetchError::protocol(format!("invalid status line {:?}", line)));
    }
    let code = parts
        .next()
        .ok_or_else(|| FetchError::protocol(format!("missing status code in {:?}", line)))?;
    let status_code = code
        .parse::<u16>()
        .map_err(|_| FetchError::protocol(format!("invalid status code {:?}", code)))?;
    let reason = parts.next().unwrap_or_default();

    Ok((version.to_string(), status_code, reason.to_string()))
}

fn check_headers(headers: &HeaderMap, policy: HeaderPolicy) -> Result<(), FetchError> {
    for name in UNSUPPORTED_HEADERS {
        if let Some(value) = headers.get(name) {
            match policy {
                HeaderPolicy::Strict => {
                    return Err(FetchError::protocol(format!(
                        "{}: {} is not supported",
                        name, value
                    )));
                }
                HeaderPolicy::Lenient => {
                    warn!(header = *name, value, "Ignoring unsupported response header");
                }
            }
        }
    }
    Ok(())
}

/// Read one line including its terminator; `None` at end of stream
async fn read_line<R>(reader: &mut R) -> Result<Option<String>, FetchError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line).await? == 0 {
        return Ok(None);
    }
    String::from_utf8(line)
        .map(Some)
        .map_err(|_| FetchError::protocol("response head is not valid UTF-8"))
}

async fn read_body<R>(reader: &mut R) -> Result<Bytes, FetchError>
where
    R: AsyncBufRead + Unpin,
{
    let mut body = Vec::new();
    match reader.read_to_end(&mut body).await {
        Ok(_) => {}
        // TLS peers often close the socket without sending close_notify
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            debug!(size = body.len(), "Stream closed without close_notify");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(Bytes::from(body))
}
