//! HTTP and HTTPS fetcher
//!
//! Opens one TCP connection per fetch, wraps it in TLS for `https`, writes
//! a single `GET` and reads the response until the peer closes. The
//! connection is owned by the fetch call and dropped on every return path.

use crate::client::FetchOptions;
use crate::error::{FetchError, ParseError};
use crate::fetchers::Fetcher;
use crate::http::{compose_request, parse_response, Response};
use crate::locator::{Endpoint, Locator, Scheme};
use crate::types::{HeaderPolicy, Page};
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{self, ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::debug;

/// Fetcher for `http://` and `https://` locators
pub struct HttpFetcher;

impl HttpFetcher {
    /// Create a new HTTP fetcher
    pub fn new() -> Self {
        Self
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, locator: &Locator, options: &FetchOptions) -> Result<Page, FetchError> {
        let endpoint = locator
            .endpoint()
            .ok_or_else(|| ParseError::UnsupportedScheme(locator.scheme().to_string()))?;

        let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let request = compose_request(&endpoint, options.http_version, user_agent);

        let response = if endpoint.scheme == Scheme::Https {
            let server_name = server_name(endpoint.host)?;
            let stream = connect(&endpoint).await?;
            let stream = tls_connector()?
                .connect(server_name, stream)
                .await
                .map_err(FetchError::Tls)?;
            debug!(host = endpoint.host, "TLS handshake complete");
            exchange(stream, &request, options.header_policy).await?
        } else {
            let stream = connect(&endpoint).await?;
            exchange(stream, &request, options.header_policy).await?
        };

        let content = response.text()?;

        Ok(Page {
            locator: locator.to_string(),
            status_code: Some(response.status_code),
            reason: Some(response.reason.clone()),
            content_type: response.content_type().map(str::to_string),
            charset: Some(response.encoding.name().to_string()),
            size: response.body.len() as u64,
            view_source: locator.is_view_source(),
            content,
        })
    }
}

async fn connect(endpoint: &Endpoint<'_>) -> Result<TcpStream, FetchError> {
    debug!(host = endpoint.host, port = endpoint.port, "Connecting");
    TcpStream::connect((endpoint.host, endpoint.port))
        .await
        .map_err(|source| FetchError::Connect {
            host: endpoint.host.to_string(),
            port: endpoint.port,
            source,
        })
}

/// Send `request` and parse the reply; the stream is closed on return
async fn exchange<S>(
    mut stream: S,
    request: &str,
    policy: HeaderPolicy,
) -> Result<Response, FetchError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(request.as_bytes()).await?;
    stream.flush().await?;

    let mut reader = BufReader::new(stream);
    parse_response(&mut reader, policy).await
}

/// Server name presented during the handshake and checked against the
/// certificate
fn server_name(host: &str) -> Result<ServerName<'static>, FetchError> {
    ServerName::try_from(host.to_string())
        .map_err(|_| FetchError::InvalidServerName(host.to_string()))
}

fn tls_connector() -> Result<TlsConnector, FetchError> {
    let roots = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    let config = ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| FetchError::Tls(io::Error::other(e)))?
    .with_root_certificates(roots)
    .with_no_client_auth();

    Ok(TlsConnector::from(Arc::new(config)))
}
