//! Error types for BrowseKit

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while parsing a locator string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Locator string is empty
    #[error("Missing locator")]
    Empty,

    /// No `://` separator and no `data:` prefix
    #[error("Invalid locator: no scheme separator in {0:?}")]
    MissingSchemeSeparator(String),

    /// `data:` locator without the comma between content type and payload
    #[error("Invalid data locator: no comma separator in {0:?}")]
    MissingDataSeparator(String),

    /// Port suffix is not a valid port number
    #[error("Invalid port: {0:?}")]
    InvalidPort(String),

    /// Scheme is not one of http, https, file or data
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),
}

/// Broad failure classes, one per error family callers may branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed locator
    Parse,
    /// Scheme or inline content type outside the supported set
    UnsupportedScheme,
    /// Response framing the codec refuses to accept
    ProtocolViolation,
    /// Connection, TLS or file-system failure
    Io,
    /// Declared charset cannot decode the body
    Encoding,
}

/// Errors that can occur during fetch operations
#[derive(Debug, Error)]
pub enum FetchError {
    /// Neither a locator nor a default locator was supplied
    #[error("Missing required parameter: url")]
    MissingLocator,

    /// Locator could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// `data:` locator with a content type other than text/html
    #[error("Unsupported inline content type: {0}")]
    UnsupportedContentType(String),

    /// Response status line or headers are malformed or disallowed
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    /// Failed to connect to server
    #[error("Failed to connect to {host}:{port}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Host cannot be presented as a TLS server name
    #[error("Invalid TLS server name: {0}")]
    InvalidServerName(String),

    /// TLS configuration or handshake failed
    #[error("TLS handshake failed")]
    Tls(#[source] io::Error),

    /// Local file could not be read
    #[error("Failed to read {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Other I/O failure on an open stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Declared charset is not a known encoding label
    #[error("Unknown charset: {0}")]
    UnknownCharset(String),

    /// Body is not valid in the resolved charset
    #[error("Body is not valid {charset}")]
    Encoding { charset: &'static str },
}

impl FetchError {
    /// Classify this error into its failure family
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::MissingLocator => ErrorKind::Parse,
            FetchError::Parse(ParseError::UnsupportedScheme(_)) => ErrorKind::UnsupportedScheme,
            FetchError::Parse(_) => ErrorKind::Parse,
            FetchError::UnsupportedContentType(_) => ErrorKind::UnsupportedScheme,
            FetchError::ProtocolViolation(_) => ErrorKind::ProtocolViolation,
            FetchError::Connect { .. }
            | FetchError::InvalidServerName(_)
            | FetchError::Tls(_)
            | FetchError::ReadFile { .. }
            | FetchError::Io(_) => ErrorKind::Io,
            FetchError::UnknownCharset(_) | FetchError::Encoding { .. } => ErrorKind::Encoding,
        }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        FetchError::ProtocolViolation(message.into())
    }
}
