//! Locator parsing
//!
//! A [`Locator`] is the validated form of a user-supplied address. It is
//! only ever built by [`Locator::parse`], so a value in hand always has a
//! supported scheme and exactly one of a host/path pair or an inline payload.

use crate::error::ParseError;
use std::fmt;
use std::str::FromStr;

const VIEW_SOURCE_PREFIX: &str = "view-source:";
const DATA_PREFIX: &str = "data:";
const SCHEME_SEPARATOR: &str = "://";

/// Addressing scheme of a locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Plain HTTP over TCP
    Http,
    /// HTTP over TLS
    Https,
    /// Local file system
    File,
    /// Payload embedded in the locator itself
    Data,
}

impl Scheme {
    /// Port used when the locator does not carry one
    pub fn default_port(self) -> Option<u16> {
        match self {
            Scheme::Http => Some(80),
            Scheme::Https => Some(443),
            Scheme::File | Scheme::Data => None,
        }
    }

    /// True for the schemes fetched over a network connection
    pub fn is_network(self) -> bool {
        matches!(self, Scheme::Http | Scheme::Https)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::File => "file",
            Scheme::Data => "data",
        }
    }
}

impl FromStr for Scheme {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            "file" => Ok(Scheme::File),
            "data" => Ok(Scheme::Data),
            _ => Err(ParseError::UnsupportedScheme(s.to_string())),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a locator points at
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resource {
    /// `scheme://host[:port]/path`
    Hierarchical {
        host: String,
        port: Option<u16>,
        path: String,
    },
    /// `data:content_type,payload`
    Inline {
        content_type: String,
        payload: String,
    },
}

/// Parsed, immutable resource locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    scheme: Scheme,
    view_source: bool,
    resource: Resource,
}

/// Network address and request path of an http or https locator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint<'a> {
    pub scheme: Scheme,
    pub host: &'a str,
    pub port: u16,
    pub path: &'a str,
}

impl Endpoint<'_> {
    /// Value of the `Host` request header; the port is only included when
    /// it differs from the scheme default.
    pub fn host_header(&self) -> String {
        if self.scheme.default_port() == Some(self.port) {
            self.host.to_string()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Locator {
    /// Parse a raw locator string
    ///
    /// Accepts `scheme://host[:port]/path`, `data:<content-type>,<payload>`
    /// and either of those behind a `view-source:` prefix. Query strings and
    /// fragments stay part of the path verbatim.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let raw = raw.trim_start();
        if raw.is_empty() {
            return Err(ParseError::Empty);
        }

        let (view_source, rest) = match strip_prefix_ignore_case(raw, VIEW_SOURCE_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        if let Some(data) = strip_prefix_ignore_case(rest, DATA_PREFIX) {
            let (content_type, payload) = data
                .split_once(',')
                .ok_or_else(|| ParseError::MissingDataSeparator(rest.to_string()))?;
            return Ok(Self {
                scheme: Scheme::Data,
                view_source,
                resource: Resource::Inline {
                    content_type: content_type.to_string(),
                    payload: payload.to_string(),
                },
            });
        }

        let (scheme, rest) = rest
            .trim_end()
            .split_once(SCHEME_SEPARATOR)
            .ok_or_else(|| ParseError::MissingSchemeSeparator(raw.trim_end().to_string()))?;
        let scheme: Scheme = scheme.parse()?;

        let (host_port, path_rest) = rest.split_once('/').unwrap_or((rest, ""));
        let path = format!("/{path_rest}");

        let (host, port) = match host_port.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| ParseError::InvalidPort(port.to_string()))?;
                (host, Some(port))
            }
            None => (host_port, scheme.default_port()),
        };

        Ok(Self {
            scheme,
            view_source,
            resource: Resource::Hierarchical {
                host: host.to_string(),
                port,
                path,
            },
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// True when the locator carried a `view-source:` prefix
    pub fn is_view_source(&self) -> bool {
        self.view_source
    }

    pub fn host(&self) -> Option<&str> {
        match &self.resource {
            Resource::Hierarchical { host, .. } => Some(host.as_str()),
            Resource::Inline { .. } => None,
        }
    }

    pub fn port(&self) -> Option<u16> {
        match &self.resource {
            Resource::Hierarchical { port, .. } => *port,
            Resource::Inline { .. } => None,
        }
    }

    /// Request path, always starting with `/`
    pub fn path(&self) -> Option<&str> {
        match &self.resource {
            Resource::Hierarchical { path, .. } => Some(path.as_str()),
            Resource::Inline { .. } => None,
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        match &self.resource {
            Resource::Inline { content_type, .. } => Some(content_type.as_str()),
            Resource::Hierarchical { .. } => None,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        match &self.resource {
            Resource::Inline { payload, .. } => Some(payload.as_str()),
            Resource::Hierarchical { .. } => None,
        }
    }

    /// Connection target for http and https locators
    pub fn endpoint(&self) -> Option<Endpoint<'_>> {
        match &self.resource {
            Resource::Hierarchical {
                host,
                port: Some(port),
                path,
            } if self.scheme.is_network() => Some(Endpoint {
                scheme: self.scheme,
                host,
                port: *port,
                path,
            }),
            _ => None,
        }
    }
}

impl FromStr for Locator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locator::parse(s)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.view_source {
            f.write_str(VIEW_SOURCE_PREFIX)?;
        }
        match &self.resource {
            Resource::Inline {
                content_type,
                payload,
            } => write!(f, "{DATA_PREFIX}{content_type},{payload}"),
            Resource::Hierarchical { host, port, path } => {
                write!(f, "{}{}{}", self.scheme, SCHEME_SEPARATOR, host)?;
                if let Some(port) = port {
                    if self.scheme.default_port() != Some(*port) {
                        write!(f, ":{port}")?;
                    }
                }
                f.write_str(path)
            }
        }
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}
