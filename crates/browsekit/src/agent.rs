//! Agent builder and the parse -> fetch -> render pipeline

use crate::client::{fetch_with_options, FetchOptions};
use crate::error::FetchError;
use crate::locator::Locator;
use crate::render::Renderer;
use crate::types::{HeaderPolicy, HttpVersion, Page};
use std::io::Write;
use std::path::PathBuf;

/// Builder for configuring an [`Agent`]
#[derive(Debug, Clone)]
pub struct AgentBuilder {
    /// Custom User-Agent
    user_agent: Option<String>,
    /// Request protocol version
    http_version: HttpVersion,
    /// Unsupported response header handling
    header_policy: HeaderPolicy,
    /// Root for `file://` paths
    file_root: Option<PathBuf>,
    /// Decode character entities while rendering
    decode_entities: bool,
    /// Locator used when the caller supplies none
    default_locator: Option<String>,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    /// Create a new builder: HTTP/1.1, strict headers, entity decoding on
    pub fn new() -> Self {
        Self {
            user_agent: None,
            http_version: HttpVersion::default(),
            header_policy: HeaderPolicy::default(),
            file_root: None,
            decode_entities: true,
            default_locator: None,
        }
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set the HTTP version used for requests
    pub fn http_version(mut self, version: HttpVersion) -> Self {
        self.http_version = version;
        self
    }

    /// Set how transfer-encoding / content-encoding headers are treated
    pub fn header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.header_policy = policy;
        self
    }

    /// Resolve `file://` paths against `root`
    pub fn file_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.file_root = Some(root.into());
        self
    }

    /// Enable entity decoding while rendering
    pub fn decode_entities(mut self, enable: bool) -> Self {
        self.decode_entities = enable;
        self
    }

    /// Locator to load when none is given
    pub fn default_locator(mut self, locator: impl Into<String>) -> Self {
        self.default_locator = Some(locator.into());
        self
    }

    /// Build the agent
    pub fn build(self) -> Agent {
        Agent {
            options: FetchOptions {
                user_agent: self.user_agent,
                http_version: self.http_version,
                header_policy: self.header_policy,
                file_root: self.file_root,
            },
            renderer: Renderer::new().decode_entities(self.decode_entities),
            default_locator: self.default_locator,
        }
    }
}

/// Configured user agent
#[derive(Debug, Clone)]
pub struct Agent {
    options: FetchOptions,
    renderer: Renderer,
    default_locator: Option<String>,
}

impl Default for Agent {
    fn default() -> Self {
        AgentBuilder::new().build()
    }
}

impl Agent {
    /// Create a new agent builder
    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }

    /// Fetch options this agent passes to every fetch
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Parse `raw`, falling back to the configured default locator
    pub fn locator(&self, raw: Option<&str>) -> Result<Locator, FetchError> {
        let raw = raw
            .or(self.default_locator.as_deref())
            .ok_or(FetchError::MissingLocator)?;
        Ok(Locator::parse(raw)?)
    }

    /// Fetch a locator (or the default one) without rendering it
    pub async fn load(&self, raw: Option<&str>) -> Result<Page, FetchError> {
        let locator = self.locator(raw)?;
        fetch_with_options(&locator, &self.options).await
    }

    /// Write the plain-text rendering of a fetched page to `sink`
    pub fn render<W: Write + ?Sized>(
        &self,
        page: &Page,
        sink: &mut W,
    ) -> Result<(), FetchError> {
        self.renderer.render(&page.content, page.view_source, sink)?;
        Ok(())
    }

    /// Render a fetched page into a `String`
    pub fn render_to_string(&self, page: &Page) -> String {
        self.renderer.render_to_string(&page.content, page.view_source)
    }

    /// Fetch and render in one step, returning the fetched page
    pub async fn browse<W: Write + ?Sized>(
        &self,
        raw: Option<&str>,
        sink: &mut W,
    ) -> Result<Page, FetchError> {
        let page = self.load(raw).await?;
        self.render(&page, sink)?;
        Ok(page)
    }
}
