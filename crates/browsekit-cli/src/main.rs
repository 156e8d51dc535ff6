//! BrowseKit CLI - print the plain-text view of a locator

use browsekit::{Agent, FetchError, HeaderPolicy, HttpVersion, Page};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Rendered plain text
    #[default]
    Text,
    /// JSON with page metadata and rendered text
    Json,
}

/// BrowseKit - minimal text-mode user agent
#[derive(Parser, Debug)]
#[command(name = "browsekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Locator to load: http://, https://, file://, data: (optionally behind view-source:)
    url: Option<String>,

    /// Locator loaded when no URL is given
    #[arg(long, env = "BROWSEKIT_DEFAULT_URL")]
    default_url: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Custom User-Agent
    #[arg(long)]
    user_agent: Option<String>,

    /// Send HTTP/1.0 requests (Host header only)
    #[arg(long)]
    http10: bool,

    /// Accept responses with transfer-encoding or content-encoding headers
    #[arg(long)]
    lenient_headers: bool,

    /// Directory file:// paths are resolved against
    #[arg(long)]
    file_root: Option<PathBuf>,

    /// Leave character entities undecoded
    #[arg(long)]
    no_entities: bool,
}

/// JSON output: page metadata plus the rendered text
#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    page: &'a Page,
    text: String,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if cli.url.is_none() && cli.default_url.is_none() {
        eprintln!("Usage: browsekit <URL>");
        eprintln!("   or: BROWSEKIT_DEFAULT_URL=<URL> browsekit");
        eprintln!("   or: browsekit --help");
        std::process::exit(1);
    }

    let agent = build_agent(&cli);

    match agent.load(cli.url.as_deref()).await {
        Ok(page) => match cli.output {
            OutputFormat::Text => write_rendered(&agent, &page),
            OutputFormat::Json => {
                let json = format_json(&agent, &page).unwrap_or_else(|e| {
                    eprintln!("Error serializing response: {}", e);
                    std::process::exit(1);
                });
                write_safe(&json);
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (warnings only by default)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_agent(cli: &Cli) -> Agent {
    let mut builder = Agent::builder().decode_entities(!cli.no_entities);

    if let Some(ref ua) = cli.user_agent {
        builder = builder.user_agent(ua);
    }
    if cli.http10 {
        builder = builder.http_version(HttpVersion::Http10);
    }
    if cli.lenient_headers {
        builder = builder.header_policy(HeaderPolicy::Lenient);
    }
    if let Some(ref root) = cli.file_root {
        builder = builder.file_root(root);
    }
    if let Some(ref url) = cli.default_url {
        builder = builder.default_locator(url);
    }

    builder.build()
}

fn format_json(agent: &Agent, page: &Page) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonOutput {
        page,
        text: agent.render_to_string(page),
    })
}

/// Render straight into stdout, exit silently on broken pipe
fn write_rendered(agent: &Agent, page: &Page) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let result = agent
        .render(page, &mut handle)
        .and_then(|()| handle.flush().map_err(FetchError::from));
    if let Err(e) = result {
        exit_on_write_error(e);
    }
}

/// Write to stdout, exit silently on broken pipe
fn write_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        exit_on_write_error(FetchError::from(e));
    }
}

fn exit_on_write_error(e: FetchError) -> ! {
    if let FetchError::Io(ref io_err) = e {
        if io_err.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
    }
    eprintln!("Error writing to stdout: {}", e);
    std::process::exit(1);
}
