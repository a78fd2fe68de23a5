//! Raw HTML retrieval from URLs, files, and stdin.
//!
//! A fetched page is the server response as a crawler receives it: no
//! JavaScript runs, so the markup is the "initial" side of a comparison.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::{RendergapError, Result};

/// HTTP client configuration for fetching raw markup.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Bodies longer than this are truncated before analysis (0 = unlimited).
    pub max_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (compatible; rendergap/0.1; raw-html audit)".to_string(),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Cut `body` to at most `max_bytes`, on a character boundary.
fn truncate_body(mut body: String, max_bytes: usize) -> String {
    if max_bytes == 0 || body.len() <= max_bytes {
        return body;
    }

    let mut cut = max_bytes;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    tracing::warn!(original = body.len(), kept = cut, "response body truncated");
    body.truncate(cut);
    body
}

/// Fetches the raw HTML served at `url`.
///
/// Only `http` and `https` URLs are accepted. Non-success status codes are
/// returned as [`RendergapError::HttpError`].
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| RendergapError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(RendergapError::InvalidUrl(format!(
            "unsupported scheme {:?} (expected http or https)",
            parsed_url.scheme()
        )));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(RendergapError::HttpError)?;

    tracing::debug!(url = %parsed_url, "fetching raw html");

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() { RendergapError::Timeout { timeout: config.timeout } } else { RendergapError::HttpError(e) }
        })?
        .error_for_status()?;

    let body = response.text().await?;
    Ok(truncate_body(body, config.max_bytes))
}

/// Reads content from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(RendergapError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(RendergapError::from)
    }
}

/// Reads all of standard input.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(RendergapError::from)?;

    Ok(buffer)
}

/// Whether `source` names a remote page rather than a local file.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Load content from `-` (stdin), an `http(s)://` URL, or a file path.
pub async fn fetch_source(source: &str, config: &FetchConfig) -> Result<String> {
    if source == "-" {
        fetch_stdin()
    } else if is_remote(source) {
        fetch_url(source, config).await
    } else {
        fetch_file(source)
    }
}
