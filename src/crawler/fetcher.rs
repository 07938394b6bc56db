//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with user agent, deadlines and redirect limit
//! - GET requests returning raw bytes plus a text form for HTML
//! - Bounded retry for transient failures
//! - Error classification

use crate::config::FetchConfig;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a fetch did not produce a resource
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to read body: {0}")]
    Body(String),
}

impl FetchError {
    /// Returns true for failures worth another attempt (timeouts, connects, 5xx)
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status } => *status >= 500,
            Self::Timeout | Self::Connect(_) => true,
            Self::Transport(_) | Self::Body(_) => false,
        }
    }

    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            Self::Body(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// A successfully fetched resource
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// URL that was requested
    pub url: Url,
    /// URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value, if any
    pub content_type: Option<String>,
    /// Body exactly as received
    pub bytes: Vec<u8>,
    /// Decoded body, present only for HTML
    pub text: Option<String>,
}

impl FetchedResource {
    /// Builds a resource, deriving the text form from the content type
    pub fn new(
        url: Url,
        final_url: Url,
        status: u16,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        let text = is_html(content_type.as_deref(), &final_url, &bytes)
            .then(|| String::from_utf8_lossy(&bytes).into_owned());

        Self {
            url,
            final_url,
            status,
            content_type,
            bytes,
            text,
        }
    }
}

/// Transport collaborator consumed by the traversal controller
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedResource, FetchError>;
}

/// Decides whether a response should be link-extracted
///
/// An HTML Content-Type always wins and any other specific type loses. A missing or
/// generic type (`text/plain`, `application/octet-stream`) falls back to the path
/// (`.html`, `.htm`, directory-style) and then to the start of the body.
pub fn is_html(content_type: Option<&str>, url: &Url, body: &[u8]) -> bool {
    let mime = content_type.map(|ct| {
        ct.split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase()
    });

    match mime.as_deref() {
        Some("text/html" | "application/xhtml+xml") => true,
        None | Some("" | "text/plain" | "application/octet-stream") => {
            has_html_path(url) || starts_like_html(body)
        }
        Some(_) => false,
    }
}

fn has_html_path(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    path.is_empty() || path.ends_with('/') || path.ends_with(".html") || path.ends_with(".htm")
}

/// True when the body opens with a doctype or `<html>` tag, ignoring a BOM and whitespace
fn starts_like_html(body: &[u8]) -> bool {
    let body = body.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(body);
    let head: Vec<u8> = body
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .take(14)
        .map(u8::to_ascii_lowercase)
        .collect();
    head.starts_with(b"<!doctype html") || head.starts_with(b"<html")
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site_mirror::config::FetchConfig;
/// use site_mirror::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_millis(config.timeout_ms))
        .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`Fetcher`] with optional bounded retry
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Success |
/// | HTTP 4xx | Immediate failure |
/// | HTTP 5xx | Retry up to `max_retries` times |
/// | Timeout | Retry up to `max_retries` times |
/// | Connection error | Retry up to `max_retries` times |
/// | Other transport error | Immediate failure |
///
/// Attempt `n` waits `n * retry_backoff_ms` before being sent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    retry_backoff: Duration,
}

impl HttpFetcher {
    pub fn new(client: Client, max_retries: u32, retry_backoff: Duration) -> Self {
        Self {
            client,
            max_retries,
            retry_backoff,
        }
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            build_http_client(config)?,
            config.max_retries,
            Duration::from_millis(config.retry_backoff_ms),
        ))
    }

    async fn fetch_once(&self, url: &Url) -> Result<FetchedResource, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await.map_err(FetchError::from_reqwest)?;

        Ok(FetchedResource::new(
            url.clone(),
            final_url,
            status.as_u16(),
            content_type,
            bytes.to_vec(),
        ))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedResource, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(resource) => return Ok(resource),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.retry_backoff * attempt;
                    tracing::debug!(
                        "Retrying {} in {:?} (attempt {}/{}): {}",
                        url,
                        delay,
                        attempt,
                        self.max_retries,
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
