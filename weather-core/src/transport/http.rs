use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, redirect};
use std::time::Duration;
use url::Url;

use super::{Transport, TransportFailure, TransportResponse};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MAX_REDIRECTS: usize = 10;

/// reqwest-backed transport with a bounded timeout and redirect count.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http })
    }

    pub fn with_default_timeout() -> Result<Self> {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<TransportResponse, TransportFailure> {
        let res = self.http.get(url.clone()).send().await.map_err(classify)?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "weather request rejected");
            return Err(TransportFailure::HttpStatus {
                code: status.as_u16(),
                detail: status.to_string(),
            });
        }

        let body = res.text().await.map_err(classify)?;

        Ok(TransportResponse { status: status.as_u16(), body })
    }
}

/// Map a reqwest error onto a failure category. The URL is dropped from the
/// detail because it carries the API key.
fn classify(err: reqwest::Error) -> TransportFailure {
    let failure = if err.is_timeout() {
        TransportFailure::TimedOut
    } else if err.is_redirect() {
        TransportFailure::TooManyRedirects
    } else if err.is_connect() {
        TransportFailure::ConnectionFailed(err.without_url().to_string())
    } else if let Some(status) = err.status() {
        TransportFailure::HttpStatus { code: status.as_u16(), detail: status.to_string() }
    } else {
        TransportFailure::Other(err.without_url().to_string())
    };

    tracing::warn!(error = %failure, "weather request failed");
    failure
}
