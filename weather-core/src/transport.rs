use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;
use url::Url;

use crate::model::TransportErrorKind;

pub mod http;

pub use http::HttpTransport;

/// A 2xx response with its raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Failure before a usable body was available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("request timed out")]
    TimedOut,

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("HTTP status {code}: {detail}")]
    HttpStatus { code: u16, detail: String },

    #[error("{0}")]
    Other(String),
}

impl TransportFailure {
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            TransportFailure::ConnectionFailed(_) => TransportErrorKind::ConnectionFailed,
            TransportFailure::TimedOut => TransportErrorKind::TimedOut,
            TransportFailure::TooManyRedirects => TransportErrorKind::TooManyRedirects,
            TransportFailure::HttpStatus { code, .. } => TransportErrorKind::HttpStatus(*code),
            TransportFailure::Other(_) => TransportErrorKind::Other,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            TransportFailure::ConnectionFailed(d)
            | TransportFailure::HttpStatus { detail: d, .. }
            | TransportFailure::Other(d) => d.clone(),
            TransportFailure::TimedOut | TransportFailure::TooManyRedirects => self.to_string(),
        }
    }
}

/// Performs the HTTP GET for a fully built request URL.
///
/// The URL carries the API key; implementations must not log it.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn fetch(&self, url: &Url) -> Result<TransportResponse, TransportFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kinds() {
        assert_eq!(TransportFailure::TimedOut.kind(), TransportErrorKind::TimedOut);
        assert_eq!(
            TransportFailure::HttpStatus { code: 503, detail: "503 Service Unavailable".into() }
                .kind(),
            TransportErrorKind::HttpStatus(503)
        );
        assert_eq!(TransportFailure::Other("x".into()).kind(), TransportErrorKind::Other);
    }

    #[test]
    fn failure_detail() {
        assert_eq!(TransportFailure::ConnectionFailed("refused".into()).detail(), "refused");
        assert_eq!(TransportFailure::TimedOut.detail(), "request timed out");
    }
}
