//! Network transport for fetching raw CDN resources.

use std::{future::Future, pin::Pin};

use crate::error::{Error, Result};

/// Future type for transport fetch operations.
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;

/// Fetches byte resources by URL.
///
/// Implementations report a non-success response as [`Error::HttpStatus`]
/// and a failed request as [`Error::Http`]. No retries, no timeouts.
pub trait Transport: Send + Sync {
    /// Fetch the body of `url`.
    fn fetch(&self, url: &str) -> FetchFuture<'_>;
}

/// HTTP transport backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a default HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport around a preconfigured HTTP client.
    #[must_use]
    pub fn with_http(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> FetchFuture<'_> {
        let url = url.to_string();
        Box::pin(async move {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|e| Error::Http {
                    url: url.clone(),
                    message: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(Error::HttpStatus {
                    url,
                    status: status.as_u16(),
                });
            }

            let data = response.bytes().await.map_err(|e| Error::Http {
                url: url.clone(),
                message: e.to_string(),
            })?;

            Ok(data.to_vec())
        })
    }
}
