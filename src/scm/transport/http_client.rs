//! Reqwest-backed transport shared by all adapters.

use async_trait::async_trait;
use http::HeaderMap;
use http::header::{HeaderName, HeaderValue};
use url::Url;

use super::{RawResponse, Request, Transport};
use crate::scm::error::ScmError;

/// Sends requests with `reqwest`, resolving relative paths against a base
/// URL.
///
/// Credentials are the caller's concern: attach them as default headers
/// with [`HttpTransport::with_header`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    headers: HeaderMap,
}

impl HttpTransport {
    /// Creates a transport for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ScmError::InvalidUrl`] when the URL cannot be parsed or
    /// cannot serve as a base.
    pub fn new(base_url: &str) -> Result<Self, ScmError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a transport reusing an existing `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns [`ScmError::InvalidUrl`] when the URL cannot be parsed or
    /// cannot serve as a base.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ScmError> {
        Ok(Self {
            client,
            base_url: normalise_base(base_url)?,
            headers: HeaderMap::new(),
        })
    }

    /// Adds a header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Borrows the normalised base URL (always ends with `/`).
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> Result<Url, ScmError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|error| ScmError::InvalidUrl(format!("{path}: {error}")))
    }
}

fn normalise_base(base_url: &str) -> Result<Url, ScmError> {
    let mut url = Url::parse(base_url).map_err(|error| ScmError::InvalidUrl(error.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ScmError::InvalidUrl(format!(
            "{base_url} cannot be used as a base URL"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<RawResponse, ScmError> {
        let url = self.resolve(&request.path)?;
        let mut headers = self.headers.clone();
        headers.extend(request.headers);

        let mut builder = self.client.request(request.method, url).headers(headers);
        if let Some(body) = request.body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(|error| ScmError::Transport {
            message: error.to_string(),
        })?;
        let status = response.status();
        let response_headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|error| ScmError::Transport {
                message: error.to_string(),
            })?;

        Ok(RawResponse {
            status,
            headers: response_headers,
            body: body.to_vec(),
        })
    }
}
