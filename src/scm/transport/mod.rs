//! Transport abstraction and the status-classifying wrapper.
//!
//! A [`Transport`] performs one HTTP round trip. Each adapter wraps its
//! transport in a [`Wrapper`] parameterised by the backend's error envelope,
//! which classifies the status code and decodes, streams or discards the
//! body as directed.

mod http_client;
mod octo;

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{HeaderMap, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ScmError;
use super::rate_limit::RateLimitInfo;
use super::response::Response;

pub use http_client::HttpTransport;
pub use octo::OctocrabTransport;

/// An outgoing backend request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the backend base URL, or an absolute URL.
    pub path: String,
    /// Extra request headers.
    pub headers: HeaderMap,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
}

impl Request {
    /// Creates a body-less request.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Creates a `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Attaches a JSON body and the matching content type.
    ///
    /// # Errors
    ///
    /// Returns [`ScmError::Decode`] when the input cannot be serialised.
    pub fn with_json(mut self, body: &impl Serialize) -> Result<Self, ScmError> {
        let value = serde_json::to_value(body).map_err(|error| ScmError::Decode {
            message: format!("request body: {error}"),
        })?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(value);
        Ok(self)
    }
}

/// A raw backend response before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body bytes.
    pub body: Vec<u8>,
}

/// Performs a single HTTP round trip.
///
/// Implementations only fail for problems below HTTP; every status code is
/// returned as a [`RawResponse`] for the [`Wrapper`] to classify.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and collects the full response.
    async fn send(&self, request: Request) -> Result<RawResponse, ScmError>;
}

/// A backend-specific JSON error body.
pub trait ErrorEnvelope: DeserializeOwned {
    /// Extracts the human-readable message, if the envelope carried one.
    fn into_message(self) -> Option<String>;
}

/// Issues requests through a [`Transport`] and classifies the responses.
///
/// - `401` always becomes [`ScmError::Unauthorized`], whatever the body.
/// - Any other status above `300` decodes `E` and becomes [`ScmError::Api`].
/// - Otherwise the body is decoded, returned raw or discarded.
pub struct Wrapper<E> {
    transport: Arc<dyn Transport>,
    envelope: PhantomData<fn() -> E>,
}

impl<E> Clone for Wrapper<E> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            envelope: PhantomData,
        }
    }
}

impl<E: ErrorEnvelope> Wrapper<E> {
    /// Wraps a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            envelope: PhantomData,
        }
    }

    /// Sends the request and decodes a JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns the classified status error, the transport failure, or
    /// [`ScmError::Decode`] when the body is not valid for `T`.
    pub async fn json<T: DeserializeOwned>(
        &self,
        request: Request,
    ) -> Result<(T, Response), ScmError> {
        let raw = self.execute(request).await?;
        let value = serde_json::from_slice(&raw.body).map_err(|error| ScmError::Decode {
            message: error.to_string(),
        })?;
        Ok((value, metadata(raw.status, raw.headers)))
    }

    /// Sends the request and returns the body bytes untouched.
    ///
    /// # Errors
    ///
    /// Returns the classified status error or the transport failure.
    pub async fn raw(&self, request: Request) -> Result<(Vec<u8>, Response), ScmError> {
        let raw = self.execute(request).await?;
        Ok((raw.body, metadata(raw.status, raw.headers)))
    }

    /// Sends the request and ignores any body.
    ///
    /// # Errors
    ///
    /// Returns the classified status error or the transport failure.
    pub async fn empty(&self, request: Request) -> Result<Response, ScmError> {
        let raw = self.execute(request).await?;
        Ok(metadata(raw.status, raw.headers))
    }

    /// Sends the request, treating `expected` statuses as answers rather
    /// than errors. Any other status is classified as usual.
    ///
    /// # Errors
    ///
    /// Returns the classified status error or the transport failure.
    pub async fn status(
        &self,
        request: Request,
        expected: &[StatusCode],
    ) -> Result<Response, ScmError> {
        tracing::trace!(method = %request.method, path = %request.path, "sending backend request");
        let raw = self.transport.send(request).await?;
        if expected.contains(&raw.status) {
            return Ok(metadata(raw.status, raw.headers));
        }
        let classified = classify::<E>(raw)?;
        Ok(metadata(classified.status, classified.headers))
    }

    async fn execute(&self, request: Request) -> Result<RawResponse, ScmError> {
        tracing::trace!(method = %request.method, path = %request.path, "sending backend request");
        let raw = self.transport.send(request).await?;
        classify::<E>(raw)
    }
}

fn classify<E: ErrorEnvelope>(raw: RawResponse) -> Result<RawResponse, ScmError> {
    if raw.status == StatusCode::UNAUTHORIZED {
        tracing::debug!("backend rejected credentials");
        return Err(ScmError::Unauthorized);
    }
    if raw.status.as_u16() > 300 {
        let message = serde_json::from_slice::<E>(&raw.body)
            .ok()
            .and_then(ErrorEnvelope::into_message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| {
                raw.status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_owned()
            });
        tracing::debug!(status = raw.status.as_u16(), %message, "backend returned an error");
        return Err(ScmError::Api {
            status: raw.status.as_u16(),
            message,
        });
    }
    Ok(raw)
}

fn metadata(status: StatusCode, headers: HeaderMap) -> Response {
    let rate = RateLimitInfo::from_headers(&headers);
    Response {
        status,
        headers,
        page: super::pagination::Page::default(),
        rate,
    }
}
