//! Gitea adapter.
//!
//! Covers organizations, repositories, users, raw file contents and the
//! pull request lifecycle (find, list, merge, close). Lists paginate with
//! `page`/`limit` and advertise neighbours in the `Link` header.

mod models;
mod services;

use std::sync::Arc;

use http::HeaderValue;
use http::header::AUTHORIZATION;
use serde::de::DeserializeOwned;

use self::models::ApiError;
use super::{convert_all, link_paged};
use crate::scm::client::{Client, Driver};
use crate::scm::error::ScmError;
use crate::scm::pagination::ListOptions;
use crate::scm::response::Reply;
use crate::scm::service::ScmResult;
use crate::scm::transport::{HttpTransport, Request, Transport, Wrapper};

/// Gitea implementation of the capability traits.
#[derive(Clone)]
pub struct GiteaDriver {
    wrapper: Wrapper<ApiError>,
}

impl GiteaDriver {
    /// Creates a driver sending requests through `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            wrapper: Wrapper::new(transport),
        }
    }

    async fn fetch<W, T>(&self, request: Request) -> ScmResult<T>
    where
        W: DeserializeOwned + Send,
        T: From<W> + Send,
    {
        let (wire, response) = self.wrapper.json::<W>(request).await?;
        Ok(Reply::new(T::from(wire), response))
    }

    async fn fetch_page<W, T>(&self, request: Request, opts: &ListOptions) -> ScmResult<Vec<T>>
    where
        W: DeserializeOwned + Send,
        T: From<W> + Send,
    {
        let (wire, response) = self.wrapper.json::<Option<Vec<W>>>(request).await?;
        Ok(Reply::new(convert_all(wire), link_paged(response, opts)))
    }
}

/// Builds a [`Client`] backed by Gitea over `transport`.
#[must_use]
pub fn client(transport: Arc<dyn Transport>) -> Client {
    let driver = Arc::new(GiteaDriver::new(transport));
    Client::builder(Driver::Gitea)
        .organizations(driver.clone())
        .repositories(driver.clone())
        .pull_requests(driver.clone())
        .users(driver.clone())
        .contents(driver)
        .build()
}

/// Connects to a Gitea server root such as `https://try.gitea.io`.
///
/// # Errors
///
/// Returns [`ScmError::InvalidUrl`] when `server` cannot be parsed or
/// [`ScmError::Configuration`] when the token is not a valid header value.
pub fn new(server: &str, token: Option<&str>) -> Result<Client, ScmError> {
    let mut transport = HttpTransport::new(server)?;
    if let Some(secret) = token.filter(|value| !value.is_empty()) {
        let value = HeaderValue::from_str(&format!("token {secret}")).map_err(|error| {
            ScmError::Configuration {
                message: format!("invalid token: {error}"),
            }
        })?;
        transport = transport.with_header(AUTHORIZATION, value);
    }
    Ok(client(Arc::new(transport)))
}
