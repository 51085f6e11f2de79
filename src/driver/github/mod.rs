//! GitHub and GitHub Enterprise adapter.
//!
//! This is the reference adapter: every capability except reviews and
//! contents is implemented. Lists paginate through the `Link` header; links
//! carrying a `page` parameter become page numbers and anything else is kept
//! as a cursor URL.

mod git;
mod models;
mod pulls;
mod repos;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use self::models::ApiError;
use super::{convert_all, link_paged};
use crate::scm::client::{Client, Driver};
use crate::scm::error::ScmError;
use crate::scm::pagination::ListOptions;
use crate::scm::response::Reply;
use crate::scm::service::ScmResult;
use crate::scm::transport::{HttpTransport, OctocrabTransport, Request, Transport, Wrapper};

/// Public GitHub API endpoint.
pub const DEFAULT_SERVER: &str = "https://api.github.com";

/// GitHub implementation of the capability traits.
#[derive(Clone)]
pub struct GithubDriver {
    wrapper: Wrapper<ApiError>,
}

impl GithubDriver {
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

/// Builds a [`Client`] backed by GitHub over `transport`.
#[must_use]
pub fn client(transport: Arc<dyn Transport>) -> Client {
    let driver = Arc::new(GithubDriver::new(transport));
    Client::builder(Driver::Github)
        .repositories(driver.clone())
        .pull_requests(driver.clone())
        .issues(driver.clone())
        .organizations(driver.clone())
        .users(driver.clone())
        .git(driver.clone())
        .webhooks(driver)
        .build()
}

/// Connects to a GitHub API root.
///
/// With a token the requests go through an authenticated Octocrab client;
/// without one a plain anonymous `reqwest` transport is used.
///
/// # Errors
///
/// Returns [`ScmError::InvalidUrl`] when `server` cannot be parsed or
/// [`ScmError::Transport`] when the HTTP client cannot be built.
pub fn new(server: &str, token: Option<&str>) -> Result<Client, ScmError> {
    let transport: Arc<dyn Transport> = match token.filter(|value| !value.is_empty()) {
        Some(secret) => Arc::new(OctocrabTransport::for_token(secret, server)?),
        None => Arc::new(HttpTransport::new(server)?),
    };
    Ok(client(transport))
}

#[cfg(test)]
mod tests;
