//! Harness Code adapter.
//!
//! Repositories live inside an account, organization and project scope that
//! travels as query parameters on every request, so repository identifiers
//! are plain names. Lists page with `page`/`limit` and report their position
//! in `x-page`, `x-next-page` and `x-total-pages` headers.

mod models;
mod services;

use std::sync::Arc;

use http::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

use self::models::ApiError;
use super::{convert_all, with_query};
use crate::scm::client::{Client, Driver};
use crate::scm::error::ScmError;
use crate::scm::pagination::{ListOptions, Page};
use crate::scm::response::{Reply, Response};
use crate::scm::service::ScmResult;
use crate::scm::transport::{HttpTransport, Request, Transport, Wrapper};

/// Account, organization and project a Harness client operates in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Account identifier; also used as the routing id.
    pub account: String,
    /// Organization identifier, empty for account-level repositories.
    pub organization: String,
    /// Project identifier, empty for organization-level repositories.
    pub project: String,
}

impl Scope {
    /// Scope for the given account, organization and project.
    #[must_use]
    pub fn new(
        account: impl Into<String>,
        organization: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            organization: organization.into(),
            project: project.into(),
        }
    }

    fn query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("routingId".to_owned(), self.account.clone()),
            ("accountIdentifier".to_owned(), self.account.clone()),
        ];
        if !self.organization.is_empty() {
            query.push(("orgIdentifier".to_owned(), self.organization.clone()));
        }
        if !self.project.is_empty() {
            query.push(("projectIdentifier".to_owned(), self.project.clone()));
        }
        query
    }
}

/// Harness implementation of the capability traits.
#[derive(Clone)]
pub struct HarnessDriver {
    wrapper: Wrapper<ApiError>,
    scope: Scope,
}

impl HarnessDriver {
    /// Creates a driver for `scope` sending requests through `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, scope: Scope) -> Self {
        Self {
            wrapper: Wrapper::new(transport),
            scope,
        }
    }

    /// Resolves `repo` to its API path.
    fn repo_path(&self, repo: &str) -> Result<String, ScmError> {
        if self.scope.account.is_empty() {
            return Err(ScmError::InvalidUrl("missing account identifier".to_owned())
                .context("failed to resolve repository id"));
        }
        if repo.is_empty() || repo.contains('/') {
            return Err(ScmError::InvalidUrl(format!("invalid repository identifier {repo:?}"))
                .context("failed to resolve repository id"));
        }
        Ok(format!("api/v1/repos/{repo}"))
    }

    /// Appends the operation filters followed by the scope parameters.
    fn scoped(&self, path: &str, filters: Vec<(String, String)>) -> String {
        let mut query = filters;
        query.extend(self.scope.query());
        with_query(path, &query)
    }

    fn list_request(&self, path: &str, filters: Vec<(String, String)>, opts: &ListOptions) -> Request {
        if let Some(cursor) = opts.cursor() {
            return Request::get(cursor);
        }
        let mut query = filters;
        query.extend(opts.page_query("page", "limit"));
        Request::get(self.scoped(path, query))
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
        Ok(Reply::new(convert_all(wire), header_paged(response, opts)))
    }
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// Reads `x-page`, `x-next-page` and `x-total-pages` into the response page.
fn header_paged(response: Response, opts: &ListOptions) -> Response {
    let headers = &response.headers;
    let current = header_number(headers, "x-page").unwrap_or(opts.page);
    let page = Page::builder(current)
        .first(1)
        .prev(current.saturating_sub(1))
        .next(header_number(headers, "x-next-page").unwrap_or_default())
        .last(header_number(headers, "x-total-pages").unwrap_or_default())
        .build();
    response.with_page(page)
}

/// Builds a [`Client`] backed by Harness over `transport`.
#[must_use]
pub fn client(transport: Arc<dyn Transport>, scope: Scope) -> Client {
    let driver = Arc::new(HarnessDriver::new(transport, scope));
    Client::builder(Driver::Harness)
        .repositories(driver.clone())
        .pull_requests(driver)
        .build()
}

/// Connects to a Harness Code gateway such as `https://app.harness.io/gateway/code`.
///
/// # Errors
///
/// Returns [`ScmError::InvalidUrl`] when `server` cannot be parsed or
/// [`ScmError::Configuration`] when the token is not a valid header value.
pub fn new(server: &str, token: Option<&str>, scope: Scope) -> Result<Client, ScmError> {
    let mut transport = HttpTransport::new(server)?;
    if let Some(secret) = token.filter(|value| !value.is_empty()) {
        let value = HeaderValue::from_str(secret).map_err(|error| ScmError::Configuration {
            message: format!("invalid token: {error}"),
        })?;
        transport = transport.with_header(HeaderName::from_static("x-api-key"), value);
    }
    Ok(client(Arc::new(transport), scope))
}
