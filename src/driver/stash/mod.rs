//! Bitbucket Server (Stash) adapter.
//!
//! Repository identifiers take the form `PROJECT/slug`. Lists are wrapped in
//! a paging envelope; the next page is exposed as a cursor URL built from
//! that envelope, never as a page number.

mod models;

use std::sync::Arc;

use async_trait::async_trait;
use http::HeaderValue;
use http::header::AUTHORIZATION;
use serde::de::DeserializeOwned;

use self::models::{ApiChange, ApiError, ApiPage, ApiPullRequest, ApiRepository, ApiUser};
use super::{convert_all, with_query};
use crate::scm::client::{Client, Driver};
use crate::scm::error::ScmError;
use crate::scm::models::{Change, PullRequest, Repository, User};
use crate::scm::pagination::{ListOptions, Page};
use crate::scm::response::Reply;
use crate::scm::service::{PullRequestService, RepositoryService, ScmResult, UserService};
use crate::scm::transport::{HttpTransport, Request, Transport, Wrapper};

/// Bitbucket Server implementation of the capability traits.
#[derive(Clone)]
pub struct StashDriver {
    wrapper: Wrapper<ApiError>,
}

impl StashDriver {
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

    async fn fetch_page<W, T>(
        &self,
        path: &str,
        filters: Vec<(String, String)>,
        opts: &ListOptions,
    ) -> ScmResult<Vec<T>>
    where
        W: DeserializeOwned + Send,
        T: From<W> + Send,
    {
        let request = opts.cursor().map_or_else(
            || {
                let mut query = filters.clone();
                query.extend(start_query(opts));
                Request::get(with_query(path, &query))
            },
            Request::get,
        );
        let (envelope, response) = self.wrapper.json::<ApiPage<W>>(request).await?;
        let page = next_page(path, filters, opts, &envelope);
        Ok(Reply::new(convert_all(envelope.values), response.with_page(page)))
    }
}

fn start_query(opts: &ListOptions) -> Vec<(String, String)> {
    let mut query = Vec::new();
    if opts.page > 1 && opts.size != 0 {
        let start = (opts.page - 1).saturating_mul(opts.size);
        query.push(("start".to_owned(), start.to_string()));
    }
    if opts.size != 0 {
        query.push(("limit".to_owned(), opts.size.to_string()));
    }
    query
}

fn next_page<W>(
    path: &str,
    filters: Vec<(String, String)>,
    opts: &ListOptions,
    envelope: &ApiPage<W>,
) -> Page {
    if !envelope.next.is_empty() {
        return Page::builder(0).next_url(envelope.next.clone()).build();
    }
    match envelope.next_page_start {
        Some(start) if !envelope.is_last_page => {
            let mut query = filters;
            query.push(("start".to_owned(), start.to_string()));
            if opts.size != 0 {
                query.push(("limit".to_owned(), opts.size.to_string()));
            }
            Page::builder(0).next_url(with_query(path, &query)).build()
        }
        _ => Page::default(),
    }
}

fn split_repo(repo: &str) -> Result<(&str, &str), ScmError> {
    repo.split_once('/')
        .filter(|(project, slug)| !project.is_empty() && !slug.is_empty())
        .ok_or_else(|| ScmError::InvalidUrl(format!("expected PROJECT/slug, got {repo}")))
}

fn repo_path(repo: &str) -> Result<String, ScmError> {
    let (project, slug) = split_repo(repo)?;
    Ok(format!("rest/api/1.0/projects/{project}/repos/{slug}"))
}

#[async_trait]
impl RepositoryService for StashDriver {
    async fn find(&self, repo: &str) -> ScmResult<Repository> {
        self.fetch::<ApiRepository, _>(Request::get(repo_path(repo)?))
            .await
    }

    async fn list(&self, opts: &ListOptions) -> ScmResult<Vec<Repository>> {
        let filters = vec![("permission".to_owned(), "REPO_READ".to_owned())];
        self.fetch_page::<ApiRepository, _>("rest/api/1.0/repos", filters, opts)
            .await
    }
}

#[async_trait]
impl PullRequestService for StashDriver {
    async fn find(&self, repo: &str, number: u64) -> ScmResult<PullRequest> {
        let path = format!("{}/pull-requests/{number}", repo_path(repo)?);
        self.fetch::<ApiPullRequest, _>(Request::get(path)).await
    }

    async fn list_changes(
        &self,
        repo: &str,
        number: u64,
        opts: &ListOptions,
    ) -> ScmResult<Vec<Change>> {
        let path = format!("{}/pull-requests/{number}/changes", repo_path(repo)?);
        self.fetch_page::<ApiChange, _>(&path, Vec::new(), opts)
            .await
    }
}

#[async_trait]
impl UserService for StashDriver {
    async fn find_login(&self, login: &str) -> ScmResult<User> {
        self.fetch::<ApiUser, _>(Request::get(format!("rest/api/1.0/users/{login}")))
            .await
    }
}

/// Builds a [`Client`] backed by Bitbucket Server over `transport`.
#[must_use]
pub fn client(transport: Arc<dyn Transport>) -> Client {
    let driver = Arc::new(StashDriver::new(transport));
    Client::builder(Driver::Stash)
        .repositories(driver.clone())
        .pull_requests(driver.clone())
        .users(driver)
        .build()
}

/// Connects to a Bitbucket Server root such as `http://localhost:7990`.
///
/// # Errors
///
/// Returns [`ScmError::InvalidUrl`] when `server` cannot be parsed or
/// [`ScmError::Configuration`] when the token is not a valid header value.
pub fn new(server: &str, token: Option<&str>) -> Result<Client, ScmError> {
    let mut transport = HttpTransport::new(server)?;
    if let Some(secret) = token.filter(|value| !value.is_empty()) {
        let value = HeaderValue::from_str(&format!("Bearer {secret}")).map_err(|error| {
            ScmError::Configuration {
                message: format!("invalid token: {error}"),
            }
        })?;
        transport = transport.with_header(AUTHORIZATION, value);
    }
    Ok(client(Arc::new(transport)))
}

#[cfg(test)]
mod tests;
