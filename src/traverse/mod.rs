//! Walks every page of a list operation.
//!
//! The engine only needs a function that fetches one page for a given
//! [`ListOptions`] and returns the items with their [`Page`] descriptor, so it
//! works for any list operation of any adapter.
//!
//! - [`Traversal::all`] follows `next`/`next_url` strictly and preserves page
//!   order. It works for every pagination style.
//! - [`Traversal::all_concurrent`] fetches the first page, then requests the
//!   remaining numbered pages in parallel. Results are **unordered** across
//!   pages. When the backend cannot report a last page it falls back to the
//!   sequential walk.
//!
//! Any error aborts the traversal and is returned as is; partial results are
//! dropped. No retries happen here.

mod logger;

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;

pub use logger::{NoopLogger, PageEvent, PageLogger, TracingLogger};

use crate::scm::client::Client;
use crate::scm::error::ScmError;
use crate::scm::models::Repository;
use crate::scm::pagination::{DEFAULT_PAGE_SIZE, ListOptions, Page};
use crate::scm::response::Reply;
use crate::scm::service::ScmResult;

/// Traversal engine bound to a progress logger.
#[derive(Clone)]
pub struct Traversal {
    logger: Arc<dyn PageLogger>,
}

impl Default for Traversal {
    fn default() -> Self {
        Self::new()
    }
}

impl Traversal {
    /// Creates an engine that logs nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_logger(Arc::new(NoopLogger))
    }

    /// Creates an engine reporting progress to `logger`.
    #[must_use]
    pub fn with_logger(logger: Arc<dyn PageLogger>) -> Self {
        Self { logger }
    }

    /// Fetches every page in order and concatenates the items.
    ///
    /// A zero `size` is replaced by [`DEFAULT_PAGE_SIZE`]. A non-zero
    /// `max_page` stops the walk after that many pages.
    ///
    /// # Errors
    ///
    /// Returns the first error from `fetch`, or
    /// [`ScmError::InvalidPagination`] when the backend points back at a page
    /// that was already fetched.
    pub async fn all<T, F, Fut>(&self, opts: ListOptions, fetch: F) -> Result<Vec<T>, ScmError>
    where
        F: Fn(ListOptions) -> Fut,
        Fut: Future<Output = ScmResult<Vec<T>>>,
    {
        let sized = with_default_size(opts);
        let first = self.fetch_one(&fetch, &sized).await?;
        self.follow(sized, first, &fetch).await
    }

    /// Fetches the first page, then every remaining page up to
    /// `min(last, max_page)` concurrently.
    ///
    /// Items from page one come first; the order of the remaining pages is
    /// unspecified. The first failing page cancels the others.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by any page, or the errors described
    /// for [`Traversal::all`] when falling back to the sequential walk.
    pub async fn all_concurrent<T, F, Fut>(
        &self,
        opts: ListOptions,
        fetch: F,
    ) -> Result<Vec<T>, ScmError>
    where
        T: Send + 'static,
        F: Fn(ListOptions) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ScmResult<Vec<T>>> + Send + 'static,
    {
        let sized = with_default_size(opts);
        let first = self.fetch_one(&fetch, &sized).await?;
        let page = first.response.page.clone();

        if page.is_last_page() {
            return Ok(first.value);
        }
        if page.last() == 0 || page.next() == 0 {
            self.logger.log(&PageEvent::Degraded);
            return self.follow(sized, first, &fetch).await;
        }

        let bound = match sized.max_page {
            0 => page.last(),
            cap => page.last().min(cap),
        };
        let shared = Arc::new(fetch);
        let mut workers = JoinSet::new();
        for number in page.next()..=bound {
            let worker_fetch = Arc::clone(&shared);
            let logger = Arc::clone(&self.logger);
            let worker_opts = ListOptions::new(number, sized.size);
            workers.spawn(async move {
                logger.log(&PageEvent::Requesting {
                    page: number,
                    url: None,
                });
                let outcome = (*worker_fetch)(worker_opts).await;
                (number, outcome)
            });
        }

        let mut items = first.value;
        while let Some(joined) = workers.join_next().await {
            let (number, outcome) = joined.map_err(|error| ScmError::Transport {
                message: format!("page worker failed: {error}"),
            })?;
            match outcome {
                Ok(reply) => {
                    self.logger.log(&PageEvent::Received {
                        page: number,
                        items: reply.value.len(),
                    });
                    items.extend(reply.value);
                }
                Err(error) => {
                    workers.abort_all();
                    self.logger.log(&PageEvent::Aborted {
                        page: number,
                        error: &error,
                    });
                    return Err(error);
                }
            }
        }
        Ok(items)
    }

    async fn fetch_one<T, F, Fut>(&self, fetch: &F, opts: &ListOptions) -> ScmResult<Vec<T>>
    where
        F: Fn(ListOptions) -> Fut,
        Fut: Future<Output = ScmResult<Vec<T>>>,
    {
        self.logger.log(&PageEvent::Requesting {
            page: opts.page,
            url: opts.cursor(),
        });
        match fetch(opts.clone()).await {
            Ok(reply) => {
                self.logger.log(&PageEvent::Received {
                    page: opts.page,
                    items: reply.value.len(),
                });
                Ok(reply)
            }
            Err(error) => {
                self.logger.log(&PageEvent::Aborted {
                    page: opts.page,
                    error: &error,
                });
                Err(error)
            }
        }
    }

    async fn follow<T, F, Fut>(
        &self,
        mut opts: ListOptions,
        first: Reply<Vec<T>>,
        fetch: &F,
    ) -> Result<Vec<T>, ScmError>
    where
        F: Fn(ListOptions) -> Fut,
        Fut: Future<Output = ScmResult<Vec<T>>>,
    {
        let mut seen = HashSet::from([Cursor::of(&opts)]);
        let mut fetched = 1_u32;
        let mut items = first.value;
        let mut page = first.response.page;

        loop {
            if page.is_last_page() {
                return Ok(items);
            }
            if opts.max_page != 0 && fetched >= opts.max_page {
                self.logger.log(&PageEvent::Capped {
                    max_page: opts.max_page,
                });
                return Ok(items);
            }

            advance(&mut opts, &page);
            let cursor = Cursor::of(&opts);
            if !seen.insert(cursor.clone()) {
                return Err(ScmError::InvalidPagination {
                    message: format!("backend pointed back at {cursor}"),
                });
            }

            let reply = self.fetch_one(fetch, &opts).await?;
            fetched = fetched.saturating_add(1);
            items.extend(reply.value);
            page = reply.response.page;
        }
    }
}

/// Position requested from the backend, used to detect cursor loops.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Cursor {
    Number(u32),
    Url(String),
}

impl Cursor {
    fn of(opts: &ListOptions) -> Self {
        opts.cursor().map_or_else(
            || Self::Number(opts.page.max(1)),
            |url| Self::Url(url.to_owned()),
        )
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(page) => write!(formatter, "page {page}"),
            Self::Url(url) => write!(formatter, "{url}"),
        }
    }
}

fn advance(opts: &mut ListOptions, page: &Page) {
    opts.page = page.next();
    opts.url = page.next_url().map(ToOwned::to_owned);
}

fn with_default_size(mut opts: ListOptions) -> ListOptions {
    if opts.size == 0 {
        opts.size = DEFAULT_PAGE_SIZE;
    }
    opts
}

/// Lists every repository visible to the client, in page order, reporting
/// progress through `traversal`'s logger.
///
/// # Errors
///
/// Propagates the first failing page.
pub async fn repositories(
    traversal: &Traversal,
    client: &Client,
    opts: ListOptions,
) -> Result<Vec<Repository>, ScmError> {
    let service = client.repositories();
    traversal
        .all(opts, |page_opts| async move { service.list(&page_opts).await })
        .await
}

/// Lists every repository visible to the client, fetching pages
/// concurrently. Order across pages is unspecified.
///
/// # Errors
///
/// Propagates the first failing page.
pub async fn repositories_concurrent(
    traversal: &Traversal,
    client: &Client,
    opts: ListOptions,
) -> Result<Vec<Repository>, ScmError> {
    let service = Arc::clone(client.repositories());
    traversal
        .all_concurrent(opts, move |page_opts| {
            let worker_service = Arc::clone(&service);
            async move { worker_service.list(&page_opts).await }
        })
        .await
}
