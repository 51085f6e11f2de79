//! Pluggable progress logging for traversal.

use crate::scm::error::ScmError;

/// Progress notifications emitted while walking pages.
#[derive(Debug, Clone, Copy)]
pub enum PageEvent<'a> {
    /// A page is about to be requested.
    Requesting {
        /// Page number, `0` when following a cursor URL.
        page: u32,
        /// Cursor URL when the backend pages by URL.
        url: Option<&'a str>,
    },
    /// A page arrived.
    Received {
        /// Page number, `0` when following a cursor URL.
        page: u32,
        /// Items on the page.
        items: usize,
    },
    /// Traversal stopped at the caller's page cap.
    Capped {
        /// The cap that was reached.
        max_page: u32,
    },
    /// The backend reported no last page, so concurrent traversal fell back
    /// to following `next` links.
    Degraded,
    /// A page failed and traversal was abandoned.
    Aborted {
        /// Page number that failed.
        page: u32,
        /// The failure returned to the caller.
        error: &'a ScmError,
    },
}

/// Receives traversal progress.
pub trait PageLogger: Send + Sync {
    /// Records one event.
    fn log(&self, event: &PageEvent<'_>);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl PageLogger for NoopLogger {
    fn log(&self, _event: &PageEvent<'_>) {}
}

/// Forwards events to `tracing` under the `forgekit::traverse` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl PageLogger for TracingLogger {
    fn log(&self, event: &PageEvent<'_>) {
        match *event {
            PageEvent::Requesting { page, url } => {
                tracing::debug!(target: "forgekit::traverse", page, url, "requesting page");
            }
            PageEvent::Received { page, items } => {
                tracing::debug!(target: "forgekit::traverse", page, items, "received page");
            }
            PageEvent::Capped { max_page } => {
                tracing::debug!(target: "forgekit::traverse", max_page, "page cap reached");
            }
            PageEvent::Degraded => {
                tracing::warn!(
                    target: "forgekit::traverse",
                    "backend reports no last page; following next links sequentially"
                );
            }
            PageEvent::Aborted { page, error } => {
                tracing::warn!(target: "forgekit::traverse", page, %error, "page fetch failed");
            }
        }
    }
}
