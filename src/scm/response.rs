//! Response metadata returned alongside every driver result.

use http::{HeaderMap, StatusCode};

use super::pagination::Page;
use super::rate_limit::RateLimitInfo;

/// HTTP metadata of a completed backend call.
#[derive(Debug, Clone, Default)]
pub struct Response {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Pagination descriptor; default for non-list operations.
    pub page: Page,
    /// Rate limit hints when the backend sends them.
    pub rate: Option<RateLimitInfo>,
}

impl Response {
    /// Replaces the pagination descriptor.
    #[must_use]
    pub fn with_page(mut self, page: Page) -> Self {
        self.page = page;
        self
    }
}

/// A canonical value together with the response it was decoded from.
#[derive(Debug, Clone)]
pub struct Reply<T> {
    /// Decoded canonical value.
    pub value: T,
    /// Response metadata, including pagination.
    pub response: Response,
}

impl<T> Reply<T> {
    /// Pairs a value with its response metadata.
    #[must_use]
    pub const fn new(value: T, response: Response) -> Self {
        Self { value, response }
    }

    /// Converts the value, keeping the response metadata.
    #[must_use]
    pub fn map<U>(self, convert: impl FnOnce(T) -> U) -> Reply<U> {
        Reply {
            value: convert(self.value),
            response: self.response,
        }
    }

    /// Borrows the pagination descriptor.
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.response.page
    }
}
