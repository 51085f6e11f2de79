//! Uniform pagination descriptor and list options.
//!
//! Backends page in three incompatible ways: numbered pages, `Link` header
//! next URLs and cursor tokens embedded in response bodies. Adapters
//! translate whichever signal they receive into a [`Page`], and callers (or
//! the traversal engine) feed it back through [`ListOptions`].

/// Page size used when a caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Pagination state attached to every list response.
///
/// Numeric fields use `0` for "unknown / none". When `next_url` is set the
/// numeric fields are ignored by traversal.
///
/// # Example
///
/// ```
/// use forgekit::scm::Page;
///
/// let page = Page::builder(2).next(3).last(5).build();
/// assert!(!page.is_last_page());
/// assert_eq!(page.last(), 5);
///
/// let cursor = Page::builder(0).next_url("https://example.test/?cursor=abc").build();
/// assert!(cursor.has_next());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    page: u32,
    first: u32,
    prev: u32,
    next: u32,
    last: u32,
    next_url: Option<String>,
}

impl Page {
    /// Starts building a descriptor for the given current page.
    #[must_use]
    pub const fn builder(page: u32) -> PageBuilder {
        PageBuilder {
            page: Page {
                page,
                first: 0,
                prev: 0,
                next: 0,
                last: 0,
                next_url: None,
            },
        }
    }

    /// Current page number, `0` when the backend does not number pages.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// First page number, when reported.
    #[must_use]
    pub const fn first(&self) -> u32 {
        self.first
    }

    /// Previous page number, `0` when none.
    #[must_use]
    pub const fn prev(&self) -> u32 {
        self.prev
    }

    /// Next page number, `0` when none.
    #[must_use]
    pub const fn next(&self) -> u32 {
        self.next
    }

    /// Last page number, `0` when the backend cannot tell.
    #[must_use]
    pub const fn last(&self) -> u32 {
        self.last
    }

    /// Next page URL or cursor, when the backend pages by URL.
    #[must_use]
    pub fn next_url(&self) -> Option<&str> {
        self.next_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Returns true when another page can be requested.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next != 0 || self.next_url().is_some()
    }

    /// Returns true when the sequence has terminated.
    #[must_use]
    pub fn is_last_page(&self) -> bool {
        !self.has_next()
    }
}

/// Builder for [`Page`].
#[derive(Debug, Clone)]
pub struct PageBuilder {
    page: Page,
}

impl PageBuilder {
    /// Sets the first page number.
    #[must_use]
    pub const fn first(mut self, first: u32) -> Self {
        self.page.first = first;
        self
    }

    /// Sets the previous page number.
    #[must_use]
    pub const fn prev(mut self, prev: u32) -> Self {
        self.page.prev = prev;
        self
    }

    /// Sets the next page number.
    #[must_use]
    pub const fn next(mut self, next: u32) -> Self {
        self.page.next = next;
        self
    }

    /// Sets the last page number.
    #[must_use]
    pub const fn last(mut self, last: u32) -> Self {
        self.page.last = last;
        self
    }

    /// Sets the next page URL or cursor. Empty values are ignored.
    #[must_use]
    pub fn next_url(mut self, next_url: impl Into<String>) -> Self {
        let url = next_url.into();
        self.page.next_url = (!url.is_empty()).then_some(url);
        self
    }

    /// Finishes the descriptor.
    #[must_use]
    pub fn build(self) -> Page {
        self.page
    }
}

/// Generic paging options accepted by every list operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Page number to fetch (1-based); `0` lets the backend choose.
    pub page: u32,
    /// Items per page; `0` lets the backend choose.
    pub size: u32,
    /// Next page URL or cursor; takes precedence over `page` when set.
    pub url: Option<String>,
    /// Upper bound on pages visited by traversal; `0` means unbounded.
    pub max_page: u32,
}

impl ListOptions {
    /// Options for the given page and size.
    #[must_use]
    pub const fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            url: None,
            max_page: 0,
        }
    }

    /// Sets the traversal page cap.
    #[must_use]
    pub const fn with_max_page(mut self, max_page: u32) -> Self {
        self.max_page = max_page;
        self
    }

    /// Returns the cursor URL when one is set.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }

    /// Renders `page`/`per_page` style query parameters, omitting zeros.
    #[must_use]
    pub fn page_query(&self, page_key: &str, size_key: &str) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if self.page != 0 {
            query.push((page_key.to_owned(), self.page.to_string()));
        }
        if self.size != 0 {
            query.push((size_key.to_owned(), self.size.to_string()));
        }
        query
    }
}

/// Options for listing pull requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestListOptions {
    /// Paging options.
    pub list: ListOptions,
    /// Include open pull requests.
    pub open: bool,
    /// Include closed pull requests.
    pub closed: bool,
}

impl PullRequestListOptions {
    /// Returns the state filter in the `open`/`closed`/`all` vocabulary.
    #[must_use]
    pub const fn state(&self) -> &'static str {
        match (self.open, self.closed) {
            (true, false) => "open",
            (false, true) => "closed",
            _ => "all",
        }
    }
}

/// Options for listing issues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueListOptions {
    /// Paging options.
    pub list: ListOptions,
    /// Include open issues.
    pub open: bool,
    /// Include closed issues.
    pub closed: bool,
}

impl IssueListOptions {
    /// Returns the state filter in the `open`/`closed`/`all` vocabulary.
    #[must_use]
    pub const fn state(&self) -> &'static str {
        match (self.open, self.closed) {
            (true, false) => "open",
            (false, true) => "closed",
            _ => "all",
        }
    }
}

/// Options for listing commits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitListOptions {
    /// Paging options.
    pub list: ListOptions,
    /// Branch, tag or SHA to list from.
    pub git_ref: String,
    /// Only commits touching this path.
    pub path: String,
}

/// Renders query pairs into a `key=value&...` string with form encoding.
#[must_use]
pub fn encode_query(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ListOptions, Page, PullRequestListOptions, encode_query};

    #[rstest]
    #[case::numeric_next(Page::builder(1).next(2).build(), false)]
    #[case::cursor(Page::builder(0).next_url("https://x.test/?page=2").build(), false)]
    #[case::exhausted(Page::builder(3).last(3).build(), true)]
    #[case::empty_cursor_ignored(Page::builder(1).next_url("").build(), true)]
    fn termination_rule(#[case] page: Page, #[case] terminal: bool) {
        assert_eq!(page.is_last_page(), terminal);
    }

    #[rstest]
    fn accessors() {
        let page = Page::builder(3).first(1).prev(2).next(4).last(10).build();
        assert_eq!(page.page(), 3, "current page mismatch");
        assert_eq!(page.first(), 1, "first page mismatch");
        assert_eq!(page.prev(), 2, "prev page mismatch");
        assert_eq!(page.next(), 4, "next page mismatch");
        assert_eq!(page.last(), 10, "last page mismatch");
        assert_eq!(page.next_url(), None);
    }

    #[rstest]
    #[case::open(true, false, "open")]
    #[case::closed(false, true, "closed")]
    #[case::both(true, true, "all")]
    #[case::neither(false, false, "all")]
    fn pull_request_state_filter(#[case] open: bool, #[case] closed: bool, #[case] expected: &str) {
        let opts = PullRequestListOptions {
            open,
            closed,
            ..PullRequestListOptions::default()
        };
        assert_eq!(opts.state(), expected);
    }

    #[rstest]
    fn page_query_omits_zero_values() {
        assert!(ListOptions::default().page_query("page", "per_page").is_empty());

        let query = ListOptions::new(2, 50).page_query("page", "limit");
        assert_eq!(encode_query(&query), "page=2&limit=50");
    }
}
