//! Backend adapters.
//!
//! Each adapter owns private wire structs mirroring its backend's JSON, pure
//! `From` conversions into the canonical model, and a [`Wrapper`] tied to the
//! backend's error envelope. Adapters implement only the capabilities their
//! backend can honour; [`Client`] fills the rest with
//! [`Unsupported`](crate::scm::Unsupported).
//!
//! [`Wrapper`]: crate::scm::transport::Wrapper
//! [`Client`]: crate::scm::Client

pub mod gitea;
pub mod github;
pub mod harness;
pub mod stash;

use chrono::{DateTime, Utc};

use crate::scm::link::page_from_link_header;
use crate::scm::pagination::{ListOptions, encode_query};
use crate::scm::response::Response;
use crate::scm::transport::Request;

/// Appends an encoded query string when there is one.
pub(crate) fn with_query(path: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return path.to_owned();
    }
    format!("{path}?{}", encode_query(query))
}

/// Builds a `GET` for one page of a listing using `page`/`per_page`.
pub(crate) fn list_request(path: &str, filters: Vec<(String, String)>, opts: &ListOptions) -> Request {
    list_request_with(path, filters, opts, "per_page")
}

/// Builds a `GET` for one page of a listing.
///
/// A cursor URL in `opts` is followed verbatim; otherwise `page` and the
/// backend's page size parameter are appended after the operation's own
/// filters.
pub(crate) fn list_request_with(
    path: &str,
    filters: Vec<(String, String)>,
    opts: &ListOptions,
    size_key: &str,
) -> Request {
    if let Some(cursor) = opts.cursor() {
        return Request::get(cursor);
    }
    let mut query = filters;
    query.extend(opts.page_query("page", size_key));
    Request::get(with_query(path, &query))
}

/// Attaches the `Link` header pagination to a list response.
pub(crate) fn link_paged(response: Response, opts: &ListOptions) -> Response {
    let page = page_from_link_header(&response.headers, opts.page);
    response.with_page(page)
}

/// Converts epoch milliseconds, mapping out-of-range values to the epoch.
pub(crate) fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

/// Converts a decoded list, treating `null` as empty.
pub(crate) fn convert_all<A, T: From<A>>(wire: Option<Vec<A>>) -> Vec<T> {
    wire.unwrap_or_default().into_iter().map(T::from).collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{convert_all, from_millis, list_request, list_request_with, with_query};
    use crate::scm::pagination::ListOptions;

    #[rstest]
    fn query_is_omitted_when_empty() {
        assert_eq!(with_query("user/repos", &[]), "user/repos");
    }

    #[rstest]
    fn list_request_appends_paging_after_filters() {
        let request = list_request(
            "repos/o/r/pulls",
            vec![("state".to_owned(), "all".to_owned())],
            &ListOptions::new(2, 30),
        );
        assert_eq!(request.path, "repos/o/r/pulls?state=all&page=2&per_page=30");
    }

    #[rstest]
    fn list_request_prefers_cursor() {
        let opts = ListOptions {
            url: Some("https://forge.test/next?after=abc".to_owned()),
            ..ListOptions::new(2, 30)
        };
        let request = list_request("repos/o/r/pulls", Vec::new(), &opts);
        assert_eq!(request.path, "https://forge.test/next?after=abc");
    }

    #[rstest]
    fn list_request_uses_backend_size_key() {
        let request = list_request_with("api/v1/user/repos", Vec::new(), &ListOptions::new(1, 50), "limit");
        assert_eq!(request.path, "api/v1/user/repos?page=1&limit=50");
    }

    #[rstest]
    fn millis_convert_to_utc() {
        assert_eq!(
            from_millis(1_700_000_000_123).to_rfc3339(),
            "2023-11-14T22:13:20.123+00:00"
        );
    }

    #[rstest]
    fn null_lists_convert_to_empty() {
        let converted: Vec<String> = convert_all::<String, String>(None);
        assert!(converted.is_empty(), "null list should become empty");
    }
}
