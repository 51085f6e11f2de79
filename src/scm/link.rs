//! `Link` response header parsing.
//!
//! GitHub-style and Gitea backends advertise neighbouring pages as
//! `<url>; rel="next"` entries. Links carrying a numeric `page` query
//! parameter become page numbers; any other `next` link is treated as an
//! opaque cursor URL and followed verbatim.

use http::HeaderMap;
use http::header::LINK;
use url::Url;

use super::pagination::{Page, PageBuilder};

/// Builds a [`Page`] from the `Link` header of a response.
///
/// `current` is the page number that was requested (or `0` when unknown).
#[must_use]
pub fn page_from_link_header(headers: &HeaderMap, current: u32) -> Page {
    let Some(header) = headers.get(LINK).and_then(|value| value.to_str().ok()) else {
        return Page::builder(current).build();
    };
    parse_link(header, current)
}

/// Parses a raw `Link` header value.
#[must_use]
pub fn parse_link(header: &str, current: u32) -> Page {
    header
        .split(',')
        .filter_map(parse_entry)
        .fold(Page::builder(current), |builder, (rel, target)| {
            apply(builder, &rel, &target)
        })
        .build()
}

fn apply(builder: PageBuilder, rel: &str, target: &str) -> PageBuilder {
    let number = page_number(target);
    match (rel, number) {
        ("next", Some(page)) => builder.next(page),
        ("next", None) => builder.next_url(target),
        ("prev", Some(page)) => builder.prev(page),
        ("first", Some(page)) => builder.first(page),
        ("last", Some(page)) => builder.last(page),
        _ => builder,
    }
}

fn parse_entry(entry: &str) -> Option<(String, String)> {
    let mut parts = entry.split(';');
    let target = parts
        .next()?
        .trim()
        .strip_prefix('<')?
        .strip_suffix('>')?
        .to_owned();
    let rel = parts.find_map(|param| {
        let (key, value) = param.trim().split_once('=')?;
        (key.trim() == "rel").then(|| value.trim().trim_matches('"').to_owned())
    })?;
    Some((rel, target))
}

fn page_number(target: &str) -> Option<u32> {
    let url = Url::parse(target).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use http::HeaderMap;
    use http::header::{HeaderValue, LINK};
    use rstest::rstest;

    use super::{page_from_link_header, parse_link};

    #[rstest]
    fn parses_numeric_links() {
        let header = concat!(
            "<https://api.github.com/user/repos?page=3&per_page=100>; rel=\"next\", ",
            "<https://api.github.com/user/repos?page=1&per_page=100>; rel=\"prev\", ",
            "<https://api.github.com/user/repos?page=1&per_page=100>; rel=\"first\", ",
            "<https://api.github.com/user/repos?page=50&per_page=100>; rel=\"last\""
        );
        let page = parse_link(header, 2);

        assert_eq!(page.page(), 2);
        assert_eq!(page.next(), 3);
        assert_eq!(page.prev(), 1);
        assert_eq!(page.first(), 1);
        assert_eq!(page.last(), 50);
        assert_eq!(page.next_url(), None);
    }

    #[rstest]
    fn keeps_cursor_links_verbatim() {
        let header = "<https://api.github.com/orgs/o/audit-log?after=MTYw&before=>; rel=\"next\"";
        let page = parse_link(header, 0);

        assert_eq!(page.next(), 0);
        assert_eq!(
            page.next_url(),
            Some("https://api.github.com/orgs/o/audit-log?after=MTYw&before=")
        );
        assert!(page.has_next());
    }

    #[rstest]
    fn missing_header_terminates() {
        let page = page_from_link_header(&HeaderMap::new(), 4);
        assert_eq!(page.page(), 4);
        assert!(page.is_last_page());
    }

    #[rstest]
    fn ignores_malformed_entries() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static("garbage, <https://x.test/?page=2>; rel=\"next\""),
        );
        let page = page_from_link_header(&headers, 1);
        assert_eq!(page.next(), 2);
    }
}
