//! Helpers for fully-qualified git reference paths.

/// Prefix of branch references.
pub const BRANCH_PREFIX: &str = "refs/heads";
/// Prefix of tag references.
pub const TAG_PREFIX: &str = "refs/tags";

/// Expands a short reference name into a fully-qualified path.
///
/// Names that already start with `refs/` are returned unchanged, so the
/// expansion is idempotent.
///
/// # Example
///
/// ```
/// use forgekit::scm::refs::{BRANCH_PREFIX, expand_ref};
///
/// assert_eq!(expand_ref("main", BRANCH_PREFIX), "refs/heads/main");
/// assert_eq!(expand_ref("refs/heads/main", BRANCH_PREFIX), "refs/heads/main");
/// ```
#[must_use]
pub fn expand_ref(name: &str, prefix: &str) -> String {
    if name.starts_with("refs/") {
        return name.to_owned();
    }
    let trimmed_prefix = prefix.trim_end_matches('/');
    let trimmed_name = name.trim_start_matches('/');
    format!("{trimmed_prefix}/{trimmed_name}")
}

/// Strips the `refs/heads/` or `refs/tags/` prefix from a reference.
#[must_use]
pub fn trim_ref(name: &str) -> &str {
    name.strip_prefix("refs/heads/")
        .or_else(|| name.strip_prefix("refs/tags/"))
        .unwrap_or(name)
}

/// Returns true when the reference points at a branch.
#[must_use]
pub fn is_branch(name: &str) -> bool {
    name.starts_with("refs/heads/")
}

/// Returns true when the reference points at a tag.
#[must_use]
pub fn is_tag(name: &str) -> bool {
    name.starts_with("refs/tags/")
}

/// Returns true when the reference belongs to a pull request, in any of
/// the layouts used by the supported backends.
#[must_use]
pub fn is_pull_request(name: &str) -> bool {
    name.starts_with("refs/pull/")
        || name.starts_with("refs/pull-requests/")
        || name.starts_with("refs/pullreq/")
        || name.starts_with("refs/merge-requests/")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{BRANCH_PREFIX, TAG_PREFIX, expand_ref, is_branch, is_pull_request, is_tag, trim_ref};

    #[rstest]
    #[case::short_branch("main", BRANCH_PREFIX, "refs/heads/main")]
    #[case::nested_branch("feature/login", BRANCH_PREFIX, "refs/heads/feature/login")]
    #[case::qualified_branch("refs/heads/main", BRANCH_PREFIX, "refs/heads/main")]
    #[case::short_tag("v1.0.0", TAG_PREFIX, "refs/tags/v1.0.0")]
    #[case::trailing_slash_prefix("main", "refs/heads/", "refs/heads/main")]
    #[case::slashes_on_both_sides("/main", "refs/heads/", "refs/heads/main")]
    fn expands_reference(#[case] name: &str, #[case] prefix: &str, #[case] expected: &str) {
        assert_eq!(expand_ref(name, prefix), expected);
    }

    #[rstest]
    #[case("main")]
    #[case("refs/heads/main")]
    #[case("refs/tags/v2")]
    fn expansion_is_idempotent(#[case] name: &str) {
        let once = expand_ref(name, BRANCH_PREFIX);
        assert_eq!(expand_ref(&once, BRANCH_PREFIX), once);
    }

    #[rstest]
    fn classifies_references() {
        assert!(is_branch("refs/heads/main"));
        assert!(is_tag("refs/tags/v1"));
        assert!(is_pull_request("refs/pull/4/head"));
        assert!(is_pull_request("refs/pullreq/4/head"));
        assert!(!is_pull_request("refs/heads/pull"));
        assert_eq!(trim_ref("refs/heads/main"), "main");
        assert_eq!(trim_ref("refs/tags/v1"), "v1");
        assert_eq!(trim_ref("HEAD"), "HEAD");
    }
}
