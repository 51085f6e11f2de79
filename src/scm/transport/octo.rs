//! Octocrab-backed transport for GitHub and GitHub Enterprise.

use async_trait::async_trait;
use http::{Method, Uri};
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;

use super::{RawResponse, Request, Transport};
use crate::scm::error::ScmError;

/// Sends requests through an authenticated Octocrab client.
///
/// Octocrab owns authentication and base URL handling; the raw response is
/// handed back untouched so the GitHub adapter's wrapper can classify it.
pub struct OctocrabTransport {
    client: Octocrab,
    base: Uri,
}

impl OctocrabTransport {
    /// Creates a transport from an Octocrab client configured for `base`.
    #[must_use]
    pub const fn new(client: Octocrab, base: Uri) -> Self {
        Self { client, base }
    }

    /// Builds an Octocrab client for the given token and API base URL.
    ///
    /// Octocrab's retry middleware is switched off: every request reaches the
    /// server exactly once and failures surface to the caller unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ScmError::InvalidUrl`] when the base URI cannot be parsed or
    /// [`ScmError::Transport`] when Octocrab fails to construct a client.
    pub fn for_token(token: &str, api_base: &str) -> Result<Self, ScmError> {
        let base_uri: Uri = api_base
            .parse::<Uri>()
            .map_err(|error| ScmError::InvalidUrl(error.to_string()))?;

        let client = Octocrab::builder()
            .add_retry_config(RetryConfig::None)
            .personal_token(token)
            .base_uri(base_uri.clone())
            .map_err(|error| ScmError::Transport {
                message: format!("build client failed: {error}"),
            })?
            .build()
            .map_err(|error| ScmError::Transport {
                message: format!("build client failed: {error}"),
            })?;
        Ok(Self::new(client, base_uri))
    }
}

/// Resolves a request path against the client's base URI.
///
/// Absolute URLs on the base authority (cursor links handed back by GitHub
/// Enterprise) are reduced to their path and query so Octocrab still applies
/// its base URI and credentials. Foreign hosts are left absolute.
fn request_uri(base: &Uri, path: &str) -> Result<Uri, ScmError> {
    let invalid = |error: http::uri::InvalidUri| ScmError::InvalidUrl(format!("{path}: {error}"));
    if !(path.starts_with("http://") || path.starts_with("https://")) {
        return format!("/{}", path.trim_start_matches('/'))
            .parse::<Uri>()
            .map_err(invalid);
    }
    let absolute = path.parse::<Uri>().map_err(invalid)?;
    if absolute.authority() != base.authority() {
        return Ok(absolute);
    }
    let local = absolute
        .path_and_query()
        .map_or("/", http::uri::PathAndQuery::as_str);
    local.parse::<Uri>().map_err(invalid)
}

fn transport_error(error: &octocrab::Error) -> ScmError {
    ScmError::Transport {
        message: error.to_string(),
    }
}

#[async_trait]
impl Transport for OctocrabTransport {
    async fn send(&self, request: Request) -> Result<RawResponse, ScmError> {
        let uri = request_uri(&self.base, &request.path)?;
        let body = request.body.as_ref();
        let response = match request.method {
            Method::GET => {
                self.client
                    ._get_with_headers(uri, Some(request.headers))
                    .await
            }
            Method::POST => self.client._post(uri, body).await,
            Method::PATCH => self.client._patch(uri, body).await,
            Method::PUT => self.client._put(uri, body).await,
            Method::DELETE => self.client._delete(uri, body).await,
            other => {
                return Err(ScmError::Transport {
                    message: format!("method {other} is not supported by the octocrab transport"),
                });
            }
        }
        .map_err(|error| transport_error(&error))?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = self
            .client
            .body_to_string(response)
            .await
            .map_err(|error| transport_error(&error))?;

        Ok(RawResponse {
            status,
            headers,
            body: text.into_bytes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::Uri;
    use rstest::rstest;
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{OctocrabTransport, request_uri};
    use crate::driver::github;
    use crate::scm::error::ScmError;
    use crate::scm::pagination::ListOptions;
    use crate::traverse::{self, Traversal};

    #[rstest]
    #[case::relative("repos/o/r/pulls?state=all", "/repos/o/r/pulls?state=all")]
    #[case::rooted("/user", "/user")]
    #[case::same_host_cursor(
        "https://ghe.example.com/api/v3/user/repos?after=Y3Vyc29y",
        "/api/v3/user/repos?after=Y3Vyc29y"
    )]
    #[case::foreign_host(
        "https://uploads.example.com/user/repos?page=2",
        "https://uploads.example.com/user/repos?page=2"
    )]
    fn builds_request_uris(#[case] path: &str, #[case] expected: &str) {
        let base = Uri::from_static("https://ghe.example.com/api/v3");
        let uri = request_uri(&base, path).expect("uri should parse");
        assert_eq!(uri.to_string(), expected);
    }

    fn github_client(server: &MockServer) -> crate::scm::client::Client {
        let transport =
            OctocrabTransport::for_token("secret", &server.uri()).expect("transport should build");
        github::client(Arc::new(transport))
    }

    #[tokio::test]
    async fn server_errors_are_sent_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/repos"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
            .expect(1)
            .mount(&server)
            .await;

        let result = github_client(&server)
            .repositories()
            .list(&ListOptions::default())
            .await;

        assert!(matches!(result, Err(ScmError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn cursor_pages_keep_credentials() {
        let server = MockServer::start().await;
        let next = format!("<{}/user/repos?after=abc>; rel=\"next\"", server.uri());
        Mock::given(method("GET"))
            .and(path("/user/repos"))
            .and(query_param("after", "abc"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/user/repos"))
            .and(header_exists("authorization"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("link", next.as_str())
                    .set_body_json(json!([])),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let client = github_client(&server);
        let repos = traverse::repositories(&Traversal::new(), &client, ListOptions::new(1, 50))
            .await
            .expect("both pages should be fetched with credentials");

        assert!(repos.is_empty());
    }
}
