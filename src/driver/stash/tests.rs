//! HTTP-level tests for the Bitbucket Server adapter.

use std::sync::Arc;

use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::models::ApiPage;
use super::{client, next_page};
use crate::scm::client::Client;
use crate::scm::error::ScmError;
use crate::scm::models::{Change, PullRequest};
use crate::scm::pagination::ListOptions;
use crate::scm::transport::HttpTransport;
use crate::traverse::Traversal;

async fn start() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let transport = HttpTransport::new(&server.uri()).expect("mock server URI should parse");
    (server, client(Arc::new(transport)))
}

fn json_body(body: &'static str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/json")
}

fn repository(slug: &str) -> serde_json::Value {
    json!({
        "id": 1,
        "slug": slug,
        "project": {"key": "PRJ"},
        "public": true,
        "links": {
            "clone": [
                {"href": format!("http://example.com:7990/scm/prj/{slug}.git"), "name": "http"},
                {"href": format!("ssh://git@example.com:7999/prj/{slug}.git"), "name": "ssh"}
            ],
            "self": [{"href": format!("http://example.com:7990/projects/PRJ/repos/{slug}/browse")}]
        }
    })
}

#[tokio::test]
async fn find_pull_request_matches_golden() {
    let (server, client) = start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/projects/PRJ/repos/my-repo/pull-requests/1"))
        .respond_with(json_body(include_str!("testdata/pr.json")))
        .mount(&server)
        .await;

    let got = client
        .pull_requests()
        .find("PRJ/my-repo", 1)
        .await
        .expect("lookup should succeed");

    let want: PullRequest = serde_json::from_str(include_str!("testdata/pr.json.golden"))
        .expect("golden should decode");
    assert_eq!(got.value, want);
}

#[tokio::test]
async fn list_changes_matches_golden() {
    let (server, client) = start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/projects/PRJ/repos/my-repo/pull-requests/1/changes"))
        .respond_with(json_body(include_str!("testdata/changes.json")))
        .mount(&server)
        .await;

    let got = client
        .pull_requests()
        .list_changes("PRJ/my-repo", 1, &ListOptions::default())
        .await
        .expect("listing should succeed");

    let want: Vec<Change> = serde_json::from_str(include_str!("testdata/changes.json.golden"))
        .expect("golden should decode");
    assert_eq!(got.value, want);
    assert!(got.page().is_last_page());
}

#[tokio::test]
async fn repository_listing_follows_body_cursor() {
    let (server, client) = start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/repos"))
        .and(query_param_is_missing("start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [repository("first")],
            "isLastPage": false,
            "nextPageStart": 1
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/repos"))
        .and(query_param("start", "1"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [repository("second")],
            "isLastPage": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let first = client
        .repositories()
        .list(&ListOptions::new(0, 1))
        .await
        .expect("first page should succeed");
    assert_eq!(first.page().next(), 0, "cursor backends never number pages");
    assert_eq!(
        first.page().next_url(),
        Some("rest/api/1.0/repos?permission=REPO_READ&start=1&limit=1")
    );

    let service = client.repositories();
    let all = Traversal::new()
        .all(ListOptions::new(0, 1), |opts| async move { service.list(&opts).await })
        .await
        .expect("traversal should succeed");
    let slugs: Vec<&str> = all.iter().map(|repo| repo.name.as_str()).collect();
    assert_eq!(slugs, vec!["first", "second"]);
    let repo = all.first().expect("first repository");
    assert_eq!(repo.clone, "http://example.com:7990/scm/prj/first.git");
    assert_eq!(repo.clone_ssh, "ssh://git@example.com:7999/prj/first.git");
    assert!(!repo.private);
}

#[rstest]
fn legacy_next_link_is_kept_verbatim() {
    let envelope: ApiPage<serde_json::Value> = serde_json::from_value(json!({
        "values": [],
        "next": "https://example.com/rest/api/1.0/repos?start=50"
    }))
    .expect("envelope should decode");

    let page = next_page("rest/api/1.0/repos", Vec::new(), &ListOptions::default(), &envelope);

    assert_eq!(page.next_url(), Some("https://example.com/rest/api/1.0/repos?start=50"));
}

#[rstest]
fn missing_paging_fields_end_the_listing() {
    let envelope: ApiPage<serde_json::Value> =
        serde_json::from_value(json!({"values": []})).expect("envelope should decode");

    let page = next_page("rest/api/1.0/repos", Vec::new(), &ListOptions::default(), &envelope);

    assert!(page.is_last_page());
}

#[tokio::test]
async fn errors_surface_first_message() {
    let (server, client) = start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/users/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"context": null, "message": "User ghost does not exist.", "exceptionName": "NoSuchUserException"}]
        })))
        .mount(&server)
        .await;

    let error = client
        .users()
        .find_login("ghost")
        .await
        .expect_err("missing user");

    assert_eq!(
        error,
        ScmError::Api {
            status: 404,
            message: "User ghost does not exist.".to_owned(),
        }
    );
}

#[tokio::test]
async fn malformed_repository_id_is_rejected() {
    let (_server, client) = start().await;

    let error = client
        .repositories()
        .find("no-project")
        .await
        .expect_err("identifier lacks a project");

    assert!(matches!(error, ScmError::InvalidUrl(_)), "unexpected error: {error:?}");
}

#[tokio::test]
async fn merge_is_not_supported() {
    let (_server, client) = start().await;

    let error = client
        .pull_requests()
        .merge("PRJ/my-repo", 1)
        .await
        .expect_err("merge is not wired");

    assert!(error.is_not_supported());
}
