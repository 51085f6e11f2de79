//! HTTP-level tests for the GitHub adapter.

use std::sync::Arc;

use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::client;
use crate::scm::client::Client;
use crate::scm::error::ScmError;
use crate::scm::models::{PullRequest, PullRequestInput, Repository};
use crate::scm::pagination::{ListOptions, PullRequestListOptions};
use crate::scm::transport::HttpTransport;

struct Forge {
    server: MockServer,
    client: Client,
}

async fn start() -> Forge {
    let server = MockServer::start().await;
    let transport = HttpTransport::new(&server.uri()).expect("mock server URI should parse");
    Forge {
        client: client(Arc::new(transport)),
        server,
    }
}

fn json_body(body: &'static str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/json")
}

#[rstest]
#[tokio::test]
async fn find_pull_request_matches_golden() {
    let forge = start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/Hello-World/pulls/1347"))
        .respond_with(json_body(include_str!("testdata/pr.json")))
        .mount(&forge.server)
        .await;

    let reply = forge
        .client
        .pull_requests()
        .find("octocat/Hello-World", 1347)
        .await
        .expect("request should succeed");

    let golden: PullRequest =
        serde_json::from_str(include_str!("testdata/pr.json.golden")).expect("golden should decode");
    assert_eq!(reply.value, golden);
    assert_eq!(reply.response.status.as_u16(), 200);
}

#[rstest]
#[tokio::test]
async fn list_repositories_reads_link_header() {
    let forge = start().await;
    let base = forge.server.uri();
    let link = format!(
        "<{base}/user/repos?page=3&per_page=1>; rel=\"next\", <{base}/user/repos?page=5&per_page=1>; rel=\"last\", <{base}/user/repos?page=1&per_page=1>; rel=\"first\", <{base}/user/repos?page=1&per_page=1>; rel=\"prev\""
    );
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "1"))
        .respond_with(json_body(include_str!("testdata/repos.json")).insert_header("Link", link))
        .mount(&forge.server)
        .await;

    let reply = forge
        .client
        .repositories()
        .list(&ListOptions::new(2, 1))
        .await
        .expect("request should succeed");

    let golden: Vec<Repository> = serde_json::from_str(include_str!("testdata/repos.json.golden"))
        .expect("golden should decode");
    assert_eq!(reply.value, golden);
    let page = reply.page();
    assert_eq!(page.page(), 2);
    assert_eq!(page.next(), 3);
    assert_eq!(page.prev(), 1);
    assert_eq!(page.first(), 1);
    assert_eq!(page.last(), 5);
    assert_eq!(page.next_url(), None);
}

#[rstest]
#[tokio::test]
async fn cursor_links_are_followed_verbatim() {
    let forge = start().await;
    let next = format!("{}/user/repos?after=Y3Vyc29y", forge.server.uri());
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(query_param("after", "Y3Vyc29y"))
        .respond_with(json_body("[]"))
        .mount(&forge.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(query_param("per_page", "100"))
        .respond_with(
            json_body(include_str!("testdata/repos.json"))
                .insert_header("Link", format!("<{next}>; rel=\"next\"")),
        )
        .mount(&forge.server)
        .await;

    let first = forge
        .client
        .repositories()
        .list(&ListOptions::new(0, 100))
        .await
        .expect("first page should succeed");
    assert_eq!(first.page().next(), 0);
    assert_eq!(first.page().next_url(), Some(next.as_str()));

    let opts = ListOptions {
        url: Some(next.clone()),
        ..ListOptions::new(0, 100)
    };
    let second = forge
        .client
        .repositories()
        .list(&opts)
        .await
        .expect("cursor page should succeed");
    assert!(second.value.is_empty(), "empty page should convert to empty list");
    assert!(second.page().is_last_page());
}

#[rstest]
#[case::json_body(json!({"message": "Bad credentials"}))]
#[case::unrelated_body(json!({"errors": [{"message": "ignored"}]}))]
#[tokio::test]
async fn unauthorized_ignores_body(#[case] body: serde_json::Value) {
    let forge = start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(body))
        .mount(&forge.server)
        .await;

    let error = forge
        .client
        .users()
        .find()
        .await
        .expect_err("401 should fail");

    assert_eq!(error, ScmError::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn api_errors_surface_first_detail() {
    let forge = start().await;
    Mock::given(method("POST"))
        .and(path("/repos/octocat/Hello-World/pulls"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "errors": [
                {"message": "No commits between master and topic"},
                {"message": "second"}
            ]
        })))
        .mount(&forge.server)
        .await;

    let input = PullRequestInput {
        title: "Add topic".to_owned(),
        body: String::new(),
        source: "topic".to_owned(),
        target: "master".to_owned(),
    };
    let error = forge
        .client
        .pull_requests()
        .create("octocat/Hello-World", &input)
        .await
        .expect_err("422 should fail");

    assert_eq!(
        error,
        ScmError::Api {
            status: 422,
            message: "No commits between master and topic".to_owned(),
        }
    );
}

#[rstest]
#[tokio::test]
async fn update_sends_only_supplied_fields() {
    let forge = start().await;
    Mock::given(method("PATCH"))
        .and(path("/repos/octocat/Hello-World/pulls/1347"))
        .and(body_json(json!({"title": "Renamed"})))
        .respond_with(json_body(include_str!("testdata/pr.json")))
        .expect(1)
        .mount(&forge.server)
        .await;

    let input = PullRequestInput {
        title: "Renamed".to_owned(),
        ..PullRequestInput::default()
    };
    forge
        .client
        .pull_requests()
        .update("octocat/Hello-World", 1347, &input)
        .await
        .expect("update should succeed");
}

#[rstest]
#[tokio::test]
async fn merge_and_close_return_response_metadata() {
    let forge = start().await;
    Mock::given(method("PUT"))
        .and(path("/repos/octocat/Hello-World/pulls/1347/merge"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"merged": true})))
        .mount(&forge.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/repos/octocat/Hello-World/pulls/1348"))
        .and(body_json(json!({"state": "closed"})))
        .respond_with(json_body(include_str!("testdata/pr.json")))
        .mount(&forge.server)
        .await;

    let pulls = forge.client.pull_requests();
    let merged = pulls
        .merge("octocat/Hello-World", 1347)
        .await
        .expect("merge should succeed");
    let closed = pulls
        .close("octocat/Hello-World", 1348)
        .await
        .expect("close should succeed");

    assert_eq!(merged.status.as_u16(), 200);
    assert_eq!(closed.status.as_u16(), 200);
}

#[rstest]
#[tokio::test]
async fn list_pull_requests_sends_state_filter() {
    let forge = start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/Hello-World/pulls"))
        .and(query_param("state", "closed"))
        .respond_with(json_body("[]"))
        .expect(1)
        .mount(&forge.server)
        .await;

    let opts = PullRequestListOptions {
        closed: true,
        ..PullRequestListOptions::default()
    };
    let reply = forge
        .client
        .pull_requests()
        .list("octocat/Hello-World", &opts)
        .await
        .expect("list should succeed");

    assert!(reply.value.is_empty());
}

#[rstest]
#[tokio::test]
async fn find_perms_reads_repository_permissions() {
    let forge = start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/Hello-World"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "Hello-World",
            "owner": {"login": "octocat"},
            "permissions": {"admin": true, "push": true, "pull": true}
        })))
        .mount(&forge.server)
        .await;

    let perm = forge
        .client
        .repositories()
        .find_perms("octocat/Hello-World")
        .await
        .expect("lookup should succeed")
        .value;

    assert!(perm.admin && perm.push && perm.pull);
}

#[rstest]
#[tokio::test]
async fn reviews_are_not_supported() {
    let forge = start().await;

    let error = forge
        .client
        .reviews()
        .list("octocat/Hello-World", 1, &ListOptions::default())
        .await
        .expect_err("reviews are not wired");

    assert!(error.is_not_supported());
}
