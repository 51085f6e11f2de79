//! End-to-end traversal of a paginated repository listing over HTTP.

use std::sync::Arc;

use forgekit::driver::github;
use forgekit::scm::HttpTransport;
use forgekit::{Client, ForgeConfig, ListOptions, ScmError, Traversal, traverse};
use rstest::rstest;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGES: u32 = 3;
const PER_PAGE: u32 = 2;

fn repositories(page: u32) -> Value {
    let entries: Vec<Value> = (1..=PER_PAGE)
        .map(|index| {
            let name = format!("repo-{page}-{index}");
            json!({
                "id": page * 100 + index,
                "name": name,
                "full_name": format!("octocat/{name}"),
                "owner": {"login": "octocat"},
                "clone_url": format!("https://github.com/octocat/{name}.git"),
                "created_at": "2011-01-26T19:01:12Z",
                "updated_at": "2011-01-26T19:14:43Z"
            })
        })
        .collect();
    Value::Array(entries)
}

async fn seeded_server() -> MockServer {
    let server = MockServer::start().await;
    let uri = server.uri();
    for page in 1..=PAGES {
        let mut links = Vec::new();
        if page < PAGES {
            links.push(format!(
                "<{uri}/user/repos?page={}&per_page={PER_PAGE}>; rel=\"next\"",
                page + 1
            ));
        }
        links.push(format!(
            "<{uri}/user/repos?page={PAGES}&per_page={PER_PAGE}>; rel=\"last\""
        ));
        Mock::given(method("GET"))
            .and(path("/user/repos"))
            .and(query_param("page", page.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("link", links.join(", "))
                    .set_body_json(repositories(page)),
            )
            .mount(&server)
            .await;
    }
    server
}

fn client_for(server: &MockServer) -> Client {
    let transport = HttpTransport::new(&server.uri()).expect("mock server URI should parse");
    github::client(Arc::new(transport))
}

fn names(repos: Vec<forgekit::scm::Repository>) -> Vec<String> {
    repos.into_iter().map(|repo| repo.name).collect()
}

fn expected_names(pages: u32) -> Vec<String> {
    (1..=pages)
        .flat_map(|page| (1..=PER_PAGE).map(move |index| format!("repo-{page}-{index}")))
        .collect()
}

#[tokio::test]
async fn sequential_traversal_preserves_page_order() {
    let server = seeded_server().await;
    let client = client_for(&server);

    let repos = traverse::repositories(&Traversal::new(), &client, ListOptions::new(1, PER_PAGE))
        .await
        .expect("traversal should succeed");

    assert_eq!(names(repos), expected_names(PAGES));
}

#[tokio::test]
async fn concurrent_traversal_collects_every_page() {
    let server = seeded_server().await;
    let client = client_for(&server);

    let traversal = Traversal::new();
    let repos = traverse::repositories_concurrent(&traversal, &client, ListOptions::new(1, PER_PAGE))
        .await
        .expect("traversal should succeed");

    let mut got = names(repos);
    got.sort();
    assert_eq!(got, expected_names(PAGES));
}

#[rstest]
#[case::sequential(false)]
#[case::concurrent(true)]
#[tokio::test]
async fn page_cap_limits_requests(#[case] concurrent: bool) {
    let server = seeded_server().await;
    let client = client_for(&server);
    let service = Arc::clone(client.repositories());
    let opts = ListOptions::new(1, PER_PAGE).with_max_page(2);

    let repos = if concurrent {
        Traversal::new()
            .all_concurrent(opts, move |page_opts| {
                let worker_service = Arc::clone(&service);
                async move { worker_service.list(&page_opts).await }
            })
            .await
    } else {
        Traversal::new()
            .all(opts, |page_opts| {
                let page_service = Arc::clone(&service);
                async move { page_service.list(&page_opts).await }
            })
            .await
    }
    .expect("traversal should succeed");

    let mut got = names(repos);
    got.sort();
    assert_eq!(got, expected_names(2));
}

#[tokio::test]
async fn failing_page_aborts_traversal() {
    let server = MockServer::start().await;
    let uri = server.uri();
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "link",
                    format!("<{uri}/user/repos?page=2&per_page=2>; rel=\"next\""),
                )
                .set_body_json(repositories(1)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({"message": "Server Error"})))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let error = traverse::repositories(&Traversal::new(), &client, ListOptions::new(1, PER_PAGE))
        .await
        .expect_err("second page fails");

    assert_eq!(
        error,
        ScmError::Api {
            status: 502,
            message: "Server Error".to_owned(),
        }
    );
}

#[tokio::test]
async fn configured_client_lists_repositories() {
    let server = seeded_server().await;
    let config = ForgeConfig {
        server: Some(server.uri()),
        page_size: PER_PAGE,
        ..ForgeConfig::default()
    };
    let client = {
        let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);
        config.connect().expect("client should build")
    };

    let repos = traverse::repositories(&Traversal::new(), &client, config.list_options())
        .await
        .expect("traversal should succeed");

    assert_eq!(names(repos), expected_names(PAGES));
}
