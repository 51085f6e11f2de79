//! Capability implementations for Harness.

use async_trait::async_trait;
use http::Method;

use super::HarnessDriver;
use super::models::{
    ApiComment, ApiCommentInput, ApiCommit, ApiFileDiff, ApiPullRequest, ApiPullRequestInput,
    ApiRepository,
};
use crate::scm::models::{
    Change, Comment, CommentInput, Commit, PullRequest, PullRequestInput, Repository,
};
use crate::scm::pagination::{ListOptions, PullRequestListOptions};
use crate::scm::service::{PullRequestService, RepositoryService, ScmResult};
use crate::scm::transport::Request;

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

/// Harness keeps merged pull requests apart from closed ones.
fn state_filter(opts: &PullRequestListOptions) -> Vec<(String, String)> {
    match opts.state() {
        "open" => vec![("state".to_owned(), "open".to_owned())],
        "closed" => vec![
            ("state".to_owned(), "closed".to_owned()),
            ("state".to_owned(), "merged".to_owned()),
        ],
        _ => Vec::new(),
    }
}

#[async_trait]
impl RepositoryService for HarnessDriver {
    async fn find(&self, repo: &str) -> ScmResult<Repository> {
        let path = self.scoped(&self.repo_path(repo)?, Vec::new());
        self.fetch::<ApiRepository, _>(Request::get(path)).await
    }

    async fn list(&self, opts: &ListOptions) -> ScmResult<Vec<Repository>> {
        let filters = vec![
            ("sort".to_owned(), "path".to_owned()),
            ("order".to_owned(), "asc".to_owned()),
        ];
        self.fetch_page::<ApiRepository, _>(self.list_request("api/v1/repos", filters, opts), opts)
            .await
    }
}

#[async_trait]
impl PullRequestService for HarnessDriver {
    async fn find(&self, repo: &str, number: u64) -> ScmResult<PullRequest> {
        let path = format!("{}/pullreq/{number}", self.repo_path(repo)?);
        self.fetch::<ApiPullRequest, _>(Request::get(self.scoped(&path, Vec::new())))
            .await
    }

    async fn list(&self, repo: &str, opts: &PullRequestListOptions) -> ScmResult<Vec<PullRequest>> {
        let path = format!("{}/pullreq", self.repo_path(repo)?);
        let request = self.list_request(&path, state_filter(opts), &opts.list);
        self.fetch_page::<ApiPullRequest, _>(request, &opts.list)
            .await
    }

    /// The diff endpoint answers a `POST` with every changed file at once.
    async fn list_changes(
        &self,
        repo: &str,
        number: u64,
        opts: &ListOptions,
    ) -> ScmResult<Vec<Change>> {
        let path = format!("{}/pullreq/{number}/diff", self.repo_path(repo)?);
        let request = Request::new(Method::POST, self.scoped(&path, Vec::new()));
        self.fetch_page::<ApiFileDiff, _>(request, opts).await
    }

    async fn list_commits(
        &self,
        repo: &str,
        number: u64,
        opts: &ListOptions,
    ) -> ScmResult<Vec<Commit>> {
        let path = format!("{}/pullreq/{number}/commits", self.repo_path(repo)?);
        self.fetch_page::<ApiCommit, _>(self.list_request(&path, Vec::new(), opts), opts)
            .await
    }

    async fn create(&self, repo: &str, input: &PullRequestInput) -> ScmResult<PullRequest> {
        let path = format!("{}/pullreq", self.repo_path(repo)?);
        let body = ApiPullRequestInput {
            title: Some(input.title.clone()),
            description: Some(input.body.clone()),
            source_branch: Some(input.source.clone()),
            target_branch: Some(input.target.clone()),
        };
        let request = Request::new(Method::POST, self.scoped(&path, Vec::new())).with_json(&body)?;
        self.fetch::<ApiPullRequest, _>(request).await
    }

    async fn update(
        &self,
        repo: &str,
        number: u64,
        input: &PullRequestInput,
    ) -> ScmResult<PullRequest> {
        let path = format!("{}/pullreq/{number}", self.repo_path(repo)?);
        let body = ApiPullRequestInput {
            title: non_empty(&input.title),
            description: non_empty(&input.body),
            source_branch: None,
            target_branch: non_empty(&input.target),
        };
        let request = Request::new(Method::PUT, self.scoped(&path, Vec::new())).with_json(&body)?;
        self.fetch::<ApiPullRequest, _>(request).await
    }

    async fn create_comment(
        &self,
        repo: &str,
        number: u64,
        input: &CommentInput,
    ) -> ScmResult<Comment> {
        let path = format!("{}/pullreq/{number}/comments", self.repo_path(repo)?);
        let body = ApiCommentInput {
            text: input.body.clone(),
        };
        let request = Request::new(Method::POST, self.scoped(&path, Vec::new())).with_json(&body)?;
        self.fetch::<ApiComment, _>(request).await
    }
}
