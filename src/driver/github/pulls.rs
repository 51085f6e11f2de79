//! Pull request and issue operations.
//!
//! GitHub stores pull request conversation comments as issue comments, so
//! both capabilities share the `issues/...` comment endpoints.

use async_trait::async_trait;
use http::Method;

use super::GithubDriver;
use super::models::{
    ApiBodyInput, ApiComment, ApiCommit, ApiFile, ApiIssue, ApiIssueInput, ApiPullRequest,
    ApiPullRequestInput, ApiStateInput,
};
use crate::driver::list_request;
use crate::scm::error::ScmError;
use crate::scm::models::{
    Change, Comment, CommentInput, Commit, Issue, IssueInput, PullRequest, PullRequestInput,
};
use crate::scm::pagination::{IssueListOptions, ListOptions, PullRequestListOptions};
use crate::scm::response::Response;
use crate::scm::service::{IssueService, PullRequestService, ScmResult};
use crate::scm::transport::Request;

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

fn state_filter(state: &str) -> Vec<(String, String)> {
    vec![("state".to_owned(), state.to_owned())]
}

impl GithubDriver {
    async fn find_issue_comment(&self, repo: &str, id: u64) -> ScmResult<Comment> {
        let path = format!("repos/{repo}/issues/comments/{id}");
        self.fetch::<ApiComment, _>(Request::get(path)).await
    }

    async fn list_issue_comments(
        &self,
        repo: &str,
        number: u64,
        opts: &ListOptions,
    ) -> ScmResult<Vec<Comment>> {
        let path = format!("repos/{repo}/issues/{number}/comments");
        self.fetch_page::<ApiComment, _>(list_request(&path, Vec::new(), opts), opts)
            .await
    }

    async fn create_issue_comment(
        &self,
        repo: &str,
        number: u64,
        input: &CommentInput,
    ) -> ScmResult<Comment> {
        let path = format!("repos/{repo}/issues/{number}/comments");
        let body = ApiBodyInput {
            body: input.body.clone(),
        };
        let request = Request::new(Method::POST, path).with_json(&body)?;
        self.fetch::<ApiComment, _>(request).await
    }

    async fn delete_issue_comment(&self, repo: &str, id: u64) -> Result<Response, ScmError> {
        let path = format!("repos/{repo}/issues/comments/{id}");
        self.wrapper.empty(Request::new(Method::DELETE, path)).await
    }

    async fn close_issue(&self, path: String) -> Result<Response, ScmError> {
        let request =
            Request::new(Method::PATCH, path).with_json(&ApiStateInput { state: "closed" })?;
        self.wrapper.empty(request).await
    }
}

#[async_trait]
impl PullRequestService for GithubDriver {
    async fn find(&self, repo: &str, number: u64) -> ScmResult<PullRequest> {
        let path = format!("repos/{repo}/pulls/{number}");
        self.fetch::<ApiPullRequest, _>(Request::get(path)).await
    }

    async fn list(&self, repo: &str, opts: &PullRequestListOptions) -> ScmResult<Vec<PullRequest>> {
        let path = format!("repos/{repo}/pulls");
        let request = list_request(&path, state_filter(opts.state()), &opts.list);
        self.fetch_page::<ApiPullRequest, _>(request, &opts.list)
            .await
    }

    async fn list_changes(
        &self,
        repo: &str,
        number: u64,
        opts: &ListOptions,
    ) -> ScmResult<Vec<Change>> {
        let path = format!("repos/{repo}/pulls/{number}/files");
        self.fetch_page::<ApiFile, _>(list_request(&path, Vec::new(), opts), opts)
            .await
    }

    async fn list_commits(
        &self,
        repo: &str,
        number: u64,
        opts: &ListOptions,
    ) -> ScmResult<Vec<Commit>> {
        let path = format!("repos/{repo}/pulls/{number}/commits");
        self.fetch_page::<ApiCommit, _>(list_request(&path, Vec::new(), opts), opts)
            .await
    }

    async fn create(&self, repo: &str, input: &PullRequestInput) -> ScmResult<PullRequest> {
        let body = ApiPullRequestInput {
            title: Some(input.title.clone()),
            body: Some(input.body.clone()),
            head: Some(input.source.clone()),
            base: Some(input.target.clone()),
        };
        let request = Request::new(Method::POST, format!("repos/{repo}/pulls")).with_json(&body)?;
        self.fetch::<ApiPullRequest, _>(request).await
    }

    async fn update(
        &self,
        repo: &str,
        number: u64,
        input: &PullRequestInput,
    ) -> ScmResult<PullRequest> {
        let body = ApiPullRequestInput {
            title: non_empty(&input.title),
            body: non_empty(&input.body),
            head: None,
            base: non_empty(&input.target),
        };
        let request = Request::new(Method::PATCH, format!("repos/{repo}/pulls/{number}"))
            .with_json(&body)?;
        self.fetch::<ApiPullRequest, _>(request).await
    }

    async fn merge(&self, repo: &str, number: u64) -> Result<Response, ScmError> {
        let path = format!("repos/{repo}/pulls/{number}/merge");
        self.wrapper.empty(Request::new(Method::PUT, path)).await
    }

    async fn close(&self, repo: &str, number: u64) -> Result<Response, ScmError> {
        self.close_issue(format!("repos/{repo}/pulls/{number}"))
            .await
    }

    async fn find_comment(&self, repo: &str, _number: u64, id: u64) -> ScmResult<Comment> {
        self.find_issue_comment(repo, id).await
    }

    async fn list_comments(
        &self,
        repo: &str,
        number: u64,
        opts: &ListOptions,
    ) -> ScmResult<Vec<Comment>> {
        self.list_issue_comments(repo, number, opts).await
    }

    async fn create_comment(
        &self,
        repo: &str,
        number: u64,
        input: &CommentInput,
    ) -> ScmResult<Comment> {
        self.create_issue_comment(repo, number, input).await
    }

    async fn delete_comment(&self, repo: &str, _number: u64, id: u64) -> Result<Response, ScmError> {
        self.delete_issue_comment(repo, id).await
    }
}

#[async_trait]
impl IssueService for GithubDriver {
    async fn find(&self, repo: &str, number: u64) -> ScmResult<Issue> {
        let path = format!("repos/{repo}/issues/{number}");
        self.fetch::<ApiIssue, _>(Request::get(path)).await
    }

    async fn list(&self, repo: &str, opts: &IssueListOptions) -> ScmResult<Vec<Issue>> {
        let path = format!("repos/{repo}/issues");
        let request = list_request(&path, state_filter(opts.state()), &opts.list);
        self.fetch_page::<ApiIssue, _>(request, &opts.list).await
    }

    async fn create(&self, repo: &str, input: &IssueInput) -> ScmResult<Issue> {
        let body = ApiIssueInput {
            title: input.title.clone(),
            body: input.body.clone(),
        };
        let request =
            Request::new(Method::POST, format!("repos/{repo}/issues")).with_json(&body)?;
        self.fetch::<ApiIssue, _>(request).await
    }

    async fn close(&self, repo: &str, number: u64) -> Result<Response, ScmError> {
        self.close_issue(format!("repos/{repo}/issues/{number}"))
            .await
    }

    async fn find_comment(&self, repo: &str, _number: u64, id: u64) -> ScmResult<Comment> {
        self.find_issue_comment(repo, id).await
    }

    async fn list_comments(
        &self,
        repo: &str,
        number: u64,
        opts: &ListOptions,
    ) -> ScmResult<Vec<Comment>> {
        self.list_issue_comments(repo, number, opts).await
    }

    async fn create_comment(
        &self,
        repo: &str,
        number: u64,
        input: &CommentInput,
    ) -> ScmResult<Comment> {
        self.create_issue_comment(repo, number, input).await
    }

    async fn delete_comment(&self, repo: &str, _number: u64, id: u64) -> Result<Response, ScmError> {
        self.delete_issue_comment(repo, id).await
    }
}
