//! Capability implementations for Gitea.

use async_trait::async_trait;
use http::{Method, StatusCode};

use super::GiteaDriver;
use super::models::{
    ApiMergeInput, ApiOrgPermissions, ApiOrganization, ApiPullRequest, ApiRepository,
    ApiStateInput, ApiUser,
};
use crate::driver::list_request_with;
use crate::scm::error::ScmError;
use crate::scm::models::{Content, Membership, Organization, PullRequest, Repository, User};
use crate::scm::pagination::{ListOptions, PullRequestListOptions};
use crate::scm::refs::trim_ref;
use crate::scm::response::{Reply, Response};
use crate::scm::service::{
    ContentService, OrganizationService, PullRequestService, RepositoryService, ScmResult,
    UserService,
};
use crate::scm::transport::Request;

fn page(path: &str, filters: Vec<(String, String)>, opts: &ListOptions) -> Request {
    list_request_with(path, filters, opts, "limit")
}

#[async_trait]
impl OrganizationService for GiteaDriver {
    async fn find(&self, name: &str) -> ScmResult<Organization> {
        self.fetch::<ApiOrganization, _>(Request::get(format!("api/v1/orgs/{name}")))
            .await
    }

    async fn list(&self, opts: &ListOptions) -> ScmResult<Vec<Organization>> {
        self.fetch_page::<ApiOrganization, _>(page("api/v1/user/orgs", Vec::new(), opts), opts)
            .await
    }

    /// Membership takes two calls: the member check answers `204` for
    /// members and `404` otherwise, then the permissions lookup decides the
    /// role.
    async fn find_membership(&self, name: &str, username: &str) -> ScmResult<Membership> {
        let check = Request::get(format!("api/v1/orgs/{name}/members/{username}"));
        let response = self
            .wrapper
            .status(check, &[StatusCode::NOT_FOUND])
            .await
            .map_err(|error| error.context("failed to check organization membership"))?;
        if response.status != StatusCode::NO_CONTENT {
            return Ok(Reply::new(Membership::default(), response));
        }

        let permissions = Request::get(format!("api/v1/users/{username}/orgs/{name}/permissions"));
        self.fetch::<ApiOrgPermissions, _>(permissions)
            .await
            .map_err(|error| error.context("failed to resolve membership role"))
    }
}

#[async_trait]
impl RepositoryService for GiteaDriver {
    async fn find(&self, repo: &str) -> ScmResult<Repository> {
        self.fetch::<ApiRepository, _>(Request::get(format!("api/v1/repos/{repo}")))
            .await
    }

    async fn list(&self, opts: &ListOptions) -> ScmResult<Vec<Repository>> {
        self.fetch_page::<ApiRepository, _>(page("api/v1/user/repos", Vec::new(), opts), opts)
            .await
    }
}

#[async_trait]
impl PullRequestService for GiteaDriver {
    async fn find(&self, repo: &str, number: u64) -> ScmResult<PullRequest> {
        let path = format!("api/v1/repos/{repo}/pulls/{number}");
        self.fetch::<ApiPullRequest, _>(Request::get(path)).await
    }

    async fn list(&self, repo: &str, opts: &PullRequestListOptions) -> ScmResult<Vec<PullRequest>> {
        let path = format!("api/v1/repos/{repo}/pulls");
        let filters = vec![("state".to_owned(), opts.state().to_owned())];
        self.fetch_page::<ApiPullRequest, _>(page(&path, filters, &opts.list), &opts.list)
            .await
    }

    async fn merge(&self, repo: &str, number: u64) -> Result<Response, ScmError> {
        let path = format!("api/v1/repos/{repo}/pulls/{number}/merge");
        let request =
            Request::new(Method::POST, path).with_json(&ApiMergeInput { action: "merge" })?;
        self.wrapper.empty(request).await
    }

    async fn close(&self, repo: &str, number: u64) -> Result<Response, ScmError> {
        let path = format!("api/v1/repos/{repo}/pulls/{number}");
        let request =
            Request::new(Method::PATCH, path).with_json(&ApiStateInput { state: "closed" })?;
        self.wrapper.empty(request).await
    }
}

#[async_trait]
impl UserService for GiteaDriver {
    async fn find(&self) -> ScmResult<User> {
        self.fetch::<ApiUser, _>(Request::get("api/v1/user")).await
    }

    async fn find_login(&self, login: &str) -> ScmResult<User> {
        self.fetch::<ApiUser, _>(Request::get(format!("api/v1/users/{login}")))
            .await
    }
}

#[async_trait]
impl ContentService for GiteaDriver {
    async fn find(&self, repo: &str, path: &str, git_ref: &str) -> ScmResult<Content> {
        let request = Request::get(format!(
            "api/v1/repos/{repo}/raw/{}/{}",
            trim_ref(git_ref),
            path.trim_start_matches('/')
        ));
        let (data, response) = self.wrapper.raw(request).await?;
        let content = Content {
            path: path.to_owned(),
            data,
            ..Content::default()
        };
        Ok(Reply::new(content, response))
    }
}
