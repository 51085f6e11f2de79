//! Repository, organization, user and webhook operations.

use async_trait::async_trait;
use http::Method;

use super::GithubDriver;
use super::models::{
    ApiHook, ApiHookInput, ApiHookInputConfig, ApiMembership, ApiOrganization, ApiRepository,
    ApiUser,
};
use crate::driver::list_request;
use crate::scm::error::ScmError;
use crate::scm::models::{Hook, HookInput, Membership, Organization, Perm, Repository, User};
use crate::scm::pagination::ListOptions;
use crate::scm::response::{Reply, Response};
use crate::scm::service::{
    OrganizationService, RepositoryService, ScmResult, UserService, WebhookService,
};
use crate::scm::transport::Request;

#[async_trait]
impl RepositoryService for GithubDriver {
    async fn find(&self, repo: &str) -> ScmResult<Repository> {
        self.fetch::<ApiRepository, _>(Request::get(format!("repos/{repo}")))
            .await
    }

    async fn find_perms(&self, repo: &str) -> ScmResult<Perm> {
        let reply = self
            .fetch::<ApiRepository, Repository>(Request::get(format!("repos/{repo}")))
            .await?;
        Ok(reply.map(|repository| repository.perm.unwrap_or_default()))
    }

    async fn list(&self, opts: &ListOptions) -> ScmResult<Vec<Repository>> {
        let filters = vec![(
            "affiliation".to_owned(),
            "owner,collaborator,organization_member".to_owned(),
        )];
        self.fetch_page::<ApiRepository, _>(list_request("user/repos", filters, opts), opts)
            .await
    }
}

#[async_trait]
impl OrganizationService for GithubDriver {
    async fn find(&self, name: &str) -> ScmResult<Organization> {
        self.fetch::<ApiOrganization, _>(Request::get(format!("orgs/{name}")))
            .await
    }

    async fn list(&self, opts: &ListOptions) -> ScmResult<Vec<Organization>> {
        self.fetch_page::<ApiOrganization, _>(list_request("user/orgs", Vec::new(), opts), opts)
            .await
    }

    async fn find_membership(&self, name: &str, username: &str) -> ScmResult<Membership> {
        let path = format!("orgs/{name}/memberships/{username}");
        self.fetch::<ApiMembership, _>(Request::get(path)).await
    }
}

#[async_trait]
impl UserService for GithubDriver {
    async fn find(&self) -> ScmResult<User> {
        self.fetch::<ApiUser, _>(Request::get("user")).await
    }

    async fn find_login(&self, login: &str) -> ScmResult<User> {
        self.fetch::<ApiUser, _>(Request::get(format!("users/{login}")))
            .await
    }
}

#[async_trait]
impl WebhookService for GithubDriver {
    async fn find(&self, repo: &str, id: &str) -> ScmResult<Hook> {
        self.fetch::<ApiHook, _>(Request::get(format!("repos/{repo}/hooks/{id}")))
            .await
    }

    async fn list(&self, repo: &str, opts: &ListOptions) -> ScmResult<Vec<Hook>> {
        let path = format!("repos/{repo}/hooks");
        self.fetch_page::<ApiHook, _>(list_request(&path, Vec::new(), opts), opts)
            .await
    }

    async fn create(&self, repo: &str, input: &HookInput) -> ScmResult<Hook> {
        let body = ApiHookInput {
            name: "web",
            active: true,
            events: input.events.clone(),
            config: ApiHookInputConfig {
                url: input.target.clone(),
                secret: input.secret.clone(),
                content_type: "json",
                insecure_ssl: if input.skip_verify { "1" } else { "0" },
            },
        };
        let request =
            Request::new(Method::POST, format!("repos/{repo}/hooks")).with_json(&body)?;
        let reply = self.fetch::<ApiHook, Hook>(request).await?;
        Ok(Reply::new(
            Hook {
                name: input.name.clone(),
                ..reply.value
            },
            reply.response,
        ))
    }

    async fn delete(&self, repo: &str, id: &str) -> Result<Response, ScmError> {
        let path = format!("repos/{repo}/hooks/{id}");
        self.wrapper.empty(Request::new(Method::DELETE, path)).await
    }
}
