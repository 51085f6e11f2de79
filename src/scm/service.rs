//! Capability contracts every backend adapter may implement.
//!
//! Each capability is an independent trait. Every operation has a default
//! body returning [`ScmError::NotSupported`], so an adapter overrides only
//! what its backend can honour and callers can tell "backend lacks this"
//! apart from "operation failed".

use async_trait::async_trait;

use super::error::ScmError;
use super::models::{
    Change, Comment, CommentInput, Commit, Content, Hook, HookInput, Issue, IssueInput,
    Membership, Organization, Perm, PullRequest, PullRequestInput, Reference, Repository, Review,
    ReviewInput, User,
};
use super::pagination::{CommitListOptions, IssueListOptions, ListOptions, PullRequestListOptions};
use super::response::{Reply, Response};

/// Result type shared by driver operations.
pub type ScmResult<T> = Result<Reply<T>, ScmError>;

/// Repository lookups and listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryService: Send + Sync {
    /// Finds a repository by its backend identifier (e.g. `owner/name`).
    async fn find(&self, _repo: &str) -> ScmResult<Repository> {
        Err(ScmError::NotSupported)
    }

    /// Returns the current user's permissions on the repository.
    async fn find_perms(&self, _repo: &str) -> ScmResult<Perm> {
        Err(ScmError::NotSupported)
    }

    /// Lists one page of repositories visible to the current user.
    async fn list(&self, _opts: &ListOptions) -> ScmResult<Vec<Repository>> {
        Err(ScmError::NotSupported)
    }
}

/// Pull request operations.
#[async_trait]
pub trait PullRequestService: Send + Sync {
    /// Finds a pull request by number.
    async fn find(&self, _repo: &str, _number: u64) -> ScmResult<PullRequest> {
        Err(ScmError::NotSupported)
    }

    /// Lists one page of pull requests.
    async fn list(&self, _repo: &str, _opts: &PullRequestListOptions) -> ScmResult<Vec<PullRequest>> {
        Err(ScmError::NotSupported)
    }

    /// Lists one page of file changes in a pull request.
    async fn list_changes(
        &self,
        _repo: &str,
        _number: u64,
        _opts: &ListOptions,
    ) -> ScmResult<Vec<Change>> {
        Err(ScmError::NotSupported)
    }

    /// Lists one page of commits in a pull request.
    async fn list_commits(
        &self,
        _repo: &str,
        _number: u64,
        _opts: &ListOptions,
    ) -> ScmResult<Vec<Commit>> {
        Err(ScmError::NotSupported)
    }

    /// Opens a pull request.
    async fn create(&self, _repo: &str, _input: &PullRequestInput) -> ScmResult<PullRequest> {
        Err(ScmError::NotSupported)
    }

    /// Updates title, body or target branch; empty input fields are kept.
    async fn update(
        &self,
        _repo: &str,
        _number: u64,
        _input: &PullRequestInput,
    ) -> ScmResult<PullRequest> {
        Err(ScmError::NotSupported)
    }

    /// Merges a pull request.
    async fn merge(&self, _repo: &str, _number: u64) -> Result<Response, ScmError> {
        Err(ScmError::NotSupported)
    }

    /// Closes a pull request without merging.
    async fn close(&self, _repo: &str, _number: u64) -> Result<Response, ScmError> {
        Err(ScmError::NotSupported)
    }

    /// Finds a pull request comment.
    async fn find_comment(&self, _repo: &str, _number: u64, _id: u64) -> ScmResult<Comment> {
        Err(ScmError::NotSupported)
    }

    /// Lists one page of pull request comments.
    async fn list_comments(
        &self,
        _repo: &str,
        _number: u64,
        _opts: &ListOptions,
    ) -> ScmResult<Vec<Comment>> {
        Err(ScmError::NotSupported)
    }

    /// Adds a comment to a pull request.
    async fn create_comment(
        &self,
        _repo: &str,
        _number: u64,
        _input: &CommentInput,
    ) -> ScmResult<Comment> {
        Err(ScmError::NotSupported)
    }

    /// Deletes a pull request comment.
    async fn delete_comment(&self, _repo: &str, _number: u64, _id: u64) -> Result<Response, ScmError> {
        Err(ScmError::NotSupported)
    }
}

/// Issue operations.
#[async_trait]
pub trait IssueService: Send + Sync {
    /// Finds an issue by number.
    async fn find(&self, _repo: &str, _number: u64) -> ScmResult<Issue> {
        Err(ScmError::NotSupported)
    }

    /// Lists one page of issues.
    async fn list(&self, _repo: &str, _opts: &IssueListOptions) -> ScmResult<Vec<Issue>> {
        Err(ScmError::NotSupported)
    }

    /// Opens an issue.
    async fn create(&self, _repo: &str, _input: &IssueInput) -> ScmResult<Issue> {
        Err(ScmError::NotSupported)
    }

    /// Closes an issue.
    async fn close(&self, _repo: &str, _number: u64) -> Result<Response, ScmError> {
        Err(ScmError::NotSupported)
    }

    /// Finds an issue comment.
    async fn find_comment(&self, _repo: &str, _number: u64, _id: u64) -> ScmResult<Comment> {
        Err(ScmError::NotSupported)
    }

    /// Lists one page of issue comments.
    async fn list_comments(
        &self,
        _repo: &str,
        _number: u64,
        _opts: &ListOptions,
    ) -> ScmResult<Vec<Comment>> {
        Err(ScmError::NotSupported)
    }

    /// Adds a comment to an issue.
    async fn create_comment(
        &self,
        _repo: &str,
        _number: u64,
        _input: &CommentInput,
    ) -> ScmResult<Comment> {
        Err(ScmError::NotSupported)
    }

    /// Deletes an issue comment.
    async fn delete_comment(&self, _repo: &str, _number: u64, _id: u64) -> Result<Response, ScmError> {
        Err(ScmError::NotSupported)
    }
}

/// Organization lookups.
#[async_trait]
pub trait OrganizationService: Send + Sync {
    /// Finds an organization by name.
    async fn find(&self, _name: &str) -> ScmResult<Organization> {
        Err(ScmError::NotSupported)
    }

    /// Lists one page of organizations of the current user.
    async fn list(&self, _opts: &ListOptions) -> ScmResult<Vec<Organization>> {
        Err(ScmError::NotSupported)
    }

    /// Looks up one user's membership in an organization.
    async fn find_membership(&self, _name: &str, _username: &str) -> ScmResult<Membership> {
        Err(ScmError::NotSupported)
    }
}

/// User lookups.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Returns the authenticated user.
    async fn find(&self) -> ScmResult<User> {
        Err(ScmError::NotSupported)
    }

    /// Finds a user by login.
    async fn find_login(&self, _login: &str) -> ScmResult<User> {
        Err(ScmError::NotSupported)
    }

    /// Returns the authenticated user's primary email.
    async fn find_email(&self) -> ScmResult<String> {
        Err(ScmError::NotSupported)
    }
}

/// Branch, tag and commit lookups.
#[async_trait]
pub trait GitService: Send + Sync {
    /// Finds a branch by name.
    async fn find_branch(&self, _repo: &str, _name: &str) -> ScmResult<Reference> {
        Err(ScmError::NotSupported)
    }

    /// Lists one page of branches.
    async fn list_branches(&self, _repo: &str, _opts: &ListOptions) -> ScmResult<Vec<Reference>> {
        Err(ScmError::NotSupported)
    }

    /// Finds a tag by name.
    async fn find_tag(&self, _repo: &str, _name: &str) -> ScmResult<Reference> {
        Err(ScmError::NotSupported)
    }

    /// Lists one page of tags.
    async fn list_tags(&self, _repo: &str, _opts: &ListOptions) -> ScmResult<Vec<Reference>> {
        Err(ScmError::NotSupported)
    }

    /// Finds a commit by SHA or reference.
    async fn find_commit(&self, _repo: &str, _git_ref: &str) -> ScmResult<Commit> {
        Err(ScmError::NotSupported)
    }

    /// Lists one page of commits.
    async fn list_commits(&self, _repo: &str, _opts: &CommitListOptions) -> ScmResult<Vec<Commit>> {
        Err(ScmError::NotSupported)
    }
}

/// Code review comments on pull request diffs.
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Finds a review comment.
    async fn find(&self, _repo: &str, _number: u64, _id: u64) -> ScmResult<Review> {
        Err(ScmError::NotSupported)
    }

    /// Lists one page of review comments.
    async fn list(&self, _repo: &str, _number: u64, _opts: &ListOptions) -> ScmResult<Vec<Review>> {
        Err(ScmError::NotSupported)
    }

    /// Adds a review comment.
    async fn create(&self, _repo: &str, _number: u64, _input: &ReviewInput) -> ScmResult<Review> {
        Err(ScmError::NotSupported)
    }

    /// Deletes a review comment.
    async fn delete(&self, _repo: &str, _number: u64, _id: u64) -> Result<Response, ScmError> {
        Err(ScmError::NotSupported)
    }
}

/// Repository webhook management.
#[async_trait]
pub trait WebhookService: Send + Sync {
    /// Finds a webhook by id.
    async fn find(&self, _repo: &str, _id: &str) -> ScmResult<Hook> {
        Err(ScmError::NotSupported)
    }

    /// Lists one page of webhooks.
    async fn list(&self, _repo: &str, _opts: &ListOptions) -> ScmResult<Vec<Hook>> {
        Err(ScmError::NotSupported)
    }

    /// Registers a webhook.
    async fn create(&self, _repo: &str, _input: &HookInput) -> ScmResult<Hook> {
        Err(ScmError::NotSupported)
    }

    /// Removes a webhook.
    async fn delete(&self, _repo: &str, _id: &str) -> Result<Response, ScmError> {
        Err(ScmError::NotSupported)
    }
}

/// Repository file contents.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Reads a file at the given reference.
    async fn find(&self, _repo: &str, _path: &str, _git_ref: &str) -> ScmResult<Content> {
        Err(ScmError::NotSupported)
    }
}
