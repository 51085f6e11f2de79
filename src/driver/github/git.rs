//! Branch and commit lookups.

use async_trait::async_trait;

use super::GithubDriver;
use super::models::{ApiBranch, ApiCommit};
use crate::driver::list_request;
use crate::scm::models::{Commit, Reference};
use crate::scm::pagination::{CommitListOptions, ListOptions};
use crate::scm::service::{GitService, ScmResult};
use crate::scm::transport::Request;

#[async_trait]
impl GitService for GithubDriver {
    async fn find_branch(&self, repo: &str, name: &str) -> ScmResult<Reference> {
        self.fetch::<ApiBranch, _>(Request::get(format!("repos/{repo}/branches/{name}")))
            .await
    }

    async fn list_branches(&self, repo: &str, opts: &ListOptions) -> ScmResult<Vec<Reference>> {
        let path = format!("repos/{repo}/branches");
        self.fetch_page::<ApiBranch, _>(list_request(&path, Vec::new(), opts), opts)
            .await
    }

    async fn find_commit(&self, repo: &str, git_ref: &str) -> ScmResult<Commit> {
        self.fetch::<ApiCommit, _>(Request::get(format!("repos/{repo}/commits/{git_ref}")))
            .await
    }

    async fn list_commits(&self, repo: &str, opts: &CommitListOptions) -> ScmResult<Vec<Commit>> {
        let mut filters = Vec::new();
        if !opts.git_ref.is_empty() {
            filters.push(("sha".to_owned(), opts.git_ref.clone()));
        }
        if !opts.path.is_empty() {
            filters.push(("path".to_owned(), opts.path.clone()));
        }
        let path = format!("repos/{repo}/commits");
        self.fetch_page::<ApiCommit, _>(list_request(&path, filters, &opts.list), &opts.list)
            .await
    }
}
