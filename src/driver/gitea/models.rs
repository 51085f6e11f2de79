//! Gitea wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scm::models::{
    Label, Membership, Organization, Perm, PullRequest, Reference, Repository, Role, User,
    Visibility,
};
use crate::scm::refs::{BRANCH_PREFIX, expand_ref};
use crate::scm::transport::ErrorEnvelope;

/// Gitea error body: `{"message": "...", "url": "..."}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiError {
    pub(super) message: String,
}

impl ErrorEnvelope for ApiError {
    fn into_message(self) -> Option<String> {
        (!self.message.is_empty()).then_some(self.message)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiUser {
    pub(super) id: u64,
    pub(super) login: String,
    pub(super) full_name: String,
    pub(super) email: String,
    pub(super) avatar_url: String,
    pub(super) created: Option<DateTime<Utc>>,
}

impl From<ApiUser> for User {
    fn from(value: ApiUser) -> Self {
        Self {
            login: value.login,
            name: value.full_name,
            email: value.email,
            id: value.id.to_string(),
            avatar: value.avatar_url,
            created: value.created,
            updated: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiOrganization {
    pub(super) username: String,
    pub(super) avatar_url: String,
}

impl From<ApiOrganization> for Organization {
    fn from(value: ApiOrganization) -> Self {
        Self {
            name: value.username,
            avatar: value.avatar_url,
        }
    }
}

/// Result of `users/{user}/orgs/{org}/permissions`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiOrgPermissions {
    pub(super) is_owner: bool,
    pub(super) is_admin: bool,
}

impl From<ApiOrgPermissions> for Membership {
    fn from(value: ApiOrgPermissions) -> Self {
        Self {
            active: true,
            role: if value.is_owner || value.is_admin {
                Role::Admin
            } else {
                Role::Member
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiPermissions {
    pub(super) admin: bool,
    pub(super) push: bool,
    pub(super) pull: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiRepository {
    pub(super) id: u64,
    pub(super) owner: ApiUser,
    pub(super) name: String,
    pub(super) private: bool,
    pub(super) internal: bool,
    pub(super) archived: bool,
    pub(super) default_branch: String,
    pub(super) html_url: String,
    pub(super) clone_url: String,
    pub(super) ssh_url: String,
    pub(super) permissions: Option<ApiPermissions>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
}

impl From<ApiRepository> for Repository {
    fn from(value: ApiRepository) -> Self {
        let visibility = if value.internal {
            Visibility::Internal
        } else if value.private {
            Visibility::Private
        } else {
            Visibility::Public
        };
        Self {
            id: value.id.to_string(),
            namespace: value.owner.login,
            name: value.name,
            perm: value.permissions.map(|perm| Perm {
                pull: perm.pull,
                push: perm.push,
                admin: perm.admin,
            }),
            branch: value.default_branch,
            archived: value.archived,
            private: value.private,
            visibility,
            clone: value.clone_url,
            clone_ssh: value.ssh_url,
            link: value.html_url,
            created: value.created_at,
            updated: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiRepoName {
    pub(super) full_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiBranchRef {
    #[serde(rename = "ref")]
    pub(super) name: String,
    pub(super) sha: String,
    pub(super) repo_id: u64,
    pub(super) repo: Option<ApiRepoName>,
}

impl ApiBranchRef {
    fn reference(&self) -> Reference {
        Reference {
            name: self.name.clone(),
            path: expand_ref(&self.name, BRANCH_PREFIX),
            sha: self.sha.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiLabel {
    pub(super) name: String,
    pub(super) color: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) user: ApiUser,
    pub(super) title: String,
    pub(super) body: String,
    pub(super) state: String,
    pub(super) html_url: String,
    pub(super) diff_url: String,
    pub(super) head: ApiBranchRef,
    pub(super) base: ApiBranchRef,
    pub(super) merged: bool,
    pub(super) merge_commit_sha: Option<String>,
    pub(super) labels: Vec<ApiLabel>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
}

impl From<ApiPullRequest> for PullRequest {
    fn from(value: ApiPullRequest) -> Self {
        let fork = match (&value.head.repo, value.head.repo_id == value.base.repo_id) {
            (Some(repo), false) => repo.full_name.clone(),
            _ => String::new(),
        };
        Self {
            number: value.number,
            title: value.title,
            body: value.body,
            sha: value.head.sha.clone(),
            git_ref: format!("refs/pull/{}/head", value.number),
            source: value.head.name.clone(),
            target: value.base.name.clone(),
            fork,
            link: value.html_url,
            diff: value.diff_url,
            draft: false,
            closed: value.state == "closed",
            merged: value.merged,
            merge: value.merge_commit_sha.unwrap_or_default(),
            head: value.head.reference(),
            base: value.base.reference(),
            author: value.user.into(),
            created: value.created_at,
            updated: value.updated_at,
            labels: value
                .labels
                .into_iter()
                .map(|label| Label {
                    name: label.name,
                    color: label.color,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct ApiMergeInput {
    #[serde(rename = "Do")]
    pub(super) action: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct ApiStateInput {
    pub(super) state: &'static str,
}
