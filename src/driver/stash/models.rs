//! Bitbucket Server wire format.

use serde::Deserialize;

use crate::driver::from_millis;
use crate::scm::models::{Change, PullRequest, Reference, Repository, User, Visibility};
use crate::scm::refs::{BRANCH_PREFIX, expand_ref};
use crate::scm::transport::ErrorEnvelope;

/// Bitbucket Server error body: `{"errors": [{"message": "..."}]}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiError {
    pub(super) errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiErrorDetail {
    pub(super) message: String,
}

impl ErrorEnvelope for ApiError {
    fn into_message(self) -> Option<String> {
        self.errors
            .into_iter()
            .map(|detail| detail.message)
            .find(|message| !message.is_empty())
    }
}

/// Paged list envelope. Older servers send a ready-made `next` link; newer
/// ones send `isLastPage` and `nextPageStart`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct ApiPage<T> {
    pub(super) values: Option<Vec<T>>,
    pub(super) is_last_page: bool,
    pub(super) next_page_start: Option<u32>,
    pub(super) next: String,
}

impl<T> Default for ApiPage<T> {
    fn default() -> Self {
        Self {
            values: None,
            is_last_page: true,
            next_page_start: None,
            next: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct ApiUser {
    pub(super) id: u64,
    pub(super) name: String,
    pub(super) email_address: String,
    pub(super) display_name: String,
    pub(super) slug: String,
}

impl From<ApiUser> for User {
    fn from(value: ApiUser) -> Self {
        Self {
            login: value.slug,
            name: value.display_name,
            email: value.email_address,
            id: value.id.to_string(),
            avatar: String::new(),
            created: None,
            updated: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiLink {
    pub(super) href: String,
    pub(super) name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiLinks {
    pub(super) clone: Vec<ApiLink>,
    #[serde(rename = "self")]
    pub(super) own: Vec<ApiLink>,
}

impl ApiLinks {
    fn clone_link(&self, name: &str) -> String {
        self.clone
            .iter()
            .find(|link| link.name == name)
            .map(|link| link.href.clone())
            .unwrap_or_default()
    }

    fn self_link(&self) -> String {
        self.own
            .first()
            .map(|link| link.href.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiProject {
    pub(super) key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiRepository {
    pub(super) id: u64,
    pub(super) slug: String,
    pub(super) project: ApiProject,
    pub(super) public: bool,
    pub(super) archived: bool,
    pub(super) links: ApiLinks,
}

impl ApiRepository {
    fn full_name(&self) -> String {
        format!("{}/{}", self.project.key, self.slug)
    }
}

impl From<ApiRepository> for Repository {
    fn from(value: ApiRepository) -> Self {
        Self {
            id: value.id.to_string(),
            clone: value.links.clone_link("http"),
            clone_ssh: value.links.clone_link("ssh"),
            link: value.links.self_link(),
            namespace: value.project.key,
            name: value.slug,
            perm: None,
            branch: String::new(),
            archived: value.archived,
            private: !value.public,
            visibility: if value.public {
                Visibility::Public
            } else {
                Visibility::Private
            },
            created: chrono::DateTime::default(),
            updated: chrono::DateTime::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct ApiRef {
    pub(super) display_id: String,
    pub(super) latest_commit: String,
    pub(super) repository: ApiRepository,
}

impl ApiRef {
    fn reference(&self) -> Reference {
        Reference {
            name: self.display_id.clone(),
            path: expand_ref(&self.display_id, BRANCH_PREFIX),
            sha: self.latest_commit.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiParticipant {
    pub(super) user: ApiUser,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct ApiPullRequest {
    pub(super) id: u64,
    pub(super) title: String,
    pub(super) description: String,
    pub(super) state: String,
    pub(super) closed: bool,
    pub(super) created_date: i64,
    pub(super) updated_date: i64,
    pub(super) from_ref: ApiRef,
    pub(super) to_ref: ApiRef,
    pub(super) author: ApiParticipant,
    pub(super) links: ApiLinks,
}

impl From<ApiPullRequest> for PullRequest {
    fn from(value: ApiPullRequest) -> Self {
        let source_repo = value.from_ref.repository.full_name();
        let fork = if source_repo == value.to_ref.repository.full_name() {
            String::new()
        } else {
            source_repo
        };
        Self {
            number: value.id,
            title: value.title,
            body: value.description,
            sha: value.from_ref.latest_commit.clone(),
            git_ref: format!("refs/pull-requests/{}/from", value.id),
            source: value.from_ref.display_id.clone(),
            target: value.to_ref.display_id.clone(),
            fork,
            link: value.links.self_link(),
            diff: String::new(),
            draft: false,
            closed: value.closed,
            merged: value.state == "MERGED",
            merge: String::new(),
            head: value.from_ref.reference(),
            base: value.to_ref.reference(),
            author: value.author.user.into(),
            created: from_millis(value.created_date),
            updated: from_millis(value.updated_date),
            labels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiPath {
    #[serde(rename = "toString")]
    pub(super) text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct ApiChange {
    pub(super) content_id: String,
    pub(super) path: ApiPath,
    pub(super) src_path: Option<ApiPath>,
    #[serde(rename = "type")]
    pub(super) kind: String,
}

impl From<ApiChange> for Change {
    fn from(value: ApiChange) -> Self {
        let previous = value.src_path.map(|path| path.text).unwrap_or_default();
        let renamed = value.kind == "MOVE" && !previous.is_empty();
        Self {
            path: value.path.text,
            prev_file_path: if renamed { previous } else { String::new() },
            added: value.kind == "ADD",
            deleted: value.kind == "DELETE",
            renamed,
            blob_id: value.content_id,
            sha: String::new(),
        }
    }
}
