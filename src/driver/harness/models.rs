//! Harness Code wire format.
//!
//! Timestamps arrive as epoch milliseconds. `merged` is a nullable integer
//! that only carries a value once the pull request has been merged.

use serde::{Deserialize, Serialize};

use crate::driver::from_millis;
use crate::scm::models::{
    Change, Comment, Commit, PullRequest, Reference, Repository, Signature, User, Visibility,
};
use crate::scm::nullable::Nullable;
use crate::scm::refs::{BRANCH_PREFIX, expand_ref};
use crate::scm::transport::ErrorEnvelope;

/// Harness error body: `{"message": "..."}`.
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

/// Identity attached to pull requests and comments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiPrincipal {
    pub(super) id: u64,
    pub(super) uid: String,
    pub(super) display_name: String,
    pub(super) email: String,
    pub(super) created: i64,
    pub(super) updated: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) title: String,
    pub(super) description: String,
    pub(super) state: String,
    pub(super) is_draft: bool,
    pub(super) author: ApiPrincipal,
    pub(super) created: i64,
    pub(super) edited: i64,
    pub(super) source_branch: String,
    pub(super) source_sha: String,
    pub(super) source_repo_id: u64,
    pub(super) target_branch: String,
    pub(super) target_repo_id: u64,
    pub(super) merge_target_sha: Nullable<String>,
    pub(super) merge_sha: Nullable<String>,
    pub(super) merged: Nullable<i64>,
}

impl From<ApiPullRequest> for PullRequest {
    fn from(value: ApiPullRequest) -> Self {
        let fork = if value.source_repo_id != 0 && value.source_repo_id != value.target_repo_id {
            value.source_repo_id.to_string()
        } else {
            String::new()
        };
        let merged = value.merged.is_value();
        Self {
            number: value.number,
            title: value.title,
            body: value.description,
            sha: value.source_sha.clone(),
            git_ref: format!("refs/pullreq/{}/head", value.number),
            source: value.source_branch.clone(),
            target: value.target_branch.clone(),
            fork,
            link: String::new(),
            diff: String::new(),
            draft: value.is_draft,
            closed: value.state != "open",
            merged,
            merge: if merged {
                value.merge_sha.into_option().unwrap_or_default()
            } else {
                String::new()
            },
            head: Reference {
                path: expand_ref(&value.source_branch, BRANCH_PREFIX),
                name: value.source_branch,
                sha: value.source_sha,
            },
            base: Reference {
                path: expand_ref(&value.target_branch, BRANCH_PREFIX),
                name: value.target_branch,
                sha: value.merge_target_sha.into_option().unwrap_or_default(),
            },
            author: User {
                login: value.author.email.clone(),
                name: value.author.display_name,
                email: value.author.email,
                id: value.author.uid,
                avatar: String::new(),
                created: None,
                updated: None,
            },
            created: from_millis(value.created),
            updated: from_millis(value.edited),
            labels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiIdentity {
    pub(super) name: String,
    pub(super) email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiSignature {
    pub(super) identity: ApiIdentity,
}

impl From<ApiSignature> for Signature {
    fn from(value: ApiSignature) -> Self {
        Self {
            name: value.identity.name,
            email: value.identity.email,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiCommit {
    pub(super) sha: String,
    pub(super) message: String,
    pub(super) author: ApiSignature,
    pub(super) committer: ApiSignature,
}

impl From<ApiCommit> for Commit {
    fn from(value: ApiCommit) -> Self {
        Self {
            sha: value.sha,
            message: value.message,
            author: value.author.into(),
            committer: value.committer.into(),
            link: String::new(),
        }
    }
}

/// One entry of the `pullreq/{n}/diff` listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiFileDiff {
    pub(super) path: String,
    pub(super) old_path: String,
    pub(super) status: String,
    pub(super) sha: String,
}

impl From<ApiFileDiff> for Change {
    fn from(value: ApiFileDiff) -> Self {
        let renamed = value.status.eq_ignore_ascii_case("RENAMED") && !value.old_path.is_empty();
        Self {
            path: value.path,
            prev_file_path: if renamed { value.old_path } else { String::new() },
            added: value.status.eq_ignore_ascii_case("ADDED"),
            deleted: value.status.eq_ignore_ascii_case("DELETED"),
            renamed,
            blob_id: String::new(),
            sha: value.sha,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiComment {
    pub(super) id: u64,
    pub(super) text: String,
    pub(super) created: i64,
    pub(super) updated: i64,
    pub(super) author: ApiPrincipal,
}

impl From<ApiComment> for Comment {
    fn from(value: ApiComment) -> Self {
        Self {
            id: value.id,
            body: value.text,
            author: User {
                login: value.author.uid,
                name: value.author.display_name,
                email: value.author.email,
                id: value.author.id.to_string(),
                avatar: String::new(),
                created: Some(from_millis(value.author.created)),
                updated: Some(from_millis(value.author.updated)),
            },
            created: from_millis(value.created),
            updated: from_millis(value.updated),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiRepository {
    pub(super) id: u64,
    pub(super) identifier: String,
    pub(super) path: String,
    pub(super) default_branch: String,
    pub(super) is_public: bool,
    pub(super) git_url: String,
    pub(super) created: i64,
    pub(super) updated: i64,
}

impl From<ApiRepository> for Repository {
    fn from(value: ApiRepository) -> Self {
        let namespace = value
            .path
            .rsplit_once('/')
            .map(|(parent, _)| parent.to_owned())
            .unwrap_or_default();
        Self {
            id: value.id.to_string(),
            namespace,
            name: value.identifier,
            perm: None,
            branch: value.default_branch,
            archived: false,
            private: !value.is_public,
            visibility: if value.is_public {
                Visibility::Public
            } else {
                Visibility::Private
            },
            clone: value.git_url,
            clone_ssh: String::new(),
            link: String::new(),
            created: from_millis(value.created),
            updated: from_millis(value.updated),
        }
    }
}

/// Body for creating or editing a pull request. Unset fields are omitted so
/// an edit only touches what the caller supplied.
#[derive(Debug, Clone, Default, Serialize)]
pub(super) struct ApiPullRequestInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) source_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) target_branch: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct ApiCommentInput {
    pub(super) text: String,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ApiFileDiff, ApiPullRequest};
    use crate::scm::models::{Change, PullRequest};

    fn pull_request(raw: &str) -> PullRequest {
        serde_json::from_str::<ApiPullRequest>(raw)
            .expect("wire payload should decode")
            .into()
    }

    #[rstest]
    #[case::null(r#"{"number": 3, "state": "open", "merged": null}"#, false)]
    #[case::absent(r#"{"number": 3, "state": "open"}"#, false)]
    #[case::epoch(r#"{"number": 3, "state": "merged", "merged": 1700000000000}"#, true)]
    fn merged_follows_timestamp_presence(#[case] raw: &str, #[case] merged: bool) {
        assert_eq!(pull_request(raw).merged, merged);
    }

    #[rstest]
    fn merge_sha_is_ignored_until_merged() {
        let pr = pull_request(r#"{"number": 3, "state": "open", "merge_sha": "abc"}"#);
        assert!(pr.merge.is_empty());
    }

    #[rstest]
    #[case::same_repo(7, 7, "")]
    #[case::other_repo(8, 7, "8")]
    #[case::unknown_source(0, 7, "")]
    fn fork_reports_differing_source_repo(
        #[case] source: u64,
        #[case] target: u64,
        #[case] expected: &str,
    ) {
        let raw = format!(
            r#"{{"number": 1, "state": "open", "source_repo_id": {source}, "target_repo_id": {target}}}"#
        );
        assert_eq!(pull_request(&raw).fork, expected);
    }

    #[rstest]
    fn ref_is_derived_from_number() {
        let pr = pull_request(r#"{"number": 42, "state": "closed"}"#);
        assert_eq!(pr.git_ref, "refs/pullreq/42/head");
        assert!(pr.closed);
    }

    #[rstest]
    #[case::added("added", "", (true, false, false))]
    #[case::deleted("DELETED", "", (false, true, false))]
    #[case::renamed("RENAMED", "old.txt", (false, false, true))]
    #[case::rename_without_source("RENAMED", "", (false, false, false))]
    #[case::modified("MODIFIED", "", (false, false, false))]
    fn diff_status_maps_to_flags(
        #[case] status: &str,
        #[case] old_path: &str,
        #[case] flags: (bool, bool, bool),
    ) {
        let change: Change = ApiFileDiff {
            path: "new.txt".to_owned(),
            old_path: old_path.to_owned(),
            status: status.to_owned(),
            sha: "abc".to_owned(),
        }
        .into();
        assert_eq!((change.added, change.deleted, change.renamed), flags);
        assert_eq!(change.prev_file_path.is_empty(), !change.renamed);
    }
}
