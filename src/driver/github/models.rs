//! GitHub wire format and its conversion into the canonical model.
//!
//! Types prefixed with `Api` mirror the REST payloads exactly and never leave
//! this adapter. Every conversion is a pure `From` impl.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scm::models::{
    Change, Comment, Commit, Hook, Issue, Label, Membership, Organization, Perm, PullRequest,
    Reference, Repository, Role, Signature, User, Visibility,
};
use crate::scm::nullable::Nullable;
use crate::scm::refs::{BRANCH_PREFIX, expand_ref};
use crate::scm::transport::ErrorEnvelope;

/// GitHub error body: `{"message": "...", "errors": [{"message": "..."}]}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiError {
    pub(super) message: String,
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
            .or_else(|| (!self.message.is_empty()).then_some(self.message))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiUser {
    pub(super) id: Option<u64>,
    pub(super) login: String,
    pub(super) name: Option<String>,
    pub(super) email: Option<String>,
    pub(super) avatar_url: String,
    pub(super) created_at: Option<DateTime<Utc>>,
    pub(super) updated_at: Option<DateTime<Utc>>,
}

impl From<ApiUser> for User {
    fn from(value: ApiUser) -> Self {
        Self {
            login: value.login,
            name: value.name.unwrap_or_default(),
            email: value.email.unwrap_or_default(),
            id: value.id.map(|id| id.to_string()).unwrap_or_default(),
            avatar: value.avatar_url,
            created: value.created_at,
            updated: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiLabel {
    pub(super) name: String,
    pub(super) color: String,
}

impl From<ApiLabel> for Label {
    fn from(value: ApiLabel) -> Self {
        Self {
            name: value.name,
            color: value.color,
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
    pub(super) repo: Option<ApiRepoName>,
}

impl ApiBranchRef {
    fn full_name(&self) -> &str {
        self.repo.as_ref().map_or("", |repo| repo.full_name.as_str())
    }

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
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) state: String,
    pub(super) title: String,
    pub(super) body: Option<String>,
    pub(super) diff_url: String,
    pub(super) html_url: String,
    pub(super) draft: bool,
    pub(super) user: ApiUser,
    pub(super) head: ApiBranchRef,
    pub(super) base: ApiBranchRef,
    pub(super) merged_at: Nullable<String>,
    pub(super) merge_commit_sha: Option<String>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
    pub(super) labels: Vec<ApiLabel>,
}

impl From<ApiPullRequest> for PullRequest {
    fn from(value: ApiPullRequest) -> Self {
        let merged = value.merged_at.is_non_empty();
        let fork = if value.head.full_name() == value.base.full_name() {
            String::new()
        } else {
            value.head.full_name().to_owned()
        };
        Self {
            number: value.number,
            title: value.title,
            body: value.body.unwrap_or_default(),
            sha: value.head.sha.clone(),
            git_ref: format!("refs/pull/{}/head", value.number),
            source: value.head.name.clone(),
            target: value.base.name.clone(),
            fork,
            link: value.html_url,
            diff: value.diff_url,
            draft: value.draft,
            closed: value.state != "open",
            merged,
            merge: if merged {
                value.merge_commit_sha.unwrap_or_default()
            } else {
                String::new()
            },
            head: value.head.reference(),
            base: value.base.reference(),
            author: value.user.into(),
            created: value.created_at,
            updated: value.updated_at,
            labels: value.labels.into_iter().map(Label::from).collect(),
        }
    }
}

/// One entry of `pulls/{n}/files`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiFile {
    pub(super) sha: String,
    pub(super) filename: String,
    pub(super) status: String,
    pub(super) previous_filename: String,
}

impl From<ApiFile> for Change {
    fn from(value: ApiFile) -> Self {
        let renamed = value.status == "renamed" && !value.previous_filename.is_empty();
        Self {
            path: value.filename,
            prev_file_path: if renamed {
                value.previous_filename
            } else {
                String::new()
            },
            added: value.status == "added",
            deleted: value.status == "removed",
            renamed,
            blob_id: value.sha,
            sha: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiSignature {
    pub(super) name: String,
    pub(super) email: String,
}

impl From<ApiSignature> for Signature {
    fn from(value: ApiSignature) -> Self {
        Self {
            name: value.name,
            email: value.email,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiCommitDetail {
    pub(super) message: String,
    pub(super) author: ApiSignature,
    pub(super) committer: ApiSignature,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiCommit {
    pub(super) sha: String,
    pub(super) html_url: String,
    pub(super) commit: ApiCommitDetail,
}

impl From<ApiCommit> for Commit {
    fn from(value: ApiCommit) -> Self {
        Self {
            sha: value.sha,
            message: value.commit.message,
            author: value.commit.author.into(),
            committer: value.commit.committer.into(),
            link: value.html_url,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiBranchCommit {
    pub(super) sha: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiBranch {
    pub(super) name: String,
    pub(super) commit: ApiBranchCommit,
}

impl From<ApiBranch> for Reference {
    fn from(value: ApiBranch) -> Self {
        Self {
            path: expand_ref(&value.name, BRANCH_PREFIX),
            name: value.name,
            sha: value.commit.sha,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiComment {
    pub(super) id: u64,
    pub(super) body: String,
    pub(super) user: ApiUser,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
}

impl From<ApiComment> for Comment {
    fn from(value: ApiComment) -> Self {
        Self {
            id: value.id,
            body: value.body,
            author: value.user.into(),
            created: value.created_at,
            updated: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiIssue {
    pub(super) number: u64,
    pub(super) title: String,
    pub(super) body: Option<String>,
    pub(super) html_url: String,
    pub(super) state: String,
    pub(super) locked: bool,
    pub(super) labels: Vec<ApiLabel>,
    pub(super) user: ApiUser,
    pub(super) pull_request: Option<serde_json::Value>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
}

impl From<ApiIssue> for Issue {
    fn from(value: ApiIssue) -> Self {
        Self {
            number: value.number,
            title: value.title,
            body: value.body.unwrap_or_default(),
            link: value.html_url,
            labels: value.labels.into_iter().map(|label| label.name).collect(),
            closed: value.state == "closed",
            locked: value.locked,
            author: value.user.into(),
            pull_request: value.pull_request.is_some(),
            created: value.created_at,
            updated: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiPermissions {
    pub(super) pull: bool,
    pub(super) push: bool,
    pub(super) admin: bool,
}

impl From<ApiPermissions> for Perm {
    fn from(value: ApiPermissions) -> Self {
        Self {
            pull: value.pull,
            push: value.push,
            admin: value.admin,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiOwner {
    pub(super) login: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiRepository {
    pub(super) id: u64,
    pub(super) owner: ApiOwner,
    pub(super) name: String,
    pub(super) permissions: Option<ApiPermissions>,
    pub(super) default_branch: String,
    pub(super) private: bool,
    pub(super) archived: bool,
    pub(super) visibility: Option<String>,
    pub(super) clone_url: String,
    pub(super) ssh_url: String,
    pub(super) html_url: String,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
}

impl ApiRepository {
    fn visibility(&self) -> Visibility {
        match self.visibility.as_deref() {
            Some("public") => Visibility::Public,
            Some("internal") => Visibility::Internal,
            Some("private") => Visibility::Private,
            _ if self.private => Visibility::Private,
            _ => Visibility::Public,
        }
    }
}

impl From<ApiRepository> for Repository {
    fn from(value: ApiRepository) -> Self {
        let visibility = value.visibility();
        Self {
            id: value.id.to_string(),
            namespace: value.owner.login,
            name: value.name,
            perm: value.permissions.map(Perm::from),
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
pub(super) struct ApiOrganization {
    pub(super) login: String,
    pub(super) avatar_url: String,
}

impl From<ApiOrganization> for Organization {
    fn from(value: ApiOrganization) -> Self {
        Self {
            name: value.login,
            avatar: value.avatar_url,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiMembership {
    pub(super) state: String,
    pub(super) role: String,
}

impl From<ApiMembership> for Membership {
    fn from(value: ApiMembership) -> Self {
        Self {
            active: value.state == "active",
            role: match value.role.as_str() {
                "admin" => Role::Admin,
                "member" => Role::Member,
                _ => Role::Undefined,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiHookConfig {
    pub(super) url: String,
    pub(super) insecure_ssl: Option<serde_json::Value>,
}

impl ApiHookConfig {
    /// `insecure_ssl` arrives as `"1"` or `1` depending on the endpoint.
    fn skips_verify(&self) -> bool {
        self.insecure_ssl.as_ref().is_some_and(|value| {
            value.as_str() == Some("1") || value.as_u64() == Some(1)
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApiHook {
    pub(super) id: u64,
    pub(super) name: String,
    pub(super) events: Vec<String>,
    pub(super) active: bool,
    pub(super) config: ApiHookConfig,
}

impl From<ApiHook> for Hook {
    fn from(value: ApiHook) -> Self {
        let skip_verify = value.config.skips_verify();
        Self {
            id: value.id.to_string(),
            name: value.name,
            target: value.config.url,
            events: value.events,
            active: value.active,
            skip_verify,
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
    pub(super) body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) head: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) base: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct ApiStateInput {
    pub(super) state: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct ApiBodyInput {
    pub(super) body: String,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct ApiIssueInput {
    pub(super) title: String,
    pub(super) body: String,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct ApiHookInputConfig {
    pub(super) url: String,
    pub(super) secret: String,
    pub(super) content_type: &'static str,
    pub(super) insecure_ssl: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct ApiHookInput {
    pub(super) name: &'static str,
    pub(super) active: bool,
    pub(super) events: Vec<String>,
    pub(super) config: ApiHookInputConfig,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{ApiError, ApiFile, ApiHook, ApiMembership, ApiPullRequest};
    use crate::scm::models::{Change, Hook, Membership, PullRequest, Role};
    use crate::scm::transport::ErrorEnvelope;

    fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).expect("fixture should decode")
    }

    #[rstest]
    fn pull_request_matches_golden() {
        let wire: ApiPullRequest =
            serde_json::from_str(include_str!("testdata/pr.json")).expect("fixture should decode");
        let golden: PullRequest = serde_json::from_str(include_str!("testdata/pr.json.golden"))
            .expect("golden should decode");

        assert_eq!(PullRequest::from(wire), golden);
    }

    #[rstest]
    fn changes_match_golden() {
        let wire: Vec<ApiFile> = serde_json::from_str(include_str!("testdata/pr_files.json"))
            .expect("fixture should decode");
        let golden: Vec<Change> =
            serde_json::from_str(include_str!("testdata/pr_files.json.golden"))
                .expect("golden should decode");

        let changes: Vec<Change> = wire.into_iter().map(Change::from).collect();
        assert_eq!(changes, golden);
    }

    #[rstest]
    fn same_repository_is_not_a_fork() {
        let wire: ApiPullRequest = decode(json!({
            "number": 9,
            "state": "open",
            "head": {"ref": "topic", "sha": "abc", "repo": {"full_name": "octo/hello"}},
            "base": {"ref": "main", "sha": "def", "repo": {"full_name": "octo/hello"}},
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }));

        let pull = PullRequest::from(wire);
        assert_eq!(pull.fork, "");
        assert_eq!(pull.git_ref, "refs/pull/9/head");
        assert!(!pull.closed);
        assert!(!pull.merged);
        assert!(pull.labels.is_empty(), "missing labels should be empty");
    }

    #[rstest]
    #[case::absent(json!({}), false)]
    #[case::null(json!({"merged_at": null}), false)]
    #[case::empty(json!({"merged_at": ""}), false)]
    #[case::timestamp(json!({"merged_at": "2024-02-01T10:00:00Z"}), true)]
    fn merged_follows_merge_timestamp(#[case] wire: serde_json::Value, #[case] expected: bool) {
        let pull = PullRequest::from(decode::<ApiPullRequest>(wire));
        assert_eq!(pull.merged, expected);
    }

    #[rstest]
    #[case::added("added", true, false, false)]
    #[case::removed("removed", false, true, false)]
    #[case::renamed("renamed", false, false, true)]
    #[case::modified("modified", false, false, false)]
    fn change_flags_are_exclusive(
        #[case] status: &str,
        #[case] added: bool,
        #[case] deleted: bool,
        #[case] renamed: bool,
    ) {
        let change = Change::from(decode::<ApiFile>(json!({
            "filename": "src/lib.rs",
            "status": status,
            "previous_filename": "src/old.rs"
        })));

        assert_eq!(
            (change.added, change.deleted, change.renamed),
            (added, deleted, renamed)
        );
        assert_eq!(change.renamed, !change.prev_file_path.is_empty());
    }

    #[rstest]
    fn rename_without_previous_path_is_not_a_rename() {
        let change = Change::from(decode::<ApiFile>(json!({
            "filename": "src/lib.rs",
            "status": "renamed"
        })));
        assert!(!change.renamed);
        assert!(change.prev_file_path.is_empty());
    }

    #[rstest]
    #[case::first_detail(json!({"message": "Validation Failed", "errors": [{"message": "No commits between main and main"}]}), Some("No commits between main and main"))]
    #[case::top_level(json!({"message": "Not Found"}), Some("Not Found"))]
    #[case::blank_details(json!({"message": "Validation Failed", "errors": [{"code": "missing"}]}), Some("Validation Failed"))]
    #[case::empty(json!({}), None)]
    fn error_envelope_prefers_first_detail(
        #[case] body: serde_json::Value,
        #[case] expected: Option<&str>,
    ) {
        let envelope: ApiError = decode(body);
        assert_eq!(envelope.into_message().as_deref(), expected);
    }

    #[rstest]
    #[case::string_flag(json!("1"), true)]
    #[case::numeric_flag(json!(1), true)]
    #[case::off(json!("0"), false)]
    fn hook_insecure_ssl_accepts_both_encodings(
        #[case] flag: serde_json::Value,
        #[case] expected: bool,
    ) {
        let hook = Hook::from(decode::<ApiHook>(json!({
            "id": 1,
            "events": ["push"],
            "active": true,
            "config": {"url": "https://ci.test/hook", "insecure_ssl": flag}
        })));
        assert_eq!(hook.skip_verify, expected);
        assert_eq!(hook.target, "https://ci.test/hook");
    }

    #[rstest]
    fn membership_maps_state_and_role() {
        let membership = Membership::from(decode::<ApiMembership>(json!({
            "state": "active",
            "role": "admin"
        })));
        assert_eq!(
            membership,
            Membership {
                active: true,
                role: Role::Admin
            }
        );
    }
}
