//! Provider-neutral value types produced by every adapter.
//!
//! These are plain immutable results: relationships such as a pull request's
//! author are embedded by value. Types derive serde so captured backend
//! payloads can be compared against golden JSON fixtures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account on the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Login or username.
    pub login: String,
    /// Display name.
    pub name: String,
    /// Email address when exposed.
    pub email: String,
    /// Opaque identifier; numeric ids are rendered as strings.
    pub id: String,
    /// Avatar image URL.
    pub avatar: String,
    /// Account creation time when exposed.
    pub created: Option<DateTime<Utc>>,
    /// Last account update when exposed.
    pub updated: Option<DateTime<Utc>>,
}

/// Identity attached to a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signature {
    /// Author or committer name.
    pub name: String,
    /// Author or committer email.
    pub email: String,
}

/// A named git reference with its fully-qualified path and target commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    /// Short name, e.g. `main`.
    pub name: String,
    /// Fully-qualified path, e.g. `refs/heads/main`.
    pub path: String,
    /// Commit SHA the reference points at.
    pub sha: String,
}

/// A label attached to an issue or pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    /// Label name.
    pub name: String,
    /// Label colour, usually hex without `#`.
    pub color: String,
}

/// A pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    /// Pull request number within the repository.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Description body.
    pub body: String,
    /// Head commit SHA.
    pub sha: String,
    /// Backend-specific pull request reference, derived from the number.
    pub git_ref: String,
    /// Source branch name.
    pub source: String,
    /// Target branch name.
    pub target: String,
    /// Head repository identity when it differs from the base repository.
    pub fork: String,
    /// Web page of the pull request.
    pub link: String,
    /// Diff download link.
    pub diff: String,
    /// Whether the pull request is a draft.
    pub draft: bool,
    /// Whether the pull request is closed (merged pull requests are closed).
    pub closed: bool,
    /// Whether the pull request was merged.
    pub merged: bool,
    /// Merge commit SHA when merged.
    pub merge: String,
    /// Source reference.
    pub head: Reference,
    /// Target reference.
    pub base: Reference,
    /// Author.
    pub author: User,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Last update time.
    pub updated: DateTime<Utc>,
    /// Labels in backend order.
    pub labels: Vec<Label>,
}

/// One file entry of a pull request or commit diff.
///
/// The status flags are mutually exclusive; a change with none of them set
/// is a modification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Change {
    /// Path of the file after the change.
    pub path: String,
    /// Previous path, non-empty only for renames.
    pub prev_file_path: String,
    /// The file was added.
    pub added: bool,
    /// The file was removed.
    pub deleted: bool,
    /// The file was renamed.
    pub renamed: bool,
    /// Content-addressed blob id when exposed.
    pub blob_id: String,
    /// Commit SHA when exposed.
    pub sha: String,
}

impl Change {
    /// Returns true when the file was modified in place.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        !self.added && !self.deleted && !self.renamed
    }
}

/// A commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    /// Commit SHA.
    pub sha: String,
    /// Full commit message.
    pub message: String,
    /// Author identity.
    pub author: Signature,
    /// Committer identity.
    pub committer: Signature,
    /// Web page of the commit.
    pub link: String,
}

/// A comment on an issue or pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    /// Comment identifier.
    pub id: u64,
    /// Comment body.
    pub body: String,
    /// Author.
    pub author: User,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Last update time.
    pub updated: DateTime<Utc>,
}

/// An issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    /// Issue number.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Description body.
    pub body: String,
    /// Web page of the issue.
    pub link: String,
    /// Label names.
    pub labels: Vec<String>,
    /// Whether the issue is closed.
    pub closed: bool,
    /// Whether the conversation is locked.
    pub locked: bool,
    /// Author.
    pub author: User,
    /// Whether the issue is backed by a pull request.
    pub pull_request: bool,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Last update time.
    pub updated: DateTime<Utc>,
}

/// An organization or group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    /// Organization login/name.
    pub name: String,
    /// Avatar image URL.
    pub avatar: String,
}

/// Role of a user within an organization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The backend did not report a role.
    #[default]
    Undefined,
    /// Regular member.
    Member,
    /// Organization administrator.
    Admin,
}

/// Membership of one user in one organization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Membership {
    /// Whether the membership is active.
    pub active: bool,
    /// Role within the organization.
    pub role: Role,
}

/// Permissions of the current user on a repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Perm {
    /// Can read.
    pub pull: bool,
    /// Can write.
    pub push: bool,
    /// Can administer.
    pub admin: bool,
}

/// Repository visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// The backend did not report a visibility.
    #[default]
    Undefined,
    /// Visible to everyone.
    Public,
    /// Visible inside the enterprise or instance.
    Internal,
    /// Visible to collaborators only.
    Private,
}

/// A repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    /// Opaque identifier.
    pub id: String,
    /// Owner, organization or project key.
    pub namespace: String,
    /// Repository name.
    pub name: String,
    /// Permissions of the current user when reported.
    pub perm: Option<Perm>,
    /// Default branch.
    pub branch: String,
    /// Whether the repository is archived.
    pub archived: bool,
    /// Whether the repository is private.
    pub private: bool,
    /// Visibility level.
    pub visibility: Visibility,
    /// HTTP clone URL.
    pub clone: String,
    /// SSH clone URL.
    pub clone_ssh: String,
    /// Web page of the repository.
    pub link: String,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Last update time.
    pub updated: DateTime<Utc>,
}

/// A repository webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hook {
    /// Opaque identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Delivery URL.
    pub target: String,
    /// Subscribed backend event names.
    pub events: Vec<String>,
    /// Whether deliveries are enabled.
    pub active: bool,
    /// Whether TLS verification is skipped on delivery.
    pub skip_verify: bool,
}

/// A code review comment attached to a line of a diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    /// Review comment identifier.
    pub id: u64,
    /// Comment body.
    pub body: String,
    /// File path the comment is attached to.
    pub path: String,
    /// Commit SHA the comment was made against.
    pub sha: String,
    /// Line number in the diff.
    pub line: u32,
    /// Web page of the comment.
    pub link: String,
    /// Author.
    pub author: User,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Last update time.
    pub updated: DateTime<Utc>,
}

/// A file read from a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    /// File path.
    pub path: String,
    /// Raw file contents.
    pub data: Vec<u8>,
    /// Commit SHA the content was read at, when known.
    pub sha: String,
    /// Blob id when known.
    pub blob_id: String,
}

/// Input for creating or updating a pull request.
///
/// Empty fields are left untouched by update operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestInput {
    /// Title.
    pub title: String,
    /// Description body.
    pub body: String,
    /// Source branch.
    pub source: String,
    /// Target branch.
    pub target: String,
}

/// Input for creating an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueInput {
    /// Title.
    pub title: String,
    /// Description body.
    pub body: String,
}

/// Input for creating a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentInput {
    /// Comment body.
    pub body: String,
}

/// Input for creating a review comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewInput {
    /// Comment body.
    pub body: String,
    /// Commit SHA to comment on.
    pub sha: String,
    /// File path to comment on.
    pub path: String,
    /// Line number in the diff.
    pub line: u32,
}

/// Input for creating a webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookInput {
    /// Display name.
    pub name: String,
    /// Delivery URL.
    pub target: String,
    /// Shared secret used to sign deliveries.
    pub secret: String,
    /// Backend event names to subscribe to.
    pub events: Vec<String>,
    /// Skip TLS verification on delivery.
    pub skip_verify: bool,
}
