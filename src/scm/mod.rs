//! Provider-neutral model, capability contracts and transport plumbing.
//!
//! Adapters under [`crate::driver`] implement the traits in [`service`] on
//! top of a [`transport::Wrapper`], converting each backend's wire format
//! into the types in [`models`]. Every list result carries a [`Page`]
//! descriptor that [`crate::traverse`] can follow.

pub mod client;
pub mod error;
pub mod link;
pub mod models;
pub mod nullable;
pub mod pagination;
pub mod rate_limit;
pub mod refs;
pub mod response;
pub mod service;
pub mod transport;

pub use client::{Client, ClientBuilder, Driver, Unsupported};
pub use error::ScmError;
pub use models::{
    Change, Comment, CommentInput, Commit, Content, Hook, HookInput, Issue, IssueInput, Label,
    Membership, Organization, Perm, PullRequest, PullRequestInput, Reference, Repository, Review,
    ReviewInput, Role, Signature, User, Visibility,
};
pub use nullable::Nullable;
pub use pagination::{
    CommitListOptions, DEFAULT_PAGE_SIZE, IssueListOptions, ListOptions, Page, PageBuilder,
    PullRequestListOptions,
};
pub use rate_limit::RateLimitInfo;
pub use response::{Reply, Response};
pub use service::{
    ContentService, GitService, IssueService, OrganizationService, PullRequestService,
    RepositoryService, ReviewService, ScmResult, UserService, WebhookService,
};
pub use transport::{HttpTransport, OctocrabTransport, Transport};

#[cfg(test)]
pub use service::MockRepositoryService;
