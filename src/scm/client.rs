//! The aggregate client exposing one adapter through the capability traits.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::ScmError;
use super::service::{
    ContentService, GitService, IssueService, OrganizationService, PullRequestService,
    RepositoryService, ReviewService, UserService, WebhookService,
};

/// Supported backend families.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// GitHub and GitHub Enterprise.
    #[default]
    Github,
    /// Gitea and Forgejo.
    Gitea,
    /// Bitbucket Server (formerly Stash).
    Stash,
    /// Harness Code.
    Harness,
}

impl Driver {
    /// Returns the lowercase driver name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitea => "gitea",
            Self::Stash => "stash",
            Self::Harness => "harness",
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Driver {
    type Err = ScmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "github" => Ok(Self::Github),
            "gitea" => Ok(Self::Gitea),
            "stash" | "bitbucket-server" => Ok(Self::Stash),
            "harness" => Ok(Self::Harness),
            other => Err(ScmError::Configuration {
                message: format!("unknown driver: {other}"),
            }),
        }
    }
}

/// Placeholder for capabilities an adapter does not provide.
///
/// Every operation returns [`ScmError::NotSupported`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl RepositoryService for Unsupported {}
impl PullRequestService for Unsupported {}
impl IssueService for Unsupported {}
impl OrganizationService for Unsupported {}
impl UserService for Unsupported {}
impl GitService for Unsupported {}
impl ReviewService for Unsupported {}
impl WebhookService for Unsupported {}
impl ContentService for Unsupported {}

/// One backend, resolved to its capability implementations.
#[derive(Clone)]
pub struct Client {
    driver: Driver,
    repositories: Arc<dyn RepositoryService>,
    pull_requests: Arc<dyn PullRequestService>,
    issues: Arc<dyn IssueService>,
    organizations: Arc<dyn OrganizationService>,
    users: Arc<dyn UserService>,
    git: Arc<dyn GitService>,
    reviews: Arc<dyn ReviewService>,
    webhooks: Arc<dyn WebhookService>,
    contents: Arc<dyn ContentService>,
}

impl fmt::Debug for Client {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Client")
            .field("driver", &self.driver)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Starts a client whose capabilities all default to [`Unsupported`].
    #[must_use]
    pub fn builder(driver: Driver) -> ClientBuilder {
        let unsupported = Arc::new(Unsupported);
        ClientBuilder {
            client: Self {
                driver,
                repositories: unsupported.clone(),
                pull_requests: unsupported.clone(),
                issues: unsupported.clone(),
                organizations: unsupported.clone(),
                users: unsupported.clone(),
                git: unsupported.clone(),
                reviews: unsupported.clone(),
                webhooks: unsupported.clone(),
                contents: unsupported,
            },
        }
    }

    /// Backend family of this client.
    #[must_use]
    pub const fn driver(&self) -> Driver {
        self.driver
    }

    /// Repository capability.
    #[must_use]
    pub const fn repositories(&self) -> &Arc<dyn RepositoryService> {
        &self.repositories
    }

    /// Pull request capability.
    #[must_use]
    pub const fn pull_requests(&self) -> &Arc<dyn PullRequestService> {
        &self.pull_requests
    }

    /// Issue capability.
    #[must_use]
    pub const fn issues(&self) -> &Arc<dyn IssueService> {
        &self.issues
    }

    /// Organization capability.
    #[must_use]
    pub const fn organizations(&self) -> &Arc<dyn OrganizationService> {
        &self.organizations
    }

    /// User capability.
    #[must_use]
    pub const fn users(&self) -> &Arc<dyn UserService> {
        &self.users
    }

    /// Git capability.
    #[must_use]
    pub const fn git(&self) -> &Arc<dyn GitService> {
        &self.git
    }

    /// Review capability.
    #[must_use]
    pub const fn reviews(&self) -> &Arc<dyn ReviewService> {
        &self.reviews
    }

    /// Webhook capability.
    #[must_use]
    pub const fn webhooks(&self) -> &Arc<dyn WebhookService> {
        &self.webhooks
    }

    /// Content capability.
    #[must_use]
    pub const fn contents(&self) -> &Arc<dyn ContentService> {
        &self.contents
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    client: Client,
}

impl ClientBuilder {
    /// Sets the repository capability.
    #[must_use]
    pub fn repositories(mut self, service: Arc<dyn RepositoryService>) -> Self {
        self.client.repositories = service;
        self
    }

    /// Sets the pull request capability.
    #[must_use]
    pub fn pull_requests(mut self, service: Arc<dyn PullRequestService>) -> Self {
        self.client.pull_requests = service;
        self
    }

    /// Sets the issue capability.
    #[must_use]
    pub fn issues(mut self, service: Arc<dyn IssueService>) -> Self {
        self.client.issues = service;
        self
    }

    /// Sets the organization capability.
    #[must_use]
    pub fn organizations(mut self, service: Arc<dyn OrganizationService>) -> Self {
        self.client.organizations = service;
        self
    }

    /// Sets the user capability.
    #[must_use]
    pub fn users(mut self, service: Arc<dyn UserService>) -> Self {
        self.client.users = service;
        self
    }

    /// Sets the git capability.
    #[must_use]
    pub fn git(mut self, service: Arc<dyn GitService>) -> Self {
        self.client.git = service;
        self
    }

    /// Sets the review capability.
    #[must_use]
    pub fn reviews(mut self, service: Arc<dyn ReviewService>) -> Self {
        self.client.reviews = service;
        self
    }

    /// Sets the webhook capability.
    #[must_use]
    pub fn webhooks(mut self, service: Arc<dyn WebhookService>) -> Self {
        self.client.webhooks = service;
        self
    }

    /// Sets the content capability.
    #[must_use]
    pub fn contents(mut self, service: Arc<dyn ContentService>) -> Self {
        self.client.contents = service;
        self
    }

    /// Finishes the client.
    #[must_use]
    pub fn build(self) -> Client {
        self.client
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Client, Driver};
    use crate::scm::error::ScmError;
    use crate::scm::pagination::ListOptions;

    #[rstest]
    #[case("github", Driver::Github)]
    #[case("Gitea", Driver::Gitea)]
    #[case("bitbucket-server", Driver::Stash)]
    #[case(" harness ", Driver::Harness)]
    fn parses_driver_names(#[case] raw: &str, #[case] expected: Driver) {
        assert_eq!(raw.parse::<Driver>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_driver() {
        let result = "gitlab".parse::<Driver>();
        assert!(
            matches!(result, Err(ScmError::Configuration { .. })),
            "expected Configuration, got {result:?}"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unset_capabilities_report_not_supported() {
        let client = Client::builder(Driver::Gitea).build();

        let repos = client.repositories().list(&ListOptions::default()).await;
        let merge = client.pull_requests().merge("o/r", 1).await;
        let hooks = client.webhooks().delete("o/r", "1").await;

        assert_eq!(repos.err(), Some(ScmError::NotSupported));
        assert_eq!(merge.err(), Some(ScmError::NotSupported));
        assert_eq!(hooks.err(), Some(ScmError::NotSupported));
    }
}
