//! Command-line configuration loaded from CLI, environment, and files.
//!
//! Values are merged with ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in defaults (GitHub, 100 items per page)
//! 2. **Configuration file** – `.forgekit.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `FORGEKIT_DRIVER`, `FORGEKIT_TOKEN`, …, or
//!    legacy `GITHUB_TOKEN` for the token
//! 4. **Command-line arguments** – `--driver`/`-d`, `--server`/`-s`,
//!    `--token`/`-t`, …
//!
//! # Configuration File
//!
//! ```toml
//! driver = "harness"
//! server = "https://app.harness.io/gateway/code"
//! token = "pat.example"
//! account = "acct"
//! organization = "default"
//! project = "demo"
//! page_size = 50
//! max_pages = 10
//! concurrent = true
//! ```

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::driver::{gitea, github, harness, stash};
use crate::scm::client::{Client, Driver};
use crate::scm::error::ScmError;
use crate::scm::pagination::{DEFAULT_PAGE_SIZE, ListOptions};

/// Configuration for the `forgekit` binary.
///
/// # Example
///
/// ```no_run
/// use forgekit::ForgeConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = ForgeConfig::load().expect("failed to load configuration");
/// let client = config.connect().expect("failed to connect");
/// println!("{}", client.driver());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "FORGEKIT",
    discovery(
        dotfile_name = ".forgekit.toml",
        config_file_name = "forgekit.toml",
        app_name = "forgekit"
    )
)]
pub struct ForgeConfig {
    /// Backend family: `github`, `gitea`, `stash` or `harness`.
    ///
    /// Can be provided via:
    /// - CLI: `--driver <NAME>` or `-d <NAME>`
    /// - Environment: `FORGEKIT_DRIVER`
    /// - Config file: `driver = "..."`
    #[ortho_config(cli_short = 'd')]
    pub driver: String,

    /// Base API URL of the backend. Only GitHub has a built-in default.
    #[ortho_config(cli_short = 's')]
    pub server: Option<String>,

    /// Access token.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `FORGEKIT_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Items requested per page.
    #[ortho_config()]
    pub page_size: u32,

    /// Upper bound on pages fetched; `0` means unbounded.
    #[ortho_config()]
    pub max_pages: u32,

    /// Fetches pages concurrently once the page count is known.
    ///
    /// Note: `ortho_config` does not load boolean values from the
    /// environment, so use `--concurrent` or the config file.
    #[ortho_config(cli_short = 'c')]
    pub concurrent: bool,

    /// Harness account identifier.
    #[ortho_config()]
    pub account: Option<String>,

    /// Harness organization identifier.
    #[ortho_config()]
    pub organization: Option<String>,

    /// Harness project identifier.
    #[ortho_config()]
    pub project: Option<String>,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            driver: Driver::Github.as_str().to_owned(),
            server: None,
            token: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: 0,
            concurrent: false,
            account: None,
            organization: None,
            project: None,
        }
    }
}

impl ForgeConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable. Empty values count as absent.
    #[must_use]
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .filter(|token| !token.is_empty())
    }

    /// Parses the configured driver name.
    ///
    /// # Errors
    ///
    /// Returns [`ScmError::Configuration`] for an unknown driver.
    pub fn driver_kind(&self) -> Result<Driver, ScmError> {
        self.driver.parse()
    }

    /// Returns the configured server, falling back to the driver default.
    ///
    /// # Errors
    ///
    /// Returns [`ScmError::Configuration`] when the driver is unknown or has
    /// no default server and none was configured.
    pub fn server_url(&self) -> Result<String, ScmError> {
        if let Some(server) = self.server.as_deref().filter(|value| !value.is_empty()) {
            return Ok(server.to_owned());
        }
        match self.driver_kind()? {
            Driver::Github => Ok(github::DEFAULT_SERVER.to_owned()),
            other => Err(ScmError::Configuration {
                message: format!("server is required for the {other} driver (use --server or -s)"),
            }),
        }
    }

    /// Harness scope assembled from `account`, `organization` and `project`.
    #[must_use]
    pub fn scope(&self) -> harness::Scope {
        harness::Scope::new(
            self.account.clone().unwrap_or_default(),
            self.organization.clone().unwrap_or_default(),
            self.project.clone().unwrap_or_default(),
        )
    }

    /// Paging options for a full listing.
    #[must_use]
    pub const fn list_options(&self) -> ListOptions {
        ListOptions::new(1, self.page_size).with_max_page(self.max_pages)
    }

    /// Builds a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`ScmError::Configuration`] for an unknown driver, a missing
    /// server or an unusable token, and [`ScmError::InvalidUrl`] when the
    /// server URL cannot be parsed.
    pub fn connect(&self) -> Result<Client, ScmError> {
        let server = self.server_url()?;
        let token = self.resolve_token();
        match self.driver_kind()? {
            Driver::Github => github::new(&server, token.as_deref()),
            Driver::Gitea => gitea::new(&server, token.as_deref()),
            Driver::Stash => stash::new(&server, token.as_deref()),
            Driver::Harness => harness::new(&server, token.as_deref(), self.scope()),
        }
    }
}
