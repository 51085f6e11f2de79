//! Forgekit CLI entrypoint: lists every repository visible on a backend.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use forgekit::scm::Repository;
use forgekit::{ForgeConfig, ScmError, TracingLogger, Traversal, traverse};
use ortho_config::OrthoConfig;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ScmError> {
    let config = load_config()?;
    let client = config.connect()?;
    let traversal = Traversal::with_logger(Arc::new(TracingLogger));
    let opts = config.list_options();

    let repositories = if config.concurrent {
        traverse::repositories_concurrent(&traversal, &client, opts).await?
    } else {
        traverse::repositories(&traversal, &client, opts).await?
    };

    write_repositories(&repositories)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ScmError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<ForgeConfig, ScmError> {
    ForgeConfig::load().map_err(|error| ScmError::Configuration {
        message: error.to_string(),
    })
}

fn write_repositories(repositories: &[Repository]) -> Result<(), ScmError> {
    let mut stdout = io::stdout().lock();
    for repository in repositories {
        let full_name = if repository.namespace.is_empty() {
            repository.name.clone()
        } else {
            format!("{}/{}", repository.namespace, repository.name)
        };
        writeln!(stdout, "{full_name}\t{}", repository.clone).map_err(|error| ScmError::Io {
            message: error.to_string(),
        })?;
    }
    Ok(())
}
