//! Forgekit gives one strongly-typed interface over several source code
//! hosting backends.
//!
//! Callers program against the capability traits in [`scm::service`] through
//! an [`scm::Client`]; adapters in [`driver`] translate GitHub, Gitea,
//! Bitbucket Server and Harness wire formats into the canonical model in
//! [`scm::models`]. Every list response carries a [`scm::Page`] descriptor,
//! and [`traverse`] walks a complete listing sequentially or concurrently.

pub mod config;
pub mod driver;
pub mod scm;
pub mod traverse;

pub use config::ForgeConfig;
pub use scm::{Client, Driver, ListOptions, Page, Reply, Response, ScmError, ScmResult};
pub use traverse::{NoopLogger, PageEvent, PageLogger, TracingLogger, Traversal};
