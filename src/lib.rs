//! CI automation for CapRover preview apps.
//!
//! Provisions, configures, and tears down a preview application on a
//! CapRover server during a CI/CD workflow. One invocation runs one
//! flow, selected by the `COMMAND` environment variable:
//!
//! - **setup** - idempotently ensure the app exists, SSL is enabled
//!   (best effort), the deploy token is enabled, and any custom
//!   configuration is applied, then emit the deploy token.
//! - **cleanup** - delete the app and, when `CLEANUP_STORAGE` allows,
//!   its named volumes; a missing app is a no-op success.
//!
//! # Overview
//!
//! The reusable pieces are:
//!
//! - [`CiEnv`] - the validated CI environment, built once at startup
//! - [`config::validate`] - turns loosely-typed JSON (array or keyed
//!   mapping shapes) into a canonical [`AppConfig`], dropping
//!   malformed fields with a warning
//! - [`config::merge`] - merges partial configs, element-wise by
//!   natural key for env vars, volumes, and ports
//! - [`config::diff`] - decides whether a save call is warranted
//! - [`retry::with_retry`] - exponential backoff for transient API
//!   failures
//! - [`CapRoverClient`] - the CapRover JSON-over-HTTP client
//!
//! # Example
//!
//! ```rust,no_run
//! use caprover_preview::{CiEnv, setup};
//!
//! # async fn run() -> caprover_preview::PreviewResult<()> {
//! let env = CiEnv::from_env()?;
//! let deploy_token = setup::run(&env).await?;
//! println!("{deploy_token}");
//! # Ok(())
//! # }
//! ```

// Allow noisy pedantic lints that don't add value for a CI
// automation crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod api;
pub mod cleanup;
pub mod config;
pub mod env;
pub mod error;
pub mod retry;
pub mod setup;

pub use api::AppDefinition;
pub use api::AppDefinitionsResponse;
pub use api::CapRoverClient;
pub use config::AppConfig;
pub use config::DeployTokenConfig;
pub use config::EnvVar;
pub use config::PortMapping;
pub use config::Volume;
pub use env::CiEnv;
pub use env::FlowCommand;
pub use error::PreviewError;
pub use error::PreviewResult;
pub use retry::with_retry;
