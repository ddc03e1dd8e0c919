//! Composition helpers for the serverless container launch mode.
//!
//! The composers in this crate refine caller-supplied declarative arguments
//! into fully-valid task definition and service records and hand them to a
//! [`Provisioner`], the seam to the external provisioning runtime. The only
//! non-trivial derivation is [`task::TaskSize`], which computes the minimal
//! jointly-valid memory/CPU allocation for a task from its containers'
//! declared resource requests.

use thiserror::Error as ThisError;

pub mod provider;
pub mod service;
pub mod task;

pub use provider::Provisioner;
pub use service::FargateService;
pub use task::FargateTaskDefinition;

/// The launch mode every task definition composed by this crate targets.
pub const LAUNCH_MODE: &str = "FARGATE";

/// The network mode required by [`LAUNCH_MODE`].
pub const NETWORK_MODE: &str = "awsvpc";

/// A global error within this crate.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A set of composition arguments was rejected.
    ///
    /// Raised synchronously at composition entry, before any sizing or
    /// delegation takes place.
    #[error("invalid arguments for `{name}`: {reason}")]
    InvalidArguments {
        /// The name of the resource being composed.
        name: String,
        /// Why the arguments were rejected.
        reason: &'static str,
    },

    /// An error surfaced by the provisioning runtime during registration.
    ///
    /// These are propagated unchanged.
    #[error(transparent)]
    Provision(#[from] anyhow::Error),
}

/// A [`Result`](std::result::Result) with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
