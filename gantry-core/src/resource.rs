//! Handles for resources provisioned outside this workspace.
//!
//! These types carry only the identity and posture fields the composition
//! helpers consume; constructing and diffing the underlying infrastructure is
//! the provisioning runtime's concern.

pub mod cluster;
pub mod distribution;

pub use cluster::Cluster;
pub use distribution::Distribution;
