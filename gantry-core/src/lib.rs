//! Core value and resource-handle types shared across Gantry.

pub mod output;
pub mod resource;

pub use output::Output;
pub use resource::Cluster;
pub use resource::Distribution;
