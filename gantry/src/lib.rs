//! Gantry.

#[cfg(feature = "core")]
#[doc(inline)]
pub use gantry_core::Cluster;
#[cfg(feature = "core")]
#[doc(inline)]
pub use gantry_core::Distribution;
#[cfg(feature = "core")]
#[doc(inline)]
pub use gantry_core::Output;
#[cfg(feature = "fargate")]
#[doc(inline)]
pub use gantry_fargate as fargate;
#[cfg(feature = "metrics")]
#[doc(inline)]
pub use gantry_metrics as metrics;
