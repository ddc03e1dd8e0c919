//! Handles for provisioned CDN distributions.

use bon::Builder;

use crate::Output;

/// A provisioned CDN distribution, referenced by identity only.
#[derive(Builder, Clone, Debug)]
#[builder(builder_type = Builder)]
pub struct Distribution {
    /// The provider-assigned distribution identifier.
    #[builder(into)]
    id: Output<String>,
}

impl Distribution {
    /// Gets the distribution identifier.
    pub fn id(&self) -> &Output<String> {
        &self.id
    }
}
