//! Handles for provisioned container clusters.

use bon::Builder;

use crate::Output;

/// A provisioned container cluster and its network posture.
#[derive(Builder, Clone, Debug)]
#[builder(builder_type = Builder)]
pub struct Cluster {
    /// The cluster ARN.
    #[builder(into)]
    arn: Output<String>,

    /// Whether the cluster places tasks on private subnets.
    #[builder(default)]
    uses_private_subnets: bool,

    /// The instance security group shared by services on the cluster.
    #[builder(into)]
    security_group_id: Output<String>,

    /// The subnets tasks are placed in.
    #[builder(into)]
    subnet_ids: Output<Vec<String>>,
}

impl Cluster {
    /// Gets the cluster ARN.
    pub fn arn(&self) -> &Output<String> {
        &self.arn
    }

    /// Whether the cluster places tasks on private subnets.
    pub fn uses_private_subnets(&self) -> bool {
        self.uses_private_subnets
    }

    /// Gets the instance security group shared by services on the cluster.
    pub fn security_group_id(&self) -> &Output<String> {
        &self.security_group_id
    }

    /// Gets the subnets tasks are placed in.
    pub fn subnet_ids(&self) -> &Output<Vec<String>> {
        &self.subnet_ids
    }
}
