//! Services running composed task definitions.

use bon::Builder;
use gantry_core::Cluster;
use gantry_core::Output;
use tracing::debug;

use crate::Error;
use crate::Result;
use crate::provider::NetworkConfiguration;
use crate::provider::Provisioner;
use crate::provider::ServiceHandle;
use crate::provider::ServiceSpec;
use crate::task::FargateTaskDefinition;
use crate::task::FargateTaskDefinitionArgs;

/// Arguments for composing a [`FargateService`].
///
/// The accepting type carries no launch-type field: it is fixed by the
/// composer and cannot be supplied.
#[derive(Builder, Clone, Debug, Default)]
#[builder(builder_type = Builder)]
pub struct FargateServiceArgs {
    /// An existing task definition to run.
    ///
    /// Takes precedence over `task_definition_args` when both are supplied.
    pub(crate) task_definition: Option<FargateTaskDefinition>,

    /// Arguments for composing the task definition to run.
    pub(crate) task_definition_args: Option<FargateTaskDefinitionArgs>,

    /// The number of task copies to keep running.
    ///
    /// Defaults to 1.
    pub(crate) desired_count: Option<u64>,

    /// Whether registration waits for the service to reach a steady state.
    pub(crate) wait_for_steady_state: Option<bool>,
}

/// A composed service bound to the serverless launch mode.
#[derive(Clone, Debug)]
pub struct FargateService {
    /// The graph name the service was registered under.
    name: String,

    /// The handle returned by the provisioning runtime.
    handle: ServiceHandle,
}

impl FargateService {
    /// Composes and registers a service on the given cluster.
    ///
    /// At least one of `task_definition`/`task_definition_args` must be
    /// supplied; when both are, the existing task definition takes
    /// precedence. When only arguments are given, the task definition is
    /// composed internally under the name `<name>-task`.
    ///
    /// Network configuration is derived from the cluster: tasks receive a
    /// public IP exactly when the cluster does not use private subnets, and
    /// the cluster's instance security group and subnet set are carried over.
    pub fn create(
        provisioner: &dyn Provisioner,
        name: impl Into<String>,
        cluster: &Cluster,
        args: FargateServiceArgs,
    ) -> Result<Self> {
        Self::create_with_parent(provisioner, name, cluster, args, None)
    }

    /// As [`create`](Self::create), parenting the service to an existing
    /// graph node.
    pub(crate) fn create_with_parent(
        provisioner: &dyn Provisioner,
        name: impl Into<String>,
        cluster: &Cluster,
        args: FargateServiceArgs,
        parent: Option<String>,
    ) -> Result<Self> {
        let name = name.into();

        // The precondition is checked before any composition or delegation.
        let task_definition = match (args.task_definition, args.task_definition_args) {
            (Some(task_definition), _) => task_definition,
            (None, Some(task_definition_args)) => FargateTaskDefinition::create(
                provisioner,
                format!("{name}-task"),
                cluster,
                task_definition_args,
            )?,
            (None, None) => {
                return Err(Error::InvalidArguments {
                    name,
                    reason: "either `task_definition` or `task_definition_args` must be provided",
                });
            }
        };

        debug!("composing service `{name}` running `{}`", task_definition.name());

        let network = NetworkConfiguration::builder()
            .assign_public_ip(!cluster.uses_private_subnets())
            .security_groups(vec![cluster.security_group_id().clone()])
            .subnets(cluster.subnet_ids().clone())
            .build();

        let spec = ServiceSpec::builder()
            .task_definition(task_definition.arn().clone())
            .maybe_desired_count(args.desired_count)
            .maybe_wait_for_steady_state(args.wait_for_steady_state)
            .network(network)
            .maybe_parent(parent)
            .build();

        let handle = provisioner.service(&name, spec)?;

        Ok(Self { name, handle })
    }

    /// Gets the graph name the service was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the stable identifier assigned by the runtime.
    pub fn id(&self) -> &Output<String> {
        self.handle.id()
    }

    /// Gets the registered ARN.
    pub fn arn(&self) -> &Output<String> {
        self.handle.arn()
    }
}
