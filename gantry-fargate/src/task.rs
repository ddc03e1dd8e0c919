//! Task definitions for the serverless launch mode.

use bon::Builder;
use gantry_core::Cluster;
use gantry_core::Output;
use indexmap::IndexMap;
use tracing::debug;

pub mod container;
pub mod resources;

pub use container::ContainerDefinition;
pub use container::PortMapping;
pub use resources::ContainerResources;
pub use resources::TaskSize;

use crate::Error;
use crate::Result;
use crate::provider::Provisioner;
use crate::provider::TaskDefinitionHandle;
use crate::provider::TaskDefinitionSpec;
use crate::service::FargateService;
use crate::service::FargateServiceArgs;

/// The key used when normalizing the single-container convenience form.
const SINGLE_CONTAINER_KEY: &str = "container";

/// Arguments for composing a [`FargateTaskDefinition`].
///
/// The accepting type carries no launch-compatibility or network-mode fields:
/// both are fixed by the composer and cannot be supplied.
#[derive(Builder, Clone, Debug, Default)]
#[builder(builder_type = Builder)]
pub struct FargateTaskDefinitionArgs {
    /// The single-container convenience form.
    ///
    /// Normalized into a one-entry `containers` mapping keyed `"container"`.
    /// Ignored when `containers` is also supplied.
    #[builder(into)]
    container: Option<ContainerDefinition>,

    /// The containers to run, keyed by name.
    ///
    /// Takes precedence over `container` when both are supplied.
    #[builder(into, default)]
    containers: IndexMap<String, ContainerDefinition>,

    /// The task memory token, e.g. `"1GB"`.
    ///
    /// Computed from the container resource requests when unset.
    #[builder(into)]
    memory: Option<String>,

    /// The task CPU units, e.g. `"256"`.
    ///
    /// Computed from the container resource requests when unset.
    #[builder(into)]
    cpu: Option<String>,

    /// The task definition family.
    ///
    /// Defaults to the resource name.
    #[builder(into)]
    family: Option<String>,

    /// The role assumed by the task's containers.
    #[builder(into)]
    task_role_arn: Option<String>,

    /// The role used to pull images and publish logs.
    #[builder(into)]
    execution_role_arn: Option<String>,
}

/// Validates and normalizes the mutually exclusive container arguments.
fn resolve_containers(
    name: &str,
    container: Option<ContainerDefinition>,
    containers: IndexMap<String, ContainerDefinition>,
) -> Result<IndexMap<String, ContainerDefinition>> {
    if !containers.is_empty() {
        return Ok(containers);
    }

    match container {
        Some(container) => {
            let mut containers = IndexMap::new();
            containers.insert(String::from(SINGLE_CONTAINER_KEY), container);
            Ok(containers)
        }
        None => Err(Error::InvalidArguments {
            name: name.to_string(),
            reason: "either `container` or `containers` must be provided",
        }),
    }
}

/// A composed task definition bound to the serverless launch mode.
#[derive(Clone, Debug)]
pub struct FargateTaskDefinition {
    /// The graph name the task definition was registered under.
    name: String,

    /// The handle returned by the provisioning runtime.
    handle: TaskDefinitionHandle,

    /// The cluster the task definition was composed for.
    cluster: Cluster,
}

impl FargateTaskDefinition {
    /// Composes and registers a task definition.
    ///
    /// At least one of `container`/`containers` must be supplied; when both
    /// are, `containers` takes precedence. Memory and CPU left unset by the
    /// caller are filled in, independently of one another, from
    /// [`TaskSize::resolve`] over the resolved container mapping.
    pub fn create(
        provisioner: &dyn Provisioner,
        name: impl Into<String>,
        cluster: &Cluster,
        args: FargateTaskDefinitionArgs,
    ) -> Result<Self> {
        let name = name.into();

        // The precondition is checked before any sizing or delegation.
        let containers = resolve_containers(&name, args.container, args.containers)?;

        debug!(
            "composing task definition `{name}` with {} container(s)",
            containers.len()
        );

        // Memory and CPU are resolved independently: the caller may pin one
        // and let the other be computed.
        let (memory, cpu) = match (args.memory, args.cpu) {
            (Some(memory), Some(cpu)) => (memory, cpu),
            (memory, cpu) => {
                let size = TaskSize::resolve(containers.values().map(ContainerDefinition::resources));
                (
                    memory.unwrap_or_else(|| size.memory().to_string()),
                    cpu.unwrap_or_else(|| size.cpu().to_string()),
                )
            }
        };

        let spec = TaskDefinitionSpec::builder()
            .family(args.family.unwrap_or_else(|| name.clone()))
            .memory(memory)
            .cpu(cpu)
            .containers(containers)
            .maybe_task_role_arn(args.task_role_arn)
            .maybe_execution_role_arn(args.execution_role_arn)
            .build();

        let handle = provisioner.task_definition(&name, spec)?;

        Ok(Self {
            name,
            handle,
            cluster: cluster.clone(),
        })
    }

    /// Gets the graph name the task definition was registered under.
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

    /// Composes a service running this task definition.
    ///
    /// The service is parented to the task definition for lifecycle purposes
    /// and runs on the cluster the task definition was composed for. Any
    /// `task_definition`/`task_definition_args` in `args` are replaced by
    /// this task definition.
    pub fn create_service(
        &self,
        provisioner: &dyn Provisioner,
        name: impl Into<String>,
        args: FargateServiceArgs,
    ) -> Result<FargateService> {
        let args = FargateServiceArgs {
            task_definition: Some(self.clone()),
            task_definition_args: None,
            ..args
        };

        FargateService::create_with_parent(
            provisioner,
            name,
            &self.cluster,
            args,
            Some(self.name.clone()),
        )
    }
}
