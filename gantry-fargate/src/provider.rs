//! The seam between composition and the provisioning runtime.
//!
//! The composers in this crate only refine declarative records; materializing
//! them (and diffing them against live infrastructure) belongs to an external
//! runtime reached through the [`Provisioner`] trait. Errors raised on the
//! far side of the seam are propagated to composition callers unchanged.

use bon::Builder;
use gantry_core::Output;
use indexmap::IndexMap;

use crate::LAUNCH_MODE;
use crate::NETWORK_MODE;
use crate::Result;
use crate::task::ContainerDefinition;

/// A refined, fully-valid task definition record.
///
/// The launch compatibilities and network mode are fixed at construction and
/// cannot be supplied by callers.
#[derive(Builder, Clone, Debug)]
pub struct TaskDefinitionSpec {
    /// The task definition family.
    #[builder(into)]
    family: String,

    /// The launch compatibilities. Fixed to the serverless launch mode.
    #[builder(skip = vec![String::from(LAUNCH_MODE)])]
    requires_compatibilities: Vec<String>,

    /// The network mode. Fixed to the mode the launch mode requires.
    #[builder(skip = String::from(NETWORK_MODE))]
    network_mode: String,

    /// The task memory token, e.g. `"1GB"`.
    #[builder(into)]
    memory: String,

    /// The task CPU units, e.g. `"256"`.
    #[builder(into)]
    cpu: String,

    /// The containers to run, keyed by name.
    #[builder(into)]
    containers: IndexMap<String, ContainerDefinition>,

    /// The role assumed by the task's containers.
    #[builder(into)]
    task_role_arn: Option<String>,

    /// The role used to pull images and publish logs.
    #[builder(into)]
    execution_role_arn: Option<String>,
}

impl TaskDefinitionSpec {
    /// Gets the task definition family.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Gets the launch compatibilities.
    pub fn requires_compatibilities(&self) -> &[String] {
        &self.requires_compatibilities
    }

    /// Gets the network mode.
    pub fn network_mode(&self) -> &str {
        &self.network_mode
    }

    /// Gets the task memory token.
    pub fn memory(&self) -> &str {
        &self.memory
    }

    /// Gets the task CPU units.
    pub fn cpu(&self) -> &str {
        &self.cpu
    }

    /// Gets the containers to run, keyed by name.
    pub fn containers(&self) -> &IndexMap<String, ContainerDefinition> {
        &self.containers
    }

    /// Gets the role assumed by the task's containers.
    pub fn task_role_arn(&self) -> Option<&str> {
        self.task_role_arn.as_deref()
    }

    /// Gets the role used to pull images and publish logs.
    pub fn execution_role_arn(&self) -> Option<&str> {
        self.execution_role_arn.as_deref()
    }
}

/// Network configuration derived from a cluster's posture.
#[derive(Builder, Clone, Debug)]
pub struct NetworkConfiguration {
    /// Whether tasks receive a public IP.
    ///
    /// The negation of the cluster's private-subnet posture.
    assign_public_ip: bool,

    /// The security groups attached to task network interfaces.
    #[builder(into)]
    security_groups: Vec<Output<String>>,

    /// The subnets tasks are placed in.
    subnets: Output<Vec<String>>,
}

impl NetworkConfiguration {
    /// Whether tasks receive a public IP.
    pub fn assign_public_ip(&self) -> bool {
        self.assign_public_ip
    }

    /// Gets the security groups attached to task network interfaces.
    pub fn security_groups(&self) -> &[Output<String>] {
        &self.security_groups
    }

    /// Gets the subnets tasks are placed in.
    pub fn subnets(&self) -> &Output<Vec<String>> {
        &self.subnets
    }
}

/// A refined, fully-valid service record.
#[derive(Builder, Clone, Debug)]
pub struct ServiceSpec {
    /// The launch type. Fixed to the serverless launch mode.
    #[builder(skip = String::from(LAUNCH_MODE))]
    launch_type: String,

    /// The ARN of the task definition to run.
    task_definition: Output<String>,

    /// The number of task copies to keep running.
    #[builder(default = 1)]
    desired_count: u64,

    /// Whether registration waits for the service to reach a steady state.
    #[builder(default)]
    wait_for_steady_state: bool,

    /// The network configuration derived from the cluster.
    network: NetworkConfiguration,

    /// The graph node the service is parented to, if any.
    #[builder(into)]
    parent: Option<String>,
}

impl ServiceSpec {
    /// Gets the launch type.
    pub fn launch_type(&self) -> &str {
        &self.launch_type
    }

    /// Gets the ARN of the task definition to run.
    pub fn task_definition(&self) -> &Output<String> {
        &self.task_definition
    }

    /// Gets the number of task copies to keep running.
    pub fn desired_count(&self) -> u64 {
        self.desired_count
    }

    /// Whether registration waits for the service to reach a steady state.
    pub fn wait_for_steady_state(&self) -> bool {
        self.wait_for_steady_state
    }

    /// Gets the network configuration derived from the cluster.
    pub fn network(&self) -> &NetworkConfiguration {
        &self.network
    }

    /// Gets the graph node the service is parented to, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }
}

/// A handle to a registered task definition.
#[derive(Clone, Debug)]
pub struct TaskDefinitionHandle {
    /// The stable identifier assigned by the runtime.
    id: Output<String>,

    /// The registered ARN.
    arn: Output<String>,
}

impl TaskDefinitionHandle {
    /// Creates a new handle.
    pub fn new(id: Output<String>, arn: Output<String>) -> Self {
        Self { id, arn }
    }

    /// Gets the stable identifier assigned by the runtime.
    pub fn id(&self) -> &Output<String> {
        &self.id
    }

    /// Gets the registered ARN.
    pub fn arn(&self) -> &Output<String> {
        &self.arn
    }
}

/// A handle to a registered service.
#[derive(Clone, Debug)]
pub struct ServiceHandle {
    /// The stable identifier assigned by the runtime.
    id: Output<String>,

    /// The registered ARN.
    arn: Output<String>,
}

impl ServiceHandle {
    /// Creates a new handle.
    pub fn new(id: Output<String>, arn: Output<String>) -> Self {
        Self { id, arn }
    }

    /// Gets the stable identifier assigned by the runtime.
    pub fn id(&self) -> &Output<String> {
        &self.id
    }

    /// Gets the registered ARN.
    pub fn arn(&self) -> &Output<String> {
        &self.arn
    }
}

/// The provisioning runtime the composers delegate to.
///
/// Registration accepts a refined declarative record and returns a handle
/// with a stable identifier, which may resolve later.
pub trait Provisioner: Send + Sync {
    /// Registers a task definition.
    fn task_definition(&self, name: &str, spec: TaskDefinitionSpec) -> Result<TaskDefinitionHandle>;

    /// Registers a service.
    fn service(&self, name: &str, spec: ServiceSpec) -> Result<ServiceHandle>;
}
