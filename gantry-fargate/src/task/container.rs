//! Container definitions for composed tasks.

use bon::Builder;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

use crate::task::ContainerResources;

/// The default for [`ContainerDefinition::essential`].
fn essential_default() -> bool {
    true
}

/// A single port exposed by a container.
///
/// Under the dedicated-interface network mode the host port always matches
/// the container port, so only the latter is declared.
#[derive(Builder, Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PortMapping {
    /// The port the container listens on.
    container_port: u16,

    /// The transport protocol; defaults to TCP downstream when unset.
    #[builder(into)]
    protocol: Option<String>,
}

impl PortMapping {
    /// Gets the port the container listens on.
    pub fn container_port(&self) -> u16 {
        self.container_port
    }

    /// Gets the transport protocol, if one was declared.
    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }
}

/// A container to run as part of a task.
///
/// Immutable once built; the composer only reads it.
#[derive(Builder, Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContainerDefinition {
    /// The image to run.
    #[builder(into)]
    image: String,

    /// An optional command override.
    #[builder(into)]
    command: Option<Vec<String>>,

    /// Environment variables set in the container.
    #[serde(default)]
    #[builder(into, default)]
    environment: IndexMap<String, String>,

    /// The ports the container exposes.
    #[serde(default)]
    #[builder(into, default)]
    port_mappings: Vec<PortMapping>,

    /// Whether the task should stop when this container exits.
    #[serde(default = "essential_default")]
    #[builder(default = true)]
    essential: bool,

    /// The resources declared for the container.
    #[serde(default)]
    #[builder(into, default)]
    resources: ContainerResources,
}

impl ContainerDefinition {
    /// Gets the image to run.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Gets the command override, if one was declared.
    pub fn command(&self) -> Option<&[String]> {
        self.command.as_deref()
    }

    /// Gets the environment variables set in the container.
    pub fn environment(&self) -> &IndexMap<String, String> {
        &self.environment
    }

    /// Gets the ports the container exposes.
    pub fn port_mappings(&self) -> &[PortMapping] {
        &self.port_mappings
    }

    /// Whether the task should stop when this container exits.
    pub fn essential(&self) -> bool {
        self.essential
    }

    /// Gets the resources declared for the container.
    pub fn resources(&self) -> &ContainerResources {
        &self.resources
    }
}
