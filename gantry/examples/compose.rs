//! Composes a demo task definition, service, and metric descriptor against a
//! printing provisioner.
//!
//! You can run this command with the following command:
//!
//! `cargo run --example compose`

use gantry::Cluster;
use gantry::Distribution;
use gantry::Output;
use gantry::fargate::FargateService;
use gantry::fargate::provider::Provisioner;
use gantry::fargate::provider::ServiceHandle;
use gantry::fargate::provider::ServiceSpec;
use gantry::fargate::provider::TaskDefinitionHandle;
use gantry::fargate::provider::TaskDefinitionSpec;
use gantry::fargate::service::FargateServiceArgs;
use gantry::fargate::task::ContainerDefinition;
use gantry::fargate::task::ContainerResources;
use gantry::fargate::task::FargateTaskDefinitionArgs;
use gantry::metrics;
use gantry::metrics::MetricChange;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// A provisioner that prints every record it receives.
struct Printing;

impl Provisioner for Printing {
    fn task_definition(
        &self,
        name: &str,
        spec: TaskDefinitionSpec,
    ) -> gantry::fargate::Result<TaskDefinitionHandle> {
        info!("registering task definition `{name}`: {spec:#?}");

        Ok(TaskDefinitionHandle::new(
            Output::value(format!("{name}-id")),
            Output::value(format!("arn:aws:ecs:task-definition/{name}")),
        ))
    }

    fn service(&self, name: &str, spec: ServiceSpec) -> gantry::fargate::Result<ServiceHandle> {
        info!("registering service `{name}`: {spec:#?}");

        Ok(ServiceHandle::new(
            Output::value(format!("{name}-id")),
            Output::value(format!("arn:aws:ecs:service/{name}")),
        ))
    }
}

/// Starting point for execution.
async fn run() -> gantry::fargate::Result<()> {
    let cluster = Cluster::builder()
        .arn("arn:aws:ecs:cluster/demo")
        .security_group_id("sg-0123456789abcdef0")
        .subnet_ids(vec![String::from("subnet-a"), String::from("subnet-b")])
        .build();

    let mut containers = indexmap::IndexMap::new();
    containers.insert(
        String::from("app"),
        ContainerDefinition::builder()
            .image("app:latest")
            .resources(
                ContainerResources::builder()
                    .memory_reservation(3000)
                    .cpu(300)
                    .build(),
            )
            .build(),
    );
    containers.insert(
        String::from("proxy"),
        ContainerDefinition::builder()
            .image("nginx:alpine")
            .resources(ContainerResources::builder().memory(256).build())
            .build(),
    );

    let args = FargateServiceArgs::builder()
        .task_definition_args(
            FargateTaskDefinitionArgs::builder()
                .containers(containers)
                .build(),
        )
        .desired_count(2)
        .build();

    let service = FargateService::create(&Printing, "demo", &cluster, args)?;
    info!("service registered as `{}`", service.id().clone().await);

    let distribution = Distribution::builder().id("E2EXAMPLE").build();
    let descriptor = metrics::requests(
        MetricChange::builder()
            .distribution(distribution)
            .region("us-east-1")
            .build(),
    );
    info!("metric descriptor: {descriptor:#?}");

    Ok(())
}

/// The main function.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    run().await.expect("demo composition failed");
}
