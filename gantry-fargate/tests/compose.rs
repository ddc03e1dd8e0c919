//! End-to-end composition tests against a recording provisioner.

use std::sync::Mutex;

use gantry_core::Cluster;
use gantry_core::Output;
use gantry_fargate::Error;
use gantry_fargate::FargateService;
use gantry_fargate::FargateTaskDefinition;
use gantry_fargate::provider::Provisioner;
use gantry_fargate::provider::ServiceHandle;
use gantry_fargate::provider::ServiceSpec;
use gantry_fargate::provider::TaskDefinitionHandle;
use gantry_fargate::provider::TaskDefinitionSpec;
use gantry_fargate::service::FargateServiceArgs;
use gantry_fargate::task::ContainerDefinition;
use gantry_fargate::task::ContainerResources;
use gantry_fargate::task::FargateTaskDefinitionArgs;

/// Records every spec the composers hand to the runtime.
#[derive(Default)]
struct Recording {
    task_definitions: Mutex<Vec<(String, TaskDefinitionSpec)>>,
    services: Mutex<Vec<(String, ServiceSpec)>>,
}

impl Recording {
    fn task_definition_specs(&self) -> Vec<(String, TaskDefinitionSpec)> {
        self.task_definitions.lock().unwrap().clone()
    }

    fn service_specs(&self) -> Vec<(String, ServiceSpec)> {
        self.services.lock().unwrap().clone()
    }
}

impl Provisioner for Recording {
    fn task_definition(
        &self,
        name: &str,
        spec: TaskDefinitionSpec,
    ) -> gantry_fargate::Result<TaskDefinitionHandle> {
        self.task_definitions
            .lock()
            .unwrap()
            .push((name.to_string(), spec));

        Ok(TaskDefinitionHandle::new(
            Output::value(format!("{name}-id")),
            Output::value(format!("arn:aws:ecs:task-definition/{name}")),
        ))
    }

    fn service(&self, name: &str, spec: ServiceSpec) -> gantry_fargate::Result<ServiceHandle> {
        self.services.lock().unwrap().push((name.to_string(), spec));

        Ok(ServiceHandle::new(
            Output::value(format!("{name}-id")),
            Output::value(format!("arn:aws:ecs:service/{name}")),
        ))
    }
}

fn cluster(private: bool) -> Cluster {
    Cluster::builder()
        .arn("arn:aws:ecs:cluster/test")
        .uses_private_subnets(private)
        .security_group_id("sg-0123456789abcdef0")
        .subnet_ids(vec![String::from("subnet-a"), String::from("subnet-b")])
        .build()
}

fn nginx() -> ContainerDefinition {
    ContainerDefinition::builder()
        .image("nginx:alpine")
        .resources(ContainerResources::builder().memory(128).build())
        .build()
}

#[test]
fn a_single_container_is_normalized_into_a_mapping() {
    let runtime = Recording::default();
    let args = FargateTaskDefinitionArgs::builder().container(nginx()).build();

    FargateTaskDefinition::create(&runtime, "web", &cluster(false), args).unwrap();

    let specs = runtime.task_definition_specs();
    assert_eq!(specs.len(), 1);

    let (name, spec) = &specs[0];
    assert_eq!(name, "web");
    assert_eq!(spec.containers().len(), 1);
    assert!(spec.containers().contains_key("container"));
}

#[test]
fn forced_fields_cannot_be_overridden() {
    let runtime = Recording::default();
    let args = FargateTaskDefinitionArgs::builder().container(nginx()).build();

    FargateTaskDefinition::create(&runtime, "web", &cluster(false), args).unwrap();

    let (_, spec) = &runtime.task_definition_specs()[0];
    assert_eq!(spec.requires_compatibilities(), ["FARGATE"]);
    assert_eq!(spec.network_mode(), "awsvpc");
}

#[test]
fn the_family_defaults_to_the_resource_name() {
    let runtime = Recording::default();
    let args = FargateTaskDefinitionArgs::builder().container(nginx()).build();

    FargateTaskDefinition::create(&runtime, "web", &cluster(false), args).unwrap();
    let (_, spec) = &runtime.task_definition_specs()[0];
    assert_eq!(spec.family(), "web");

    let args = FargateTaskDefinitionArgs::builder()
        .container(nginx())
        .family("frontends")
        .build();

    FargateTaskDefinition::create(&runtime, "web2", &cluster(false), args).unwrap();
    let (_, spec) = &runtime.task_definition_specs()[1];
    assert_eq!(spec.family(), "frontends");
}

#[test]
fn sizes_are_computed_when_the_caller_leaves_them_unset() {
    let runtime = Recording::default();

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

    let args = FargateTaskDefinitionArgs::builder()
        .containers(containers)
        .build();

    FargateTaskDefinition::create(&runtime, "app", &cluster(false), args).unwrap();

    let (_, spec) = &runtime.task_definition_specs()[0];
    assert_eq!(spec.memory(), "3GB");
    assert_eq!(spec.cpu(), "512");
}

#[test]
fn caller_sizes_are_resolved_independently() {
    let runtime = Recording::default();

    // Memory pinned, CPU computed.
    let args = FargateTaskDefinitionArgs::builder()
        .container(nginx())
        .memory("8GB")
        .build();

    FargateTaskDefinition::create(&runtime, "pinned-memory", &cluster(false), args).unwrap();
    let (_, spec) = &runtime.task_definition_specs()[0];
    assert_eq!(spec.memory(), "8GB");
    assert_eq!(spec.cpu(), "256");

    // Both pinned; the sizer is not consulted.
    let args = FargateTaskDefinitionArgs::builder()
        .container(nginx())
        .memory("30GB")
        .cpu("4096")
        .build();

    FargateTaskDefinition::create(&runtime, "pinned-both", &cluster(false), args).unwrap();
    let (_, spec) = &runtime.task_definition_specs()[1];
    assert_eq!(spec.memory(), "30GB");
    assert_eq!(spec.cpu(), "4096");
}

#[test]
fn a_task_definition_without_containers_is_rejected() {
    let runtime = Recording::default();
    let args = FargateTaskDefinitionArgs::builder().build();

    let err = FargateTaskDefinition::create(&runtime, "empty", &cluster(false), args).unwrap_err();

    assert!(matches!(err, Error::InvalidArguments { .. }));
    assert_eq!(
        err.to_string(),
        "invalid arguments for `empty`: either `container` or `containers` must be provided"
    );
    assert!(runtime.task_definition_specs().is_empty());
}

#[test]
fn explicit_containers_take_precedence_over_the_convenience_form() {
    let runtime = Recording::default();

    let mut containers = indexmap::IndexMap::new();
    containers.insert(
        String::from("api"),
        ContainerDefinition::builder().image("api:latest").build(),
    );

    let args = FargateTaskDefinitionArgs::builder()
        .container(nginx())
        .containers(containers)
        .build();

    FargateTaskDefinition::create(&runtime, "both", &cluster(false), args).unwrap();

    let (_, spec) = &runtime.task_definition_specs()[0];
    assert_eq!(spec.containers().len(), 1);
    assert_eq!(spec.containers()["api"].image(), "api:latest");
}

#[tokio::test]
async fn a_service_composed_from_args_creates_its_task_definition() {
    let runtime = Recording::default();

    let args = FargateServiceArgs::builder()
        .task_definition_args(FargateTaskDefinitionArgs::builder().container(nginx()).build())
        .desired_count(2)
        .build();

    FargateService::create(&runtime, "web", &cluster(false), args).unwrap();

    let task_definitions = runtime.task_definition_specs();
    assert_eq!(task_definitions.len(), 1);
    assert_eq!(task_definitions[0].0, "web-task");

    let services = runtime.service_specs();
    assert_eq!(services.len(), 1);

    let (name, spec) = &services[0];
    assert_eq!(name, "web");
    assert_eq!(spec.launch_type(), "FARGATE");
    assert_eq!(spec.desired_count(), 2);
    assert_eq!(
        spec.task_definition().clone().await,
        "arn:aws:ecs:task-definition/web-task"
    );
}

#[test]
fn a_service_without_a_task_definition_is_rejected() {
    let runtime = Recording::default();
    let args = FargateServiceArgs::builder().build();

    let err = FargateService::create(&runtime, "empty", &cluster(false), args).unwrap_err();

    assert!(matches!(err, Error::InvalidArguments { .. }));
    assert!(runtime.service_specs().is_empty());
}

#[tokio::test]
async fn an_existing_task_definition_takes_precedence_over_args() {
    let runtime = Recording::default();

    let task_definition = FargateTaskDefinition::create(
        &runtime,
        "existing",
        &cluster(false),
        FargateTaskDefinitionArgs::builder().container(nginx()).build(),
    )
    .unwrap();

    let args = FargateServiceArgs::builder()
        .task_definition(task_definition)
        .task_definition_args(FargateTaskDefinitionArgs::builder().container(nginx()).build())
        .build();

    FargateService::create(&runtime, "web", &cluster(false), args).unwrap();

    // Only the explicitly created task definition was registered.
    assert_eq!(runtime.task_definition_specs().len(), 1);

    let (_, spec) = &runtime.service_specs()[0];
    assert_eq!(
        spec.task_definition().clone().await,
        "arn:aws:ecs:task-definition/existing"
    );
}

#[tokio::test]
async fn network_configuration_follows_the_cluster_posture() {
    for (private, public_ip) in [(false, true), (true, false)] {
        let runtime = Recording::default();

        let args = FargateServiceArgs::builder()
            .task_definition_args(FargateTaskDefinitionArgs::builder().container(nginx()).build())
            .build();

        FargateService::create(&runtime, "web", &cluster(private), args).unwrap();

        let (_, spec) = &runtime.service_specs()[0];
        let network = spec.network();

        assert_eq!(network.assign_public_ip(), public_ip);
        assert_eq!(network.security_groups().len(), 1);
        assert_eq!(
            network.security_groups()[0].clone().await,
            "sg-0123456789abcdef0"
        );
        assert_eq!(network.subnets().clone().await, ["subnet-a", "subnet-b"]);
    }
}

#[tokio::test]
async fn create_service_parents_the_service_to_its_task_definition() {
    let runtime = Recording::default();

    let task_definition = FargateTaskDefinition::create(
        &runtime,
        "api",
        &cluster(true),
        FargateTaskDefinitionArgs::builder().container(nginx()).build(),
    )
    .unwrap();

    let service = task_definition
        .create_service(&runtime, "api-svc", FargateServiceArgs::builder().build())
        .unwrap();

    assert_eq!(service.name(), "api-svc");
    assert_eq!(service.id().clone().await, "api-svc-id");

    let (_, spec) = &runtime.service_specs()[0];
    assert_eq!(spec.parent(), Some("api"));
    assert_eq!(spec.desired_count(), 1);
    assert_eq!(
        spec.task_definition().clone().await,
        "arn:aws:ecs:task-definition/api"
    );
}

#[test]
fn runtime_errors_propagate_unchanged() {
    /// Always fails registration.
    struct Failing;

    impl Provisioner for Failing {
        fn task_definition(
            &self,
            _: &str,
            _: TaskDefinitionSpec,
        ) -> gantry_fargate::Result<TaskDefinitionHandle> {
            Err(anyhow::anyhow!("task definition limit exceeded").into())
        }

        fn service(&self, _: &str, _: ServiceSpec) -> gantry_fargate::Result<ServiceHandle> {
            unreachable!()
        }
    }

    let args = FargateTaskDefinitionArgs::builder().container(nginx()).build();
    let err = FargateTaskDefinition::create(&Failing, "web", &cluster(false), args).unwrap_err();

    assert!(matches!(err, Error::Provision(_)));
    assert_eq!(err.to_string(), "task definition limit exceeded");
}
