//! Container resource requests and task sizing.
//!
//! The serverless launch mode only accepts certain (memory, CPU) pairs.
//! [`TaskSize::resolve`] derives the minimal valid pair covering the sum of a
//! task's per-container requests; no caller can observe an invalid pair from
//! this module.

use std::cmp;

use bon::Builder;
use gantry_core::Output;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

/// The platform's memory-to-minimum-CPU compatibility floors.
///
/// Entries are `(memory threshold in MiB, minimum CPU units)` in descending
/// order; the first threshold the computed memory exceeds wins. Memory at or
/// below 2048 MiB carries no floor.
const CPU_FLOORS: &[(u64, u64)] = &[(16384, 4096), (8192, 2048), (4096, 1024), (2048, 512)];

/// The smallest CPU allocation the platform accepts, in CPU units.
const MIN_CPU_UNITS: u64 = 256;

/// The smallest memory allocation the platform accepts, in MiB.
const MIN_MEMORY_MIB: u64 = 512;

/// Resources declared for a single container.
///
/// Every field is optional; a container that declares nothing contributes
/// zero to the task aggregate.
#[derive(Builder, Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
#[builder(builder_type = Builder)]
pub struct ContainerResources {
    /// The hard memory limit, in MiB.
    memory: Option<u64>,

    /// The soft memory reservation, in MiB.
    ///
    /// Takes precedence over `memory` in aggregate sizing when present.
    memory_reservation: Option<u64>,

    /// The requested CPU units (1024 units is one vCPU).
    cpu: Option<u64>,
}

impl ContainerResources {
    /// Gets the hard memory limit, in MiB.
    pub fn memory(&self) -> Option<u64> {
        self.memory
    }

    /// Gets the soft memory reservation, in MiB.
    pub fn memory_reservation(&self) -> Option<u64> {
        self.memory_reservation
    }

    /// Gets the requested CPU units.
    pub fn cpu(&self) -> Option<u64> {
        self.cpu
    }

    /// The memory this container contributes to the task aggregate, in MiB.
    pub fn effective_memory(&self) -> u64 {
        self.memory_reservation.or(self.memory).unwrap_or(0)
    }
}

/// A jointly-valid (memory, CPU) allocation for a whole task.
///
/// Values are string-encoded the way the provisioning API consumes them:
/// memory as a size token (`"0.5GB"`, `"1GB"`, ...) and CPU as a decimal unit
/// count (`"256"`, `"512"`, ...).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TaskSize {
    /// The memory token.
    memory: String,

    /// The CPU unit count.
    cpu: String,
}

impl TaskSize {
    /// Computes the minimal valid task size covering the given requests.
    ///
    /// Memory resolves to `"0.5GB"` when the aggregate is at or below 512
    /// MiB and to the aggregate rounded up to whole gigabytes otherwise. CPU
    /// resolves to the smallest power of two at or above the aggregate (with
    /// a minimum of 256 units), then raised to the floor the resolved memory
    /// requires. CPU is not capped: allocations beyond what the platform
    /// supports pass through and are rejected downstream.
    ///
    /// This is a pure, order-independent fold over the requests; a task with
    /// no containers sizes to the platform minimums.
    pub fn resolve<'a>(requests: impl IntoIterator<Item = &'a ContainerResources>) -> Self {
        let (min_memory, min_cpu) =
            requests
                .into_iter()
                .fold((0u64, 0u64), |(memory, cpu), request| {
                    (
                        memory + request.effective_memory(),
                        cpu + request.cpu.unwrap_or(0),
                    )
                });

        let (memory, memory_mib) = if min_memory <= MIN_MEMORY_MIB {
            (String::from("0.5GB"), MIN_MEMORY_MIB)
        } else {
            let gb = min_memory.div_ceil(1024);
            (format!("{gb}GB"), gb * 1024)
        };

        let mut cpu = cmp::max(min_cpu, MIN_CPU_UNITS).next_power_of_two();

        if let Some(&(_, floor)) = CPU_FLOORS
            .iter()
            .find(|(threshold, _)| memory_mib > *threshold)
        {
            cpu = cmp::max(cpu, floor);
        }

        Self {
            memory,
            cpu: cpu.to_string(),
        }
    }

    /// Lifts [`TaskSize::resolve`] over a container mapping that is still
    /// pending.
    ///
    /// Sizing is deferred until the mapping resolves; this never blocks.
    pub fn resolve_pending(
        containers: &Output<IndexMap<String, ContainerResources>>,
    ) -> Output<TaskSize> {
        containers.map(|containers| Self::resolve(containers.values()))
    }

    /// Gets the memory token.
    pub fn memory(&self) -> &str {
        &self.memory
    }

    /// Gets the CPU unit count.
    pub fn cpu(&self) -> &str {
        &self.cpu
    }
}
