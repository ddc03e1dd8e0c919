//! Fully-dimensioned metric descriptors.

use std::time::Duration;

use gantry_core::Output;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

use crate::name::MetricName;

/// A statistic used to aggregate a metric's reported values.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Statistic {
    /// The sum of all values over the period.
    Sum,
    /// The mean of all values over the period.
    Average,
    /// The lowest value over the period.
    Minimum,
    /// The highest value over the period.
    Maximum,
    /// The number of samples over the period.
    SampleCount,
}

impl Statistic {
    /// Gets the wire name of the statistic.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "Sum",
            Self::Average => "Average",
            Self::Minimum => "Minimum",
            Self::Maximum => "Maximum",
            Self::SampleCount => "SampleCount",
        }
    }
}

/// The unit a metric's values are reported in.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Unit {
    /// A dimensionless value.
    None,
    /// A count of events.
    Count,
    /// A size in bytes.
    Bytes,
    /// A percentage between 0 and 100.
    Percent,
    /// A duration in seconds.
    Seconds,
}

impl Unit {
    /// Gets the wire name of the unit.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Count => "Count",
            Self::Bytes => "Bytes",
            Self::Percent => "Percent",
            Self::Seconds => "Seconds",
        }
    }
}

/// A fully-dimensioned metric descriptor.
///
/// Descriptors are constructed once by the builders in the crate root and
/// never mutated; registering one against the external metrics API is the
/// caller's responsibility.
#[derive(Clone, Debug)]
pub struct MetricDescriptor {
    /// The namespace the metric is reported under.
    namespace: &'static str,

    /// The metric name.
    name: MetricName,

    /// The statistic used to aggregate the metric.
    statistic: Statistic,

    /// The unit the metric is reported in.
    unit: Unit,

    /// The aggregation period, if one was requested.
    period: Option<Duration>,

    /// The dimensions the metric is filtered on.
    ///
    /// Only dimensions a value was supplied for are present; values may still
    /// be pending.
    dimensions: IndexMap<&'static str, Output<String>>,
}

impl MetricDescriptor {
    /// Creates a new descriptor.
    pub(crate) fn new(
        namespace: &'static str,
        name: MetricName,
        statistic: Statistic,
        unit: Unit,
        period: Option<Duration>,
        dimensions: IndexMap<&'static str, Output<String>>,
    ) -> Self {
        Self {
            namespace,
            name,
            statistic,
            unit,
            period,
            dimensions,
        }
    }

    /// Gets the namespace the metric is reported under.
    pub fn namespace(&self) -> &str {
        self.namespace
    }

    /// Gets the metric name.
    pub fn name(&self) -> MetricName {
        self.name
    }

    /// Gets the statistic used to aggregate the metric.
    pub fn statistic(&self) -> Statistic {
        self.statistic
    }

    /// Gets the unit the metric is reported in.
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Gets the aggregation period, if one was requested.
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Gets the dimensions the metric is filtered on.
    pub fn dimensions(&self) -> &IndexMap<&'static str, Output<String>> {
        &self.dimensions
    }
}
