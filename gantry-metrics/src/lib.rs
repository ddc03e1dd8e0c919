//! Metric descriptors for CDN distributions.
//!
//! Each metric in the closed set carries a default statistic/unit pair; the
//! builders here apply caller-supplied overrides on top of those defaults and
//! compose the filtering dimensions that were actually supplied. Building a
//! descriptor is a total function with no side effects.

use std::time::Duration;

use bon::Builder;
use gantry_core::Distribution;
use gantry_core::Output;
use indexmap::IndexMap;

pub mod descriptor;
pub mod name;

pub use descriptor::MetricDescriptor;
pub use descriptor::Statistic;
pub use descriptor::Unit;
pub use name::MetricName;

/// The namespace the CDN reports its metrics under.
pub const NAMESPACE: &str = "AWS/CloudFront";

/// The dimension naming a single distribution.
const DISTRIBUTION_ID_DIMENSION: &str = "DistributionId";

/// The dimension naming a single edge region.
const REGION_DIMENSION: &str = "Region";

/// Overrides applied on top of a metric's defaults.
///
/// Every field is optional; an empty change produces a descriptor with the
/// metric's default statistic and unit and no dimensions.
#[derive(Builder, Clone, Debug, Default)]
#[builder(builder_type = Builder)]
pub struct MetricChange {
    /// Filters the metric to a single distribution.
    ///
    /// Sets the `DistributionId` dimension to the distribution's identifier,
    /// which may still be pending.
    #[builder(into)]
    distribution: Option<Distribution>,

    /// Filters the metric to a single edge region.
    ///
    /// Sets the `Region` dimension.
    #[builder(into)]
    region: Option<String>,

    /// Overrides the metric's default statistic.
    statistic: Option<Statistic>,

    /// Overrides the metric's default unit.
    unit: Option<Unit>,

    /// The aggregation period.
    period: Option<Duration>,
}

/// Builds a descriptor for one of the CDN metrics.
///
/// Caller-supplied overrides take precedence over the per-metric defaults.
/// Dimensions are present only when a value was supplied for them.
pub fn metric(name: MetricName, change: impl Into<Option<MetricChange>>) -> MetricDescriptor {
    let change = change.into().unwrap_or_default();
    let (statistic, unit) = name.defaults();

    let mut dimensions = IndexMap::new();

    if let Some(distribution) = change.distribution {
        dimensions.insert(DISTRIBUTION_ID_DIMENSION, distribution.id().clone());
    }

    if let Some(region) = change.region {
        dimensions.insert(REGION_DIMENSION, Output::value(region));
    }

    MetricDescriptor::new(
        NAMESPACE,
        name,
        change.statistic.unwrap_or(statistic),
        change.unit.unwrap_or(unit),
        change.period,
        dimensions,
    )
}

/// Builds a descriptor for the total viewer request count.
pub fn requests(change: impl Into<Option<MetricChange>>) -> MetricDescriptor {
    metric(MetricName::Requests, change)
}

/// Builds a descriptor for the number of bytes served to viewers.
pub fn bytes_downloaded(change: impl Into<Option<MetricChange>>) -> MetricDescriptor {
    metric(MetricName::BytesDownloaded, change)
}

/// Builds a descriptor for the number of bytes uploaded to the origin.
pub fn bytes_uploaded(change: impl Into<Option<MetricChange>>) -> MetricDescriptor {
    metric(MetricName::BytesUploaded, change)
}

/// Builds a descriptor for the percentage of 4xx and 5xx responses.
pub fn total_error_rate(change: impl Into<Option<MetricChange>>) -> MetricDescriptor {
    metric(MetricName::TotalErrorRate, change)
}

/// Builds a descriptor for the percentage of 4xx responses.
pub fn error_rate_4xx(change: impl Into<Option<MetricChange>>) -> MetricDescriptor {
    metric(MetricName::Error4xxRate, change)
}

/// Builds a descriptor for the percentage of 5xx responses.
pub fn error_rate_5xx(change: impl Into<Option<MetricChange>>) -> MetricDescriptor {
    metric(MetricName::Error5xxRate, change)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_defaults_to_sum_of_dimensionless_values() {
        let descriptor = requests(None);

        assert_eq!(descriptor.namespace(), "AWS/CloudFront");
        assert_eq!(descriptor.name(), MetricName::Requests);
        assert_eq!(descriptor.statistic(), Statistic::Sum);
        assert_eq!(descriptor.unit(), Unit::None);
        assert_eq!(descriptor.period(), None);
        assert!(descriptor.dimensions().is_empty());
    }

    #[test]
    fn error_rates_default_to_average_percent() {
        for descriptor in [
            total_error_rate(None),
            error_rate_4xx(None),
            error_rate_5xx(None),
        ] {
            assert_eq!(descriptor.statistic(), Statistic::Average);
            assert_eq!(descriptor.unit(), Unit::Percent);
        }
    }

    #[test]
    fn overrides_take_precedence_over_defaults() {
        let descriptor = requests(
            MetricChange::builder()
                .statistic(Statistic::SampleCount)
                .unit(Unit::Count)
                .period(Duration::from_secs(300))
                .build(),
        );

        assert_eq!(descriptor.statistic(), Statistic::SampleCount);
        assert_eq!(descriptor.unit(), Unit::Count);
        assert_eq!(descriptor.period(), Some(Duration::from_secs(300)));
    }

    #[tokio::test]
    async fn supplied_filters_become_dimensions() {
        let distribution = Distribution::builder().id("E2EXAMPLE").build();
        let descriptor = requests(
            MetricChange::builder()
                .distribution(distribution)
                .region("us-east-1")
                .build(),
        );

        // Statistic and unit stay defaulted when only filters are supplied.
        assert_eq!(descriptor.statistic(), Statistic::Sum);
        assert_eq!(descriptor.unit(), Unit::None);

        let dimensions = descriptor.dimensions();
        assert_eq!(dimensions.len(), 2);
        assert_eq!(dimensions["DistributionId"].clone().await, "E2EXAMPLE");
        assert_eq!(dimensions["Region"].clone().await, "us-east-1");
    }

    #[test]
    fn unsupplied_filters_leave_no_dimension_behind() {
        let descriptor = bytes_downloaded(MetricChange::builder().region("eu-west-1").build());

        assert_eq!(descriptor.dimensions().len(), 1);
        assert!(descriptor.dimensions().contains_key("Region"));
        assert!(!descriptor.dimensions().contains_key("DistributionId"));
    }
}
