//! The closed set of metrics a CDN distribution reports.

use serde::Deserialize;
use serde::Serialize;

use crate::descriptor::Statistic;
use crate::descriptor::Unit;

/// The default statistic and unit reported for every metric.
///
/// This table drives the generic builder in the crate root; extending the
/// metric set means adding an enumeration value, an entry here, and a
/// convenience function.
const DEFAULTS: &[(MetricName, Statistic, Unit)] = &[
    (MetricName::Requests, Statistic::Sum, Unit::None),
    (MetricName::BytesDownloaded, Statistic::Sum, Unit::None),
    (MetricName::BytesUploaded, Statistic::Sum, Unit::None),
    (MetricName::TotalErrorRate, Statistic::Average, Unit::Percent),
    (MetricName::Error4xxRate, Statistic::Average, Unit::Percent),
    (MetricName::Error5xxRate, Statistic::Average, Unit::Percent),
];

/// One of the metrics reported for a CDN distribution.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricName {
    /// The total number of viewer requests, for all HTTP methods.
    Requests,

    /// The number of bytes served to viewers.
    BytesDownloaded,

    /// The number of bytes uploaded to the origin by viewers.
    BytesUploaded,

    /// The percentage of requests whose response status was 4xx or 5xx.
    TotalErrorRate,

    /// The percentage of requests whose response status was 4xx.
    Error4xxRate,

    /// The percentage of requests whose response status was 5xx.
    Error5xxRate,
}

impl MetricName {
    /// Gets the wire name of the metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requests => "Requests",
            Self::BytesDownloaded => "BytesDownloaded",
            Self::BytesUploaded => "BytesUploaded",
            Self::TotalErrorRate => "TotalErrorRate",
            Self::Error4xxRate => "4xxErrorRate",
            Self::Error5xxRate => "5xxErrorRate",
        }
    }

    /// Gets the default statistic and unit reported for the metric.
    pub fn defaults(&self) -> (Statistic, Unit) {
        DEFAULTS
            .iter()
            .find(|(name, ..)| name == self)
            .map(|&(_, statistic, unit)| (statistic, unit))
            // SAFETY: completeness of the table is tested statically below.
            .unwrap()
    }
}

impl std::fmt::Display for MetricName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_defaults_table_is_complete() {
        for name in [
            MetricName::Requests,
            MetricName::BytesDownloaded,
            MetricName::BytesUploaded,
            MetricName::TotalErrorRate,
            MetricName::Error4xxRate,
            MetricName::Error5xxRate,
        ] {
            let _ = name.defaults();
        }
    }

    #[test]
    fn error_rates_use_their_wire_names() {
        assert_eq!(MetricName::Error4xxRate.as_str(), "4xxErrorRate");
        assert_eq!(MetricName::Error5xxRate.as_str(), "5xxErrorRate");
    }
}
