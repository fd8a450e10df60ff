use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::MimirError;

/// Metric kinds recognized by the aggregation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Gauge,
    Rate,
    Count,
    MonotonicCount,
    Counter,
    Histogram,
    Historate,
}

impl MetricType {
    pub const ALL: [MetricType; 7] = [
        MetricType::Gauge,
        MetricType::Rate,
        MetricType::Count,
        MetricType::MonotonicCount,
        MetricType::Counter,
        MetricType::Histogram,
        MetricType::Historate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricType::Gauge => "gauge",
            MetricType::Rate => "rate",
            MetricType::Count => "count",
            MetricType::MonotonicCount => "monotonic_count",
            MetricType::Counter => "counter",
            MetricType::Histogram => "histogram",
            MetricType::Historate => "historate",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = MimirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gauge" => Ok(MetricType::Gauge),
            "rate" => Ok(MetricType::Rate),
            "count" => Ok(MetricType::Count),
            "monotonic_count" => Ok(MetricType::MonotonicCount),
            "counter" => Ok(MetricType::Counter),
            "histogram" => Ok(MetricType::Histogram),
            "historate" => Ok(MetricType::Historate),
            _ => Err(MimirError::InvalidMetricType(s.to_string())),
        }
    }
}

/// One metric observation submitted for aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSample {
    pub check_id: String,
    pub metric_type: MetricType,
    pub name: String,
    pub value: f64,
    pub tags: Vec<String>,
    /// Empty means "unspecified, infer at aggregation time".
    pub hostname: String,
    pub timestamp: DateTime<Utc>,
}

impl MetricSample {
    pub fn new(
        check_id: String,
        metric_type: MetricType,
        name: String,
        value: f64,
        tags: Vec<String>,
        hostname: String,
    ) -> Self {
        Self {
            check_id,
            metric_type,
            name,
            value,
            tags,
            hostname,
            timestamp: Utc::now(),
        }
    }
}

/// Opaque caller-supplied handle forwarded to the backend untouched.
/// The caller retains ownership; backends may record it but never
/// interpret it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckContext {
    pub metadata: HashMap<String, String>,
}
