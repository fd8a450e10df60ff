pub mod types;

pub use types::{CheckContext, MetricSample, MetricType};

use tracing::{debug, warn};

use crate::aggregator::Aggregator;
use crate::error::{MimirError, Result};

/// Client facade for recording metric observations. Validates at the
/// boundary and hands accepted samples to the injected aggregator.
pub struct MetricSubmitter<A: Aggregator> {
    aggregator: A,
}

impl<A: Aggregator> MetricSubmitter<A> {
    pub fn new(aggregator: A) -> Self {
        Self { aggregator }
    }

    pub fn aggregator(&self) -> &A {
        &self.aggregator
    }

    /// Record a single metric observation. Success is signaled by
    /// returning normally; when or whether the observation becomes
    /// externally visible is up to the aggregator.
    pub fn submit_metric(
        &self,
        context: Option<&CheckContext>,
        check_id: &str,
        metric_type: MetricType,
        name: &str,
        value: f64,
        tags: Vec<String>,
        hostname: &str,
    ) -> Result<()> {
        let sample = MetricSample::new(
            check_id.to_string(),
            metric_type,
            name.to_string(),
            value,
            tags,
            hostname.to_string(),
        );
        self.submit(context, sample)
    }

    /// Same contract for a pre-built sample.
    pub fn submit(&self, context: Option<&CheckContext>, sample: MetricSample) -> Result<()> {
        if sample.name.is_empty() {
            warn!(check_id = %sample.check_id, "rejected metric with empty name");
            return Err(MimirError::InvalidArgument("metric name must not be empty"));
        }

        debug!(
            check_id = %sample.check_id,
            metric_type = %sample.metric_type,
            name = %sample.name,
            "submitting metric"
        );

        self.aggregator.submit_metric(context, sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::MemoryAggregator;

    fn submitter() -> MetricSubmitter<MemoryAggregator> {
        MetricSubmitter::new(MemoryAggregator::new())
    }

    #[test]
    fn test_submit_records_latest_for_check() {
        let submitter = submitter();

        submitter
            .submit_metric(
                None,
                "id",
                MetricType::Gauge,
                "name",
                -99.0,
                vec!["foo".to_string(), "bar".to_string()],
                "myhost",
            )
            .unwrap();

        let sample = submitter.aggregator().latest_for("id").unwrap();
        assert_eq!(sample.name, "name");
        assert_eq!(sample.value, -99.0);
        assert_eq!(sample.tags, vec!["foo", "bar"]);
        assert_eq!(sample.hostname, "myhost");
        assert_eq!(sample.metric_type, MetricType::Gauge);
    }

    #[test]
    fn test_all_types_accepted() {
        let submitter = submitter();

        for (i, metric_type) in MetricType::ALL.into_iter().enumerate() {
            submitter
                .submit_metric(None, "id", metric_type, "name", i as f64, vec![], "")
                .unwrap();
        }

        assert_eq!(submitter.aggregator().len(), MetricType::ALL.len());
    }

    #[test]
    fn test_extreme_values_accepted() {
        let submitter = submitter();

        for value in [0.0, -99.0, f64::MAX, f64::MIN] {
            submitter
                .submit_metric(None, "id", MetricType::Gauge, "name", value, vec![], "")
                .unwrap();
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        let submitter = submitter();

        let err = submitter
            .submit_metric(None, "id", MetricType::Gauge, "", 1.0, vec![], "")
            .unwrap_err();

        assert!(matches!(err, MimirError::InvalidArgument(_)));
        assert!(submitter.aggregator().is_empty());
    }

    #[test]
    fn test_context_and_hostname_optional() {
        let submitter = submitter();
        let context = CheckContext::default();

        submitter
            .submit_metric(
                Some(&context),
                "id",
                MetricType::Counter,
                "name",
                1.0,
                vec![],
                "",
            )
            .unwrap();
        submitter
            .submit_metric(None, "id", MetricType::Counter, "name", 2.0, vec![], "")
            .unwrap();

        let sample = submitter.aggregator().latest_for("id").unwrap();
        assert_eq!(sample.value, 2.0);
        assert!(sample.hostname.is_empty());
    }

    #[test]
    fn test_duplicate_tags_preserved_in_order() {
        let submitter = submitter();

        submitter
            .submit_metric(
                None,
                "id",
                MetricType::Histogram,
                "name",
                1.0,
                vec![
                    "env:dev".to_string(),
                    "env:dev".to_string(),
                    "bare".to_string(),
                ],
                "",
            )
            .unwrap();

        let sample = submitter.aggregator().latest_for("id").unwrap();
        assert_eq!(sample.tags, vec!["env:dev", "env:dev", "bare"]);
    }
}
