use std::collections::HashMap;
use std::sync::Mutex;

pub mod sqlite;

pub use sqlite::{AggregatorStats, SqliteAggregator};

use crate::error::Result;
use crate::submission::{CheckContext, MetricSample};

/// Collaborator that receives submitted observations. Implementations
/// own buffering and visibility; thread safety is their obligation.
pub trait Aggregator {
    fn submit_metric(&self, context: Option<&CheckContext>, sample: MetricSample) -> Result<()>;
}

#[derive(Default)]
struct MemoryState {
    submitted: usize,
    latest: HashMap<String, MetricSample>,
}

/// In-process recorder keeping the most recent sample per check.
pub struct MemoryAggregator {
    state: Mutex<MemoryState>,
}

impl MemoryAggregator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Number of observations submitted so far.
    pub fn len(&self) -> usize {
        self.state.lock().expect("lock poisoned").submitted
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn latest_for(&self, check_id: &str) -> Option<MetricSample> {
        self.state
            .lock()
            .expect("lock poisoned")
            .latest
            .get(check_id)
            .cloned()
    }
}

impl Default for MemoryAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for MemoryAggregator {
    fn submit_metric(&self, _context: Option<&CheckContext>, sample: MetricSample) -> Result<()> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.submitted += 1;
        state.latest.insert(sample.check_id.clone(), sample);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::MetricType;

    fn sample(check_id: &str, value: f64) -> MetricSample {
        MetricSample::new(
            check_id.to_string(),
            MetricType::Gauge,
            "name".to_string(),
            value,
            vec![],
            String::new(),
        )
    }

    #[test]
    fn test_latest_wins_per_check() {
        let aggregator = MemoryAggregator::new();

        aggregator.submit_metric(None, sample("a", 1.0)).unwrap();
        aggregator.submit_metric(None, sample("a", 2.0)).unwrap();
        aggregator.submit_metric(None, sample("b", 3.0)).unwrap();

        assert_eq!(aggregator.len(), 3);
        assert_eq!(aggregator.latest_for("a").unwrap().value, 2.0);
        assert_eq!(aggregator.latest_for("b").unwrap().value, 3.0);
        assert!(aggregator.latest_for("c").is_none());
    }
}
