//! An in-memory health store, loadable from a JSON fixture.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use healthsnap_types::{Quantity, Unit};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::{HealthStore, Statistic, StatisticsQuery, StoreError};

/// One recorded quantity sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub value: f64,
    pub unit: Unit,
    pub timestamp_ms: u64,
}

/// A [`HealthStore`] backed by samples held in memory.
///
/// Useful for tests and for running the pipeline without a device. A fixture
/// file looks like:
///
/// ```json
/// {
///   "available": true,
///   "grant": true,
///   "samples": {
///     "HKQuantityTypeIdentifierStepCount": [
///       { "value": 9000.0, "unit": "count", "timestamp_ms": 1715000000000 }
///     ]
///   },
///   "sample_counts": { "Electrocardiogram (ECG)": 3 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStore {
    pub available: bool,
    pub grant: bool,
    pub samples: BTreeMap<String, Vec<Sample>>,
    pub sample_counts: BTreeMap<String, u64>,
    /// Types whose queries never complete.
    #[serde(skip)]
    pub stalled: BTreeSet<String>,
    /// Types whose queries fail.
    #[serde(skip)]
    pub failing: BTreeSet<String>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            available: true,
            grant: true,
            samples: BTreeMap::new(),
            sample_counts: BTreeMap::new(),
            stalled: BTreeSet::new(),
            failing: BTreeSet::new(),
        }
    }
}

impl MemoryStore {
    /// An available store that grants access and holds no samples.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON fixture.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Add a sample.
    pub fn sample(mut self, identifier: impl Into<String>, value: f64, unit: Unit, timestamp_ms: u64) -> Self {
        self.samples.entry(identifier.into()).or_default().push(Sample {
            value,
            unit,
            timestamp_ms,
        });
        self
    }

    /// Set the number of recorded samples for a count-only type.
    pub fn recorded_samples(mut self, identifier: impl Into<String>, count: u64) -> Self {
        self.sample_counts.insert(identifier.into(), count);
        self
    }

    /// Report health data as unavailable on this device.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Deny every authorization request.
    pub fn denying(mut self) -> Self {
        self.grant = false;
        self
    }

    /// Make queries for `identifier` hang forever.
    pub fn stall(mut self, identifier: impl Into<String>) -> Self {
        self.stalled.insert(identifier.into());
        self
    }

    /// Make queries for `identifier` fail.
    pub fn fail(mut self, identifier: impl Into<String>) -> Self {
        self.failing.insert(identifier.into());
        self
    }

    async fn check(&self, identifier: &str) -> Result<(), StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable);
        }
        if self.stalled.contains(identifier) {
            std::future::pending::<()>().await;
        }
        if self.failing.contains(identifier) {
            return Err(StoreError::Query(format!("{identifier} is failing")));
        }
        Ok(())
    }
}

#[async_trait]
impl HealthStore for MemoryStore {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn request_authorization(&self, _identifiers: &[String]) -> Result<bool, StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable);
        }
        Ok(self.grant)
    }

    async fn statistics(&self, query: &StatisticsQuery) -> Result<Option<Quantity>, StoreError> {
        self.check(&query.identifier).await?;

        let Some(samples) = self.samples.get(&query.identifier) else {
            return Ok(None);
        };

        let in_window: Vec<&Sample> = samples
            .iter()
            .filter(|s| query.window.map_or(true, |w| w.contains(s.timestamp_ms)))
            .collect();

        // The first sample's unit stands in for the type's native unit.
        let Some(native) = in_window.first().map(|s| s.unit) else {
            return Ok(None);
        };

        let mut total = 0.0;
        let mut count = 0usize;
        for sample in in_window {
            match Quantity::new(sample.value, sample.unit).value_in(native) {
                Some(value) => {
                    total += value;
                    count += 1;
                }
                None => warn!(
                    metric = %query.identifier,
                    unit = %sample.unit,
                    "skipping sample with mismatched unit"
                ),
            }
        }

        let value = match query.statistic {
            Statistic::Sum => total,
            Statistic::Average => total / count as f64,
        };
        Ok(Some(Quantity::new(value, native)))
    }

    async fn sample_count(&self, identifier: &str) -> Result<u64, StoreError> {
        self.check(identifier).await?;
        Ok(self.sample_counts.get(identifier).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use healthsnap_types::{Granularity, QueryWindow, ECG_IDENTIFIER};

    use super::*;

    const STEPS: &str = "HKQuantityTypeIdentifierStepCount";

    fn query(statistic: Statistic, window: Option<QueryWindow>) -> StatisticsQuery {
        StatisticsQuery {
            identifier: STEPS.to_string(),
            statistic,
            window,
            granularity: Granularity::Day,
        }
    }

    #[tokio::test]
    async fn sums_and_averages_samples_in_window() {
        let store = MemoryStore::new()
            .sample(STEPS, 1000.0, Unit::Count, 10)
            .sample(STEPS, 3000.0, Unit::Count, 20)
            .sample(STEPS, 5000.0, Unit::Count, 99);
        let window = Some(QueryWindow {
            start_ms: 10,
            end_ms: 50,
        });

        let sum = store.statistics(&query(Statistic::Sum, window)).await.unwrap();
        assert_eq!(sum, Some(Quantity::new(4000.0, Unit::Count)));

        let avg = store
            .statistics(&query(Statistic::Average, window))
            .await
            .unwrap();
        assert_eq!(avg, Some(Quantity::new(2000.0, Unit::Count)));

        let all = store.statistics(&query(Statistic::Sum, None)).await.unwrap();
        assert_eq!(all, Some(Quantity::new(9000.0, Unit::Count)));
    }

    #[tokio::test]
    async fn empty_window_has_no_data() {
        let store = MemoryStore::new().sample(STEPS, 1000.0, Unit::Count, 5);
        let window = Some(QueryWindow {
            start_ms: 10,
            end_ms: 50,
        });
        assert_eq!(store.statistics(&query(Statistic::Sum, window)).await.unwrap(), None);

        let empty = MemoryStore::new();
        assert_eq!(empty.statistics(&query(Statistic::Sum, None)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn converts_samples_to_first_unit() {
        let store = MemoryStore::new()
            .sample("distance", 1.0, Unit::Kilometer, 1)
            .sample("distance", 500.0, Unit::Meter, 2)
            .sample("distance", 3.0, Unit::Kilogram, 3);
        let mut q = query(Statistic::Sum, None);
        q.identifier = "distance".into();

        let sum = store.statistics(&q).await.unwrap().unwrap();
        assert_eq!(sum.unit, Unit::Kilometer);
        assert!((sum.value - 1.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn authorization_follows_flags() {
        assert!(MemoryStore::new().request_authorization(&[]).await.unwrap());
        assert!(!MemoryStore::new().denying().request_authorization(&[]).await.unwrap());
        assert!(matches!(
            MemoryStore::new().unavailable().request_authorization(&[]).await,
            Err(StoreError::Unavailable)
        ));
    }

    #[tokio::test]
    async fn sample_count_defaults_to_zero() {
        let store = MemoryStore::new().recorded_samples(ECG_IDENTIFIER, 3);
        assert_eq!(store.sample_count(ECG_IDENTIFIER).await.unwrap(), 3);
        assert_eq!(store.sample_count("other").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failing_type_reports_error() {
        let store = MemoryStore::new().fail(STEPS);
        assert!(matches!(
            store.statistics(&query(Statistic::Sum, None)).await,
            Err(StoreError::Query(_))
        ));
    }

    #[test]
    fn parses_fixture() {
        let json = r#"{
            "samples": {
                "HKQuantityTypeIdentifierStepCount": [
                    { "value": 9000.0, "unit": "count", "timestamp_ms": 1715000000000 }
                ]
            },
            "sample_counts": { "Electrocardiogram (ECG)": 3 }
        }"#;

        let store = MemoryStore::from_json(json).unwrap();
        assert!(store.available);
        assert!(store.grant);
        assert_eq!(store.samples[STEPS][0].unit, Unit::Count);
        assert_eq!(store.sample_counts[ECG_IDENTIFIER], 3);
    }
}
