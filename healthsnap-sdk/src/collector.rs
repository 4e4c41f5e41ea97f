//! The collector - one query per catalog metric, joined into a snapshot.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use healthsnap_types::{
    current_timestamp_ms, normalize, Catalog, CatalogSettings, MetricDescriptor, MetricKind,
    NormalizedRecord, Reading, Snapshot,
};
use tracing::{debug, info, warn};

use crate::output::Output;
use crate::state::{CollectorState, Phase, Published};
use crate::store::{HealthStore, Statistic, StatisticsQuery, StoreError};

/// Default bound on a single metric query.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds snapshots by querying a [`HealthStore`] once per catalog metric.
///
/// # Example
///
/// ```rust
/// use healthsnap_sdk::{Collector, MemoryStore};
/// use healthsnap_types::Unit;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let store = MemoryStore::new().sample(
///     "HKQuantityTypeIdentifierHeartRate",
///     64.0,
///     Unit::CountPerMinute,
///     healthsnap_types::current_timestamp_ms() - 1_000,
/// );
/// let collector = Collector::builder(store).build();
///
/// if collector.request_authorization().await {
///     let snapshot = collector.fetch_snapshot().await;
///     assert_eq!(snapshot.get("HKQuantityTypeIdentifierHeartRate"), Some("64.00"));
/// }
/// # });
/// ```
#[derive(Debug)]
pub struct Collector {
    catalog: Arc<Catalog>,
    store: Arc<dyn HealthStore>,
    outputs: Arc<Vec<Output>>,
    query_timeout: Duration,
    state: CollectorState,
}

impl Collector {
    /// Create a builder around a health store.
    pub fn builder(store: impl HealthStore + 'static) -> CollectorBuilder {
        CollectorBuilder::new(Arc::new(store))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Whether the last authorization request was granted.
    pub fn is_authorized(&self) -> bool {
        self.state.authorized()
    }

    /// The result of the last completed fetch, if still current.
    pub fn latest(&self) -> Option<Arc<Published>> {
        self.state.latest()
    }

    /// Request read access to every catalog type.
    ///
    /// Fails closed: an unavailable store, a denial, or a store error all
    /// yield `false`.
    pub async fn request_authorization(&self) -> bool {
        self.state.begin_authorization();

        let granted = if !self.store.is_available() {
            warn!("health data unavailable on this device");
            false
        } else {
            let identifiers: Vec<String> = self.catalog.identifiers().map(String::from).collect();
            match self.store.request_authorization(&identifiers).await {
                Ok(granted) => granted,
                Err(err) => {
                    warn!(error = %err, "authorization request failed");
                    false
                }
            }
        };

        info!(granted, "health data authorization");
        self.state.finish_authorization(granted);
        granted
    }

    /// Query every catalog metric and publish the resulting snapshot.
    ///
    /// All queries run concurrently and the call returns once every one of
    /// them has produced a reading. A failing, empty, or timed-out query only
    /// affects its own entry, so the snapshot always holds exactly one entry
    /// per catalog metric.
    pub async fn fetch_snapshot(&self) -> Snapshot {
        self.state.begin_fetch();

        let end_ms = current_timestamp_ms();
        let readings = join_all(self.catalog.iter().map(|d| self.query(d, end_ms))).await;

        let snapshot = readings
            .into_iter()
            .fold(Snapshot::builder(), |builder, (identifier, reading)| {
                builder.reading(identifier, reading)
            })
            .timestamp_ms(current_timestamp_ms())
            .build();

        let with_data = snapshot.iter().filter(|(_, text)| has_value(text)).count();
        info!(
            metrics = snapshot.len(),
            with_data,
            "health snapshot collected"
        );

        let record = normalize(&snapshot, &self.catalog);
        let published = self.state.publish(snapshot, record);

        for output in self.outputs.iter() {
            if let Err(err) = output.emit(&published).await {
                warn!(error = %err, "failed to emit snapshot");
            }
        }

        published.snapshot.clone()
    }

    /// Derive the nested record from a snapshot using this collector's catalog.
    pub fn normalize(&self, snapshot: &Snapshot) -> NormalizedRecord {
        normalize(snapshot, &self.catalog)
    }

    /// Authorize, then fetch. Returns `None` if access was not granted.
    pub async fn sync(&self) -> Option<Arc<Published>> {
        if !self.request_authorization().await {
            return None;
        }
        self.fetch_snapshot().await;
        self.latest()
    }

    async fn query(&self, descriptor: &MetricDescriptor, end_ms: u64) -> (String, Reading) {
        let outcome = tokio::time::timeout(self.query_timeout, self.run_query(descriptor, end_ms)).await;

        let reading = match outcome {
            Ok(Ok(reading)) => reading,
            Ok(Err(err)) => {
                warn!(metric = %descriptor.identifier, error = %err, "health query failed");
                Reading::NoData
            }
            Err(_) => {
                warn!(
                    metric = %descriptor.identifier,
                    timeout_ms = self.query_timeout.as_millis() as u64,
                    "health query timed out"
                );
                Reading::NoData
            }
        };

        debug!(metric = %descriptor.identifier, %reading, "health query complete");
        (descriptor.identifier.clone(), reading)
    }

    async fn run_query(&self, descriptor: &MetricDescriptor, end_ms: u64) -> Result<Reading, StoreError> {
        let statistic = match descriptor.kind {
            MetricKind::Cumulative(_) => Statistic::Sum,
            MetricKind::DiscreteAverage(_) => Statistic::Average,
            MetricKind::SampleCount => {
                let count = self.store.sample_count(&descriptor.identifier).await?;
                return Ok(Reading::Count(count));
            }
        };

        let query = StatisticsQuery {
            identifier: descriptor.identifier.clone(),
            statistic,
            window: descriptor.window_ending(end_ms),
            granularity: self.catalog.granularity(),
        };
        let quantity = self.store.statistics(&query).await?;
        Ok(Reading::from_statistics(descriptor, quantity))
    }
}

fn has_value(text: &str) -> bool {
    text != healthsnap_types::NO_DATA && text != healthsnap_types::INCOMPATIBLE_UNIT
}

/// Builder for configuring a [`Collector`].
#[derive(Debug)]
pub struct CollectorBuilder {
    store: Arc<dyn HealthStore>,
    catalog: Option<Arc<Catalog>>,
    outputs: Vec<Output>,
    query_timeout: Option<Duration>,
}

impl CollectorBuilder {
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self {
            store,
            catalog: None,
            outputs: Vec::new(),
            query_timeout: None,
        }
    }

    /// Use a specific catalog (default: the standard catalog with default settings).
    pub fn catalog(mut self, catalog: impl Into<Arc<Catalog>>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Add an output destination. Every published result goes to all of them.
    pub fn output(mut self, output: Output) -> Self {
        self.outputs.push(output);
        self
    }

    /// Bound on each individual metric query (default: 10 seconds).
    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Collector {
        Collector {
            catalog: self
                .catalog
                .unwrap_or_else(|| Arc::new(Catalog::standard(CatalogSettings::default()))),
            store: self.store,
            outputs: Arc::new(self.outputs),
            query_timeout: self.query_timeout.unwrap_or(DEFAULT_QUERY_TIMEOUT),
            state: CollectorState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use healthsnap_types::{Unit, DAY_MS, ECG_IDENTIFIER, INCOMPATIBLE_UNIT, NO_DATA};

    use super::*;
    use crate::MemoryStore;

    const STEPS: &str = "HKQuantityTypeIdentifierStepCount";
    const HEART_RATE: &str = "HKQuantityTypeIdentifierHeartRate";
    const BODY_MASS: &str = "HKQuantityTypeIdentifierBodyMass";

    fn recently() -> u64 {
        current_timestamp_ms() - DAY_MS
    }

    #[tokio::test]
    async fn step_count_example() {
        let store = MemoryStore::new()
            .sample(STEPS, 4000.0, Unit::Count, recently())
            .sample(STEPS, 5000.0, Unit::Count, recently());
        let collector = Collector::builder(store).build();

        let snapshot = collector.fetch_snapshot().await;
        assert_eq!(snapshot.get(STEPS), Some("9000.00 (avg: 300.00)"));

        let record = collector.normalize(&snapshot);
        assert_eq!(record.activity.unwrap().step_count, Some(300.0));
    }

    #[tokio::test]
    async fn heart_rate_without_samples_is_no_data() {
        let collector = Collector::builder(MemoryStore::new()).build();

        let snapshot = collector.fetch_snapshot().await;
        assert_eq!(snapshot.get(HEART_RATE), Some(NO_DATA));
        assert_eq!(collector.normalize(&snapshot).heart.unwrap().heart_rate, None);
    }

    #[tokio::test]
    async fn ecg_counts_all_samples() {
        let store = MemoryStore::new().recorded_samples(ECG_IDENTIFIER, 3);
        let collector = Collector::builder(store).build();

        let snapshot = collector.fetch_snapshot().await;
        assert_eq!(snapshot.get(ECG_IDENTIFIER), Some("3"));
    }

    #[tokio::test]
    async fn old_samples_fall_outside_window() {
        let store = MemoryStore::new()
            .sample(HEART_RATE, 60.0, Unit::CountPerMinute, recently())
            .sample(HEART_RATE, 200.0, Unit::CountPerMinute, current_timestamp_ms() - 40 * DAY_MS);
        let collector = Collector::builder(store).build();

        let snapshot = collector.fetch_snapshot().await;
        assert_eq!(snapshot.get(HEART_RATE), Some("60.00"));
    }

    #[tokio::test]
    async fn one_entry_per_metric_regardless_of_outcome() {
        let store = MemoryStore::new()
            .sample(STEPS, 100.0, Unit::Count, recently())
            .sample(BODY_MASS, 1.8, Unit::Meter, recently())
            .fail(HEART_RATE);
        let collector = Collector::builder(store).build();

        let snapshot = collector.fetch_snapshot().await;
        assert!(snapshot.covers(collector.catalog()));
        assert_eq!(snapshot.get(BODY_MASS), Some(INCOMPATIBLE_UNIT));
        assert_eq!(snapshot.get(HEART_RATE), Some(NO_DATA));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_query_times_out_without_blocking_batch() {
        let store = MemoryStore::new()
            .sample(STEPS, 300.0, Unit::Count, recently())
            .stall(HEART_RATE);
        let collector = Collector::builder(store)
            .query_timeout(Duration::from_secs(2))
            .build();

        let snapshot = collector.fetch_snapshot().await;
        assert!(snapshot.covers(collector.catalog()));
        assert_eq!(snapshot.get(HEART_RATE), Some(NO_DATA));
        assert_eq!(snapshot.get(STEPS), Some("300.00 (avg: 10.00)"));
    }

    #[tokio::test]
    async fn authorization_fails_closed() {
        let denied = Collector::builder(MemoryStore::new().denying()).build();
        assert!(!denied.request_authorization().await);
        assert_eq!(denied.phase(), Phase::Idle);
        assert!(!denied.is_authorized());

        let unavailable = Collector::builder(MemoryStore::new().unavailable()).build();
        assert!(!unavailable.request_authorization().await);

        let granted = Collector::builder(MemoryStore::new()).build();
        assert!(granted.request_authorization().await);
        assert!(granted.is_authorized());
    }

    #[tokio::test]
    async fn sync_publishes_snapshot_and_record() {
        let store = MemoryStore::new().sample(STEPS, 600.0, Unit::Count, recently());
        let collector = Collector::builder(store).build();
        assert_eq!(collector.phase(), Phase::Idle);

        let published = collector.sync().await.unwrap();
        assert_eq!(collector.phase(), Phase::Ready);
        assert_eq!(published.record.activity.as_ref().unwrap().step_count, Some(20.0));
        assert_eq!(published.record, collector.normalize(&published.snapshot));
    }

    #[tokio::test]
    async fn sync_stops_on_denial() {
        let collector = Collector::builder(MemoryStore::new().denying()).build();
        assert!(collector.sync().await.is_none());
        assert!(collector.latest().is_none());
    }

    #[tokio::test]
    async fn each_fetch_replaces_the_previous() {
        let collector = Collector::builder(MemoryStore::new()).build();

        collector.fetch_snapshot().await;
        let first = collector.latest().unwrap();
        collector.fetch_snapshot().await;
        let second = collector.latest().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn custom_lookback_changes_average() {
        let catalog = Catalog::standard(CatalogSettings {
            lookback_days: 10,
            ..Default::default()
        });
        let store = MemoryStore::new().sample(STEPS, 1000.0, Unit::Count, recently());
        let collector = Collector::builder(store).catalog(catalog).build();

        let snapshot = collector.fetch_snapshot().await;
        assert_eq!(snapshot.get(STEPS), Some("1000.00 (avg: 100.00)"));
    }

    #[tokio::test]
    async fn outputs_receive_published_snapshot() {
        let (output, mut rx) = Output::channel(1);
        let collector = Collector::builder(MemoryStore::new())
            .output(output)
            .build();

        let snapshot = collector.fetch_snapshot().await;
        assert_eq!(rx.recv().await.unwrap(), snapshot);
    }

    #[test]
    fn builder_defaults() {
        let collector = Collector::builder(MemoryStore::new()).build();
        assert_eq!(collector.query_timeout(), DEFAULT_QUERY_TIMEOUT);
        assert_eq!(
            collector.catalog(),
            &Catalog::standard(CatalogSettings::default())
        );
        assert!(collector.outputs.is_empty());
    }
}
