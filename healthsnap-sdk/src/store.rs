//! The health-data store the collector queries.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use healthsnap_types::{Granularity, Quantity, QueryWindow};
use thiserror::Error;

/// Errors a health store can report for a single call.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Health data is not available on this device.
    #[error("health data is unavailable")]
    Unavailable,

    /// The store does not know this metric type.
    #[error("unknown metric type: {0}")]
    UnknownType(String),

    /// The query itself failed.
    #[error("query failed: {0}")]
    Query(String),
}

/// Which statistic a query asks the store to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    /// Total of all samples in the window.
    Sum,
    /// Mean of all samples in the window.
    Average,
}

/// A single statistics query for one quantity type.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsQuery {
    pub identifier: String,
    pub statistic: Statistic,
    /// `None` queries all samples ever recorded.
    pub window: Option<QueryWindow>,
    pub granularity: Granularity,
}

/// Read access to a health-data store.
///
/// Implementations run each call on their own workers; the collector only
/// awaits the returned futures. Calls may arrive concurrently.
#[async_trait]
pub trait HealthStore: Send + Sync + Debug {
    /// Whether health data exists on this device at all.
    fn is_available(&self) -> bool;

    /// Ask for read access to every listed type.
    ///
    /// Returns `Ok(false)` if the user denied access.
    async fn request_authorization(&self, identifiers: &[String]) -> Result<bool, StoreError>;

    /// Compute a statistic, returning `None` when the window has no samples.
    ///
    /// The quantity is in the store's native unit for the type.
    async fn statistics(&self, query: &StatisticsQuery) -> Result<Option<Quantity>, StoreError>;

    /// Count every sample of a type, without a date filter.
    async fn sample_count(&self, identifier: &str) -> Result<u64, StoreError>;
}

#[async_trait]
impl<S: HealthStore + ?Sized> HealthStore for Arc<S> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    async fn request_authorization(&self, identifiers: &[String]) -> Result<bool, StoreError> {
        (**self).request_authorization(identifiers).await
    }

    async fn statistics(&self, query: &StatisticsQuery) -> Result<Option<Quantity>, StoreError> {
        (**self).statistics(query).await
    }

    async fn sample_count(&self, identifier: &str) -> Result<u64, StoreError> {
        (**self).sample_count(identifier).await
    }
}
