//! Snapshot - the flat result of one fetch cycle.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use crate::{Catalog, Reading, SCHEMA_VERSION};

/// Schema version embedded in serialized snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
}

impl SchemaVersion {
    pub const fn current() -> Self {
        Self {
            major: SCHEMA_VERSION,
            minor: 0,
        }
    }

    /// Minor differences are compatible; major ones are not.
    pub fn is_compatible(&self) -> bool {
        self.major == SCHEMA_VERSION
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::current()
    }
}

/// A point-in-time view of every catalog metric.
///
/// Maps each metric identifier to its rendered display string. A snapshot is
/// built fresh on every fetch and is never merged with an earlier one.
///
/// # Example
///
/// ```rust
/// use healthsnap_types::{Reading, Snapshot};
///
/// let snapshot = Snapshot::builder()
///     .timestamp_ms(1_715_000_000_000)
///     .reading("HKQuantityTypeIdentifierStepCount", Reading::Cumulative { sum: 9000.0, average: 300.0 })
///     .reading("HKQuantityTypeIdentifierHeartRate", Reading::NoData)
///     .build();
///
/// assert_eq!(snapshot.get("HKQuantityTypeIdentifierStepCount"), Some("9000.00 (avg: 300.00)"));
/// assert_eq!(snapshot.get("HKQuantityTypeIdentifierHeartRate"), Some("No Data"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub version: SchemaVersion,

    /// Unix timestamp in milliseconds when the fetch completed.
    pub timestamp_ms: u64,

    /// Display string per metric identifier.
    pub entries: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn with_timestamp(timestamp_ms: u64) -> Self {
        Self {
            version: SchemaVersion::current(),
            timestamp_ms,
            entries: BTreeMap::new(),
        }
    }

    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::new()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.entries.get(identifier).map(String::as_str)
    }

    /// Iterate entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when the keys are exactly the catalog's identifiers.
    pub fn covers(&self, catalog: &Catalog) -> bool {
        self.entries.len() == catalog.len()
            && catalog.identifiers().all(|id| self.entries.contains_key(id))
    }
}

/// Builder for `Snapshot` instances.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    timestamp_ms: Option<u64>,
    entries: BTreeMap<String, String>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a specific timestamp (milliseconds since Unix epoch).
    pub fn timestamp_ms(mut self, ts: u64) -> Self {
        self.timestamp_ms = Some(ts);
        self
    }

    /// Record a rendered reading for a metric.
    pub fn reading(mut self, identifier: impl Into<String>, reading: Reading) -> Self {
        self.entries.insert(identifier.into(), reading.to_string());
        self
    }

    /// Record a raw display string for a metric.
    pub fn entry(mut self, identifier: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(identifier.into(), value.into());
        self
    }

    #[cfg(feature = "std")]
    pub fn build(self) -> Snapshot {
        Snapshot {
            version: SchemaVersion::current(),
            timestamp_ms: self.timestamp_ms.unwrap_or_else(current_timestamp_ms),
            entries: self.entries,
        }
    }

    #[cfg(not(feature = "std"))]
    pub fn build(self) -> Snapshot {
        Snapshot {
            version: SchemaVersion::current(),
            timestamp_ms: self.timestamp_ms.unwrap_or(0),
            entries: self.entries,
        }
    }
}

/// Current timestamp in milliseconds since Unix epoch.
#[cfg(feature = "std")]
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
