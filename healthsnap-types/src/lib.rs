//! # healthsnap-types
//!
//! Core types for health-metric snapshots: the metric catalog, units and
//! quantities, rendered readings, the flat [`Snapshot`] and the nested
//! [`NormalizedRecord`] derived from it.
//!
//! ## Features
//!
//! - `std` (default): Standard library support (wall-clock timestamps)
//! - `serde`: JSON serialization of snapshots and records
//!
//! ## Example
//!
//! ```rust
//! use healthsnap_types::{normalize, Catalog, CatalogSettings, Quantity, Reading, Snapshot, Unit};
//!
//! let catalog = Catalog::standard(CatalogSettings::default());
//! let steps = catalog.get("HKQuantityTypeIdentifierStepCount").unwrap();
//!
//! let reading = Reading::from_statistics(steps, Some(Quantity::new(9000.0, Unit::Count)));
//! let snapshot = Snapshot::builder()
//!     .reading(steps.identifier.clone(), reading)
//!     .build();
//!
//! assert_eq!(snapshot.get("HKQuantityTypeIdentifierStepCount"), Some("9000.00 (avg: 300.00)"));
//!
//! let record = normalize(&snapshot, &catalog);
//! assert_eq!(record.activity.unwrap().step_count, Some(300.0));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod catalog;
mod normalize;
mod reading;
pub mod record;
mod snapshot;
mod unit;

pub use catalog::*;
pub use normalize::{metric_value, normalize};
pub use reading::*;
pub use record::{GeneralInformation, Insurance, NormalizedRecord};
pub use snapshot::*;
pub use unit::*;

/// Current snapshot schema version.
pub const SCHEMA_VERSION: u32 = 1;
