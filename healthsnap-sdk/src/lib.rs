//! # healthsnap-sdk
//!
//! Collects health-metric snapshots from a health-data store.
//!
//! A [`Collector`] issues one statistics query per catalog metric, runs them
//! all concurrently, and publishes a [`Snapshot`] once every query has
//! finished, together with the [`NormalizedRecord`] derived from it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use healthsnap_sdk::{Collector, MemoryStore, Output};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryStore::from_json(&std::fs::read_to_string("store.json").unwrap()).unwrap();
//!
//!     let collector = Collector::builder(store)
//!         .output(Output::file("health.json"))
//!         .query_timeout(Duration::from_secs(5))
//!         .build();
//!
//!     if let Some(published) = collector.sync().await {
//!         println!("Collected {} metrics", published.snapshot.len());
//!     }
//! }
//! ```
//!
//! ## Features
//!
//! - **Fail-closed authorization**: denial or an unavailable store yields `false`
//! - **Isolated failures**: a failing, empty, or stalled query only affects its own entry
//! - **Bounded waits**: every query is wrapped in a timeout
//! - **Pluggable stores**: implement [`HealthStore`] for any backend

mod collector;
mod memory;
mod output;
mod state;
mod store;

pub use collector::{Collector, CollectorBuilder, DEFAULT_QUERY_TIMEOUT};
pub use memory::{MemoryStore, Sample};
pub use output::Output;
pub use state::{Phase, Published};
pub use store::{HealthStore, Statistic, StatisticsQuery, StoreError};

// Re-export types for convenience
pub use healthsnap_types::{Catalog, CatalogSettings, NormalizedRecord, Reading, Snapshot};
