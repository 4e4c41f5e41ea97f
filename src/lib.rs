//! # healthsnap
//!
//! Collects a snapshot of health metrics, derives the nested upload record,
//! and optionally exports or uploads it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ HealthStore  │──▶│  Collector   │──▶│  normalize   │──▶│ UploadClient │
//! │ (fixture)    │   │ (sdk)        │   │ (types)      │   │ (adapters)   │
//! └──────────────┘   └──────┬───────┘   └──────────────┘   └──────────────┘
//!                           │
//!                           ▼
//!                     Output::File / report
//! ```
//!
//! - **[`config`]**: layered settings (defaults, TOML file, environment)
//! - **[`app`]**: one authorize, fetch, and upload cycle
//! - **[`report`]**: console rendering of a snapshot
//!
//! ## Usage
//!
//! ```bash
//! healthsnap --fixture store.json --export health.json
//! healthsnap --fixture store.json --config healthsnap.toml --upload --document scan.pdf
//! ```
//!
//! ### As a library
//!
//! ```
//! use healthsnap::{App, RunOptions, Settings};
//! use healthsnap_sdk::MemoryStore;
//!
//! # tokio_test::block_on(async {
//! let app = App::new(Settings::default(), MemoryStore::new(), RunOptions::default());
//! let published = app.run().await.unwrap();
//! println!("{}", healthsnap::report::render(&published.snapshot, app.catalog()));
//! # });
//! ```

pub mod app;
pub mod config;
pub mod report;

pub use app::{App, RunOptions};
pub use config::Settings;
