//! # healthsnap-adapters
//!
//! Sends collected health data to a remote service.
//!
//! ## Endpoints
//!
//! - `POST /health` - the normalized record as JSON
//! - `POST /general-information` - patient identity as JSON
//! - `POST /upload` - a scanned document as multipart form data
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use healthsnap_adapters::upload::UploadClient;
//! use healthsnap_types::NormalizedRecord;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = UploadClient::builder()
//!         .endpoint("https://records.example.com/api")
//!         .build()?;
//!
//!     client.upload_record(&NormalizedRecord::default()).await?;
//!     client.upload_document("scan.pdf").await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod media;

#[cfg(feature = "http")]
pub mod upload;

pub use error::UploadError;
pub use media::content_type_for;

// Re-export types for convenience
pub use healthsnap_types::{GeneralInformation, Insurance, NormalizedRecord};
