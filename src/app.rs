//! One authorize, fetch, and upload cycle.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use healthsnap_adapters::upload::UploadClient;
use healthsnap_sdk::{Collector, HealthStore, Output, Published};
use healthsnap_types::{Catalog, Snapshot};
use tracing::info;

use crate::config::Settings;

/// What to do with a collected snapshot besides printing it.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Write the snapshot and record to this file as JSON.
    pub export: Option<PathBuf>,
    /// POST the normalized record to the upload service.
    pub upload: bool,
    /// Documents to send to the upload service.
    pub documents: Vec<PathBuf>,
}

impl RunOptions {
    fn needs_client(&self) -> bool {
        self.upload || !self.documents.is_empty()
    }
}

/// Application state: a collector wired to the configured store and outputs.
#[derive(Debug)]
pub struct App {
    settings: Settings,
    collector: Collector,
    options: RunOptions,
}

impl App {
    pub fn new(settings: Settings, store: impl HealthStore + 'static, options: RunOptions) -> Self {
        let mut builder = Collector::builder(store)
            .catalog(Catalog::standard(settings.catalog))
            .query_timeout(settings.query_timeout());
        if let Some(path) = &options.export {
            builder = builder.output(Output::file(path));
        }

        Self {
            settings,
            collector: builder.build(),
            options,
        }
    }

    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    /// The catalog snapshots are collected against.
    pub fn catalog(&self) -> &Catalog {
        self.collector.catalog()
    }

    /// Authorize and fetch, then upload if requested.
    pub async fn run(&self) -> Result<Arc<Published>> {
        let published = self.collect().await?;
        self.deliver(&published).await?;
        Ok(published)
    }

    /// Authorize and fetch. Fails if access was not granted.
    pub async fn collect(&self) -> Result<Arc<Published>> {
        let Some(published) = self.collector.sync().await else {
            bail!("health data access was not granted");
        };

        if let Some(path) = &self.options.export {
            info!(path = %path.display(), "exported snapshot");
        }
        Ok(published)
    }

    /// Send the record and documents, as requested, to the upload service.
    ///
    /// Stops at the first rejected upload.
    pub async fn deliver(&self, published: &Published) -> Result<()> {
        if self.options.needs_client() {
            self.upload(published).await?;
        }
        Ok(())
    }

    /// The snapshot from the last successful run, if still published.
    pub fn latest_snapshot(&self) -> Option<Snapshot> {
        self.collector.latest().map(|p| p.snapshot.clone())
    }

    async fn upload(&self, published: &Published) -> Result<()> {
        let client = UploadClient::builder()
            .endpoint(&self.settings.upload.endpoint)
            .timeout(self.settings.upload_timeout())
            .build()
            .context("failed to build upload client")?;

        if self.options.upload {
            client
                .upload_record(&published.record)
                .await
                .with_context(|| format!("failed to upload record to {}", client.endpoint()))?;
        }

        for document in &self.options.documents {
            client
                .upload_document(document)
                .await
                .with_context(|| format!("failed to upload {}", document.display()))?;
        }

        Ok(())
    }
}
