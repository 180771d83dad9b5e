//! Pipeline — coordinates the batch phases against a graph store.

use futures::stream::{self, StreamExt};
use reqwest::Client;
use tracing::{info, warn};

use citegraph_core::{PipelineConfig, Result};
use citegraph_ingest::{normalize_dir, IngestReport, LinkIngester, NormalizeReport};
use citegraph_net::{classify, fetch_resource};
use citegraph_store::{GraphStore, ResourceStatus};

use crate::types::{FetchReport, RunReport, StatusReport};

/// Runs the link pipeline phases against a graph store.
pub struct Pipeline<'a> {
    store: &'a dyn GraphStore,
    config: &'a PipelineConfig,
    client: Client,
}

impl<'a> Pipeline<'a> {
    pub fn new(store: &'a dyn GraphStore, config: &'a PipelineConfig) -> Self {
        Self {
            store,
            config,
            client: Client::new(),
        }
    }

    /// Run one full batch: ingest → status update → fetch → normalize.
    pub async fn run(&self) -> Result<RunReport> {
        let ingest = self.ingest()?;
        let status = self.update_statuses().await?;
        let fetch = self.fetch_accessible().await?;
        let normalize = self.normalize()?;
        Ok(RunReport {
            ingest,
            status,
            fetch,
            normalize,
        })
    }

    /// Phase 1: merge every PDF's links into the graph.
    pub fn ingest(&self) -> Result<IngestReport> {
        let report = LinkIngester::new(self.store).ingest_directory(&self.config.docs_dir)?;
        info!(
            "Ingested {} documents, {} links ({} unreadable skipped)",
            report.documents, report.links, report.skipped
        );
        Ok(report)
    }

    /// Phase 2: probe every resource still marked `unknown` and persist
    /// the outcome. Probes run with bounded concurrency; each URL appears
    /// at most once in the work list, so no two probes share a resource.
    pub async fn update_statuses(&self) -> Result<StatusReport> {
        let urls = self
            .store
            .list_resources_by_status(ResourceStatus::Unknown)?;
        let timeout = self.config.probe_timeout();

        let outcomes: Vec<(String, ResourceStatus)> = stream::iter(urls)
            .map(|url| {
                let client = self.client.clone();
                async move {
                    let status = classify(&client, &url, timeout).await;
                    (url, status)
                }
            })
            .buffer_unordered(self.config.probe_concurrency)
            .collect()
            .await;

        let mut report = StatusReport::default();
        for (url, status) in outcomes {
            self.store.set_resource_status(&url, status, None)?;
            report.record(status);
        }
        info!(
            "Probed {} resources: {} accessible, {} unauthorized, {} not found, {} other, {} errors",
            report.probed,
            report.accessible,
            report.unauthorized,
            report.not_found,
            report.other,
            report.errors
        );
        Ok(report)
    }

    /// Phase 3: download every accessible resource that has no local copy
    /// yet. Failures are persisted as `fetch_error` and never retried
    /// automatically.
    pub async fn fetch_accessible(&self) -> Result<FetchReport> {
        let urls = self
            .store
            .list_resources_by_status(ResourceStatus::Accessible)?;
        let timeout = self.config.fetch_timeout();

        let mut report = FetchReport::default();
        for url in urls {
            let Some(resource) = self.store.get_resource(&url)? else {
                continue;
            };
            if resource.local_path.is_some() {
                report.skipped += 1;
                continue;
            }
            match fetch_resource(&self.client, &url, &self.config.raw_dir, timeout).await {
                Ok(path) => {
                    self.store.set_resource_local_path(&url, &path)?;
                    report.fetched += 1;
                }
                Err(e) => {
                    warn!("Fetch failed for {}: {}", url, e);
                    self.store.set_resource_status(
                        &url,
                        ResourceStatus::FetchError,
                        Some(&e.to_string()),
                    )?;
                    report.failed += 1;
                }
            }
        }
        info!(
            "Fetched {} resources ({} failed, {} already local)",
            report.fetched, report.failed, report.skipped
        );
        Ok(report)
    }

    /// Phase 4: normalize the raw downloads directory.
    pub fn normalize(&self) -> Result<NormalizeReport> {
        let report = normalize_dir(&self.config.raw_dir, &self.config.clean_dir)?;
        info!(
            "Normalized downloads: {} copied, {} converted, {} skipped",
            report.copied, report.converted, report.skipped
        );
        Ok(report)
    }
}
