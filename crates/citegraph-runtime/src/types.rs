//! Per-phase report types.

use serde::Serialize;

use citegraph_ingest::{IngestReport, NormalizeReport};
use citegraph_store::ResourceStatus;

/// Counts from one status-update pass over `unknown` resources.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusReport {
    pub probed: usize,
    pub accessible: usize,
    pub unauthorized: usize,
    pub not_found: usize,
    pub other: usize,
    pub errors: usize,
}

impl StatusReport {
    pub fn record(&mut self, status: ResourceStatus) {
        self.probed += 1;
        match status {
            ResourceStatus::Accessible => self.accessible += 1,
            ResourceStatus::Unauthorized => self.unauthorized += 1,
            ResourceStatus::NotFound => self.not_found += 1,
            ResourceStatus::Other(_) => self.other += 1,
            ResourceStatus::Error => self.errors += 1,
            // The classifier never yields these.
            ResourceStatus::Unknown | ResourceStatus::FetchError => {}
        }
    }
}

/// Counts from one fetch pass over accessible, unfetched resources.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FetchReport {
    pub fetched: usize,
    pub failed: usize,
    /// Resources that already had a local path.
    pub skipped: usize,
}

/// Combined result of one full batch run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunReport {
    pub ingest: IngestReport,
    pub status: StatusReport,
    pub fetch: FetchReport,
    pub normalize: NormalizeReport,
}
