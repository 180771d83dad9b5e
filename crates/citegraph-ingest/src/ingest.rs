//! Link ingestion: walk a directory of PDFs and merge their hyperlinks
//! into the citation graph.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use citegraph_core::{Error, Result};
use citegraph_net::resource_domain;
use citegraph_pdf::extract_links;
use citegraph_store::GraphStore;

/// Counts from one ingestion pass.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct IngestReport {
    /// PDFs registered as source documents.
    pub documents: usize,
    /// Link annotations merged (including ones already present).
    pub links: usize,
    /// Unreadable PDFs skipped.
    pub skipped: usize,
}

/// Merges hyperlinks from a directory of PDFs into the graph.
pub struct LinkIngester<'a> {
    store: &'a dyn GraphStore,
}

impl<'a> LinkIngester<'a> {
    pub fn new(store: &'a dyn GraphStore) -> Self {
        Self { store }
    }

    /// Ingest every `*.pdf` in `docs_dir`, in sorted filename order.
    ///
    /// Unreadable PDFs are logged and skipped; store failures abort the
    /// pass. Re-running over the same directory converges: no duplicate
    /// documents, resources, or citation edges are created.
    pub fn ingest_directory(&self, docs_dir: &Path) -> Result<IngestReport> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(docs_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.to_lowercase().ends_with(".pdf") && entry.path().is_file() {
                names.push(name);
            }
        }
        names.sort();

        let mut report = IngestReport::default();
        for name in names {
            match self.ingest_file(docs_dir, &name) {
                Ok(links) => {
                    report.documents += 1;
                    report.links += links;
                }
                Err(Error::DocumentRead(message)) => {
                    warn!("Skipping unreadable PDF: {}", message);
                    report.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(report)
    }

    fn ingest_file(&self, docs_dir: &Path, name: &str) -> Result<usize> {
        self.store.ensure_source_document(name)?;
        let links = extract_links(&docs_dir.join(name))?;
        for link in &links {
            let domain = resource_domain(&link.uri);
            self.store
                .ensure_linked_resource_and_citation(&link.uri, &domain, name, link.page)?;
        }
        debug!("Ingested {}: {} links", name, links.len());
        Ok(links.len())
    }
}
