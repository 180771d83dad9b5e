//! CiteGraph Store — persistent citation graph over SQLite.
//!
//! The pipeline consumes the [`GraphStore`] trait; [`SqliteGraphStore`] is
//! the embedded implementation. All upsert operations are idempotent so a
//! batch can be re-run after any partial failure.

pub mod schema;
pub mod sqlite;
pub mod types;

use std::path::Path;

use citegraph_core::Result;

pub use sqlite::SqliteGraphStore;
pub use types::{GraphStats, LinkedResource, ResourceStatus};

/// Operation contract for the citation graph backend.
///
/// Every operation is idempotent and atomic with respect to a single
/// logical upsert. Backend failures surface as
/// [`citegraph_core::Error::StoreUnavailable`] and are retryable at the
/// batch level.
pub trait GraphStore: Send + Sync {
    /// Create the source document node if absent; no-op otherwise.
    fn ensure_source_document(&self, name: &str) -> Result<()>;

    /// Create the linked resource if absent (status defaults to `unknown`),
    /// then create the citation edge `(source_name) -[cites, page]-> (url)`
    /// unless an identical (document, URL, page) edge already exists.
    fn ensure_linked_resource_and_citation(
        &self,
        url: &str,
        domain: &str,
        source_name: &str,
        page: u32,
    ) -> Result<()>;

    /// URLs of all linked resources currently holding the given status.
    fn list_resources_by_status(&self, status: ResourceStatus) -> Result<Vec<String>>;

    /// Update status (and optionally error message) for one resource.
    fn set_resource_status(
        &self,
        url: &str,
        status: ResourceStatus,
        error_message: Option<&str>,
    ) -> Result<()>;

    /// Record the local file path of a successfully fetched resource.
    fn set_resource_local_path(&self, url: &str, path: &Path) -> Result<()>;

    /// Look up one linked resource by URL.
    fn get_resource(&self, url: &str) -> Result<Option<LinkedResource>>;

    /// Node and edge counts for the whole graph.
    fn stats(&self) -> Result<GraphStats>;
}
