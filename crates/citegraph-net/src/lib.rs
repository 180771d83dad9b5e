//! CiteGraph Net — outbound HTTP: liveness probes and downloads.
//!
//! Both operations are side-effect free with respect to the graph; the
//! pipeline persists their outcomes.

pub mod fetch;
pub mod probe;

pub use fetch::{fetch_resource, file_name_for_url, FetchError};
pub use probe::{classify, resource_domain};
