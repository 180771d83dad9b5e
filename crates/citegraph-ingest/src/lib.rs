//! CiteGraph Ingest — PDF directory ingestion and download normalization.

pub mod ingest;
pub mod normalize;

pub use ingest::{IngestReport, LinkIngester};
pub use normalize::{html_to_text, normalize_dir, NormalizeReport};
