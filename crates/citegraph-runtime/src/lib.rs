//! CiteGraph Runtime — sequences the batch pipeline phases:
//! ingest → status update → fetch → normalize.
//!
//! Every phase is idempotent, so an interrupted batch is completed by
//! simply running again.

pub mod pipeline;
pub mod types;

pub use pipeline::Pipeline;
pub use types::{FetchReport, RunReport, StatusReport};
