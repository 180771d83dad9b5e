//! CiteGraph Core — shared error type and pipeline configuration.

pub mod config;
pub mod error;

pub use config::{GraphConfig, PipelineConfig};
pub use error::{Error, Result};
