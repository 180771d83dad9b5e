//! Pipeline configuration, built once and passed by reference.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Graph backend connection settings.
///
/// For the embedded SQLite backend the URI is a database file path and the
/// credentials are ignored; a remote backend would consume all three.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub uri: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Configuration for one batch run of the link pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Graph backend connection.
    pub graph: GraphConfig,
    /// Directory of input `*.pdf` files.
    pub docs_dir: PathBuf,
    /// Directory for raw downloaded resources.
    pub raw_dir: PathBuf,
    /// Directory for normalized text output.
    pub clean_dir: PathBuf,
    /// Liveness probe timeout in seconds.
    pub probe_timeout_secs: u64,
    /// Download timeout in seconds.
    pub fetch_timeout_secs: u64,
    /// Maximum concurrent liveness probes.
    pub probe_concurrency: usize,
}

impl PipelineConfig {
    /// Build configuration from environment variables with defaults.
    /// Creates the output directories if needed.
    pub fn from_env() -> Result<Self> {
        let graph = GraphConfig {
            uri: env_or("CITEGRAPH_GRAPH_URI", "data/citegraph.db"),
            username: std::env::var("CITEGRAPH_GRAPH_USER").ok(),
            password: std::env::var("CITEGRAPH_GRAPH_PASSWORD").ok(),
        };

        let config = Self {
            graph,
            docs_dir: PathBuf::from(env_or("CITEGRAPH_DOCS_DIR", "docs")),
            raw_dir: PathBuf::from(env_or("CITEGRAPH_RAW_DIR", "data/linked_raw")),
            clean_dir: PathBuf::from(env_or("CITEGRAPH_CLEAN_DIR", "data/linked_clean")),
            probe_timeout_secs: env_parse("CITEGRAPH_PROBE_TIMEOUT_SECS", 5)?,
            fetch_timeout_secs: env_parse("CITEGRAPH_FETCH_TIMEOUT_SECS", 10)?,
            probe_concurrency: env_parse("CITEGRAPH_PROBE_CONCURRENCY", 4)?,
        };

        config.validate()?;
        config.ensure_dirs()?;
        Ok(config)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Create the output directories (raw and clean).
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.raw_dir)?;
        std::fs::create_dir_all(&self.clean_dir)?;
        if let Some(parent) = Path::new(&self.graph.uri).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.probe_timeout_secs == 0 || self.fetch_timeout_secs == 0 {
            return Err(Error::Config("timeouts must be non-zero".to_string()));
        }
        if self.probe_concurrency == 0 {
            return Err(Error::Config(
                "probe concurrency must be at least 1".to_string(),
            ));
        }
        if self.graph.uri.trim().is_empty() {
            return Err(Error::Config("graph URI must not be empty".to_string()));
        }
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(v) => v
            .parse()
            .map_err(|_| Error::Config(format!("{} must be a number, got {:?}", key, v))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(root: &Path) -> PipelineConfig {
        PipelineConfig {
            graph: GraphConfig {
                uri: root.join("graph.db").display().to_string(),
                username: None,
                password: None,
            },
            docs_dir: root.join("docs"),
            raw_dir: root.join("raw"),
            clean_dir: root.join("clean"),
            probe_timeout_secs: 5,
            fetch_timeout_secs: 10,
            probe_concurrency: 4,
        }
    }

    #[test]
    fn test_ensure_dirs_creates_output_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        config.ensure_dirs().unwrap();
        assert!(config.raw_dir.is_dir());
        assert!(config.clean_dir.is_dir());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.probe_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.probe_concurrency = 0;
        assert!(config.validate().is_err());
    }
}
