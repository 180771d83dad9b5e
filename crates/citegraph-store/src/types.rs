//! Data types for linked resources and graph statistics.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

/// Accessibility state of a linked resource.
///
/// A resource starts as `Unknown`, moves to one probe outcome, and may
/// later move from `Accessible` to `FetchError` if its download fails.
/// Transitions are one-directional; nothing resets a status automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStatus {
    /// Initial state, not yet probed.
    Unknown,
    /// Liveness probe answered HTTP 200.
    Accessible,
    /// Probe answered HTTP 401 or 403.
    Unauthorized,
    /// Probe answered HTTP 404.
    NotFound,
    /// Probe answered some other HTTP status, carried verbatim.
    Other(u16),
    /// Probe timed out or failed at the network level.
    Error,
    /// Download of an accessible resource failed; terminal until an
    /// operator intervenes.
    FetchError,
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            Self::Accessible => f.write_str("accessible"),
            Self::Unauthorized => f.write_str("unauthorized"),
            Self::NotFound => f.write_str("not_found"),
            Self::Other(code) => write!(f, "other_{}", code),
            Self::Error => f.write_str("error"),
            Self::FetchError => f.write_str("fetch_error"),
        }
    }
}

impl FromStr for ResourceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(Self::Unknown),
            "accessible" => Ok(Self::Accessible),
            "unauthorized" => Ok(Self::Unauthorized),
            "not_found" => Ok(Self::NotFound),
            "error" => Ok(Self::Error),
            "fetch_error" => Ok(Self::FetchError),
            other => match other.strip_prefix("other_") {
                Some(code) => code
                    .parse()
                    .map(Self::Other)
                    .map_err(|_| format!("invalid status code in {:?}", other)),
                None => Err(format!("unrecognized resource status {:?}", other)),
            },
        }
    }
}

impl Serialize for ResourceStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A linked resource row from the graph.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedResource {
    pub url: String,
    pub domain: String,
    pub status: ResourceStatus,
    pub local_path: Option<PathBuf>,
    pub error_message: Option<String>,
}

/// Node and edge counts for the whole graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub source_documents: i64,
    pub linked_resources: i64,
    pub citations: i64,
}
