//! # Pipeline Errors
//!
//! Every failure a run can hit, grouped by where it comes from. Nothing in
//! here is retried: the first error unwinds the whole run back to the caller.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A required input is missing or empty.
    #[error("usage error: {0}")]
    Usage(String),
    /// A required tool location is not configured.
    #[error("`{0}` is not set; point it at the tool's absolute path")]
    Environment(&'static str),
    /// Filesystem access failed on the given path.
    #[error("`{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The tool could not be started at all.
    #[error("failed to start `{tool}`: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    /// The tool ran but exited with a failure status.
    #[error("`{tool}` failed with {status}")]
    ToolFailed { tool: String, status: ExitStatus },
    /// The manifest cannot carry the network security config attribute.
    #[error("`{}`: {reason}", path.display())]
    Structure { path: PathBuf, reason: &'static str },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
