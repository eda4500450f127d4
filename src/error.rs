//! Typed errors for registry lookups and manifest reading.
//!
//! Registry errors never leave a [`RegistryClient`](crate::registry::RegistryClient):
//! they are folded into a [`LookupOutcome`] at the client boundary. Manifest
//! errors are the only failures the driver treats as fatal.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::LookupOutcome;

/// Failure while resolving a single package against the registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry answered 404 for this package.
    #[error("not found in registry")]
    NotFound,

    /// Connection fault, timeout, or an unexpected HTTP status.
    #[error("{0}")]
    Transport(String),

    /// The body was not JSON, or lacked `dist-tags.latest`.
    #[error("malformed registry response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RegistryError::Transport(format!("request timed out: {}", err))
        } else {
            RegistryError::Transport(err.to_string())
        }
    }
}

impl From<Result<crate::model::RegistryRecord, RegistryError>> for LookupOutcome {
    fn from(result: Result<crate::model::RegistryRecord, RegistryError>) -> Self {
        match result {
            Ok(record) => LookupOutcome::Found(record),
            Err(RegistryError::NotFound) => LookupOutcome::NotFound,
            Err(err) => LookupOutcome::TransportError(err.to_string()),
        }
    }
}

/// Failure while reading a `package.json` manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("package.json not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
