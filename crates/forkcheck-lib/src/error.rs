use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::module::Capability;

/// Errors raised by the harness itself.
///
/// Assertion failures and crashes inside a test are not errors at this
/// level: they are contained by the invocation and surface as a
/// [`Status`](crate::executor::Status).
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("{0}")]
    Argument(String),

    #[error("Cannot list {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot load module {path}: {reason}")]
    ModuleLoad { path: PathBuf, reason: String },

    #[error("Module {path} does not expose `{capability}`")]
    CapabilityMissing {
        path: PathBuf,
        capability: Capability,
    },

    #[error("Output capture failed: {0}")]
    Capture(#[source] io::Error),

    #[error("Failed to fork test process: {0}")]
    Fork(#[source] nix::Error),

    #[error("Failed to wait for test process: {0}")]
    Wait(#[source] nix::Error),

    #[error("Invalid configuration in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HarnessError {
    /// Wrap an enumeration failure for `path`
    pub fn discovery(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HarnessError::Discovery {
            path: path.into(),
            source,
        }
    }
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;
