//! CLI error types.

use std::{io, path::PathBuf};

use parlor_app::ViewError;
use parlor_core::RegistryError;
use parlor_proto::ProtoError;
use thiserror::Error;

/// Errors that abort a replay.
#[derive(Error, Debug)]
pub enum CliError {
    /// Dump file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Dump or one of its batches could not be decoded
    #[error("invalid dump: {0}")]
    Proto(#[from] ProtoError),

    /// Dump field has the wrong shape
    #[error("invalid dump: field {field:?} must be an array of batches")]
    NotAList {
        /// Offending top-level field
        field: &'static str,
    },

    /// Room lifecycle error
    #[error("room error: {0}")]
    Registry(#[from] RegistryError),

    /// View fell out of sync with its room
    #[error("view error: {0}")]
    View(#[from] ViewError),

    /// Transport rejected an outgoing message
    #[error("send failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send>),

    /// Writing output failed
    #[error("output error: {0}")]
    Output(#[from] io::Error),
}
