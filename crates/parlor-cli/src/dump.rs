//! Room dump files.
//!
//! A dump is a JSON object with two optional arrays of sync timeline objects:
//!
//! ```json
//! {
//!   "live": [{"prev_batch": "t2", "events": [...]}],
//!   "backfill": [{"prev_batch": "t1", "events": [...]}]
//! }
//! ```
//!
//! Live batches are listed oldest first. Backfill batches are listed in the
//! order they were fetched, i.e. each one older than the last.

use std::{fs, path::Path};

use parlor_proto::{Batch, ProtoError};
use serde_json::Value;

use crate::CliError;

/// Decoded dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dump {
    /// Live batches, oldest first.
    pub live: Vec<Batch>,
    /// Backfill batches, newest first.
    pub backfill: Vec<Batch>,
}

impl Dump {
    /// Read and decode a dump file.
    ///
    /// # Errors
    ///
    /// - `CliError::Read` if the file cannot be read
    /// - see [`Dump::decode`]
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path)
            .map_err(|source| CliError::Read { path: path.to_owned(), source })?;
        Self::decode(&text)
    }

    /// Decode a dump from JSON text.
    ///
    /// # Errors
    ///
    /// - `CliError::Proto` if the text is not JSON, or the dump or one of its
    ///   batches is not an object
    /// - `CliError::NotAList` if `live` or `backfill` is not an array
    pub fn decode(text: &str) -> Result<Self, CliError> {
        let value: Value = serde_json::from_str(text).map_err(ProtoError::from)?;
        Self::from_json(&value)
    }

    /// Decode a dump from a parsed JSON value. See [`Dump::decode`].
    ///
    /// # Errors
    ///
    /// Same as [`Dump::decode`], minus JSON syntax errors.
    pub fn from_json(value: &Value) -> Result<Self, CliError> {
        let Some(object) = value.as_object() else {
            return Err(ProtoError::not_an_object(value).into());
        };

        Ok(Self {
            live: Self::batches(object.get("live"), "live")?,
            backfill: Self::batches(object.get("backfill"), "backfill")?,
        })
    }

    /// Total number of events across all batches.
    pub fn event_count(&self) -> usize {
        self.live.iter().chain(&self.backfill).map(Batch::len).sum()
    }

    fn batches(value: Option<&Value>, field: &'static str) -> Result<Vec<Batch>, CliError> {
        match value {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => {
                items.iter().map(|item| Batch::from_json(item).map_err(CliError::from)).collect()
            },
            Some(_) => Err(CliError::NotAList { field }),
        }
    }
}
