//! Source-table registry.
//!
//! Three kinds of source table feed the pipeline: demographics, cognition
//! and scan/record availability, each arriving as an HC file and a PD file
//! with slightly different column sets. The registry knows how to turn a
//! normalized record batch of any kind into typed [`SubjectRow`]s.

pub mod deserializer;

use std::path::Path;

use crate::config::ReaderConfig;
use crate::error::Result;
use crate::models::SubjectRow;
use crate::reader::read_table;

pub use deserializer::{DeserializeError, deserialize_batch};

/// The kind of a source table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Demographic covariates (age, sex, education)
    Demographics,
    /// Cognitive test scores (MoCA, IFS, MMSE)
    Cognition,
    /// Per-modality availability flags (t1, rest, dwi, mf, eeg)
    Records,
}

impl SourceKind {
    /// Human-readable name used in diagnostics and report headings
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Demographics => "demographics",
            Self::Cognition => "cognition",
            Self::Records => "records",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read one source file and deserialize it into subject rows.
///
/// # Errors
/// Fails on a missing or malformed file, or when the table has no
/// identifier column at all (a configuration precondition, not a
/// data-quality issue).
pub fn load_source(path: &Path, kind: SourceKind, config: &ReaderConfig) -> Result<Vec<SubjectRow>> {
    let batch = read_table(path, config)?;
    let rows = deserialize_batch(&batch, kind)?;
    Ok(rows)
}
