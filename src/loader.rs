//! Loading of the full EEG dataset: six source files, three collapsed
//! collections, one merged subject table.

use std::path::Path;

use log::info;

use crate::collections::{SubjectCollection, merge_sources};
use crate::config::ReaderConfig;
use crate::error::Result;
use crate::models::{Subject, SubjectRow};
use crate::registry::{SourceKind, load_source};

/// The six EEG source files, keyed by kind and cohort folder.
///
/// File-name casing is inconsistent at the source; it is reproduced here
/// verbatim rather than papered over, since the files are published that
/// way.
pub const EEG_SOURCES: [(SourceKind, &str, &str); 6] = [
    (SourceKind::Cognition, "Cognition HC", "cognition_hc_eeg_data.csv"),
    (SourceKind::Cognition, "Cognition PD", "Cognition_PD_EEG_data.csv"),
    (
        SourceKind::Demographics,
        "Demographics HC",
        "demographics_hc_eeg_data.csv",
    ),
    (
        SourceKind::Demographics,
        "Demographics PD",
        "Demographics_PD_EEG_data.csv",
    ),
    (SourceKind::Records, "Records HC", "records_hc_eeg_data.csv"),
    (SourceKind::Records, "Records PD", "Records_PD_EEG_data.csv"),
];

/// One source file after reading and deserialization
#[derive(Debug)]
pub struct LoadedSource {
    /// Which table this file feeds
    pub kind: SourceKind,
    /// Report heading, e.g. `Demographics HC`
    pub label: String,
    /// File name as published
    pub file_name: String,
    /// Raw (pre-collapse) rows
    pub rows: Vec<SubjectRow>,
}

/// The full EEG dataset after ingestion, collapse and reconciliation
#[derive(Debug)]
pub struct AnalysisDataset {
    /// The six loaded source files, in publication order
    pub sources: Vec<LoadedSource>,
    /// Demographics collapsed to one row per subject
    pub demographics: SubjectCollection,
    /// Cognition collapsed to one row per subject
    pub cognition: SubjectCollection,
    /// Records collapsed to one row per subject
    pub records: SubjectCollection,
    /// Outer-joined, diagnosis-reconciled subject table
    pub merged: Vec<Subject>,
}

impl AnalysisDataset {
    /// Load every source file under `dir` and run the reconciliation
    /// pipeline.
    ///
    /// # Errors
    /// Fails if any of the six files is missing or structurally malformed,
    /// or if a table lacks an identifier column.
    pub fn load(dir: &Path, config: &ReaderConfig) -> Result<Self> {
        let mut sources = Vec::with_capacity(EEG_SOURCES.len());
        for (kind, label, file_name) in EEG_SOURCES {
            let rows = load_source(&dir.join(file_name), kind, config)?;
            info!("{file_name}: {} rows", rows.len());
            sources.push(LoadedSource {
                kind,
                label: label.to_string(),
                file_name: file_name.to_string(),
                rows,
            });
        }

        let demographics =
            SubjectCollection::collapse(&concat_rows(&sources, SourceKind::Demographics), SourceKind::Demographics);
        let cognition =
            SubjectCollection::collapse(&concat_rows(&sources, SourceKind::Cognition), SourceKind::Cognition);
        let records =
            SubjectCollection::collapse(&concat_rows(&sources, SourceKind::Records), SourceKind::Records);

        let merged = merge_sources(&demographics, &cognition, &records);
        info!(
            "merged table: {} unique subjects (demographics {}, cognition {}, records {})",
            merged.len(),
            demographics.len(),
            cognition.len(),
            records.len()
        );

        Ok(Self {
            sources,
            demographics,
            cognition,
            records,
            merged,
        })
    }

    /// Raw (pre-collapse) row count of one table kind across its files
    #[must_use]
    pub fn raw_rows(&self, kind: SourceKind) -> usize {
        self.sources
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.rows.len())
            .sum()
    }
}

/// Concatenate the raw rows of every file of one kind, in publication
/// order (HC file first, then PD), which fixes the row order the collapse
/// rule depends on.
fn concat_rows(sources: &[LoadedSource], kind: SourceKind) -> Vec<SubjectRow> {
    sources
        .iter()
        .filter(|s| s.kind == kind)
        .flat_map(|s| s.rows.iter().cloned())
        .collect()
}
