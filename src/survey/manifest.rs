//! Verification of downloaded data against a remote-folder manifest.
//!
//! The remote object store is an external collaborator: all this module
//! consumes is the list of subject names it advertises per folder, supplied
//! as a JSON manifest. Verification compares three universes per folder:
//! the manifest, the CSV-derived expectation, and the local directory tree.

use std::fs;
use std::path::Path;

use log::info;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::loader::AnalysisDataset;
use crate::reader::{validate_directory, validate_file};
use crate::schema::normalize_id;
use crate::survey::{EEG_EXTENSIONS, contains_file_with_extension};

/// Subject names advertised by the remote store, per folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// One entry per remote folder
    pub folders: Vec<ManifestFolder>,
}

/// One remote folder: a cohort group and site with its advertised subjects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFolder {
    /// Cohort folder, e.g. `3_PD` or `5_HC`
    pub group_folder: String,
    /// Site code, e.g. `AR` or `CL`
    pub site: String,
    /// Advertised subject ids
    pub subjects: Vec<String>,
}

/// Load a JSON manifest from disk.
///
/// # Errors
/// A missing or syntactically invalid manifest is fatal.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    validate_file(path)?;
    let text = fs::read_to_string(path)?;
    let manifest: Manifest = serde_json::from_str(&text)?;
    info!(
        "manifest {}: {} folders",
        path.display(),
        manifest.folders.len()
    );
    Ok(manifest)
}

/// Verification outcome for one manifest folder
#[derive(Debug)]
pub struct FolderVerification {
    /// Cohort folder
    pub group_folder: String,
    /// Site code
    pub site: String,
    /// Subjects advertised by the manifest (normalized, deduplicated)
    pub manifest_subjects: Vec<String>,
    /// Subjects the demographics table expects in this folder
    pub csv_expected: Vec<String>,
    /// Expected by demographics but absent from the manifest
    pub missing_on_manifest: Vec<String>,
    /// On the manifest but unknown to every source table
    pub unknown_to_csv: Vec<String>,
    /// Local subject directories containing at least one raw-signal file
    pub downloaded: Vec<String>,
    /// Advertised subjects with no local directory, or a directory without
    /// raw-signal files
    pub not_downloaded: Vec<String>,
}

impl FolderVerification {
    /// Whether every advertised subject was retrieved with signal files
    #[must_use]
    pub fn complete(&self) -> bool {
        self.not_downloaded.is_empty()
    }
}

/// Verify every manifest folder against the CSV expectation and the local
/// tree at `data_root/<group_folder>/<site>/<subject>/`.
///
/// Every discrepancy is a reported list, never an abort.
///
/// # Errors
/// Only a missing `data_root` is fatal.
pub fn verify_manifest(
    manifest: &Manifest,
    dataset: &AnalysisDataset,
    data_root: &Path,
) -> Result<Vec<FolderVerification>> {
    validate_directory(data_root)?;

    let known_ids: FxHashSet<&str> = dataset
        .sources
        .iter()
        .flat_map(|source| source.rows.iter())
        .filter_map(|row| row.subject_id.as_deref())
        .collect();

    let mut results = Vec::with_capacity(manifest.folders.len());
    for folder in &manifest.folders {
        let mut subjects: Vec<String> = folder
            .subjects
            .iter()
            .map(|raw| normalize_id(raw))
            .filter(|id| !id.is_empty())
            .collect();
        subjects.sort();
        subjects.dedup();
        let manifest_set: FxHashSet<&str> = subjects.iter().map(String::as_str).collect();

        let csv_expected: Vec<String> = dataset
            .demographics
            .iter()
            .filter(|row| {
                row.group_folder.as_deref() == Some(folder.group_folder.as_str())
                    && row.site.as_deref() == Some(folder.site.as_str())
            })
            .filter_map(|row| row.subject_id.clone())
            .collect();

        let missing_on_manifest = csv_expected
            .iter()
            .filter(|id| !manifest_set.contains(id.as_str()))
            .cloned()
            .collect();
        let unknown_to_csv = subjects
            .iter()
            .filter(|id| !known_ids.contains(id.as_str()))
            .cloned()
            .collect();

        let folder_dir = data_root.join(&folder.group_folder).join(&folder.site);
        let mut downloaded = Vec::new();
        let mut not_downloaded = Vec::new();
        for subject in &subjects {
            let subject_dir = folder_dir.join(subject);
            if subject_dir.is_dir() && contains_file_with_extension(&subject_dir, &EEG_EXTENSIONS) {
                downloaded.push(subject.clone());
            } else {
                not_downloaded.push(subject.clone());
            }
        }

        results.push(FolderVerification {
            group_folder: folder.group_folder.clone(),
            site: folder.site.clone(),
            manifest_subjects: subjects,
            csv_expected,
            missing_on_manifest,
            unknown_to_csv,
            downloaded,
            not_downloaded,
        });
    }

    Ok(results)
}

/// Render the per-folder verification plus an overall summary.
///
/// # Errors
/// Fails only on an I/O error of the output stream.
pub fn render_verification<W: std::io::Write>(
    w: &mut W,
    results: &[FolderVerification],
) -> Result<()> {
    for result in results {
        writeln!(
            w,
            "\nFOLDER: {}/{} (manifest: {} subjects)",
            result.group_folder,
            result.site,
            result.manifest_subjects.len()
        )?;
        writeln!(
            w,
            "   Expected from demographics: {} subjects",
            result.csv_expected.len()
        )?;
        if !result.missing_on_manifest.is_empty() {
            writeln!(
                w,
                "   [WARN] Expected but absent from manifest: {}",
                result.missing_on_manifest.join(", ")
            )?;
        }
        if !result.unknown_to_csv.is_empty() {
            writeln!(
                w,
                "   [WARN] On manifest but in no source table: {}",
                result.unknown_to_csv.join(", ")
            )?;
        }
        writeln!(
            w,
            "   Downloaded (with signal files): {} / {}",
            result.downloaded.len(),
            result.manifest_subjects.len()
        )?;
        if result.complete() {
            writeln!(w, "   [OK] All advertised subjects retrieved")?;
        } else {
            writeln!(
                w,
                "   [WARN] Not downloaded / incomplete: {}",
                result.not_downloaded.join(", ")
            )?;
        }
    }

    let total_manifest: usize = results.iter().map(|r| r.manifest_subjects.len()).sum();
    let total_downloaded: usize = results.iter().map(|r| r.downloaded.len()).sum();
    let total_missing: usize = results.iter().map(|r| r.not_downloaded.len()).sum();
    writeln!(w, "\nOVERALL: {total_downloaded} / {total_manifest} subjects retrieved")?;
    if total_missing == 0 {
        writeln!(w, "[OK] All downloads verified")?;
    } else {
        writeln!(w, "[WARN] {total_missing} subjects missing or incomplete")?;
    }
    Ok(())
}
