//! On-disk data surveys.
//!
//! Two read-only checks over the local data tree: a modality-availability
//! scan of `<root>/<SITE>/<subject>/<modality>/` directories, and a
//! verification of downloaded subjects against a remote-folder manifest.
//! Directory or file presence is a proxy for "data available"; file content
//! is never validated.

pub mod manifest;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, StringArray};
use arrow::record_batch::RecordBatch;
use log::{debug, warn};

use crate::error::Result;
use crate::models::Subject;
use crate::reader::validate_directory;

pub use manifest::{
    FolderVerification, Manifest, ManifestFolder, load_manifest, render_verification,
    verify_manifest,
};

/// File extensions that count as imaging data (case-insensitive)
pub const NIFTI_EXTENSIONS: [&str; 2] = [".nii", ".nii.gz"];
/// File extensions that count as raw EEG signal data (case-insensitive)
pub const EEG_EXTENSIONS: [&str; 2] = [".set", ".fdt"];

/// The imaging modality sub-directories surveyed per subject
pub const MODALITIES: [&str; 3] = ["anat", "dwi", "func"];

/// Availability of each modality for one on-disk subject directory
#[derive(Debug, Clone)]
pub struct ModalityRecord {
    /// Site folder the subject was found under
    pub site: String,
    /// Subject directory name (`sub-...`)
    pub subject: String,
    /// Per modality: does the sub-directory exist
    pub has_dir: [bool; 3],
    /// Per modality: does the sub-directory contain at least one NIfTI file
    pub has_nifti: [bool; 3],
    /// Reconciled diagnosis, joined from the subject table
    pub diagnosis: Option<String>,
}

/// Walk `<root>/<SITE>/<sub-*>/` and record modality availability per
/// subject directory.
///
/// # Errors
/// A missing root is fatal; unreadable entries below it are skipped with a
/// warning.
pub fn scan_modalities(root: &Path) -> Result<Vec<ModalityRecord>> {
    validate_directory(root)?;

    let mut records = Vec::new();
    for site_dir in sorted_dirs(root)? {
        let site = dir_name(&site_dir);
        for subject_dir in sorted_dirs(&site_dir)? {
            let subject = dir_name(&subject_dir);
            if !subject.to_lowercase().starts_with("sub-") {
                continue;
            }

            let mut record = ModalityRecord {
                site: site.clone(),
                subject,
                has_dir: [false; 3],
                has_nifti: [false; 3],
                diagnosis: None,
            };
            for (i, modality) in MODALITIES.iter().enumerate() {
                let dir = subject_dir.join(modality);
                record.has_dir[i] = dir.is_dir();
                record.has_nifti[i] =
                    record.has_dir[i] && contains_file_with_extension(&dir, &NIFTI_EXTENSIONS);
            }
            records.push(record);
        }
    }

    debug!("{}: surveyed {} subject directories", root.display(), records.len());
    Ok(records)
}

/// Join reconciled diagnoses onto scanned records by subject id.
///
/// Subjects on disk but absent from the table keep `None`; their count is a
/// reported statistic, not an error.
pub fn attach_diagnoses(records: &mut [ModalityRecord], subjects: &[Subject]) {
    let by_id: rustc_hash::FxHashMap<&str, &Subject> =
        subjects.iter().map(|s| (s.id.as_str(), s)).collect();
    for record in records {
        record.diagnosis = by_id
            .get(record.subject.as_str())
            .and_then(|s| s.diagnosis.resolved())
            .map(ToString::to_string);
    }
}

/// Persist the per-subject availability table as a delimited file.
///
/// This is the pipeline's only persisted artifact.
///
/// # Errors
/// Fails on I/O errors or an unwritable destination.
pub fn write_availability_csv(records: &[ModalityRecord], path: &Path) -> Result<()> {
    let mut columns: Vec<(String, ArrayRef)> = vec![
        (
            "site".to_string(),
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.site.as_str()),
            )),
        ),
        (
            "subject".to_string(),
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.subject.as_str()),
            )),
        ),
    ];
    for (i, modality) in MODALITIES.iter().enumerate() {
        columns.push((
            format!("has_{modality}_dir"),
            Arc::new(BooleanArray::from_iter(
                records.iter().map(|r| Some(r.has_dir[i])),
            )),
        ));
    }
    for (i, modality) in MODALITIES.iter().enumerate() {
        columns.push((
            format!("has_{modality}_nifti"),
            Arc::new(BooleanArray::from_iter(
                records.iter().map(|r| Some(r.has_nifti[i])),
            )),
        ));
    }
    columns.push((
        "diagnosis".to_string(),
        Arc::new(StringArray::from_iter(
            records.iter().map(|r| r.diagnosis.as_deref()),
        )),
    ));

    let batch = RecordBatch::try_from_iter(columns)?;

    let file = fs::File::create(path)?;
    let mut writer = arrow::csv::WriterBuilder::new().with_header(true).build(file);
    writer.write(&batch)?;
    debug!("wrote availability table: {}", path.display());
    Ok(())
}

/// Counts of one modality combination, split by diagnosis
#[derive(Debug, Clone)]
pub struct ModalityCounts {
    /// Combination label, e.g. `ANAT + DWI`
    pub label: String,
    /// Subjects with the combination available
    pub total: usize,
    /// Thereof in the case group
    pub cases: usize,
    /// Thereof in the control group
    pub controls: usize,
    /// Thereof with no reconciled diagnosis
    pub unknown: usize,
}

/// Tabulate the usual modality combinations (NIfTI-based) by diagnosis.
#[must_use]
pub fn summarize_modalities(
    records: &[ModalityRecord],
    case_label: &str,
    control_label: &str,
) -> Vec<ModalityCounts> {
    let combos: [(&str, fn(&ModalityRecord) -> bool); 7] = [
        ("ANAT (NIfTI)", |r| r.has_nifti[0]),
        ("DWI (NIfTI)", |r| r.has_nifti[1]),
        ("FUNC (NIfTI)", |r| r.has_nifti[2]),
        ("ANAT + DWI", |r| r.has_nifti[0] && r.has_nifti[1]),
        ("ANAT + FUNC", |r| r.has_nifti[0] && r.has_nifti[2]),
        ("DWI + FUNC", |r| r.has_nifti[1] && r.has_nifti[2]),
        ("ANAT + DWI + FUNC", |r| {
            r.has_nifti[0] && r.has_nifti[1] && r.has_nifti[2]
        }),
    ];

    combos
        .iter()
        .map(|(label, matches)| {
            let matching: Vec<&ModalityRecord> =
                records.iter().filter(|r| matches(r)).collect();
            ModalityCounts {
                label: (*label).to_string(),
                total: matching.len(),
                cases: matching
                    .iter()
                    .filter(|r| r.diagnosis.as_deref() == Some(case_label))
                    .count(),
                controls: matching
                    .iter()
                    .filter(|r| r.diagnosis.as_deref() == Some(control_label))
                    .count(),
                unknown: matching.iter().filter(|r| r.diagnosis.is_none()).count(),
            }
        })
        .collect()
}

/// Render the modality availability summary.
///
/// # Errors
/// Fails only on an I/O error of the output stream.
pub fn render_modality_summary<W: std::io::Write>(
    w: &mut W,
    records: &[ModalityRecord],
    case_label: &str,
    control_label: &str,
) -> Result<()> {
    writeln!(w, "Subject directories surveyed: {}", records.len())?;
    for counts in summarize_modalities(records, case_label, control_label) {
        writeln!(
            w,
            "{:<20} total={:>4} | {}={:>3} | {}={:>3} | UNKNOWN={:>3}",
            counts.label, counts.total, case_label, counts.cases, control_label, counts.controls, counts.unknown
        )?;
    }
    Ok(())
}

/// Whether `dir` (recursively) contains at least one file whose name ends
/// with any of `extensions`, case-insensitively.
pub(crate) fn contains_file_with_extension(dir: &Path, extensions: &[&str]) -> bool {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("{}: unreadable, skipping ({err})", dir.display());
            return false;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if contains_file_with_extension(&path, extensions) {
                return true;
            }
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            let lower = name.to_lowercase();
            if extensions.iter().any(|ext| lower.ends_with(ext)) {
                return true;
            }
        }
    }
    false
}

/// Immediate sub-directories of `dir`, sorted by name for deterministic
/// report order
fn sorted_dirs(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut dirs: Vec<_> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
