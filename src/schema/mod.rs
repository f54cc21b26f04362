//! Canonical column model for the BrainLat source tables.
//!
//! Source files are authored independently per site and cohort, so the same
//! logical column arrives under several spellings ("id EEG", "ID_EEG", ...).
//! Everything downstream of the reader works exclusively with the canonical
//! names defined here.

pub mod normalize;

pub use normalize::{normalize_header, normalize_id};

/// Canonical subject identifier column for EEG sources
pub const ID_EEG: &str = "id_eeg";
/// Canonical subject identifier column for MRI sources
pub const ID_MRI: &str = "id_mri";
/// Generic identifier column, used as a fallback when no modality-specific
/// identifier is present
pub const ID: &str = "id";

/// Canonical diagnosis column
pub const DIAGNOSIS: &str = "diagnosis";
/// Canonical structured path column (`<group_folder>/<site>`)
pub const PATH: &str = "path";

/// Identifier columns in lookup priority order
pub const ID_CANDIDATES: [&str; 3] = [ID_EEG, ID_MRI, ID];

/// Columns coerced to numeric after loading; a column absent from a source
/// table is silently skipped.
pub const NUMERIC_COLUMNS: [&str; 12] = [
    "age",
    "years_education",
    "sex",
    "laterality",
    "moca_total",
    "ifs_total_score",
    "mmse",
    "t1",
    "rest",
    "dwi",
    "mf",
    "eeg",
];

/// Map a normalized header onto its canonical name.
///
/// Known variants of the identifier columns collapse onto one spelling;
/// anything else passes through unchanged.
#[must_use]
pub fn canonical_name(normalized: &str) -> &str {
    match normalized {
        "ideeg" | "id_eeg" | "id__eeg" | "eeg_id" => ID_EEG,
        "idmri" | "id_mri" | "mri_id" => ID_MRI,
        other => other,
    }
}

/// Extract the site code from a structured path value like `3_PD/CL`.
///
/// Takes the final path segment, strips every non-alphabetic character and
/// upper-cases the remainder. An empty result is `None`, never `""`.
#[must_use]
pub fn site_from_path(path: &str) -> Option<String> {
    let normalized = path.trim().replace('\\', "/");
    let last = normalized.split('/').filter(|s| !s.trim().is_empty()).next_back()?;
    let letters: String = last.chars().filter(char::is_ascii_alphabetic).collect();
    if letters.is_empty() {
        None
    } else {
        Some(letters.to_ascii_uppercase())
    }
}

/// Extract the group folder (first path segment) from a structured path
/// value like `3_PD/CL` or `5_HC/AR`.
#[must_use]
pub fn group_from_path(path: &str) -> Option<String> {
    let normalized = path.trim().replace('\\', "/");
    normalized
        .split('/')
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_from_path() {
        assert_eq!(site_from_path("3_PD/CL"), Some("CL".to_string()));
        assert_eq!(site_from_path("5_HC/AR"), Some("AR".to_string()));
        assert_eq!(site_from_path("5_HC\\AR"), Some("AR".to_string()));
        assert_eq!(site_from_path("3_PD/"), Some("PD".to_string()));
        assert_eq!(site_from_path("3_PD/123"), None);
        assert_eq!(site_from_path("   "), None);
    }

    #[test]
    fn test_group_from_path() {
        assert_eq!(group_from_path("3_PD/CL"), Some("3_PD".to_string()));
        assert_eq!(group_from_path("5_HC/AR"), Some("5_HC".to_string()));
        assert_eq!(group_from_path(""), None);
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("ideeg"), ID_EEG);
        assert_eq!(canonical_name("id__eeg"), ID_EEG);
        assert_eq!(canonical_name("mri_id"), ID_MRI);
        assert_eq!(canonical_name("moca_total"), "moca_total");
    }
}
