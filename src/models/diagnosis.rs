//! Diagnosis reconciliation across source tables.
//!
//! Several source tables carry a diagnosis column for the same subject. The
//! reconciliation never fabricates a value and never silently picks a winner
//! when sources disagree: a disagreement is a distinct outcome that the
//! report surfaces, since a silently mislabeled subject would corrupt the
//! classification cohort.

use std::fmt;

use smallvec::SmallVec;

/// Outcome of reconciling the diagnosis labels reported for one subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosisResolution {
    /// No source reported a diagnosis
    Missing,
    /// All sources agree (after trimming and case-folding)
    Resolved(String),
    /// Sources disagree; values in order of first appearance
    Conflict(SmallVec<[String; 2]>),
}

impl DiagnosisResolution {
    /// The agreed diagnosis, if exactly one distinct value was reported
    #[must_use]
    pub fn resolved(&self) -> Option<&str> {
        match self {
            Self::Resolved(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the sources disagree on the diagnosis
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Whether the resolved diagnosis equals `label`
    #[must_use]
    pub fn is(&self, label: &str) -> bool {
        self.resolved() == Some(label)
    }
}

impl fmt::Display for DiagnosisResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "NA"),
            Self::Resolved(value) => write!(f, "{value}"),
            Self::Conflict(values) => write!(f, "MISMATCH:{}", values.join("|")),
        }
    }
}

/// Reconcile the diagnosis labels reported by any number of sources.
///
/// Each non-missing value is trimmed and upper-cased; blank values and the
/// literal `NAN` (an artifact of stringified missing values) count as
/// missing. Case-normalized duplicates collapse to one, preserving the order
/// of first appearance for conflict reporting.
///
/// Zero distinct values resolve to [`DiagnosisResolution::Missing`], exactly
/// one to [`DiagnosisResolution::Resolved`], two or more to
/// [`DiagnosisResolution::Conflict`]. No combination of present and absent
/// inputs can make this fail.
pub fn resolve_diagnosis<'a, I>(sources: I) -> DiagnosisResolution
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut distinct: SmallVec<[String; 2]> = SmallVec::new();
    for value in sources.into_iter().flatten() {
        let label = value.trim().to_uppercase();
        if label.is_empty() || label == "NAN" {
            continue;
        }
        if !distinct.contains(&label) {
            distinct.push(label);
        }
    }

    match distinct.len() {
        0 => DiagnosisResolution::Missing,
        1 => DiagnosisResolution::Resolved(distinct.swap_remove(0)),
        _ => DiagnosisResolution::Conflict(distinct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_source() {
        assert_eq!(
            resolve_diagnosis([Some("PD")]),
            DiagnosisResolution::Resolved("PD".to_string())
        );
    }

    #[test]
    fn test_all_missing() {
        assert_eq!(resolve_diagnosis([None, None]), DiagnosisResolution::Missing);
        assert_eq!(resolve_diagnosis([]), DiagnosisResolution::Missing);
        assert_eq!(
            resolve_diagnosis([Some("nan"), Some("  ")]),
            DiagnosisResolution::Missing
        );
    }

    #[test]
    fn test_case_insensitive_dedup() {
        assert_eq!(
            resolve_diagnosis([Some("PD"), Some("pd"), Some(" PD ")]),
            DiagnosisResolution::Resolved("PD".to_string())
        );
    }

    #[test]
    fn test_conflict_preserves_first_seen_order() {
        let resolution = resolve_diagnosis([Some("PD"), None, Some("CN"), Some("pd")]);
        match resolution {
            DiagnosisResolution::Conflict(values) => {
                assert_eq!(values.as_slice(), ["PD", "CN"]);
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }
}
