//! The reconciled, canonical unit: one record per unique subject.

use crate::models::diagnosis::DiagnosisResolution;
use crate::models::row::SubjectRow;

/// One subject after collapsing duplicates and outer-joining every source
/// table on the canonical identifier.
#[derive(Debug, Clone)]
pub struct Subject {
    /// Canonical subject identifier; unique within a merged table
    pub id: String,
    /// Reconciled diagnosis across all sources
    pub diagnosis: DiagnosisResolution,
    /// Merged non-diagnosis attributes (first non-missing value across
    /// sources, in source priority order)
    pub data: SubjectRow,
}

impl Subject {
    /// Site code, if any source carried a usable `path`
    #[must_use]
    pub fn site(&self) -> Option<&str> {
        self.data.site.as_deref()
    }

    /// Whether every core field (age, sex, education, MoCA, IFS) is present
    #[must_use]
    pub fn has_core_fields(&self) -> bool {
        self.data.age.is_some()
            && self.data.sex.is_some()
            && self.data.years_education.is_some()
            && self.data.moca_total.is_some()
            && self.data.ifs_total_score.is_some()
    }
}
