//! Cohort selection and per-group summaries.

use crate::algorithm::stats::{BinarySplit, NumericSummary};
use crate::models::Subject;

/// The classification cohort: subjects whose reconciled diagnosis is
/// exactly the case or the control label
#[derive(Debug)]
pub struct Cohort<'a> {
    /// Retained subjects, in merged-table order
    pub subjects: Vec<&'a Subject>,
    /// Case group label (e.g. `PD`)
    pub case_label: String,
    /// Control group label (e.g. `CN`)
    pub control_label: String,
}

impl<'a> Cohort<'a> {
    /// Subjects in the case group
    #[must_use]
    pub fn cases(&self) -> Vec<&'a Subject> {
        self.group(&self.case_label)
    }

    /// Subjects in the control group
    #[must_use]
    pub fn controls(&self) -> Vec<&'a Subject> {
        self.group(&self.control_label)
    }

    /// Subjects whose resolved diagnosis equals `label`
    #[must_use]
    pub fn group(&self, label: &str) -> Vec<&'a Subject> {
        self.subjects
            .iter()
            .filter(|s| s.diagnosis.is(label))
            .copied()
            .collect()
    }

    /// Control-per-case ratio; `None` when the case group is empty
    #[must_use]
    pub fn class_ratio(&self) -> Option<f64> {
        let n_cases = self.cases().len();
        if n_cases == 0 {
            None
        } else {
            Some(self.controls().len() as f64 / n_cases as f64)
        }
    }
}

/// Restrict the merged table to the two diagnostic categories of interest.
///
/// Only subjects with an unambiguously resolved diagnosis qualify; missing
/// and conflicting resolutions are excluded (and reported elsewhere).
#[must_use]
pub fn filter_cohort<'a>(
    subjects: &'a [Subject],
    case_label: &str,
    control_label: &str,
) -> Cohort<'a> {
    let retained = subjects
        .iter()
        .filter(|s| s.diagnosis.is(case_label) || s.diagnosis.is(control_label))
        .collect();
    Cohort {
        subjects: retained,
        case_label: case_label.to_string(),
        control_label: control_label.to_string(),
    }
}

/// Demographic and cognitive summary of one diagnostic group
#[derive(Debug)]
pub struct GroupSummary {
    /// Group label
    pub label: String,
    /// Group size including subjects with missing attributes
    pub n: usize,
    /// Age over non-missing values
    pub age: Option<NumericSummary>,
    /// Years of education over non-missing values
    pub education: Option<NumericSummary>,
    /// Sex split over non-missing values (positive = male)
    pub sex: Option<BinarySplit>,
    /// MoCA total score
    pub moca: Option<NumericSummary>,
    /// IFS total score
    pub ifs: Option<NumericSummary>,
    /// MMSE total score
    pub mmse: Option<NumericSummary>,
}

/// Summarize one diagnostic group. Every attribute is computed over its
/// non-missing subset only; an all-missing attribute reports no data.
#[must_use]
pub fn summarize_group(subjects: &[&Subject], label: &str) -> GroupSummary {
    let numeric = |field: &str| {
        NumericSummary::from_values(subjects.iter().filter_map(|s| s.data.numeric_field(field)))
    };

    GroupSummary {
        label: label.to_string(),
        n: subjects.len(),
        age: numeric("age"),
        education: numeric("years_education"),
        sex: BinarySplit::from_values(subjects.iter().filter_map(|s| s.data.sex)),
        moca: numeric("moca_total"),
        ifs: numeric("ifs_total_score"),
        mmse: numeric("mmse"),
    }
}
