//! Completeness and range validation.
//!
//! Purely read-only reporting: a validation failure is a counted statistic,
//! never an abort. The point is to surface data-quality issues in a cohort
//! before it is used for modeling, not to gatekeep at load time.

use crate::algorithm::stats::unique_values;
use crate::models::Subject;

/// Declared domain of one bounded score column
#[derive(Debug, Clone, Copy)]
pub struct ScoreRange {
    /// Canonical column name
    pub column: &'static str,
    /// Inclusive lower bound
    pub min: f64,
    /// Inclusive upper bound
    pub max: f64,
}

/// Bounded cognitive scores and their declared domains
pub const SCORE_RANGES: [ScoreRange; 3] = [
    ScoreRange {
        column: "moca_total",
        min: 0.0,
        max: 30.0,
    },
    ScoreRange {
        column: "ifs_total_score",
        min: 0.0,
        max: 30.0,
    },
    ScoreRange {
        column: "mmse",
        min: 0.0,
        max: 30.0,
    },
];

/// Binary availability flags expected to hold only 0 or 1
pub const BINARY_FLAGS: [&str; 4] = ["t1", "rest", "dwi", "eeg"];

/// Plausible age window; values outside it are flagged as suspicious
pub const AGE_WINDOW: (f64, f64) = (20.0, 100.0);

/// Outcome of checking one score column against its declared domain
#[derive(Debug, Clone)]
pub struct ScoreRangeCheck {
    /// The checked rule
    pub rule: ScoreRange,
    /// Non-missing values examined
    pub n: usize,
    /// Values outside `[min, max]`
    pub out_of_range: usize,
}

/// Check every bounded score column over the non-missing values of
/// `subjects`.
#[must_use]
pub fn check_score_ranges(subjects: &[Subject]) -> Vec<ScoreRangeCheck> {
    SCORE_RANGES
        .iter()
        .map(|rule| {
            let mut n = 0;
            let mut out_of_range = 0;
            for subject in subjects {
                if let Some(value) = subject.data.numeric_field(rule.column) {
                    n += 1;
                    if value < rule.min || value > rule.max {
                        out_of_range += 1;
                    }
                }
            }
            ScoreRangeCheck {
                rule: *rule,
                n,
                out_of_range,
            }
        })
        .collect()
}

/// Outcome of checking one binary flag column
#[derive(Debug, Clone)]
pub struct FlagCheck {
    /// Canonical column name
    pub column: &'static str,
    /// Sorted distinct non-missing values observed
    pub values: Vec<f64>,
    /// Whether every observed value is 0 or 1
    pub ok: bool,
}

/// Check that every binary availability flag only holds 0 or 1.
#[must_use]
pub fn check_flags(subjects: &[Subject]) -> Vec<FlagCheck> {
    BINARY_FLAGS
        .iter()
        .map(|&column| {
            let values = unique_values(
                subjects
                    .iter()
                    .filter_map(|s| s.data.numeric_field(column)),
            );
            let ok = values.iter().all(|&v| v == 0.0 || v == 1.0);
            FlagCheck { column, values, ok }
        })
        .collect()
}

/// Count of ages outside the plausibility window, over non-missing ages
#[must_use]
pub fn suspicious_ages(subjects: &[Subject]) -> usize {
    subjects
        .iter()
        .filter_map(|s| s.data.age)
        .filter(|&age| age < AGE_WINDOW.0 || age > AGE_WINDOW.1)
        .count()
}

/// Sorted distinct sex values and whether they stay within {0, 1}
#[must_use]
pub fn sex_values(subjects: &[Subject]) -> FlagCheck {
    let values = unique_values(subjects.iter().filter_map(|s| s.data.sex));
    let ok = values.iter().all(|&v| v == 0.0 || v == 1.0);
    FlagCheck {
        column: "sex",
        values,
        ok,
    }
}

/// Observed education range over non-missing values
#[must_use]
pub fn education_range(subjects: &[Subject]) -> Option<(f64, f64)> {
    let values: Vec<f64> = subjects
        .iter()
        .filter_map(|s| s.data.years_education)
        .collect();
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Sorted distinct values of the multi-feature flag (informational only;
/// the sources legitimately carry 0 and 3)
#[must_use]
pub fn mf_values(subjects: &[Subject]) -> Vec<f64> {
    unique_values(subjects.iter().filter_map(|s| s.data.mf))
}

/// Completeness of the designated core fields over one group of subjects
#[derive(Debug, Clone, Copy)]
pub struct Completeness {
    /// Group size
    pub total: usize,
    /// Subjects with age, sex and education all present
    pub complete_demographics: usize,
    /// Subjects with a MoCA total
    pub with_moca: usize,
    /// Subjects with an IFS total
    pub with_ifs: usize,
    /// Subjects with both cognitive totals
    pub with_both_scores: usize,
    /// Subjects with every core field present
    pub complete_core: usize,
}

impl Completeness {
    /// Percentage of `count` out of the group total, guarded against an
    /// empty group
    #[must_use]
    pub fn percentage(&self, count: usize) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(count as f64 / self.total as f64 * 100.0)
        }
    }
}

/// Measure core-field completeness over a group of subjects.
#[must_use]
pub fn completeness<'a, I>(subjects: I) -> Completeness
where
    I: IntoIterator<Item = &'a Subject>,
{
    let mut report = Completeness {
        total: 0,
        complete_demographics: 0,
        with_moca: 0,
        with_ifs: 0,
        with_both_scores: 0,
        complete_core: 0,
    };

    for subject in subjects {
        report.total += 1;
        let data = &subject.data;
        let demo_complete =
            data.age.is_some() && data.sex.is_some() && data.years_education.is_some();
        if demo_complete {
            report.complete_demographics += 1;
        }
        if data.moca_total.is_some() {
            report.with_moca += 1;
        }
        if data.ifs_total_score.is_some() {
            report.with_ifs += 1;
        }
        if data.moca_total.is_some() && data.ifs_total_score.is_some() {
            report.with_both_scores += 1;
        }
        if subject.has_core_fields() {
            report.complete_core += 1;
        }
    }

    report
}
