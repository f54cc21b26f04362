//! Descriptive statistics over non-missing values.
//!
//! Every function here treats an empty non-missing subset as "no data"
//! (`None`) instead of producing a NaN or dividing by zero.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::models::{Subject, SubjectRow};

/// Mean / spread / range of one numeric attribute over its non-missing
/// values
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    /// Number of non-missing values
    pub n: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation; `None` when fewer than two values
    pub std: Option<f64>,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

impl NumericSummary {
    /// Summarize the non-missing values of one attribute.
    ///
    /// Returns `None` when no value is present, so callers report "no
    /// data" rather than a statistic.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() {
            return None;
        }

        let n = values.len();
        let mean = values.iter().sum::<f64>() / n as f64;
        let std = if n >= 2 {
            let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            Some((sum_sq / (n - 1) as f64).sqrt())
        } else {
            None
        };
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            n,
            mean,
            std,
            min,
            max,
        })
    }
}

/// Count of a binary covariate's positive level over non-missing values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinarySplit {
    /// Number of non-missing values
    pub n: usize,
    /// Number of values equal to 1
    pub positive: usize,
}

impl BinarySplit {
    /// Split the non-missing values of a binary covariate; `None` when no
    /// value is present.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut n = 0;
        let mut positive = 0;
        for value in values {
            n += 1;
            if (value - 1.0).abs() < f64::EPSILON {
                positive += 1;
            }
        }
        if n == 0 { None } else { Some(Self { n, positive }) }
    }

    /// Percentage of positive values out of `total`, guarded against an
    /// empty denominator
    #[must_use]
    pub fn percentage_of(count: usize, total: usize) -> Option<f64> {
        if total == 0 {
            None
        } else {
            Some(count as f64 / total as f64 * 100.0)
        }
    }
}

/// Cross-tabulation of site against the two diagnostic categories, with
/// row and column totals
#[derive(Debug, Clone, Default)]
pub struct SiteCrossTab {
    /// Per-site (case, control) counts, sorted by site code
    pub rows: BTreeMap<String, (usize, usize)>,
    /// Subjects excluded for lacking a site code
    pub without_site: usize,
}

impl SiteCrossTab {
    /// Tabulate the cohort by site and diagnosis.
    pub fn build<'a, I>(subjects: I, case_label: &str, control_label: &str) -> Self
    where
        I: IntoIterator<Item = &'a Subject>,
    {
        let mut tab = Self::default();
        for subject in subjects {
            let Some(site) = subject.site() else {
                tab.without_site += 1;
                continue;
            };
            let entry = tab.rows.entry(site.to_string()).or_insert((0, 0));
            if subject.diagnosis.is(case_label) {
                entry.0 += 1;
            } else if subject.diagnosis.is(control_label) {
                entry.1 += 1;
            }
        }
        tab
    }

    /// Column totals `(case, control)`
    #[must_use]
    pub fn totals(&self) -> (usize, usize) {
        self.rows
            .values()
            .fold((0, 0), |acc, (a, b)| (acc.0 + a, acc.1 + b))
    }
}

/// Per-label diagnosis counts for one source table, plus the number of rows
/// with no diagnosis at all
#[must_use]
pub fn diagnosis_counts(rows: &[SubjectRow]) -> (BTreeMap<String, usize>, usize) {
    let mut counts = BTreeMap::new();
    let mut missing = 0;
    for row in rows {
        match row.diagnosis.as_deref() {
            Some(label) => *counts.entry(label.to_string()).or_insert(0) += 1,
            None => missing += 1,
        }
    }
    (counts, missing)
}

/// Sorted unique values of one numeric column over non-missing entries
#[must_use]
pub fn unique_values<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .sorted_by(f64::total_cmp)
        .dedup()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_basic() {
        let summary = NumericSummary::from_values([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(summary.n, 3);
        assert!((summary.mean - 2.0).abs() < 1e-12);
        assert!((summary.std.unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 3.0);
    }

    #[test]
    fn test_summary_empty_is_no_data() {
        assert_eq!(NumericSummary::from_values([]), None);
    }

    #[test]
    fn test_summary_single_value_has_no_std() {
        let summary = NumericSummary::from_values([5.0]).unwrap();
        assert_eq!(summary.n, 1);
        assert_eq!(summary.std, None);
    }

    #[test]
    fn test_binary_split() {
        let split = BinarySplit::from_values([0.0, 1.0, 1.0]).unwrap();
        assert_eq!(split.n, 3);
        assert_eq!(split.positive, 2);
        assert_eq!(BinarySplit::from_values([]), None);
        assert_eq!(BinarySplit::percentage_of(1, 0), None);
    }

    #[test]
    fn test_unique_values() {
        assert_eq!(unique_values([1.0, 0.0, 1.0, 0.0]), vec![0.0, 1.0]);
        assert!(unique_values([]).is_empty());
    }
}
