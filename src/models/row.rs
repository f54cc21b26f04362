//! One normalized row from a source table.

/// A single subject-visit record after header normalization, identifier
/// cleanup and numeric coercion.
///
/// Every field other than the identifier is nullable by contract: a column
/// absent from a source file deserializes to `None` for every row, so
/// downstream stages never need to check column existence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectRow {
    /// Canonical subject identifier (whitespace removed)
    pub subject_id: Option<String>,
    /// Raw diagnosis label as reported by this source
    pub diagnosis: Option<String>,
    /// Structured path field, `<group_folder>/<site>`
    pub path: Option<String>,
    /// Site code derived from `path`
    pub site: Option<String>,
    /// Cohort folder derived from `path` (e.g. `3_PD`, `5_HC`)
    pub group_folder: Option<String>,

    /// Age in years
    pub age: Option<f64>,
    /// Years of formal education
    pub years_education: Option<f64>,
    /// Sex flag, 0 = female, 1 = male
    pub sex: Option<f64>,
    /// Handedness flag
    pub laterality: Option<f64>,
    /// MoCA total score, 0..=30
    pub moca_total: Option<f64>,
    /// IFS total score, 0..=30
    pub ifs_total_score: Option<f64>,
    /// MMSE total score, 0..=30
    pub mmse: Option<f64>,
    /// T1 structural scan availability flag
    pub t1: Option<f64>,
    /// Resting-state scan availability flag
    pub rest: Option<f64>,
    /// Diffusion scan availability flag
    pub dwi: Option<f64>,
    /// Multi-feature recording flag
    pub mf: Option<f64>,
    /// EEG recording availability flag
    pub eeg: Option<f64>,
}

impl SubjectRow {
    /// Fill every missing non-identifier field from `other`.
    ///
    /// This is the "first non-missing value wins" rule: callers apply it in
    /// source row order, so an earlier row's value is never overwritten by a
    /// later one.
    pub fn fill_missing_from(&mut self, other: &Self) {
        fn fill<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
            if target.is_none()
                && let Some(value) = source
            {
                *target = Some(value.clone());
            }
        }

        fill(&mut self.diagnosis, &other.diagnosis);
        fill(&mut self.path, &other.path);
        fill(&mut self.site, &other.site);
        fill(&mut self.group_folder, &other.group_folder);
        fill(&mut self.age, &other.age);
        fill(&mut self.years_education, &other.years_education);
        fill(&mut self.sex, &other.sex);
        fill(&mut self.laterality, &other.laterality);
        fill(&mut self.moca_total, &other.moca_total);
        fill(&mut self.ifs_total_score, &other.ifs_total_score);
        fill(&mut self.mmse, &other.mmse);
        fill(&mut self.t1, &other.t1);
        fill(&mut self.rest, &other.rest);
        fill(&mut self.dwi, &other.dwi);
        fill(&mut self.mf, &other.mf);
        fill(&mut self.eeg, &other.eeg);
    }

    /// Look up a numeric field by its canonical column name.
    ///
    /// Returns `None` both for a missing value and for a name that is not a
    /// numeric column, which lets validation rules stay table-driven.
    #[must_use]
    pub fn numeric_field(&self, name: &str) -> Option<f64> {
        match name {
            "age" => self.age,
            "years_education" => self.years_education,
            "sex" => self.sex,
            "laterality" => self.laterality,
            "moca_total" => self.moca_total,
            "ifs_total_score" => self.ifs_total_score,
            "mmse" => self.mmse,
            "t1" => self.t1,
            "rest" => self.rest,
            "dwi" => self.dwi,
            "mf" => self.mf,
            "eeg" => self.eeg,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_missing_from_keeps_existing() {
        let mut first = SubjectRow {
            subject_id: Some("sub-1".to_string()),
            age: None,
            moca_total: Some(28.0),
            ..SubjectRow::default()
        };
        let second = SubjectRow {
            subject_id: Some("sub-1".to_string()),
            age: Some(61.0),
            moca_total: Some(12.0),
            ..SubjectRow::default()
        };

        first.fill_missing_from(&second);
        assert_eq!(first.age, Some(61.0));
        assert_eq!(first.moca_total, Some(28.0));
    }
}
