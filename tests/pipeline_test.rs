//! End-to-end run over a small six-file release: ingestion, collapse,
//! reconciliation, cohort selection, statistics and validation.

mod common;

use brainlat_cohort::algorithm::cohort::summarize_group;
use brainlat_cohort::algorithm::stats::NumericSummary;
use brainlat_cohort::algorithm::validate::{check_score_ranges, completeness};
use brainlat_cohort::{ReportConfig, filter_cohort, report};

#[test]
fn full_pipeline_over_a_small_release() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = common::load_fixture(dir.path()).unwrap();

    // Five distinct subjects across the three tables; the duplicated
    // demographics row collapses, the padded identifier normalizes.
    assert_eq!(dataset.merged.len(), 5);
    assert_eq!(dataset.demographics.len(), 4);
    assert_eq!(dataset.raw_rows(brainlat_cohort::SourceKind::Demographics), 5);

    let by_id = |id: &str| {
        dataset
            .merged
            .iter()
            .find(|s| s.id == id)
            .unwrap_or_else(|| panic!("subject {id} missing from merged table"))
    };

    // Duplicate collapse: first non-missing value per column wins.
    let first = by_id("sub-10001");
    assert_eq!(first.data.age, Some(65.0));
    assert_eq!(first.data.years_education, Some(12.0));
    assert_eq!(first.data.moca_total, Some(28.0));

    // Exactly one cross-table diagnosis disagreement.
    let conflicts: Vec<&str> = dataset
        .merged
        .iter()
        .filter(|s| s.diagnosis.is_conflict())
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(conflicts, vec![common::CONFLICT_ID]);
    assert_eq!(by_id(common::CONFLICT_ID).diagnosis.to_string(), "MISMATCH:PD|CN");

    // The records-only subject survives the outer join with everything
    // else missing.
    let records_only = by_id(common::RECORDS_ONLY_ID);
    assert_eq!(records_only.diagnosis.resolved(), Some("CN"));
    assert_eq!(records_only.data.age, None);
    assert_eq!(records_only.data.moca_total, None);
    assert_eq!(records_only.data.eeg, Some(1.0));

    // Cohort selection keeps resolved PD/CN subjects only.
    let cohort = filter_cohort(&dataset.merged, "PD", "CN");
    assert_eq!(cohort.subjects.len(), 4);
    assert_eq!(cohort.cases().len(), 1);
    assert_eq!(cohort.controls().len(), 3);
    // Three controls per case.
    let ratio = cohort.class_ratio().unwrap();
    assert!((ratio - 3.0).abs() < 1e-12);

    // Exactly one score outside its declared domain (MoCA of 35).
    let out_of_range: usize = check_score_ranges(&dataset.merged)
        .iter()
        .map(|check| check.out_of_range)
        .sum();
    assert_eq!(out_of_range, 1);

    // Completeness: the records-only subject has no demographics, and the
    // unparseable MoCA cell keeps one more subject below full scores.
    let overall = completeness(dataset.merged.iter());
    assert_eq!(overall.total, 5);
    assert_eq!(overall.complete_demographics, 4);
    assert_eq!(overall.with_both_scores, 3);
}

#[test]
fn group_summaries_on_empty_subsets_report_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = common::load_fixture(dir.path()).unwrap();

    // No subject carries these labels, so both groups are empty.
    let cohort = filter_cohort(&dataset.merged, "AD", "FTD");
    assert!(cohort.subjects.is_empty());
    assert_eq!(cohort.class_ratio(), None);

    let summary = summarize_group(&cohort.cases(), "AD");
    assert_eq!(summary.n, 0);
    assert!(summary.age.is_none());
    assert!(summary.moca.is_none());

    assert!(NumericSummary::from_values(std::iter::empty::<f64>()).is_none());
}

#[test]
fn report_renders_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = common::load_fixture(dir.path()).unwrap();

    let mut out = Vec::new();
    report::render(&mut out, &dataset, &ReportConfig::default()).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("MISMATCH:PD|CN"));
    assert!(text.contains("demographics_hc_eeg_data.csv"));
    // The empty-guard path never prints a bare zero division.
    assert!(!text.contains("NaN"));
}
