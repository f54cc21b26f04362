//! Duplicate collapse and multi-source merge semantics.

use brainlat_cohort::models::{DiagnosisResolution, SubjectRow, resolve_diagnosis};
use brainlat_cohort::{SourceKind, SubjectCollection, merge_sources};

fn row(id: &str) -> SubjectRow {
    SubjectRow {
        subject_id: Some(id.to_string()),
        ..SubjectRow::default()
    }
}

#[test]
fn collapse_keeps_first_non_missing_value_per_column() {
    let mut first = row("sub-1");
    first.age = Some(65.0);
    first.moca_total = None;
    let mut second = row("sub-1");
    second.age = Some(99.0);
    second.moca_total = Some(28.0);

    let collapsed = SubjectCollection::collapse(&[first, second], SourceKind::Demographics);
    assert_eq!(collapsed.len(), 1);
    let merged = collapsed.get("sub-1").unwrap();
    // Earlier row wins where it has a value; later rows only fill gaps.
    assert_eq!(merged.age, Some(65.0));
    assert_eq!(merged.moca_total, Some(28.0));
}

#[test]
fn collapse_preserves_first_seen_order() {
    let rows = vec![row("sub-b"), row("sub-a"), row("sub-b"), row("sub-c")];
    let collapsed = SubjectCollection::collapse(&rows, SourceKind::Records);
    let ids: Vec<&str> = collapsed.ids().collect();
    assert_eq!(ids, vec!["sub-b", "sub-a", "sub-c"]);
}

#[test]
fn collapse_drops_rows_without_identifier() {
    let rows = vec![row("sub-1"), SubjectRow::default(), row("sub-2")];
    let collapsed = SubjectCollection::collapse(&rows, SourceKind::Cognition);
    assert_eq!(collapsed.len(), 2);
    assert_eq!(collapsed.dropped_without_id(), 1);
}

#[test]
fn merge_is_a_full_outer_join() {
    let demographics =
        SubjectCollection::collapse(&[row("sub-1"), row("sub-2")], SourceKind::Demographics);
    let cognition =
        SubjectCollection::collapse(&[row("sub-2"), row("sub-3")], SourceKind::Cognition);
    let records = SubjectCollection::collapse(&[row("sub-4")], SourceKind::Records);

    let merged = merge_sources(&demographics, &cognition, &records);

    let ids: Vec<&str> = merged.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["sub-1", "sub-2", "sub-3", "sub-4"]);

    // Row count is bounded below by the largest source and above by the sum.
    let largest = demographics.len().max(cognition.len()).max(records.len());
    let total = demographics.len() + cognition.len() + records.len();
    assert!(merged.len() >= largest);
    assert!(merged.len() <= total);
}

#[test]
fn merge_fills_attributes_source_priority_first() {
    let mut demo = row("sub-1");
    demo.age = Some(70.0);
    let mut cog = row("sub-1");
    cog.age = Some(12.0);
    cog.moca_total = Some(25.0);

    let demographics = SubjectCollection::collapse(&[demo], SourceKind::Demographics);
    let cognition = SubjectCollection::collapse(&[cog], SourceKind::Cognition);
    let records = SubjectCollection::collapse(&[], SourceKind::Records);

    let merged = merge_sources(&demographics, &cognition, &records);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].data.age, Some(70.0));
    assert_eq!(merged[0].data.moca_total, Some(25.0));
}

#[test]
fn merge_surfaces_diagnosis_disagreement_as_conflict() {
    let mut demo = row("sub-1");
    demo.diagnosis = Some("PD".to_string());
    let mut cog = row("sub-1");
    cog.diagnosis = Some("CN".to_string());

    let demographics = SubjectCollection::collapse(&[demo], SourceKind::Demographics);
    let cognition = SubjectCollection::collapse(&[cog], SourceKind::Cognition);
    let records = SubjectCollection::collapse(&[], SourceKind::Records);

    let merged = merge_sources(&demographics, &cognition, &records);
    assert!(merged[0].diagnosis.is_conflict());
    // The raw per-source label must not leak through the merged row.
    assert_eq!(merged[0].data.diagnosis, None);
}

#[test]
fn diagnosis_resolution_cases() {
    // No information at all
    assert_eq!(
        resolve_diagnosis([None::<&str>, None]),
        DiagnosisResolution::Missing
    );

    // Agreement, case-insensitively and with a missing source
    let resolved = resolve_diagnosis([Some("PD"), None, Some("pd ")]);
    assert_eq!(resolved.resolved(), Some("PD"));

    // Placeholder text counts as missing, not as a label
    let resolved = resolve_diagnosis([Some("nan"), Some("CN")]);
    assert_eq!(resolved.resolved(), Some("CN"));

    // Disagreement keeps every distinct label in first-seen order
    let conflict = resolve_diagnosis([Some("PD"), Some("CN"), Some("pd")]);
    match conflict {
        DiagnosisResolution::Conflict(labels) => {
            assert_eq!(labels.as_slice(), ["PD", "CN"]);
        }
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(
        resolve_diagnosis([Some("PD"), Some("CN")]).to_string(),
        "MISMATCH:PD|CN"
    );
}
