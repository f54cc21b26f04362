//! Subject collections keyed by canonical identifier.
//!
//! A [`SubjectCollection`] holds the collapsed form of one source table:
//! exactly one row per subject, in order of first appearance. Row order is
//! load-bearing: the collapse rule is "first non-missing value wins, per
//! column independently", so the collection preserves source read order
//! instead of relying on map iteration order.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::hash_map::Entry;

use log::warn;

use crate::models::{Subject, SubjectRow, resolve_diagnosis};
use crate::registry::SourceKind;

/// One source table collapsed to one row per canonical subject identifier
#[derive(Debug, Default)]
pub struct SubjectCollection {
    rows: Vec<SubjectRow>,
    index: FxHashMap<String, usize>,
    dropped_without_id: usize,
}

impl SubjectCollection {
    /// Collapse raw rows into one row per subject.
    ///
    /// Rows are grouped by identifier in order of first appearance; within
    /// a group, each non-identifier column independently takes the first
    /// non-missing value in row order. Rows without an identifier are
    /// dropped and counted.
    #[must_use]
    pub fn collapse(raw_rows: &[SubjectRow], kind: SourceKind) -> Self {
        let mut rows: Vec<SubjectRow> = Vec::new();
        let mut index = FxHashMap::default();
        let mut dropped_without_id = 0;

        for row in raw_rows {
            let Some(id) = row.subject_id.clone().filter(|id| !id.is_empty()) else {
                dropped_without_id += 1;
                continue;
            };
            match index.entry(id) {
                Entry::Occupied(entry) => {
                    let existing: &mut SubjectRow = &mut rows[*entry.get()];
                    existing.fill_missing_from(row);
                }
                Entry::Vacant(entry) => {
                    entry.insert(rows.len());
                    rows.push(row.clone());
                }
            }
        }

        if dropped_without_id > 0 {
            warn!("{kind}: dropped {dropped_without_id} rows without a subject identifier");
        }

        Self {
            rows,
            index,
            dropped_without_id,
        }
    }

    /// Number of unique subjects
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the collection holds no subjects
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows dropped at collapse time for lacking an identifier
    #[must_use]
    pub const fn dropped_without_id(&self) -> usize {
        self.dropped_without_id
    }

    /// Look up the collapsed row for a subject
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SubjectRow> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    /// Collapsed rows in order of first appearance
    pub fn iter(&self) -> impl Iterator<Item = &SubjectRow> {
        self.rows.iter()
    }

    /// Subject identifiers in order of first appearance
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().filter_map(|row| row.subject_id.as_deref())
    }
}

/// Full outer join of the three collapsed source tables on the canonical
/// identifier, with diagnosis reconciliation.
///
/// Every subject present in any source appears exactly once. Identifier
/// order is demographics order, then cognition-only subjects, then
/// records-only subjects. Non-diagnosis attributes merge first-non-missing
/// in that same source priority order; diagnosis labels from all sources go
/// through [`resolve_diagnosis`] instead, so a disagreement surfaces as a
/// conflict rather than being silently won by one source.
#[must_use]
pub fn merge_sources(
    demographics: &SubjectCollection,
    cognition: &SubjectCollection,
    records: &SubjectCollection,
) -> Vec<Subject> {
    let mut order: Vec<String> = Vec::new();
    let mut seen = FxHashSet::default();
    for source in [demographics, cognition, records] {
        for id in source.ids() {
            if seen.insert(id.to_string()) {
                order.push(id.to_string());
            }
        }
    }

    let mut subjects = Vec::with_capacity(order.len());
    for id in order {
        let parts = [
            demographics.get(&id),
            cognition.get(&id),
            records.get(&id),
        ];

        let diagnosis = resolve_diagnosis(
            parts
                .iter()
                .map(|part| part.and_then(|row| row.diagnosis.as_deref())),
        );

        let mut data = SubjectRow {
            subject_id: Some(id.clone()),
            ..SubjectRow::default()
        };
        for part in parts.into_iter().flatten() {
            data.fill_missing_from(part);
        }
        // The reconciled resolution is authoritative; drop the raw label so
        // nothing downstream can read a silently-picked winner.
        data.diagnosis = None;

        subjects.push(Subject {
            id,
            diagnosis,
            data,
        });
    }

    subjects
}
