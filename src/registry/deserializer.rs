//! Deserialization of normalized record batches into subject rows.
//!
//! All columns arrive typed `Utf8`; the designated numeric columns are
//! coerced value-by-value here, where a parse failure becomes a missing
//! value rather than an error.

use arrow::array::{Array, StringArray};
use arrow::record_batch::RecordBatch;
use log::debug;

use crate::error::CohortError;
use crate::models::SubjectRow;
use crate::registry::SourceKind;
use crate::schema::{self, normalize_id};

/// Errors at the batch-to-model seam
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    /// The table carries none of the recognized identifier columns
    #[error("{table} table has no identifier column (expected one of {expected:?})")]
    MissingIdColumn {
        /// Which source table was being deserialized
        table: &'static str,
        /// Accepted identifier column names, in priority order
        expected: [&'static str; 3],
    },

    /// A column existed but was not string-typed; the reader always
    /// produces `Utf8` columns, so this indicates a misconfigured batch
    #[error("{table} table: column '{column}' is not a string column")]
    ColumnType {
        /// Which source table was being deserialized
        table: &'static str,
        /// Offending column name
        column: String,
    },
}

impl From<DeserializeError> for CohortError {
    fn from(error: DeserializeError) -> Self {
        Self::SchemaError(error.to_string())
    }
}

/// Deserialize a normalized record batch into one [`SubjectRow`] per row.
///
/// Absent optional columns yield `None` for every row. Rows whose
/// identifier is missing or blank are kept here (their count is a reported
/// statistic); they are dropped at collapse time.
///
/// # Errors
/// Fails only when no identifier column is present, or when a present
/// column is not string-typed.
pub fn deserialize_batch(
    batch: &RecordBatch,
    kind: SourceKind,
) -> Result<Vec<SubjectRow>, DeserializeError> {
    let id_column = schema::ID_CANDIDATES
        .iter()
        .find_map(|name| string_column(batch, kind, name).transpose())
        .transpose()?
        .ok_or(DeserializeError::MissingIdColumn {
            table: kind.as_str(),
            expected: schema::ID_CANDIDATES,
        })?;

    let diagnosis = string_column(batch, kind, schema::DIAGNOSIS)?;
    let path = string_column(batch, kind, schema::PATH)?;
    let numeric: Vec<(&str, Option<&StringArray>)> = schema::NUMERIC_COLUMNS
        .iter()
        .map(|&name| Ok((name, string_column(batch, kind, name)?)))
        .collect::<Result<_, DeserializeError>>()?;

    let mut rows = Vec::with_capacity(batch.num_rows());
    for row_idx in 0..batch.num_rows() {
        let mut row = SubjectRow {
            subject_id: non_blank(id_column, row_idx).map(|raw| normalize_id(raw)),
            diagnosis: diagnosis
                .and_then(|col| non_blank(col, row_idx))
                .map(|raw| raw.trim().to_uppercase())
                .filter(|label| label != "NAN"),
            path: path
                .and_then(|col| non_blank(col, row_idx))
                .map(|raw| raw.trim().to_string()),
            ..SubjectRow::default()
        };

        if let Some(path_value) = row.path.as_deref() {
            row.site = schema::site_from_path(path_value);
            row.group_folder = schema::group_from_path(path_value);
        }

        for &(name, column) in &numeric {
            let value = column
                .and_then(|col| non_blank(col, row_idx))
                .and_then(coerce_numeric);
            set_numeric(&mut row, name, value);
        }

        rows.push(row);
    }

    debug!("{kind}: deserialized {} rows", rows.len());
    Ok(rows)
}

/// Coerce one raw value to a finite numeric; anything unparseable is
/// missing, never an error.
#[must_use]
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Look up a column by canonical name and downcast it to a string array.
///
/// An absent column is `Ok(None)` (silently skipped by contract); a present
/// column with a non-string type is an error.
fn string_column<'a>(
    batch: &'a RecordBatch,
    kind: SourceKind,
    name: &str,
) -> Result<Option<&'a StringArray>, DeserializeError> {
    let Some((index, _)) = batch.schema_ref().column_with_name(name) else {
        return Ok(None);
    };
    batch
        .column(index)
        .as_any()
        .downcast_ref::<StringArray>()
        .map(Some)
        .ok_or_else(|| DeserializeError::ColumnType {
            table: kind.as_str(),
            column: name.to_string(),
        })
}

/// A cell value, with nulls and blank strings treated as missing
fn non_blank(column: &StringArray, row: usize) -> Option<&str> {
    if column.is_null(row) {
        return None;
    }
    let value = column.value(row);
    if value.trim().is_empty() { None } else { Some(value) }
}

fn set_numeric(row: &mut SubjectRow, name: &str, value: Option<f64>) {
    match name {
        "age" => row.age = value,
        "years_education" => row.years_education = value,
        "sex" => row.sex = value,
        "laterality" => row.laterality = value,
        "moca_total" => row.moca_total = value,
        "ifs_total_score" => row.ifs_total_score = value,
        "mmse" => row.mmse = value,
        "t1" => row.t1 = value,
        "rest" => row.rest = value,
        "dwi" => row.dwi = value,
        "mf" => row.mf = value,
        "eeg" => row.eeg = value,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(coerce_numeric("28"), Some(28.0));
        assert_eq!(coerce_numeric(" 27.5 "), Some(27.5));
        assert_eq!(coerce_numeric("abc"), None);
        assert_eq!(coerce_numeric("NaN"), None);
        assert_eq!(coerce_numeric(""), None);
    }
}
