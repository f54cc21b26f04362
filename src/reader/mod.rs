//! Module for reading delimited source tables into Arrow record batches.
//!
//! Files are read fully into memory (the largest source table is a few
//! hundred rows), decoded as UTF-8 with an optional Latin-1 retry, and
//! parsed with every column typed as `Utf8`. Typing is deliberately not
//! inferred: numeric coercion happens per designated column during
//! deserialization, where a parse failure becomes a missing value instead
//! of a read error.

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use log::{debug, warn};

use crate::config::ReaderConfig;
use crate::error::{CohortError, Result};
use crate::schema::{canonical_name, normalize_header};

/// Validates that a required input file exists
///
/// # Errors
/// Returns a fatal [`CohortError::InputError`] if the file is absent; per
/// the two-tier error design, a missing input file aborts before any report
/// is produced.
pub fn validate_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(CohortError::InputError(format!(
            "Required input file does not exist: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Validates that a directory exists and is a directory
///
/// # Errors
/// Returns an error if the directory does not exist or is not a directory
pub fn validate_directory(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(CohortError::InputError(format!(
            "Directory does not exist: {}",
            dir.display()
        )));
    }
    Ok(())
}

/// Read one delimited file into a single record batch with normalized,
/// canonical column names and every column typed `Utf8`.
///
/// # Errors
/// Fails if the file is missing or unreadable, or if the delimited content
/// is structurally malformed (inconsistent field counts). Per-value
/// problems never fail here; they surface later as missing values.
pub fn read_table(path: &Path, config: &ReaderConfig) -> Result<RecordBatch> {
    validate_file(path)?;
    let bytes = fs::read(path)?;
    let text = decode(bytes, config.latin1_fallback, path)?;

    let format = Format::default()
        .with_header(true)
        .with_delimiter(config.delimiter);

    // Infer only to recover the header row; the field types are discarded.
    let (inferred, _) = format.infer_schema(Cursor::new(text.as_bytes()), Some(1))?;
    let schema = normalized_schema(&inferred);
    debug!(
        "{}: {} columns: {:?}",
        path.display(),
        schema.fields().len(),
        schema.fields().iter().map(|f| f.name()).collect::<Vec<_>>()
    );

    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_batch_size(config.batch_size)
        .build(Cursor::new(text.as_bytes()))?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    let batch = arrow::compute::concat_batches(&schema, &batches)?;
    debug!("{}: {} rows", path.display(), batch.num_rows());
    Ok(batch)
}

/// Map every header through lexical normalization and the synonym table,
/// and force every column to nullable `Utf8`.
fn normalized_schema(inferred: &Schema) -> SchemaRef {
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|field| {
            let name = canonical_name(&normalize_header(field.name())).to_string();
            Field::new(name, DataType::Utf8, true)
        })
        .collect();
    Arc::new(Schema::new(fields))
}

/// Decode file content as UTF-8, retrying as Latin-1 when enabled.
///
/// Latin-1 maps each byte to the code point of the same value, so the
/// fallback cannot fail; it can only produce mojibake for content that was
/// neither encoding, which the normalizers treat as ordinary text.
fn decode(bytes: Vec<u8>, latin1_fallback: bool, path: &Path) -> Result<String> {
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) if latin1_fallback => {
            warn!(
                "{}: not valid UTF-8, falling back to Latin-1",
                path.display()
            );
            Ok(err.into_bytes().iter().map(|&b| char::from(b)).collect())
        }
        Err(err) => Err(CohortError::InputError(format!(
            "{}: invalid UTF-8 ({err})",
            path.display()
        ))),
    }
}
