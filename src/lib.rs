//! A Rust library for building a PD vs CN classification cohort from the
//! BrainLat CSV tables, with column/identifier normalization, per-table
//! duplicate collapse, multi-source outer join with diagnosis
//! reconciliation, and data-quality reporting.

pub mod algorithm;
pub mod collections;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod reader;
pub mod registry;
pub mod report;
pub mod schema;
pub mod survey;

// Re-export the most common types for easier use
// Core types
pub use config::{ReaderConfig, ReportConfig};
pub use error::{CohortError, Result};
pub use loader::{AnalysisDataset, LoadedSource};
pub use models::{DiagnosisResolution, Subject, SubjectRow, resolve_diagnosis};

// Pipeline stages
pub use collections::{SubjectCollection, merge_sources};
pub use registry::{SourceKind, load_source};

// Cohort selection and statistics
pub use algorithm::{Cohort, NumericSummary, filter_cohort};

// Arrow types
pub use arrow::record_batch::RecordBatch;
