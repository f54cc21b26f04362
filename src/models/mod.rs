//! Domain models for the cohort pipeline.

pub mod diagnosis;
pub mod row;
pub mod subject;

pub use diagnosis::{DiagnosisResolution, resolve_diagnosis};
pub use row::SubjectRow;
pub use subject::Subject;
