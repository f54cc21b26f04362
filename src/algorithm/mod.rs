//! Algorithms over the reconciled subject table: cohort selection,
//! descriptive statistics and data-quality validation.

pub mod cohort;
pub mod stats;
pub mod validate;

pub use cohort::{Cohort, filter_cohort};
pub use stats::{BinarySplit, NumericSummary, SiteCrossTab};
