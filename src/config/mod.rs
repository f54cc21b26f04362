//! Configuration for reading source tables and rendering reports.

/// Configuration for reading delimited source tables
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Field delimiter
    pub delimiter: u8,
    /// Whether to retry a failed UTF-8 decode as Latin-1
    pub latin1_fallback: bool,
    /// Number of rows per record batch
    pub batch_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            latin1_fallback: true,
            batch_size: 8192,
        }
    }
}

/// Configuration for the text report
///
/// Display state is explicit per report; every rendering function receives
/// this struct instead of consulting globals.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Width of section banners
    pub section_width: usize,
    /// Decimal places for means and standard deviations
    pub float_precision: usize,
    /// Diagnosis label of the case group
    pub case_label: String,
    /// Diagnosis label of the control group
    pub control_label: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            section_width: 100,
            float_precision: 1,
            case_label: "PD".to_string(),
            control_label: "CN".to_string(),
        }
    }
}
