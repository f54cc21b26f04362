use std::io::{self, Write};
use std::path::Path;

use brainlat_cohort::survey::{self, load_manifest, render_verification, verify_manifest};
use brainlat_cohort::{AnalysisDataset, CohortError, ReaderConfig, ReportConfig, Result, report};
use log::{error, info};

const USAGE: &str = "Usage:
  brainlat-cohort report [data_dir]
      Run the full CSV analysis and print the report.
  brainlat-cohort survey <imaging_root> [data_dir] [availability_csv]
      Survey MRI modality availability under <imaging_root>, joined with
      the diagnoses from the CSV tables in [data_dir].
  brainlat-cohort verify <manifest.json> <eeg_root> [data_dir]
      Verify downloaded EEG folders against a remote-folder manifest.";

fn main() {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map_or("report", String::as_str);

    match command {
        "report" => run_report(args.get(1).map_or(".", String::as_str)),
        "survey" => {
            let imaging_root = args
                .get(1)
                .ok_or_else(|| CohortError::InputError(USAGE.to_string()))?;
            run_survey(
                imaging_root,
                args.get(2).map_or(".", String::as_str),
                args.get(3).map(String::as_str),
            )
        }
        "verify" => {
            let (Some(manifest), Some(eeg_root)) = (args.get(1), args.get(2)) else {
                return Err(CohortError::InputError(USAGE.to_string()));
            };
            run_verify(manifest, eeg_root, args.get(3).map_or(".", String::as_str))
        }
        // Bare `brainlat-cohort <dir>` keeps working as a report run.
        other if args.len() == 1 && Path::new(other).is_dir() => run_report(other),
        _ => Err(CohortError::InputError(USAGE.to_string())),
    }
}

fn load_dataset(data_dir: &str) -> Result<AnalysisDataset> {
    let data_dir = Path::new(data_dir);
    info!("Loading EEG source tables from: {}", data_dir.display());
    AnalysisDataset::load(data_dir, &ReaderConfig::default())
}

fn run_report(data_dir: &str) -> Result<()> {
    let dataset = load_dataset(data_dir)?;
    let config = ReportConfig::default();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::render(&mut out, &dataset, &config)?;
    Ok(())
}

fn run_survey(imaging_root: &str, data_dir: &str, availability_csv: Option<&str>) -> Result<()> {
    let dataset = load_dataset(data_dir)?;
    let config = ReportConfig::default();

    let mut records = survey::scan_modalities(Path::new(imaging_root))?;
    survey::attach_diagnoses(&mut records, &dataset.merged);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    survey::render_modality_summary(&mut out, &records, &config.case_label, &config.control_label)?;

    if let Some(path) = availability_csv {
        survey::write_availability_csv(&records, Path::new(path))?;
        writeln!(out, "Availability table written to: {path}")?;
    }
    Ok(())
}

fn run_verify(manifest_path: &str, eeg_root: &str, data_dir: &str) -> Result<()> {
    let dataset = load_dataset(data_dir)?;
    let manifest = load_manifest(Path::new(manifest_path))?;
    let results = verify_manifest(&manifest, &dataset, Path::new(eeg_root))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_verification(&mut out, &results)?;
    Ok(())
}
