//! Structured text report rendering.
//!
//! Presentation only: every statistic is computed in `algorithm` and
//! rendered here. All formatting state lives in [`ReportConfig`]; nothing
//! is process-global.

use std::io::Write;

use chrono::Local;

use crate::algorithm::cohort::{GroupSummary, summarize_group};
use crate::algorithm::stats::{BinarySplit, NumericSummary, SiteCrossTab, diagnosis_counts};
use crate::algorithm::validate::{
    self, Completeness, check_flags, check_score_ranges, completeness, education_range, mf_values,
    sex_values, suspicious_ages,
};
use crate::algorithm::{Cohort, filter_cohort};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::loader::AnalysisDataset;
use crate::models::SubjectRow;
use crate::registry::SourceKind;

/// Fields shown in the per-file profiles, in display order
const PROFILE_FIELDS: [&str; 16] = [
    "subject_id",
    "diagnosis",
    "path",
    "age",
    "years_education",
    "sex",
    "laterality",
    "moca_total",
    "ifs_total_score",
    "mmse",
    "t1",
    "rest",
    "dwi",
    "mf",
    "eeg",
    "site",
];

/// Render the full analysis report for a loaded dataset.
///
/// # Errors
/// Fails only on an I/O error of the output stream.
pub fn render<W: Write>(w: &mut W, dataset: &AnalysisDataset, config: &ReportConfig) -> Result<()> {
    section(w, "EEG DATASET - COMPREHENSIVE CSV ANALYSIS", config)?;
    writeln!(
        w,
        "Analysis Date: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;

    render_file_structure(w, dataset, config)?;
    render_diagnosis_distribution(w, dataset, config)?;

    let cohort = filter_cohort(
        &dataset.merged,
        &config.case_label,
        &config.control_label,
    );
    render_cohort(w, dataset, &cohort, config)?;
    render_completeness(w, &cohort, config)?;
    render_validation(w, dataset, &cohort, config)?;
    render_summary(w, dataset, &cohort, config)?;

    section(w, "ANALYSIS COMPLETE", config)?;
    Ok(())
}

fn render_file_structure<W: Write>(
    w: &mut W,
    dataset: &AnalysisDataset,
    config: &ReportConfig,
) -> Result<()> {
    section(w, "PART 1: FILE STRUCTURE & DATA INTEGRITY", config)?;
    for (i, source) in dataset.sources.iter().enumerate() {
        subsection(w, &format!("1.{} {} ({})", i + 1, source.label, source.file_name))?;
        profile(w, &source.rows)?;
    }
    Ok(())
}

fn profile<W: Write>(w: &mut W, rows: &[SubjectRow]) -> Result<()> {
    writeln!(w, "   Rows: {}", rows.len())?;

    writeln!(w, "\n   Missing Values:")?;
    for field in PROFILE_FIELDS {
        let present = rows.iter().filter(|row| field_present(row, field)).count();
        let missing = rows.len() - present;
        if present == 0 {
            writeln!(w, "      {field:<20} (column absent)")?;
            continue;
        }
        let pct = if rows.is_empty() {
            0.0
        } else {
            missing as f64 / rows.len() as f64 * 100.0
        };
        writeln!(w, "      {field:<20} {missing:>5} ({pct:>5.1}%)")?;
    }

    let mut unique = std::collections::HashSet::new();
    let with_id = rows
        .iter()
        .filter_map(|row| row.subject_id.as_deref())
        .inspect(|id| {
            unique.insert((*id).to_string());
        })
        .count();
    writeln!(w, "\n   Duplicate ids: {}", with_id - unique.len())?;
    writeln!(w, "   Unique subjects: {}", unique.len())?;
    Ok(())
}

fn field_present(row: &SubjectRow, field: &str) -> bool {
    match field {
        "subject_id" => row.subject_id.is_some(),
        "diagnosis" => row.diagnosis.is_some(),
        "path" => row.path.is_some(),
        "site" => row.site.is_some(),
        "group_folder" => row.group_folder.is_some(),
        numeric => row.numeric_field(numeric).is_some(),
    }
}

fn render_diagnosis_distribution<W: Write>(
    w: &mut W,
    dataset: &AnalysisDataset,
    config: &ReportConfig,
) -> Result<()> {
    section(w, "PART 2: DIAGNOSIS DISTRIBUTION", config)?;
    for (i, source) in dataset.sources.iter().enumerate() {
        subsection(w, &format!("2.{} {}", i + 1, source.label))?;
        let (counts, missing) = diagnosis_counts(&source.rows);
        let total = source.rows.len();
        writeln!(w, "\n   Total rows: {total}")?;
        if counts.is_empty() && missing == total {
            writeln!(w, "   No diagnosis values in this file.")?;
            continue;
        }
        for (label, count) in &counts {
            writeln!(w, "   {:<10} {:>4} ({:>5.1}%)", label, count, pct(*count, total))?;
        }
        if missing > 0 {
            writeln!(w, "   {:<10} {:>4} ({:>5.1}%)", "<missing>", missing, pct(missing, total))?;
        }
    }
    Ok(())
}

fn render_cohort<W: Write>(
    w: &mut W,
    dataset: &AnalysisDataset,
    cohort: &Cohort<'_>,
    config: &ReportConfig,
) -> Result<()> {
    let case = &config.case_label;
    let control = &config.control_label;
    section(
        w,
        &format!("PART 3: {case} vs {control} CLASSIFICATION DATASET (EEG)"),
        config,
    )?;

    let n_case = cohort.cases().len();
    let n_control = cohort.controls().len();
    writeln!(w, "\n   Target Population: {} subjects", cohort.subjects.len())?;
    writeln!(w, "   - {case}: {n_case} subjects")?;
    writeln!(w, "   - {control}: {n_control} subjects")?;
    match cohort.class_ratio() {
        Some(ratio) => writeln!(w, "   - Class ratio: 1:{ratio:.2} ({case}:{control})")?,
        None => writeln!(w, "   - Class ratio: undefined (no {case} subjects)")?,
    }

    let conflicted: Vec<_> = dataset
        .merged
        .iter()
        .filter(|s| s.diagnosis.is_conflict())
        .collect();
    writeln!(
        w,
        "   - Diagnosis mismatches in merged table: {}",
        conflicted.len()
    )?;
    for subject in &conflicted {
        writeln!(w, "        {}: {}", subject.id, subject.diagnosis)?;
    }

    let summaries = [
        summarize_group(&cohort.cases(), case),
        summarize_group(&cohort.controls(), control),
    ];

    subsection(w, &format!("3.1 Demographics Comparison ({case} vs {control})"))?;
    for group in &summaries {
        render_group_demographics(w, group, config)?;
    }

    subsection(w, &format!("3.2 Cognitive Scores ({case} vs {control})"))?;
    writeln!(w, "\n   MoCA Scores (Max: 30, Cutoff: <26 indicates impairment):")?;
    for group in &summaries {
        render_score(w, &group.label, group.moca.as_ref(), config)?;
    }
    writeln!(w, "\n   IFS Scores (Max: 30, Cutoff: <25 indicates frontal impairment):")?;
    for group in &summaries {
        render_score(w, &group.label, group.ifs.as_ref(), config)?;
    }
    writeln!(w, "\n   MMSE Scores (Max: 30):")?;
    for group in &summaries {
        render_score(w, &group.label, group.mmse.as_ref(), config)?;
    }

    subsection(w, "3.3 Recruitment Sites (from path -> site)")?;
    let crosstab = SiteCrossTab::build(cohort.subjects.iter().copied(), case, control);
    if crosstab.rows.is_empty() {
        writeln!(w, "   No site info available (missing 'path' column).")?;
    } else {
        writeln!(w, "\n   {:<8} {:>6} {:>6} {:>7}", "site", case, control, "Total")?;
        for (site, (n_case, n_control)) in &crosstab.rows {
            writeln!(
                w,
                "   {:<8} {:>6} {:>6} {:>7}",
                site,
                n_case,
                n_control,
                n_case + n_control
            )?;
        }
        let (total_case, total_control) = crosstab.totals();
        writeln!(
            w,
            "   {:<8} {:>6} {:>6} {:>7}",
            "TOTAL",
            total_case,
            total_control,
            total_case + total_control
        )?;
        if crosstab.without_site > 0 {
            writeln!(w, "   (no site code: {} subjects)", crosstab.without_site)?;
        }
    }
    Ok(())
}

fn render_group_demographics<W: Write>(
    w: &mut W,
    group: &GroupSummary,
    config: &ReportConfig,
) -> Result<()> {
    writeln!(w, "\n   {}:", group.label)?;
    writeln!(w, "      Sample size: {} subjects", group.n)?;

    match &group.age {
        Some(age) => writeln!(
            w,
            "      Age: {} years (range: {:.0}-{:.0})",
            mean_std(age, config),
            age.min,
            age.max
        )?,
        None => writeln!(w, "      Age: No data available")?,
    }

    match &group.sex {
        Some(sex) => {
            let males = sex.positive;
            let females = sex.n - males;
            let male_pct = BinarySplit::percentage_of(males, sex.n).unwrap_or(0.0);
            let female_pct = BinarySplit::percentage_of(females, sex.n).unwrap_or(0.0);
            writeln!(
                w,
                "      Sex: {males} male ({male_pct:.1}%), {females} female ({female_pct:.1}%)"
            )?;
        }
        None => writeln!(w, "      Sex: No data available")?,
    }

    match &group.education {
        Some(edu) => writeln!(
            w,
            "      Education: {} years (N={})",
            mean_std(edu, config),
            edu.n
        )?,
        None => writeln!(w, "      Education: No data available")?,
    }
    Ok(())
}

fn render_score<W: Write>(
    w: &mut W,
    label: &str,
    score: Option<&NumericSummary>,
    config: &ReportConfig,
) -> Result<()> {
    match score {
        Some(s) => writeln!(
            w,
            "      {label}: {} (N={}, range: {:.0}-{:.0})",
            mean_std(s, config),
            s.n,
            s.min,
            s.max
        )?,
        None => writeln!(w, "      {label}: No data available")?,
    }
    Ok(())
}

fn render_completeness<W: Write>(
    w: &mut W,
    cohort: &Cohort<'_>,
    config: &ReportConfig,
) -> Result<()> {
    section(w, "PART 4: DATA COMPLETENESS ANALYSIS", config)?;

    subsection(w, "4.1 Available Data for Cohort Subjects")?;
    let overall = completeness(cohort.subjects.iter().copied());
    writeln!(w, "\n   Total cohort subjects: {}", overall.total)?;
    writeln!(w, "\n   Demographics only:")?;
    completeness_line(
        w,
        "Complete (Age, Sex, Years Education)",
        overall.complete_demographics,
        &overall,
    )?;
    writeln!(w, "\n   Cognitive scores:")?;
    completeness_line(w, "With MoCA", overall.with_moca, &overall)?;
    completeness_line(w, "With IFS", overall.with_ifs, &overall)?;
    completeness_line(w, "With both MoCA & IFS", overall.with_both_scores, &overall)?;
    writeln!(w, "\n   Complete cases:")?;
    completeness_line(
        w,
        "All core data (Demo + MoCA + IFS)",
        overall.complete_core,
        &overall,
    )?;

    subsection(w, "4.2 Completeness by Diagnosis")?;
    for label in [&config.case_label, &config.control_label] {
        let group = cohort.group(label);
        let report = completeness(group.iter().copied());
        writeln!(w, "\n   {label}:")?;
        writeln!(w, "      Total: {}", report.total)?;
        match report.percentage(report.complete_core) {
            Some(p) => writeln!(w, "      Complete: {} ({p:.1}%)", report.complete_core)?,
            None => writeln!(w, "      Complete: no subjects")?,
        }
        writeln!(
            w,
            "      Missing core data: {} subjects",
            report.total - report.complete_core
        )?;
    }
    Ok(())
}

fn completeness_line<W: Write>(
    w: &mut W,
    label: &str,
    count: usize,
    report: &Completeness,
) -> Result<()> {
    match report.percentage(count) {
        Some(p) => writeln!(w, "      {label}: {count} / {} ({p:.1}%)", report.total)?,
        None => writeln!(w, "      {label}: no subjects")?,
    }
    Ok(())
}

fn render_validation<W: Write>(
    w: &mut W,
    dataset: &AnalysisDataset,
    cohort: &Cohort<'_>,
    config: &ReportConfig,
) -> Result<()> {
    section(w, "PART 5: DATA VALIDATION", config)?;
    subsection(w, "5.1 Quality Checks")?;

    let merged = &dataset.merged;
    writeln!(
        w,
        "   -> Suspicious age values (<{:.0} or >{:.0}): {}",
        validate::AGE_WINDOW.0,
        validate::AGE_WINDOW.1,
        suspicious_ages(merged)
    )?;

    let sex = sex_values(merged);
    if sex.values.is_empty() {
        writeln!(w, "   -> Sex: no values present")?;
    } else {
        writeln!(
            w,
            "   -> Sex values: {:?} (0=Female, 1=Male expected)",
            sex.values
        )?;
        if !sex.ok {
            writeln!(w, "      Warning: Unexpected sex values found")?;
        }
    }

    match education_range(merged) {
        Some((min, max)) => writeln!(w, "   -> Education range: {min:.0} - {max:.0} years")?,
        None => writeln!(w, "   -> Education: all values missing")?,
    }

    for check in check_score_ranges(merged) {
        writeln!(
            w,
            "   -> {} out of range ({:.0}-{:.0}): {} (of {} present)",
            check.rule.column, check.rule.min, check.rule.max, check.out_of_range, check.n
        )?;
    }

    subsection(w, "5.2 Records sanity (0/1 flags)")?;
    for check in check_flags(merged) {
        writeln!(
            w,
            "   -> {:<4} unique values: {:?} (0/1 expected) OK={}",
            check.column.to_uppercase(),
            check.values,
            check.ok
        )?;
    }
    let mf = mf_values(merged);
    if !mf.is_empty() {
        writeln!(w, "   -> MF unique values: {mf:?}")?;
    }

    subsection(w, "5.3 Data Integrity Summary")?;
    for (kind, collection) in [
        (SourceKind::Demographics, &dataset.demographics),
        (SourceKind::Cognition, &dataset.cognition),
        (SourceKind::Records, &dataset.records),
    ] {
        writeln!(
            w,
            "   -> {:<13} {:>5} rows (collapsed to {:>4} unique subjects, {} dropped without id)",
            format!("{kind}:"),
            dataset.raw_rows(kind),
            collection.len(),
            collection.dropped_without_id()
        )?;
    }
    writeln!(w, "   -> Master merged: {} unique subjects", merged.len())?;
    writeln!(
        w,
        "   -> {} subjects (cohort): {}",
        config.case_label,
        cohort.cases().len()
    )?;
    writeln!(
        w,
        "   -> {} subjects (cohort): {}",
        config.control_label,
        cohort.controls().len()
    )?;
    Ok(())
}

fn render_summary<W: Write>(
    w: &mut W,
    dataset: &AnalysisDataset,
    cohort: &Cohort<'_>,
    config: &ReportConfig,
) -> Result<()> {
    section(w, "PART 6: SUMMARY", config)?;
    subsection(w, "6.1 Dataset Summary")?;

    let conflicts = dataset
        .merged
        .iter()
        .filter(|s| s.diagnosis.is_conflict())
        .count();
    let unresolved = dataset
        .merged
        .iter()
        .filter(|s| s.diagnosis.resolved().is_none() && !s.diagnosis.is_conflict())
        .count();

    writeln!(w, "\n   Total unique subjects: {}", dataset.merged.len())?;
    writeln!(
        w,
        "   Diagnoses (reconciled): {}={}, {}={}, mismatched={}, missing={}",
        config.case_label,
        cohort.cases().len(),
        config.control_label,
        cohort.controls().len(),
        conflicts,
        unresolved
    )?;
    writeln!(
        w,
        "\n   Classification subset ({}+{}): {} subjects",
        config.case_label,
        config.control_label,
        cohort.subjects.len()
    )?;

    if conflicts > 0 {
        writeln!(
            w,
            "\n   Note: investigate the {conflicts} subject(s) with conflicting diagnosis labels\n   across sources before using the cohort for modeling."
        )?;
    }
    Ok(())
}

/// Write a full-width section banner
fn section<W: Write>(w: &mut W, title: &str, config: &ReportConfig) -> Result<()> {
    let width = config.section_width;
    writeln!(w, "\n{}", "=".repeat(width))?;
    writeln!(w, "{title:^width$}")?;
    writeln!(w, "{}", "=".repeat(width))?;
    Ok(())
}

/// Write a subsection heading underlined to its own length
fn subsection<W: Write>(w: &mut W, title: &str) -> Result<()> {
    writeln!(w, "\n{title}")?;
    writeln!(w, "{}", "-".repeat(title.chars().count()))?;
    Ok(())
}

fn mean_std(summary: &NumericSummary, config: &ReportConfig) -> String {
    let p = config.float_precision;
    match summary.std {
        Some(std) => format!("{:.p$} \u{b1} {:.p$}", summary.mean, std),
        None => format!("{:.p$} \u{b1} n/a", summary.mean),
    }
}

fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
