//! Shared fixtures for the integration tests.
//!
//! `write_fixture` materializes a small but complete six-file BrainLat EEG
//! release in a temporary directory: two sites, five subjects, one
//! cross-table diagnosis disagreement, one records-only subject, one
//! unparseable numeric cell and one cognitive score outside its domain.

use std::fs;
use std::path::Path;

use brainlat_cohort::{AnalysisDataset, ReaderConfig, Result};

/// Subject with a diagnosis disagreement between demographics and cognition
#[allow(dead_code)]
pub const CONFLICT_ID: &str = "sub-40001";
/// Subject present only in the records table
#[allow(dead_code)]
pub const RECORDS_ONLY_ID: &str = "sub-10003";

#[allow(dead_code)]
pub fn write_fixture(dir: &Path) {
    // Header spellings and the padded identifier are intentionally messy;
    // the reader has to canonicalize them.
    let files: [(&str, &str); 6] = [
        (
            "demographics_hc_eeg_data.csv",
            "id EEG,diagnosis,age,sex,years_education,path\n\
             sub-10001,CN,65,0,,5_HC/CL\n\
             sub-10001,CN,,0,12,5_HC/CL\n\
             sub-10002 ,CN,70,1,10,5_HC/AR\n",
        ),
        (
            "Demographics_PD_EEG_data.csv",
            "id EEG,diagnosis,age,sex,years_education,path\n\
             sub-40001,PD,61,1,14,3_PD/CL\n\
             sub-40002,PD,59,0,9,3_PD/AR\n",
        ),
        (
            "cognition_hc_eeg_data.csv",
            "ID eeg,diagnosis,moca_total,ifs_total_score\n\
             sub-10001,cn,28,27\n\
             sub-10002,CN,35,24\n",
        ),
        (
            "Cognition_PD_EEG_data.csv",
            "id EEG,diagnosis,moca_total,ifs_total_score\n\
             sub-40001,CN,22,20\n\
             sub-40002,PD,abc,21\n",
        ),
        (
            "records_hc_eeg_data.csv",
            "id EEG,diagnosis,eeg,t1,path\n\
             sub-10001,CN,1,1,5_HC/CL\n\
             sub-10002,CN,1,0,5_HC/AR\n\
             sub-10003,CN,1,1,5_HC/CL\n",
        ),
        (
            "Records_PD_EEG_data.csv",
            "id EEG,diagnosis,eeg,t1,path\n\
             sub-40001,PD,1,1,3_PD/CL\n\
             sub-40002,PD,1,1,3_PD/AR\n",
        ),
    ];
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

#[allow(dead_code)]
pub fn load_fixture(dir: &Path) -> Result<AnalysisDataset> {
    write_fixture(dir);
    AnalysisDataset::load(dir, &ReaderConfig::default())
}
