//! Header and identifier normalization behavior.

use brainlat_cohort::schema::{
    canonical_name, group_from_path, normalize_header, normalize_id, site_from_path,
};

#[test]
fn header_normalization_canonicalizes_messy_spellings() {
    assert_eq!(normalize_header(" ID  EEG "), "id_eeg");
    assert_eq!(normalize_header("\u{feff}id EEG"), "id_eeg");
    assert_eq!(normalize_header("Years Education"), "years_education");
    assert_eq!(normalize_header("T1/rest"), "t1_rest");
    assert_eq!(normalize_header("Age (years)"), "age_years");
    assert_eq!(normalize_header("__diagnosis__"), "diagnosis");
}

#[test]
fn header_normalization_is_idempotent() {
    for raw in [
        " ID  EEG ",
        "\u{feff}Age (years)",
        "T1/rest",
        "moca_total",
        "Sitio / Site",
    ] {
        let once = normalize_header(raw);
        assert_eq!(normalize_header(&once), once, "not idempotent for {raw:?}");
    }
}

#[test]
fn canonical_name_collapses_identifier_variants() {
    assert_eq!(canonical_name("ideeg"), "id_eeg");
    assert_eq!(canonical_name("id_eeg"), "id_eeg");
    assert_eq!(canonical_name("eeg_id"), "id_eeg");
    assert_eq!(canonical_name("idmri"), "id_mri");
    assert_eq!(canonical_name("moca_total"), "moca_total");
}

#[test]
fn id_normalization_strips_all_whitespace() {
    assert_eq!(normalize_id(" sub-40005 "), "sub-40005");
    assert_eq!(normalize_id("sub - 400 05"), "sub-40005");
    assert_eq!(normalize_id("sub-40005\t"), "sub-40005");
    assert_eq!(normalize_id("sub-40005"), "sub-40005");
}

#[test]
fn id_normalization_is_idempotent() {
    let once = normalize_id(" sub 123 ");
    assert_eq!(normalize_id(&once), once);
}

#[test]
fn path_fields_yield_site_and_group() {
    assert_eq!(site_from_path("3_PD/CL"), Some("CL".to_string()));
    assert_eq!(site_from_path("5_HC\\AR"), Some("AR".to_string()));
    assert_eq!(site_from_path("3_PD/cl"), Some("CL".to_string()));
    assert_eq!(site_from_path(""), None);
    assert_eq!(group_from_path("3_PD/CL"), Some("3_PD".to_string()));
    assert_eq!(group_from_path(" 5_HC / AR "), Some("5_HC".to_string()));
}
