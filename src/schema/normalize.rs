//! Header and identifier normalization.
//!
//! Both functions are pure and idempotent: applying them to an already
//! normalized value returns it unchanged.

/// Normalize a raw column header to its canonical lexical form.
///
/// Strips surrounding whitespace and a byte-order mark, replaces each run of
/// whitespace with a single underscore, replaces path separators with
/// underscores, drops every remaining character that is not alphanumeric or
/// an underscore, trims leading/trailing underscores and lower-cases the
/// result.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    let stripped = raw.trim().trim_start_matches('\u{feff}');

    let mut out = String::with_capacity(stripped.len());
    let mut in_whitespace = false;
    for ch in stripped.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('_');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        let mapped = if ch == '/' || ch == '\\' { '_' } else { ch };
        if mapped == '_' || mapped.is_ascii_alphanumeric() {
            out.push(mapped.to_ascii_lowercase());
        }
    }

    out.trim_matches('_').to_string()
}

/// Normalize a subject identifier by removing every whitespace character,
/// internal ones included (guards against ids like `"  sub-40005  "`).
#[must_use]
pub fn normalize_id(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header_variants() {
        assert_eq!(normalize_header("id EEG"), "id_eeg");
        assert_eq!(normalize_header("  Years Education "), "years_education");
        assert_eq!(normalize_header("\u{feff}diagnosis"), "diagnosis");
        assert_eq!(normalize_header("MoCA (total)"), "moca_total");
        assert_eq!(normalize_header("t1/rest"), "t1_rest");
    }

    #[test]
    fn test_normalize_header_idempotent() {
        for raw in ["id EEG", "  Years Education ", "MoCA (total)", "path"] {
            let once = normalize_header(raw);
            assert_eq!(normalize_header(&once), once);
        }
    }

    #[test]
    fn test_normalize_id_strips_all_whitespace() {
        assert_eq!(normalize_id(" sub-40005 "), "sub-40005");
        assert_eq!(normalize_id("sub -  40005"), "sub-40005");
        assert!(!normalize_id(" a b\tc ").contains(char::is_whitespace));
    }
}
