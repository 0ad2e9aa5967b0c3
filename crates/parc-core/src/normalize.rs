//! Normalizer: turns free-form spreadsheet text into comparable keys.
//!
//! Every function here is pure and total. Absent cells are passed as `None`;
//! plain `&str` arguments convert automatically, so both
//! `normalize_text("ab")` and `normalize_text(None)` read naturally.

/// Textual placeholders treated as an absent value, compared after
/// [`normalize_text`].
pub const BLANK_SENTINELS: &[&str] = &["", "NAN", "NONE", "NULL", "(VIDE)"];

/// Trim and uppercase. An absent value becomes the empty string.
pub fn normalize_text<'a>(s: impl Into<Option<&'a str>>) -> String {
    s.into().unwrap_or_default().trim().to_uppercase()
}

/// [`normalize_text`], then keep only ASCII letters and digits.
///
/// `"AB-123-CD"`, `"ab 123 cd"` and `"AB123CD"` all become `"AB123CD"`.
pub fn normalize_registration<'a>(s: impl Into<Option<&'a str>>) -> String {
    normalize_text(s)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// True when the value is absent or one of the [`BLANK_SENTINELS`].
pub fn is_blank<'a>(x: impl Into<Option<&'a str>>) -> bool {
    BLANK_SENTINELS.contains(&normalize_text(x).as_str())
}

/// Serial numbers: trimmed, uppercased, whitespace runs collapsed to one
/// space. Blank values become the empty string.
pub fn clean_serial<'a>(v: impl Into<Option<&'a str>>) -> String {
    let collapsed = normalize_text(v)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if is_blank(collapsed.as_str()) {
        String::new()
    } else {
        collapsed
    }
}

/// Comments: trimmed, case preserved. Blank values become the empty string.
pub fn clean_comment<'a>(v: impl Into<Option<&'a str>>) -> String {
    let trimmed = v.into().unwrap_or_default().trim();
    if is_blank(trimmed) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Fleet codes and plates: [`normalize_text`], blank sentinels collapsed.
pub(crate) fn clean_code(v: Option<&str>) -> String {
    let code = normalize_text(v);
    if is_blank(code.as_str()) {
        String::new()
    } else {
        code
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn absent_is_empty() {
        assert_eq!(normalize_text(None), "");
        assert_eq!(normalize_registration(None), "");
        assert!(is_blank(None));
    }

    #[test]
    fn text_is_trimmed_and_uppercased() {
        assert_eq!(normalize_text("  pelle Bassin \t"), "PELLE BASSIN");
    }

    #[rstest]
    #[case("AB-123-CD")]
    #[case("AB 123 CD")]
    #[case("ab123cd")]
    #[case(" ab.123/cd ")]
    fn plates_compare_equal(#[case] plate: &str) {
        assert_eq!(normalize_registration(plate), "AB123CD");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("nan")]
    #[case("None")]
    #[case("NULL")]
    #[case(" (vide) ")]
    fn sentinels_are_blank(#[case] value: &str) {
        assert!(is_blank(value));
    }

    #[test]
    fn real_values_are_not_blank() {
        assert!(!is_blank("H01100M"));
        assert!(!is_blank("NANTES"));
    }

    #[test]
    fn serial_collapses_whitespace() {
        assert_eq!(clean_serial("  ab   12\t34 "), "AB 12 34");
        assert_eq!(clean_serial("nan"), "");
        assert_eq!(clean_serial(None), "");
    }

    #[test]
    fn comment_keeps_case() {
        assert_eq!(clean_comment("  en réparation "), "en réparation");
        assert_eq!(clean_comment("(VIDE)"), "");
    }

    #[test]
    fn code_sentinels_collapse() {
        assert_eq!(clean_code(Some(" x001l ")), "X001L");
        assert_eq!(clean_code(Some("none")), "");
    }
}
