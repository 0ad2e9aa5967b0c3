//! Normalizer integration harness.
//!
//! # What this covers
//!
//! - **Plate keys**: every common spelling of a plate reduces to the same key.
//! - **Blank sentinels**: `nan`, `None`, `(vide)` and friends count as absent.
//! - **Serials and comments**: whitespace collapsing, case handling, blanks.
//! - **Property: idempotence** of `normalize_text` and
//!   `normalize_registration`.
//!
//! # Running
//!
//! ```sh
//! cargo test --test normalization_harness
//! ```

use parc_core::normalize::{
    clean_comment, clean_serial, is_blank, normalize_registration, normalize_text,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

// ---------------------------------------------------------------------------
// Registration plates
// ---------------------------------------------------------------------------

#[rstest]
#[case("AB-123-CD")]
#[case("AB 123 CD")]
#[case("AB123CD")]
#[case("  ab-123 cd ")]
#[case("ab.123/cd")]
fn plate_spellings_share_one_key(#[case] raw: &str) {
    assert_eq!(normalize_registration(raw), "AB123CD");
}

#[test]
fn absent_plate_is_empty() {
    assert_eq!(normalize_registration(None), "");
    assert_eq!(normalize_registration("--- "), "");
}

// ---------------------------------------------------------------------------
// Blank sentinels
// ---------------------------------------------------------------------------

#[rstest]
#[case(None, true)]
#[case(Some(""), true)]
#[case(Some("   "), true)]
#[case(Some("nan"), true)]
#[case(Some("NaN"), true)]
#[case(Some("None"), true)]
#[case(Some("null"), true)]
#[case(Some(" (vide) "), true)]
#[case(Some("0"), false)]
#[case(Some("vide"), false)]
#[case(Some("H01100M"), false)]
fn blank_sentinels(#[case] value: Option<&str>, #[case] blank: bool) {
    assert_eq!(is_blank(value), blank, "{value:?}");
}

// ---------------------------------------------------------------------------
// Serials and comments
// ---------------------------------------------------------------------------

#[rstest]
#[case(" sn   42 ", "SN 42")]
#[case("LIEB\t99", "LIEB 99")]
#[case("nan", "")]
#[case("", "")]
fn serials_are_collapsed_and_uppercased(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(clean_serial(raw), expected);
}

#[test]
fn comments_keep_their_case() {
    assert_eq!(clean_comment("  révision Mars "), "révision Mars");
    assert_eq!(clean_comment("(VIDE)"), "");
    assert_eq!(clean_comment(None), "");
}

#[test]
fn text_is_trimmed_and_uppercased() {
    assert_eq!(normalize_text("  pelle Bassin "), "PELLE BASSIN");
    assert_eq!(normalize_text(None), "");
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn normalize_text_is_idempotent(s in "[ -~àéèçÉ]{0,40}") {
        let once = normalize_text(s.as_str());
        prop_assert_eq!(normalize_text(once.as_str()), once);
    }

    #[test]
    fn normalize_registration_is_idempotent(s in "[ -~àéèç]{0,40}") {
        let once = normalize_registration(s.as_str());
        prop_assert_eq!(normalize_registration(once.as_str()), once.clone());
        prop_assert!(once.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn separators_never_change_the_plate(
        parts in prop::collection::vec("[a-zA-Z0-9]{1,4}", 1..4),
        sep in "[ ./-]",
    ) {
        let joined = parts.join(sep.as_str());
        prop_assert_eq!(normalize_registration(joined.as_str()), normalize_registration(parts.concat().as_str()));
    }
}
