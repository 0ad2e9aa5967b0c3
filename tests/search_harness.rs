//! Query engine integration harness.
//!
//! # What this covers
//!
//! - **Contains mode**: case-insensitive substring match, whitespace tokens
//!   ANDed together, plates matched without punctuation.
//! - **Exact mode**: whole-field equality on codes and plates only.
//! - **Serial numbers**: searched only when asked for.
//! - **Property: token order** never changes the hits.
//! - **Property: conjunction**: the hits of `a b` are the hits of `a` that
//!   are also hits of `b`.
//! - **Property: results ⊆ table**, in table order.
//!
//! # Running
//!
//! ```sh
//! cargo test --test search_harness
//! ```

mod common;
use common::*;

use parc_core::{search, MatchMode, SearchOptions};
use proptest::prelude::*;
use rstest::rstest;

const WITH_SERIALS: SearchOptions = SearchOptions { mode: MatchMode::Contains, include_serials: true };
const EXACT_WITH_SERIALS: SearchOptions = SearchOptions { mode: MatchMode::Exact, include_serials: true };

// ---------------------------------------------------------------------------
// Contains mode
// ---------------------------------------------------------------------------

#[rstest]
#[case("", &[])]
#[case("   ", &[])]
#[case("h011", &["H01100M"])]
#[case("x00", &["H01100M", "H01200M", "H03300M"])]
#[case("pelle", &["H01100M", "H01200M"])]
#[case("PELLE paris", &["H01100M", "H01200M"])]
#[case("bassin pelle", &["H01100M"])]
#[case("pelle lyon", &[])]
#[case("révision", &["H02200M"])]
#[case("nacelle", &["H03300M"])]
fn contains(#[case] query: &str, #[case] expected: &[&str]) {
    let table = fleet_table();
    assert_eq!(hme_codes(search(&table, query, MatchMode::Contains)), expected);
}

#[rstest]
#[case("AB-123-CD")]
#[case("AB 123 CD")]
#[case("AB123CD")]
#[case("ab123cd")]
#[case("ab.123.cd")]
fn every_plate_spelling_finds_the_machine(#[case] query: &str) {
    let table = fleet_table();
    assert_hits!(search(&table, query, MatchMode::Contains), ["H01100M"]);
}

#[test]
fn partial_plate_matches_several() {
    let table = fleet_table();
    assert_hits!(search(&table, "ab", MatchMode::Contains), ["H01100M", "H01200M"]);
}

// ---------------------------------------------------------------------------
// Exact mode
// ---------------------------------------------------------------------------

#[rstest]
#[case("H01100M", &["H01100M"])]
#[case(" h01100m ", &["H01100M"])]
#[case("X003L", &["H03300M"])]
#[case("ab 123 cd", &["H01100M"])]
#[case("AB456CD", &["H01200M"])]
#[case("H011", &[])]
#[case("pelle", &[])]
#[case("PARIS", &[])]
fn exact(#[case] query: &str, #[case] expected: &[&str]) {
    let table = fleet_table();
    assert_eq!(hme_codes(search(&table, query, MatchMode::Exact)), expected);
}

// ---------------------------------------------------------------------------
// Serial numbers
// ---------------------------------------------------------------------------

#[test]
fn serials_are_ignored_by_default() {
    let table = fleet_table();
    assert_no_hits!(search(&table, "GR-7781", MatchMode::Contains));
    assert_no_hits!(search(&table, "LIEB", MatchMode::Contains));
}

#[test]
fn serials_match_when_included() {
    let table = fleet_table();
    assert_hits!(search(&table, "gr-7781", WITH_SERIALS), ["H02200M"]);
    assert_hits!(search(&table, "lieb 99", WITH_SERIALS), ["H02200M"]);
    assert_hits!(search(&table, "sn 42", WITH_SERIALS), ["H01100M"]);
}

#[test]
fn exact_serial_needs_the_whole_value() {
    let table = fleet_table();
    assert_hits!(search(&table, "lieb   99", EXACT_WITH_SERIALS), ["H02200M"]);
    assert_no_hits!(search(&table, "LIEB", EXACT_WITH_SERIALS));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

const VOCABULARY: &[&str] = &[
    "PELLE", "BASSIN", "PARIS", "LYON", "GRUE", "X00", "H0", "AB", "123", "CD", "NACELLE", "M",
];

fn tokens() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(VOCABULARY), 1..4)
}

proptest! {
    #[test]
    fn token_order_does_not_matter(words in tokens()) {
        let table = fleet_table();
        let forward = words.join(" ");
        let backward = words.iter().rev().copied().collect::<Vec<_>>().join(" ");
        prop_assert_eq!(
            hme_codes(search(&table, &forward, MatchMode::Contains)),
            hme_codes(search(&table, &backward, MatchMode::Contains))
        );
    }

    #[test]
    fn tokens_are_conjunctive(a in prop::sample::select(VOCABULARY), b in prop::sample::select(VOCABULARY)) {
        let table = fleet_table();
        let hits_a = hme_codes(search(&table, a, MatchMode::Contains));
        let hits_b = hme_codes(search(&table, b, MatchMode::Contains));
        let both = hme_codes(search(&table, &format!("{a} {b}"), MatchMode::Contains));
        let expected: Vec<String> = hits_a.into_iter().filter(|h| hits_b.contains(h)).collect();
        prop_assert_eq!(both, expected);
    }

    #[test]
    fn results_are_a_subsequence_of_the_table(query in "[a-zA-Z0-9 -]{0,12}", exact in any::<bool>()) {
        let table = fleet_table();
        let mode = if exact { MatchMode::Exact } else { MatchMode::Contains };
        let hits = hme_codes(search(&table, &query, mode));
        let all = hme_codes(table.records());
        let mut rest = all.iter();
        for hit in &hits {
            prop_assert!(rest.any(|h| h == hit), "{hit} out of order or not in table");
        }
    }
}
