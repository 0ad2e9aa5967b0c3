//! Batch lookup integration harness.
//!
//! # What this covers
//!
//! - **Input cleaning**: lines are normalized, blanks dropped, duplicates
//!   removed keeping the first occurrence.
//! - **Grouping**: hits come grouped by query in input order, each group in
//!   table order; misses land in `not_found` without stopping the batch.
//! - **Options** apply to every line.
//!
//! # Running
//!
//! ```sh
//! cargo test --test batch_harness
//! ```

mod common;
use common::*;

use parc_core::{batch::batch_items, batch_search, MatchMode, SearchOptions};
use pretty_assertions::assert_eq;

const LINES: &[&str] = &["h01100m", "", "  X003L ", "H01100M", "INCONNU", "pelle", "   "];

#[test]
fn items_are_normalized_and_deduplicated() {
    assert_eq!(batch_items(LINES), ["H01100M", "X003L", "INCONNU", "PELLE"]);
}

#[test]
fn hits_are_grouped_by_query() {
    let table = fleet_table();
    let outcome = batch_search(&table, LINES, MatchMode::Contains);

    let pairs: Vec<(&str, &str)> = outcome
        .iter_hits()
        .map(|hit| (hit.query, hit.record.parc_hme.as_str()))
        .collect();
    assert_eq!(
        pairs,
        [
            ("H01100M", "H01100M"),
            ("X003L", "H03300M"),
            ("PELLE", "H01100M"),
            ("PELLE", "H01200M"),
        ]
    );
    assert_eq!(outcome.not_found, ["INCONNU"]);
    assert!(!outcome.is_empty());
}

#[test]
fn exact_mode_applies_to_every_line() {
    let table = fleet_table();
    let outcome = batch_search(&table, LINES, MatchMode::Exact);
    assert_eq!(hme_codes(outcome.hits.iter().map(|&(_, r)| r)), ["H01100M", "H03300M"]);
    assert_eq!(outcome.not_found, ["INCONNU", "PELLE"]);
}

#[test]
fn serial_lines_need_serials_enabled() {
    let table = fleet_table();
    let lines = ["GR-7781"];
    assert_eq!(batch_search(&table, lines, MatchMode::Contains).not_found, ["GR-7781"]);

    let options = SearchOptions { mode: MatchMode::Contains, include_serials: true };
    let outcome = batch_search(&table, lines, options);
    assert!(outcome.not_found.is_empty());
    assert_eq!(hme_codes(outcome.hits.iter().map(|&(_, r)| r)), ["H02200M"]);
}

#[test]
fn empty_input_is_an_empty_batch() {
    let table = fleet_table();
    let outcome = batch_search(&table, ["", "  "], MatchMode::Contains);
    assert!(outcome.queries.is_empty());
    assert!(outcome.is_empty());
    assert!(outcome.not_found.is_empty());
}
