//! Domain-specific assertion macros for parc harnesses.
//!
//! These wrap `pretty_assertions` and name the records involved, so a failure
//! shows which fleet codes came back instead of two opaque vectors.

/// HME codes of `records`, in order.
pub fn hme_codes<'r>(records: impl IntoIterator<Item = &'r parc_core::Record>) -> Vec<String> {
    records.into_iter().map(|r| r.parc_hme.clone()).collect()
}

/// Assert the HME codes of a hit list, in order.
///
/// ```rust
/// assert_hits!(search(&table, "pelle", MatchMode::Contains), ["H01100M", "H01200M"]);
/// ```
#[macro_export]
macro_rules! assert_hits {
    ($hits:expr, [$($hme:expr),* $(,)?]) => {{
        let hits: Vec<&parc_core::Record> = $hits;
        let actual: Vec<String> = hits.iter().map(|r| r.parc_hme.clone()).collect();
        let expected: Vec<String> = vec![$($hme.to_string()),*];
        pretty_assertions::assert_eq!(actual, expected, "hit list (HME codes) differs");
    }};
}

/// Assert that a hit list is empty, printing the unexpected hits otherwise.
#[macro_export]
macro_rules! assert_no_hits {
    ($hits:expr) => {{
        let hits: Vec<&parc_core::Record> = $hits;
        if !hits.is_empty() {
            panic!(
                "assert_no_hits! failed: {} unexpected hit(s): {:?}",
                hits.len(),
                hits.iter().map(|r| r.parc_hme.as_str()).collect::<Vec<_>>()
            );
        }
    }};
}

/// Assert the label and value of a headline.
///
/// ```rust
/// assert_headline!(headline(record, kind), HeadlineLabel::Rzb, "X001L");
/// ```
#[macro_export]
macro_rules! assert_headline {
    ($headline:expr, $label:expr, $value:expr) => {{
        let h: parc_core::Headline<'_> = $headline;
        let expected: (parc_core::HeadlineLabel, &str) = ($label, $value);
        pretty_assertions::assert_eq!((h.label, h.value), expected, "headline differs");
    }};
}
