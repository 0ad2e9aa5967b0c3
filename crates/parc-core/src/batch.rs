//! Batch lookup: many queries against one table.

use std::collections::HashSet;

use crate::normalize::normalize_text;
use crate::search::{search, SearchOptions};
use crate::table::Table;
use crate::types::Record;

/// A record found by one of the batch queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchHit<'t> {
    pub query: &'t str,
    pub record: &'t Record,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome<'t> {
    /// Normalized, deduplicated queries in first-seen order.
    pub queries: Vec<String>,
    pub hits: Vec<(usize, &'t Record)>,
    /// Queries without any hit, in input order.
    pub not_found: Vec<String>,
}

impl<'t> BatchOutcome<'t> {
    /// Hits paired with the query that produced them.
    pub fn iter_hits(&self) -> impl Iterator<Item = BatchHit<'_>> + '_ {
        self.hits.iter().map(|&(i, record)| BatchHit {
            query: self.queries[i].as_str(),
            record,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Normalize each line, drop blanks, keep the first occurrence of duplicates.
pub fn batch_items<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    lines
        .into_iter()
        .map(|line| normalize_text(line.as_ref()))
        .filter(|item| !item.is_empty())
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Run every line of `lines` as its own search.
///
/// Hits are grouped by query in input order, each group in table order. A
/// query with no hit lands in `not_found` and never stops the batch.
pub fn batch_search<'t, I, S>(
    table: &'t Table,
    lines: I,
    options: impl Into<SearchOptions>,
) -> BatchOutcome<'t>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let options = options.into();
    let queries = batch_items(lines);
    let mut hits = Vec::new();
    let mut not_found = Vec::new();

    for (i, query) in queries.iter().enumerate() {
        let found = search(table, query, options);
        if found.is_empty() {
            not_found.push(query.clone());
        }
        hits.extend(found.into_iter().map(|record| (i, record)));
    }

    tracing::info!(
        queries = queries.len(),
        hits = hits.len(),
        not_found = not_found.len(),
        "batch complete"
    );
    BatchOutcome { queries, hits, not_found }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::MatchMode;
    use pretty_assertions::assert_eq;

    #[test]
    fn items_are_normalized_and_deduplicated() {
        let items = batch_items(["h1", "", "  H1 ", "x2", "   ", "X2"]);
        assert_eq!(items, ["H1", "X2"]);
    }

    #[test]
    fn misses_are_reported_without_aborting() {
        let table = Table::from_records(vec![
            Record { parc_hme: "H01100M".into(), parc_rzb: "X001L".into(), ..Default::default() },
            Record { parc_hme: "H02200M".into(), parc_rzb: "X002L".into(), ..Default::default() },
        ]);
        let outcome = batch_search(&table, ["H01100M", "NOPE", "X002L"], MatchMode::Contains);

        let found: Vec<(&str, &str)> = outcome
            .iter_hits()
            .map(|h| (h.query, h.record.parc_hme.as_str()))
            .collect();
        assert_eq!(found, [("H01100M", "H01100M"), ("X002L", "H02200M")]);
        assert_eq!(outcome.not_found, ["NOPE"]);
    }
}
