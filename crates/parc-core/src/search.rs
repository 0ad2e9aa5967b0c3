//! Search layer: conjunctive multi-token matching over the fleet table.
//!
//! Two policies share one entry point, [`search`]:
//!
//! - [`MatchMode::Contains`]: the query is split on whitespace; every token
//!   must appear (plain substring, case-insensitive) in at least one of HME,
//!   RZB, plate, agency, description or comment, or, in registration form,
//!   inside IMM_NORM. Tokens are ANDed, so word order does not matter.
//! - [`MatchMode::Exact`]: the whole query must equal HME, RZB or the plate,
//!   or equal IMM_NORM in registration form.
//!
//! Results keep table order. An empty query matches nothing.

use serde::Deserialize;

use crate::normalize::{normalize_registration, normalize_text};
use crate::table::{SearchKeys, Table};
use crate::types::Record;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Matching policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Contains,
    Exact,
}

impl MatchMode {
    /// The other mode. Used by the TUI toggle.
    pub fn toggled(self) -> Self {
        match self {
            MatchMode::Contains => MatchMode::Exact,
            MatchMode::Exact => MatchMode::Contains,
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::Contains => write!(f, "contains"),
            MatchMode::Exact => write!(f, "exact"),
        }
    }
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contains" | "contient" => Ok(MatchMode::Contains),
            "exact" => Ok(MatchMode::Exact),
            other => Err(format!("unknown match mode {other:?} (expected contains|exact)")),
        }
    }
}

/// Everything that changes how a query is matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub mode: MatchMode,
    /// Also match against N° SERIE and N° SERIE GRUE.
    pub include_serials: bool,
}

impl From<MatchMode> for SearchOptions {
    fn from(mode: MatchMode) -> Self {
        Self { mode, include_serials: false }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    text: String,
    plate: String,
}

impl Token {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            plate: normalize_registration(text),
        }
    }
}

/// A normalized, tokenized query. Parse once, test against many records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    normalized: String,
    plate: String,
    tokens: Vec<Token>,
}

impl Query {
    /// Returns `None` when the query normalizes to the empty string.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_text(raw);
        if normalized.is_empty() {
            return None;
        }
        let tokens = normalized.split_whitespace().map(Token::new).collect();
        Some(Self {
            plate: normalize_registration(normalized.as_str()),
            normalized,
            tokens,
        })
    }

    /// The trimmed, uppercased query.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    fn matches(&self, keys: &SearchKeys, options: SearchOptions) -> bool {
        match options.mode {
            MatchMode::Contains => self
                .tokens
                .iter()
                .all(|token| token_matches(token, keys, options.include_serials)),
            MatchMode::Exact => self.matches_exactly(keys, options.include_serials),
        }
    }

    fn matches_exactly(&self, keys: &SearchKeys, include_serials: bool) -> bool {
        let q = self.normalized.as_str();
        if keys.parc_hme == q || keys.parc_rzb == q || keys.immatriculation == q {
            return true;
        }
        if !self.plate.is_empty() && keys.imm_norm == self.plate {
            return true;
        }
        if include_serials {
            // Serial keys have collapsed whitespace; compare like with like.
            let collapsed = self
                .tokens
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            return keys.serie == collapsed || keys.serie_grue == collapsed;
        }
        false
    }
}

fn token_matches(token: &Token, keys: &SearchKeys, include_serials: bool) -> bool {
    let text = token.text.as_str();
    if keys.text_fields().iter().any(|field| field.contains(text)) {
        return true;
    }
    if !token.plate.is_empty() && keys.imm_norm.contains(token.plate.as_str()) {
        return true;
    }
    include_serials && (keys.serie.contains(text) || keys.serie_grue.contains(text))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Return the records of `table` matching `query`, in table order.
///
/// `options` is usually a bare [`MatchMode`]; pass [`SearchOptions`] to
/// include serial numbers.
pub fn search<'t>(
    table: &'t Table,
    query: &str,
    options: impl Into<SearchOptions>,
) -> Vec<&'t Record> {
    let options = options.into();
    let Some(query) = Query::parse(query) else {
        return Vec::new();
    };

    let hits: Vec<&Record> = table
        .entries()
        .filter(|(_, keys)| query.matches(keys, options))
        .map(|(record, _)| record)
        .collect();

    tracing::debug!(
        query = %query.normalized,
        mode = %options.mode,
        include_serials = options.include_serials,
        hits = hits.len(),
        "search"
    );
    hits
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_records(vec![
            Record {
                agence: "Paris".into(),
                parc_hme: "H01100M".into(),
                parc_rzb: "X001L".into(),
                libelle: "Pelle bassin".into(),
                immatriculation: "AB-123-CD".into(),
                serie: "SN 42".into(),
                ..Default::default()
            },
            Record {
                agence: "Lyon".into(),
                parc_hme: "H02200M".into(),
                parc_rzb: "X002L".into(),
                libelle: "Grue mobile".into(),
                immatriculation: "EF-456-GH".into(),
                ..Default::default()
            },
        ])
    }

    fn hme(hits: &[&Record]) -> Vec<String> {
        hits.iter().map(|r| r.parc_hme.clone()).collect()
    }

    #[test]
    fn blank_query_matches_nothing() {
        let t = table();
        assert!(search(&t, "", MatchMode::Contains).is_empty());
        assert!(search(&t, "   ", MatchMode::Exact).is_empty());
    }

    #[test]
    fn contains_is_case_insensitive_on_free_text() {
        let t = table();
        assert_eq!(hme(&search(&t, "bassin", MatchMode::Contains)), ["H01100M"]);
        assert_eq!(hme(&search(&t, "lyon", MatchMode::Contains)), ["H02200M"]);
    }

    #[test]
    fn contains_tokens_are_anded() {
        let t = table();
        assert_eq!(hme(&search(&t, "pelle paris", MatchMode::Contains)), ["H01100M"]);
        assert!(search(&t, "pelle lyon", MatchMode::Contains).is_empty());
    }

    #[test]
    fn plate_matches_without_punctuation() {
        let t = table();
        assert_eq!(hme(&search(&t, "ab123cd", MatchMode::Contains)), ["H01100M"]);
        assert_eq!(hme(&search(&t, "ab 123-cd", MatchMode::Exact)), ["H01100M"]);
    }

    #[test]
    fn exact_requires_whole_code() {
        let t = table();
        assert!(search(&t, "H011", MatchMode::Exact).is_empty());
        assert_eq!(hme(&search(&t, "x002l", MatchMode::Exact)), ["H02200M"]);
    }

    #[test]
    fn serials_only_when_enabled() {
        let t = table();
        let with = SearchOptions { mode: MatchMode::Contains, include_serials: true };
        assert!(search(&t, "sn 42", MatchMode::Contains).is_empty());
        assert_eq!(hme(&search(&t, "sn 42", with)), ["H01100M"]);
        let exact = SearchOptions { mode: MatchMode::Exact, include_serials: true };
        assert_eq!(hme(&search(&t, " sn   42 ", exact)), ["H01100M"]);
    }

    #[test]
    fn mode_parses_and_toggles() {
        assert_eq!("EXACT".parse::<MatchMode>(), Ok(MatchMode::Exact));
        assert_eq!(MatchMode::Contains.toggled(), MatchMode::Exact);
        assert!("fuzzy".parse::<MatchMode>().is_err());
    }
}
