//! Presentation policy: which field answers a lookup, and under what label.
//!
//! A query typed as an HME code is answered with the RZB code and vice versa.
//! Plates and free-text queries are answered with the RZB code as well, the
//! only difference being the label.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::{normalize_registration, normalize_text};
use crate::types::{Column, Record};

/// What kind of identifier the user typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    HmeLookup,
    RzbLookup,
    PlateLookup,
    KeywordLookup,
}

impl LookupKind {
    pub fn label(self) -> HeadlineLabel {
        match self {
            LookupKind::HmeLookup | LookupKind::PlateLookup => HeadlineLabel::Rzb,
            LookupKind::RzbLookup => HeadlineLabel::Hme,
            LookupKind::KeywordLookup => HeadlineLabel::Result,
        }
    }

    /// The column surfaced as the answer.
    pub fn headline_column(self) -> Column {
        match self {
            LookupKind::RzbLookup => Column::ParcHme,
            _ => Column::ParcRzb,
        }
    }
}

/// Label shown next to the headline value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadlineLabel {
    Rzb,
    Hme,
    Result,
}

impl HeadlineLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            HeadlineLabel::Rzb => "RZB",
            HeadlineLabel::Hme => "HME",
            HeadlineLabel::Result => "Result",
        }
    }
}

impl std::fmt::Display for HeadlineLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labelled value borrowed from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Headline<'r> {
    pub label: HeadlineLabel,
    pub value: &'r str,
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// The two patterns that recognise fleet codes. Tested against the
/// normalized (trimmed, uppercased) query.
#[derive(Debug, Clone)]
pub struct ClassifyRules {
    hme: Regex,
    rzb: Regex,
}

impl ClassifyRules {
    pub fn new(hme: &str, rzb: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            hme: Regex::new(hme)?,
            rzb: Regex::new(rzb)?,
        })
    }

    /// Codes need a second character after `H`; RZB codes may start with `P`.
    pub fn strict() -> Self {
        Self::new(r"^H[0-9A-Z]", r"^[XP]").expect("built-in strict patterns are valid")
    }

    pub fn hme_pattern(&self) -> &str {
        self.hme.as_str()
    }

    pub fn rzb_pattern(&self) -> &str {
        self.rzb.as_str()
    }

    pub fn classify(&self, query: &str) -> LookupKind {
        let q = normalize_text(query);
        if self.hme.is_match(&q) {
            return LookupKind::HmeLookup;
        }
        if self.rzb.is_match(&q) {
            return LookupKind::RzbLookup;
        }
        let plate = normalize_registration(q.as_str());
        if plate.chars().any(|c| c.is_ascii_digit()) {
            return LookupKind::PlateLookup;
        }
        LookupKind::KeywordLookup
    }
}

impl Default for ClassifyRules {
    fn default() -> Self {
        Self::new(r"^H", r"^X").expect("built-in default patterns are valid")
    }
}

static DEFAULT_RULES: LazyLock<ClassifyRules> = LazyLock::new(ClassifyRules::default);

/// Classify with the default rules (`^H` for HME, `^X` for RZB).
pub fn classify(query: &str) -> LookupKind {
    DEFAULT_RULES.classify(query)
}

/// The headline for `record` under `kind`.
pub fn headline(record: &Record, kind: LookupKind) -> Headline<'_> {
    Headline {
        label: kind.label(),
        value: record.get(kind.headline_column()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
