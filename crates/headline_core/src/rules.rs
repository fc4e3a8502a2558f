use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::normalize::normalized_key;

/// How a rule-table pattern is applied to a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    /// Block when the whole candidate, minus surrounding punctuation, equals the pattern.
    Exact,
    /// Block when the candidate starts with the pattern at a word boundary.
    Prefix,
    /// Exempt an all-caps word from the shouted-header rule.
    Acronym,
}

/// Editable mapping of pattern to rule kind.
///
/// Patterns are stored under their normalized key (lower-cased,
/// whitespace-collapsed), so lookups are case-insensitive regardless of how
/// the table was written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, RuleKind>", into = "BTreeMap<String, RuleKind>")]
pub struct RuleTable {
    entries: BTreeMap<String, RuleKind>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Czech, Slovak and English structural vocabulary seen in publisher feeds.
    pub fn standard() -> Self {
        const EXACT: &[&str] = &[
            "přehled", "prehľad", "navigace", "navigácia", "menu", "více", "viac", "další",
            "rubrika", "rubriky", "sekce", "sekcia", "kategorie", "kategória", "domů", "domov",
            "úvod", "hlavní stránka", "titulní strana", "kontakt", "kontakty", "reklama",
            "inzerce", "inzercia", "zprávy", "správy", "novinky", "najnovšie", "nejnovější",
            "archiv", "overview", "navigation", "more", "read more", "section", "category",
            "categories", "home", "homepage", "contact", "contact us", "advertisement", "news",
        ];
        // Phrases that never open a real headline. Bare words stay exact.
        const PREFIX: &[&str] = &[
            "reklama:", "advertisement:", "sponsored:", "komerční sdělení",
            "komerčné oznámenie", "sponzorovaný obsah", "pr článek:", "více z rubriky",
            "další z rubriky", "viac z rubriky", "čtěte také", "čítajte aj", "read more:",
        ];
        const ACRONYMS: &[&str] = &[
            "eu", "usa", "nato", "osn", "čr", "sr", "čez", "čt", "čnb", "ecb", "ods", "ano",
            "stan", "top", "spd", "kdu", "čsl", "ksčm", "čssd", "nhl", "nba", "uefa", "fifa",
            "covid", "who", "unesco", "bbc", "cnn", "ai", "it", "usb", "nasa", "esa", "mf", "ms",
            "oh", "gdp", "hdp", "dph", "ibm", "amd", "cpu", "gpu", "ssd", "pc", "tv", "iss",
        ];

        let mut table = Self::new();
        for pattern in EXACT {
            table.insert(pattern, RuleKind::Exact);
        }
        for pattern in PREFIX {
            table.insert(pattern, RuleKind::Prefix);
        }
        for pattern in ACRONYMS {
            table.insert(pattern, RuleKind::Acronym);
        }
        table
    }

    /// Insert or replace a pattern. Returns the previous kind, if any.
    pub fn insert(&mut self, pattern: &str, kind: RuleKind) -> Option<RuleKind> {
        let key = normalized_key(pattern);
        if key.is_empty() {
            return None;
        }
        self.entries.insert(key, kind)
    }

    pub fn remove(&mut self, pattern: &str) -> Option<RuleKind> {
        self.entries.remove(&normalized_key(pattern))
    }

    pub fn kind_of(&self, pattern: &str) -> Option<RuleKind> {
        self.entries.get(&normalized_key(pattern)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, RuleKind)> {
        self.entries.iter().map(|(pattern, kind)| (pattern.as_str(), *kind))
    }

    pub fn is_acronym(&self, word: &str) -> bool {
        self.kind_of(word) == Some(RuleKind::Acronym)
    }

    /// First blocking pattern matching `text`, if any.
    pub fn blocking_pattern(&self, text: &str) -> Option<&str> {
        let key = normalized_key(text.trim_matches(|c: char| !c.is_alphanumeric()));
        if key.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(pattern, kind)| match kind {
                RuleKind::Exact => key == **pattern,
                RuleKind::Prefix => key.strip_prefix(pattern.as_str()).is_some_and(|rest| {
                    !pattern.ends_with(char::is_alphanumeric)
                        || !rest.starts_with(char::is_alphanumeric)
                }),
                RuleKind::Acronym => false,
            })
            .map(|(pattern, _)| pattern.as_str())
    }
}

impl From<BTreeMap<String, RuleKind>> for RuleTable {
    fn from(raw: BTreeMap<String, RuleKind>) -> Self {
        let mut table = Self::new();
        for (pattern, kind) in raw {
            table.insert(&pattern, kind);
        }
        table
    }
}

impl From<RuleTable> for BTreeMap<String, RuleKind> {
    fn from(table: RuleTable) -> Self {
        table.entries
    }
}

/// Tuning knobs of the noise classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Candidates with fewer alphabetic characters are section labels.
    pub min_alpha_chars: usize,
    /// All-caps candidates with more letters than this are shouted headers.
    pub shout_max_letters: usize,
    /// Largest tolerated share of symbols and digits among visible characters.
    pub max_symbol_ratio: f64,
    pub rules: RuleTable,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_alpha_chars: 3,
            shout_max_letters: 4,
            max_symbol_ratio: 0.5,
            rules: RuleTable::standard(),
        }
    }
}
