use std::fmt;

use crate::{AcceptedTitle, Candidate, ClassifierConfig};

/// The rule that rejected a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    TooShort,
    Shouted,
    Blocklisted,
    SymbolDominant,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::TooShort => write!(f, "too short"),
            RejectReason::Shouted => write!(f, "shouted header"),
            RejectReason::Blocklisted => write!(f, "blocklisted label"),
            RejectReason::SymbolDominant => write!(f, "mostly digits or symbols"),
        }
    }
}

/// A candidate turned away by the classifier, handed back with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub candidate: Candidate,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Article,
    Noise(RejectReason),
}

/// Heuristic article-vs-noise judge. Holds only its configuration.
///
/// Rules run in a fixed order and the first match decides:
/// too short, shouted header, blocklisted label, symbol dominated.
/// Anything that survives is an article title; borderline strings are kept.
#[derive(Debug, Clone, Default)]
pub struct NoiseClassifier {
    config: ClassifierConfig,
}

impl NoiseClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn is_article_title(&self, candidate: &Candidate) -> bool {
        self.verdict(candidate) == Verdict::Article
    }

    pub fn verdict(&self, candidate: &Candidate) -> Verdict {
        match self.first_rejection(candidate.text()) {
            Some(reason) => Verdict::Noise(reason),
            None => Verdict::Article,
        }
    }

    pub fn accept(&self, candidate: Candidate) -> Result<AcceptedTitle, Rejection> {
        match self.first_rejection(candidate.text()) {
            Some(reason) => Err(Rejection { candidate, reason }),
            None => Ok(AcceptedTitle::from_candidate(candidate)),
        }
    }

    fn first_rejection(&self, text: &str) -> Option<RejectReason> {
        let letters = text.chars().filter(|c| c.is_alphabetic()).count();
        if letters < self.config.min_alpha_chars {
            return Some(RejectReason::TooShort);
        }
        if self.is_shouted(text, letters) {
            return Some(RejectReason::Shouted);
        }
        if self.config.rules.blocking_pattern(text).is_some() {
            return Some(RejectReason::Blocklisted);
        }
        if self.is_symbol_dominant(text) {
            return Some(RejectReason::SymbolDominant);
        }
        None
    }

    fn is_shouted(&self, text: &str, letters: usize) -> bool {
        if letters <= self.config.shout_max_letters {
            return false;
        }
        if !text.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase) {
            return false;
        }
        let all_acronyms = text
            .split(|c: char| !c.is_alphabetic())
            .filter(|word| !word.is_empty())
            .all(|word| self.config.rules.is_acronym(word));
        !all_acronyms
    }

    fn is_symbol_dominant(&self, text: &str) -> bool {
        let mut visible = 0usize;
        let mut symbols = 0usize;
        for c in text.chars().filter(|c| !c.is_whitespace()) {
            visible += 1;
            if !c.is_alphabetic() {
                symbols += 1;
            }
        }
        visible > 0 && symbols as f64 / visible as f64 > self.config.max_symbol_ratio
    }
}
