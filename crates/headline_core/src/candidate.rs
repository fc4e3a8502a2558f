use crate::normalize::normalized_key;
use crate::SourceId;

/// A title string pulled out of a feed, not yet judged.
///
/// Always non-empty and trimmed; blank strings never become candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    text: String,
    source: SourceId,
}

impl Candidate {
    /// Returns `None` when `text` is empty after trimming.
    pub fn new(text: impl AsRef<str>, source: SourceId) -> Option<Self> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            source,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }
}

/// A candidate the noise classifier judged to be a real headline.
///
/// Only [`crate::NoiseClassifier::accept`] hands these out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedTitle {
    text: String,
    source: SourceId,
}

impl AcceptedTitle {
    pub(crate) fn from_candidate(candidate: Candidate) -> Self {
        Self {
            text: candidate.text,
            source: candidate.source,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }

    pub fn key(&self) -> String {
        normalized_key(&self.text)
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
