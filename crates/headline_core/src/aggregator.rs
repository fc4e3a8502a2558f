use std::collections::HashSet;

use chrono::{DateTime, Local};

use crate::AcceptedTitle;

/// Collects accepted titles for one run, dropping repeats.
///
/// Titles keep the order in which they were first seen. Two titles are the
/// same when their normalized keys match; the later one is discarded.
#[derive(Debug, Default)]
pub struct Aggregator {
    seen: HashSet<String>,
    titles: Vec<AcceptedTitle>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when an equivalent title was already added.
    pub fn add(&mut self, title: AcceptedTitle) -> bool {
        if !self.seen.insert(title.key()) {
            return false;
        }
        self.titles.push(title);
        true
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Close the run, stamping it with the current local time.
    pub fn finalize(self) -> RunResult {
        self.finalize_at(Local::now())
    }

    pub fn finalize_at(self, created_at: DateTime<Local>) -> RunResult {
        RunResult {
            titles: self.titles,
            created_at,
        }
    }
}

/// Ordered, deduplicated titles of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    titles: Vec<AcceptedTitle>,
    created_at: DateTime<Local>,
}

impl RunResult {
    pub fn titles(&self) -> &[AcceptedTitle] {
        &self.titles
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(AcceptedTitle::text)
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
