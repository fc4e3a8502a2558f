//! Headline core: pure classification and per-run aggregation of feed titles.
mod aggregator;
mod candidate;
mod classifier;
mod normalize;
mod rules;
mod source;

pub use aggregator::{Aggregator, RunResult};
pub use candidate::{AcceptedTitle, Candidate};
pub use classifier::{NoiseClassifier, RejectReason, Rejection, Verdict};
pub use normalize::{collapse_whitespace, normalized_key};
pub use rules::{ClassifierConfig, RuleKind, RuleTable};
pub use source::{FeedSource, SourceId};
