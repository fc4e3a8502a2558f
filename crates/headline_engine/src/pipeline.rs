use headline_core::{Aggregator, FeedSource, NoiseClassifier, RunResult};
use headline_logging::{headline_trace, headline_warn};

use crate::decode::tld_hint;
use crate::{
    ChardetRecoverer, EncodingRecoverer, FeedTitleExtractor, Fetcher, PipelineEvent,
    ProgressSink, SourceReport, TitleExtractor,
};

/// Runs sources one after another through fetch, decode, extraction and
/// classification into a single [`RunResult`].
///
/// A failing source contributes nothing and never stops the run.
pub struct Pipeline {
    fetcher: Box<dyn Fetcher>,
    recoverer: Box<dyn EncodingRecoverer>,
    extractor: Box<dyn TitleExtractor>,
    classifier: NoiseClassifier,
}

impl Pipeline {
    pub fn new(fetcher: Box<dyn Fetcher>, classifier: NoiseClassifier) -> Self {
        Self {
            fetcher,
            recoverer: Box::new(ChardetRecoverer),
            extractor: Box::new(FeedTitleExtractor),
            classifier,
        }
    }

    pub fn with_recoverer(mut self, recoverer: Box<dyn EncodingRecoverer>) -> Self {
        self.recoverer = recoverer;
        self
    }

    pub fn with_extractor(mut self, extractor: Box<dyn TitleExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub async fn run(&self, sources: &[FeedSource], sink: &dyn ProgressSink) -> RunResult {
        let total = sources.len();
        sink.emit(PipelineEvent::RunStarted { sources: total });

        let mut aggregator = Aggregator::new();
        for (index, source) in sources.iter().enumerate() {
            sink.emit(PipelineEvent::SourceStarted {
                index,
                total,
                source: source.id.clone(),
            });
            let report = self.process_source(source, &mut aggregator, sink).await;
            sink.emit(PipelineEvent::SourceCompleted {
                source: source.id.clone(),
                report,
            });
        }

        let result = aggregator.finalize();
        sink.emit(PipelineEvent::RunFinished {
            titles: result.len(),
        });
        result
    }

    async fn process_source(
        &self,
        source: &FeedSource,
        aggregator: &mut Aggregator,
        sink: &dyn ProgressSink,
    ) -> SourceReport {
        let mut report = SourceReport::default();

        let payload = match self.fetcher.fetch(source, sink).await {
            Ok(payload) => payload,
            Err(error) => {
                headline_warn!("{}: {}", source.id, error);
                sink.emit(PipelineEvent::FetchFailed {
                    source: source.id.clone(),
                    error,
                });
                return report;
            }
        };

        let tld = tld_hint(&source.url);
        let document = self
            .recoverer
            .recover(payload.bytes(), payload.declared_encoding(), tld.as_deref());
        if document.path().is_fallback() {
            sink.emit(PipelineEvent::EncodingFallback {
                source: source.id.clone(),
                path: document.path(),
                encoding: document.encoding_label().to_string(),
            });
        }

        let candidates = self.extractor.extract(&document, &source.id);
        if let Some(error) = candidates.parse_error() {
            sink.emit(PipelineEvent::ParseFailed {
                source: source.id.clone(),
                error: error.clone(),
            });
        }

        for candidate in candidates {
            report.extracted += 1;
            match self.classifier.accept(candidate) {
                Ok(title) => {
                    if aggregator.add(title) {
                        report.accepted += 1;
                    } else {
                        report.duplicates += 1;
                    }
                }
                Err(rejection) => {
                    headline_trace!(
                        "{}: dropped {:?} ({})",
                        source.id,
                        rejection.candidate.text(),
                        rejection.reason
                    );
                    report.rejected += 1;
                }
            }
        }
        report
    }
}
