#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

use encoding_rs::Encoding;
use headline_core::FeedSource;
use headline_engine::{
    EncodingRecoverer, FailureKind, FetchError, Fetcher, PipelineEvent, ProgressSink,
    RawFeedPayload,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(headline_logging::initialize_for_tests);
}

#[derive(Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<PipelineEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: PipelineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Serves canned payloads keyed by URL; unknown URLs fail like a dead host.
#[derive(Default)]
pub struct StaticFetcher {
    responses: HashMap<String, Result<RawFeedPayload, FetchError>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(mut self, url: &str, body: impl Into<Vec<u8>>, content_type: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Ok(RawFeedPayload::from_bytes(body, Some(content_type))),
        );
        self
    }

    pub fn fail(mut self, url: &str, kind: FailureKind) -> Self {
        self.responses
            .insert(url.to_string(), Err(FetchError::new(kind, "canned failure")));
        self
    }
}

#[async_trait::async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(
        &self,
        source: &FeedSource,
        _sink: &dyn ProgressSink,
    ) -> Result<RawFeedPayload, FetchError> {
        self.responses
            .get(&source.url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::new(FailureKind::Network, "connection refused")))
    }
}

/// Recovery whose detector always settles on one encoding.
pub struct FixedGuess(pub &'static Encoding);

impl EncodingRecoverer for FixedGuess {
    fn guess(&self, _bytes: &[u8], _tld: Option<&str>) -> &'static Encoding {
        self.0
    }
}

/// Minimal RSS 2.0 document with one item per title.
pub fn rss(titles: &[&str]) -> String {
    let mut doc = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\"><channel>\
         <title>Testovací kanál</title><link>https://example.cz/</link>\n",
    );
    for title in titles {
        doc.push_str(&format!(
            "<item><title>{title}</title><link>https://example.cz/a</link>\
             <description>Popis</description></item>\n"
        ));
    }
    doc.push_str("</channel></rss>\n");
    doc
}
