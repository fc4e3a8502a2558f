//! Headline engine: fetching, encoding recovery, title extraction and output.
mod decode;
mod extract;
mod fetch;
mod output;
mod persist;
mod pipeline;
mod sink;
mod types;

pub use decode::{
    declared_encoding, recover, recover_with_hint, tld_hint, try_recover, ChardetRecoverer,
    DecodeError, DecodePath, DecodedDocument, EncodingRecoverer,
};
pub use extract::{Candidates, FeedTitleExtractor, ParseError, TitleExtractor};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use output::{Loader, TitleFileLoader};
pub use persist::{ensure_output_dir, write_atomic, PersistError};
pub use pipeline::Pipeline;
pub use sink::{LogSink, ProgressSink};
pub use types::{
    FailureKind, FetchError, FetchMetadata, PipelineEvent, RawFeedPayload, SourceReport,
};
