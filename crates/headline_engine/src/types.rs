use std::fmt;

use headline_core::SourceId;

use crate::decode::{declared_encoding, DecodePath};
use crate::extract::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

/// Body of one feed response, exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFeedPayload {
    bytes: Vec<u8>,
    declared_encoding: Option<String>,
    metadata: FetchMetadata,
}

impl RawFeedPayload {
    /// The declared encoding comes from the `Content-Type` charset, or the XML
    /// prolog when the header carries none. It is only a hint.
    pub fn new(bytes: Vec<u8>, metadata: FetchMetadata) -> Self {
        let declared_encoding = declared_encoding(metadata.content_type.as_deref(), &bytes);
        Self {
            bytes,
            declared_encoding,
            metadata,
        }
    }

    /// Payload that did not come over HTTP, e.g. a feed read from disk.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>, content_type: Option<&str>) -> Self {
        let bytes = bytes.into();
        let metadata = FetchMetadata {
            original_url: String::new(),
            final_url: String::new(),
            redirect_count: 0,
            content_type: content_type.map(ToOwned::to_owned),
            byte_len: bytes.len() as u64,
        };
        Self::new(bytes, metadata)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn declared_encoding(&self) -> Option<&str> {
        self.declared_encoding.as_deref()
    }

    pub fn metadata(&self) -> &FetchMetadata {
        &self.metadata
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// What happened to the candidates of one source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceReport {
    pub extracted: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub duplicates: usize,
}

/// Progress and diagnostics emitted while a run is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    RunStarted {
        sources: usize,
    },
    SourceStarted {
        index: usize,
        total: usize,
        source: SourceId,
    },
    Downloading {
        source: SourceId,
        bytes: u64,
    },
    FetchFailed {
        source: SourceId,
        error: FetchError,
    },
    EncodingFallback {
        source: SourceId,
        path: DecodePath,
        encoding: String,
    },
    ParseFailed {
        source: SourceId,
        error: ParseError,
    },
    SourceCompleted {
        source: SourceId,
        report: SourceReport,
    },
    RunFinished {
        titles: usize,
    },
}
