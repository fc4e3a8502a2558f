use headline_logging::{headline_debug, headline_info, headline_warn};

use crate::PipelineEvent;

/// Receiver of pipeline progress. Advisory only: a sink cannot influence the run.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: PipelineEvent);
}

/// Sink that writes every event to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::RunStarted { sources } => {
                headline_info!("Run started with {} sources", sources);
            }
            PipelineEvent::SourceStarted {
                index,
                total,
                source,
            } => {
                headline_info!("[{}/{}] {}", index + 1, total, source);
            }
            PipelineEvent::Downloading { source, bytes } => {
                headline_debug!("{}: {} bytes received", source, bytes);
            }
            PipelineEvent::FetchFailed { source, error } => {
                headline_warn!("{}: fetch failed: {}", source, error);
            }
            PipelineEvent::EncodingFallback {
                source,
                path,
                encoding,
            } => {
                headline_warn!("{}: encoding fallback {:?} ({})", source, path, encoding);
            }
            PipelineEvent::ParseFailed { source, error } => {
                headline_warn!("{}: {}", source, error);
            }
            PipelineEvent::SourceCompleted { source, report } => {
                headline_info!(
                    "{}: extracted={} accepted={} rejected={} duplicates={}",
                    source,
                    report.extracted,
                    report.accepted,
                    report.rejected,
                    report.duplicates
                );
            }
            PipelineEvent::RunFinished { titles } => {
                headline_info!("Run finished with {} titles", titles);
            }
        }
    }
}
