//! Terminal progress for interactive runs.

use std::io::{self, Write};
use std::sync::Mutex;

use headline_engine::{LogSink, PipelineEvent, ProgressSink};

const BANNER: &str = r"
 ┌─────────────────────────────────────┐
 │  h e a d l i n e                    │
 │  news feed titles -> text corpus    │
 └─────────────────────────────────────┘
";

pub fn print_banner(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{BANNER}")
}

/// Prints one line per source and forwards every event to the log.
pub struct ConsoleProgress {
    out: Mutex<Box<dyn Write + Send>>,
    log: LogSink,
}

impl ConsoleProgress {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            log: LogSink,
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }
}

impl ProgressSink for ConsoleProgress {
    fn emit(&self, event: PipelineEvent) {
        if let Some(line) = render(&event) {
            if let Ok(mut out) = self.out.lock() {
                let _ = writeln!(out, "{line}");
                let _ = out.flush();
            }
        }
        self.log.emit(event);
    }
}

/// Terminal line for an event; byte-level and diagnostic events stay in the log.
pub fn render(event: &PipelineEvent) -> Option<String> {
    match event {
        PipelineEvent::RunStarted { sources } => {
            Some(format!("Starting scraper on {sources} feeds..."))
        }
        PipelineEvent::SourceStarted {
            index,
            total,
            source,
        } => Some(format!("[{}/{}] Scraping {}...", index + 1, total, source)),
        PipelineEvent::FetchFailed { source, error } => {
            Some(format!("  ✗ Failed to fetch {source}: {error}"))
        }
        PipelineEvent::SourceCompleted { source, report } if report.extracted > 0 => Some(
            format!(
                "  ✓ {source}: {} new titles ({} noise, {} duplicates)",
                report.accepted, report.rejected, report.duplicates
            ),
        ),
        PipelineEvent::RunFinished { titles } => Some(format!(
            "Scraping finished! Found {titles} titles total."
        )),
        PipelineEvent::Downloading { .. }
        | PipelineEvent::EncodingFallback { .. }
        | PipelineEvent::ParseFailed { .. }
        | PipelineEvent::SourceCompleted { .. } => None,
    }
}
