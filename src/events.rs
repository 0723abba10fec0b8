//! Structured pipeline events.
//!
//! A [`Pipeline`](crate::Pipeline) reports what it finds through an injected
//! [`EventSink`]. Events are filtered by [`Verbosity`] before they reach the
//! sink, so a sink only sees what the caller asked for.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gazette::events::{MemorySink, PipelineEvent, Verbosity};
//! use gazette::{Pipeline, PipelineOptions};
//!
//! let sink = Arc::new(MemorySink::new());
//! let pipeline = Pipeline::new()
//!     .with_options(PipelineOptions::new().with_verbosity(Verbosity::Debug))
//!     .with_event_sink(sink.clone());
//!
//! let text = gazette::ExtractedText::from_text("Aviso 1/2024\ncorpo");
//! pipeline.run(&text, "dr.pdf", "dr/completo.txt", None).unwrap();
//!
//! assert!(sink
//!     .events()
//!     .iter()
//!     .any(|e| matches!(e, PipelineEvent::SummaryMissing)));
//! ```

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::Stage;
use crate::model::{LinkStatus, SummaryRange};

/// How much the pipeline reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Nothing
    Quiet,
    /// Run summaries, missing structure and validation issues
    #[default]
    Info,
    /// Every item, slice, link and doc
    Debug,
}

impl Verbosity {
    /// Parse a level name (`quiet`, `info`, `debug`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "quiet" | "off" => Some(Verbosity::Quiet),
            "info" => Some(Verbosity::Info),
            "debug" => Some(Verbosity::Debug),
            _ => None,
        }
    }
}

/// Something the pipeline observed during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A run started.
    RunStarted { pdf_name: String, lines: usize },
    /// The Sumário block was located.
    SummaryRange(SummaryRange),
    /// No Sumário marker in the input.
    SummaryMissing,
    /// A summary item was parsed.
    ItemParsed {
        tipo: String,
        number: Option<String>,
        year: Option<String>,
        line: usize,
    },
    /// Body headers were detected.
    HeadersDetected { count: usize },
    /// A body slice was built.
    SliceBuilt {
        start_line: usize,
        end_line: usize,
        tipo: Option<String>,
    },
    /// An item or slice was linked.
    Linked { status: LinkStatus, line: Option<usize> },
    /// A body slice no item claimed was dropped.
    SliceDropped { start_line: usize, header: String },
    /// A doc was assembled.
    DocBuilt { id: String },
    /// A non-fatal validation issue.
    ValidationIssue { pdf_name: String, issue: String },
    /// A run finished.
    RunFinished { pdf_name: String, docs: usize },
    /// A stage failed and the run was aborted.
    StageFailed { stage: Stage, message: String },
}

impl PipelineEvent {
    /// Lowest verbosity at which the event is reported.
    pub fn level(&self) -> Verbosity {
        match self {
            PipelineEvent::RunStarted { .. }
            | PipelineEvent::SummaryMissing
            | PipelineEvent::SliceDropped { .. }
            | PipelineEvent::ValidationIssue { .. }
            | PipelineEvent::RunFinished { .. }
            | PipelineEvent::StageFailed { .. } => Verbosity::Info,
            PipelineEvent::SummaryRange(_)
            | PipelineEvent::ItemParsed { .. }
            | PipelineEvent::HeadersDetected { .. }
            | PipelineEvent::SliceBuilt { .. }
            | PipelineEvent::Linked { .. }
            | PipelineEvent::DocBuilt { .. } => Verbosity::Debug,
        }
    }

    /// Whether the event reports a problem.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            PipelineEvent::ValidationIssue { .. } | PipelineEvent::StageFailed { .. }
        )
    }
}

impl fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineEvent::RunStarted { pdf_name, lines } => {
                write!(f, "{}: processing {} lines", pdf_name, lines)
            }
            PipelineEvent::SummaryRange(range) => {
                write!(f, "Sumário at lines {}..{}", range.start, range.end)
            }
            PipelineEvent::SummaryMissing => write!(f, "no Sumário found"),
            PipelineEvent::ItemParsed {
                tipo,
                number,
                year,
                line,
            } => write!(
                f,
                "item {} {}/{} at line {}",
                tipo,
                number.as_deref().unwrap_or("na"),
                year.as_deref().unwrap_or("na"),
                line
            ),
            PipelineEvent::HeadersDetected { count } => write!(f, "{} body headers", count),
            PipelineEvent::SliceBuilt {
                start_line,
                end_line,
                tipo,
            } => write!(
                f,
                "slice {}..={} ({})",
                start_line,
                end_line,
                tipo.as_deref().unwrap_or("untyped")
            ),
            PipelineEvent::Linked { status, line } => match line {
                Some(line) => write!(f, "{} at line {}", status, line),
                None => write!(f, "{}", status),
            },
            PipelineEvent::SliceDropped { start_line, header } => {
                write!(f, "dropped unclaimed slice at line {}: {}", start_line, header)
            }
            PipelineEvent::DocBuilt { id } => write!(f, "built {}", id),
            PipelineEvent::ValidationIssue { pdf_name, issue } => {
                write!(f, "{}: {}", pdf_name, issue)
            }
            PipelineEvent::RunFinished { pdf_name, docs } => {
                write!(f, "{}: {} docs", pdf_name, docs)
            }
            PipelineEvent::StageFailed { stage, message } => {
                write!(f, "{} failed: {}", stage, message)
            }
        }
    }
}

/// Receiver of pipeline events.
///
/// Sinks are shared across concurrent runs and must not block for long.
pub trait EventSink: Send + Sync {
    /// Handle one event.
    fn emit(&self, event: &PipelineEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &PipelineEvent) {
        if event.is_warning() {
            log::warn!("{}", event);
        } else if event.level() == Verbosity::Debug {
            log::debug!("{}", event);
        } else {
            log::info!("{}", event);
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &PipelineEvent) {}
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected events.
    pub fn events(&self) -> Vec<PipelineEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of collected events.
    pub fn len(&self) -> usize {
        self.events().len()
    }

    /// Check if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &PipelineEvent) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event.clone());
    }
}

/// A sink plus the verbosity it is fed at.
#[derive(Clone)]
pub(crate) struct Emitter {
    sink: Arc<dyn EventSink>,
    verbosity: Verbosity,
}

impl Emitter {
    pub(crate) fn new(sink: Arc<dyn EventSink>, verbosity: Verbosity) -> Self {
        Self { sink, verbosity }
    }

    /// Build and emit an event if the verbosity allows it.
    pub(crate) fn emit_with<F>(&self, level: Verbosity, make: F)
    where
        F: FnOnce() -> PipelineEvent,
    {
        if self.enabled(level) {
            self.emit(make());
        }
    }

    pub(crate) fn emit(&self, event: PipelineEvent) {
        if self.enabled(event.level()) {
            self.sink.emit(&event);
        }
    }

    fn enabled(&self, level: Verbosity) -> bool {
        self.verbosity != Verbosity::Quiet && level <= self.verbosity
    }
}
