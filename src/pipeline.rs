//! The structure-recovery pipeline.
//!
//! One run turns the lines of one gazette issue into a [`Bundle`]:
//!
//! 1. locate the Sumário ([`SummaryRangeLocator`]),
//! 2. parse its items ([`SummaryItemParser`]),
//! 3. detect body headers and slice the body ([`BodySlicer`]),
//! 4. link items to slices and assemble docs ([`Linker`], [`DocAssembler`]).
//!
//! A failing stage aborts the run with an [`Error::Stage`]; no partial
//! bundle is returned.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::error::{Error, Result, Stage};
use crate::events::{Emitter, EventSink, LogSink, PipelineEvent, Verbosity};
use crate::link::{check_conservation, DocAssembler, Linker};
use crate::model::{Bundle, ExtractedText};
use crate::parser::{BodySlicer, PipelineOptions, SummaryItemParser, SummaryRangeLocator};
use crate::tagger::{EntityTagger, RuleTagger};

/// Runs structure recovery with a tagger, options and an event sink.
///
/// The pipeline holds no per-run state and can be shared across threads.
#[derive(Clone)]
pub struct Pipeline {
    tagger: Arc<dyn EntityTagger>,
    options: PipelineOptions,
    events: Arc<dyn EventSink>,
}

impl Pipeline {
    /// Pipeline with the shared rule tagger, default options and a
    /// [`LogSink`].
    pub fn new() -> Self {
        Self {
            tagger: RuleTagger::shared(),
            options: PipelineOptions::default(),
            events: Arc::new(LogSink),
        }
    }

    /// Use a different tagger.
    pub fn with_tagger(mut self, tagger: Arc<dyn EntityTagger>) -> Self {
        self.tagger = tagger;
        self
    }

    /// Set options.
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the event sink.
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Current options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Tagger in use.
    pub fn tagger(&self) -> &dyn EntityTagger {
        self.tagger.as_ref()
    }

    /// Recover the documents of one gazette issue.
    pub fn run(
        &self,
        text: &ExtractedText,
        pdf_name: &str,
        source_path: &str,
        publication_date: Option<NaiveDate>,
    ) -> Result<Bundle> {
        let events = Emitter::new(Arc::clone(&self.events), self.options.verbosity);
        events.emit(PipelineEvent::RunStarted {
            pdf_name: pdf_name.to_string(),
            lines: text.len(),
        });

        let result = self.run_stages(text, pdf_name, source_path, publication_date, &events);
        match &result {
            Ok(bundle) => {
                for issue in bundle.validate() {
                    events.emit(PipelineEvent::ValidationIssue {
                        pdf_name: pdf_name.to_string(),
                        issue,
                    });
                }
                events.emit(PipelineEvent::RunFinished {
                    pdf_name: pdf_name.to_string(),
                    docs: bundle.len(),
                });
            }
            Err(Error::Stage { stage, source }) => {
                events.emit(PipelineEvent::StageFailed {
                    stage: *stage,
                    message: source.to_string(),
                });
            }
            Err(_) => {}
        }
        result
    }

    /// Read a line file and run it.
    ///
    /// The source path is recorded as given; the publication date is left
    /// unset.
    pub fn run_file<P: AsRef<Path>>(&self, path: P, pdf_name: &str) -> Result<Bundle> {
        let path = path.as_ref();
        let text = ExtractedText::read(path)?;
        self.run(&text, pdf_name, &path.to_string_lossy(), None)
    }

    /// Run many independent issues; one failure never affects the others.
    ///
    /// Results come back in request order.
    pub fn run_batch(&self, requests: &[RunRequest]) -> Vec<Result<Bundle>> {
        let run_one = |request: &RunRequest| {
            self.run(
                &request.text,
                &request.pdf_name,
                &request.source_path,
                request.publication_date,
            )
        };

        if self.options.parallel {
            requests.par_iter().map(run_one).collect()
        } else {
            requests.iter().map(run_one).collect()
        }
    }

    fn run_stages(
        &self,
        text: &ExtractedText,
        pdf_name: &str,
        source_path: &str,
        publication_date: Option<NaiveDate>,
        events: &Emitter,
    ) -> Result<Bundle> {
        let tagger = self.tagger.as_ref();
        let lines = &text.lines;

        let range = SummaryRangeLocator::new(tagger, &self.options)
            .find_range(lines)
            .map_err(|e| e.in_stage(Stage::RangeDetection))?;
        match range {
            Some(range) => events.emit(PipelineEvent::SummaryRange(range)),
            None => events.emit(PipelineEvent::SummaryMissing),
        }

        let items = match range {
            Some(range) => SummaryItemParser::new(tagger, &self.options)
                .parse_items(&lines[range.start..range.end])
                .map_err(|e| e.in_stage(Stage::ItemParsing))?,
            None => Vec::new(),
        };
        for item in &items {
            events.emit_with(Verbosity::Debug, || PipelineEvent::ItemParsed {
                tipo: item.tipo.clone(),
                number: item.number.clone(),
                year: item.year.clone(),
                line: item.line_range.start,
            });
        }

        let slicer = BodySlicer::new(tagger, &self.options);
        let slices = slicer
            .detect_headers(lines, range)
            .and_then(|headers| {
                events.emit(PipelineEvent::HeadersDetected {
                    count: headers.len(),
                });
                slicer.slices(lines, &headers, range)
            })
            .map_err(|e| e.in_stage(Stage::BodySlicing))?;
        for slice in &slices {
            events.emit_with(Verbosity::Debug, || PipelineEvent::SliceBuilt {
                start_line: slice.start_line,
                end_line: slice.end_line,
                tipo: slice.tipo.clone(),
            });
        }

        let (item_count, slice_count) = (items.len(), slices.len());
        let linkage = Linker::new(self.options.orphans).link_detailed(items, slices);
        check_conservation(&linkage.results, item_count, slice_count)
            .map_err(|e| e.in_stage(Stage::LinkingOrAssembly))?;
        for slice in &linkage.dropped {
            events.emit(PipelineEvent::SliceDropped {
                start_line: slice.start_line,
                header: slice.header_text.clone(),
            });
        }
        for link in &linkage.results {
            events.emit_with(Verbosity::Debug, || PipelineEvent::Linked {
                status: link.status,
                line: link
                    .slice
                    .as_ref()
                    .map(|s| s.start_line)
                    .or_else(|| link.item.as_ref().map(|i| i.line_range.start)),
            });
        }

        let assembler = DocAssembler::new(pdf_name, source_path, publication_date);
        let docs = assembler.assemble(&linkage.results);
        for doc in &docs {
            events.emit_with(Verbosity::Debug, || PipelineEvent::DocBuilt { id: doc.id.clone() });
        }

        let mut bundle = Bundle::new(pdf_name, source_path);
        bundle.notes = text.notes.clone();
        bundle.docs = docs;
        Ok(bundle)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("tagger", &self.tagger.name())
            .field("options", &self.options)
            .finish()
    }
}

/// One issue to process in a batch.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Input lines and notes
    pub text: ExtractedText,
    /// Source PDF name
    pub pdf_name: String,
    /// Path the lines were read from
    pub source_path: String,
    /// Issue publication date
    pub publication_date: Option<NaiveDate>,
}

impl RunRequest {
    /// Create a request with no publication date.
    pub fn new(
        text: ExtractedText,
        pdf_name: impl Into<String>,
        source_path: impl Into<String>,
    ) -> Self {
        Self {
            text,
            pdf_name: pdf_name.into(),
            source_path: source_path.into(),
            publication_date: None,
        }
    }

    /// Set the publication date.
    pub fn with_publication_date(mut self, date: Option<NaiveDate>) -> Self {
        self.publication_date = date;
        self
    }

    /// Read `<dir>/completo.txt` for an issue directory; the PDF name is
    /// `<dir name>.pdf`.
    pub fn from_issue_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let stem = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Other(format!("not an issue directory: {}", dir.display())))?;
        let path: PathBuf = dir.join(ISSUE_TEXT_FILE);
        let text = ExtractedText::read(&path)?;
        Ok(Self::new(
            text,
            format!("{}.pdf", stem),
            path.to_string_lossy().into_owned(),
        ))
    }
}

/// File holding the extracted text of one issue.
pub const ISSUE_TEXT_FILE: &str = "completo.txt";
