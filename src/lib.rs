//! # gazette
//!
//! Structure recovery for official-gazette text.
//!
//! A gazette issue opens with a Sumário (table of contents) listing its
//! documents grouped by issuing organization; the body then repeats each
//! document under its own header. This library locates the Sumário, parses
//! its items, slices the body at document headers, links the two and
//! assembles one [`Doc`] per recovered document into a per-PDF [`Bundle`].
//!
//! ## Quick Start
//!
//! ```
//! use gazette::render::{self, JsonFormat};
//!
//! fn main() -> gazette::Result<()> {
//!     let text = "Sumário\n\
//!                 CÂMARA MUNICIPAL DE LISBOA\n\
//!                 Despacho 10/2025\n\
//!                 texto.\n\
//!                 \n\
//!                 CÂMARA MUNICIPAL DE LISBOA\n\
//!                 Despacho 10/2025\n\
//!                 corpo do despacho.";
//!
//!     let bundle = gazette::run(text, "dr-2025-001.pdf", "dr-2025-001/completo.txt", None)?;
//!     assert_eq!(bundle.docs[0].id, "despacho-10-2025@dr-2025-001.pdf");
//!
//!     let json = render::to_json(&bundle, JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Pluggable tagging**: any [`EntityTagger`]; a rule-based one is built in
//! - **Policy switches**: header purity, type position, orphan slices
//! - **Stage-tagged errors**: a run yields a complete bundle or one error
//! - **Structured events**: injected [`events::EventSink`] with verbosity
//! - **Parallel batches**: independent issues run on Rayon

pub mod error;
pub mod events;
pub mod link;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod store;
pub mod tagger;
pub mod text;

// Re-export commonly used types
pub use error::{Error, Result, Stage};
pub use link::{make_doc_id, DocAssembler, Linker};
pub use model::{
    BodySlice, Bundle, Doc, ExtractedText, Line, LineSpan, LinkReason, LinkResult, LinkStatus,
    OrgAttribution, Provenance, SummaryItem, SummaryRange,
};
pub use parser::{
    BodySlicer, HeaderPurity, OrphanPolicy, PipelineOptions, SummaryItemParser,
    SummaryRangeLocator, TypePosition,
};
pub use pipeline::{Pipeline, RunRequest};
pub use render::JsonFormat;
pub use store::{load_bundle, save_bundle};
pub use tagger::{EntityTag, EntityTagger, RuleTagger, TagLabel};

use std::path::Path;

use chrono::NaiveDate;

/// Recover the documents of one issue from its combined text.
///
/// Uses the shared rule tagger and default options.
///
/// # Arguments
///
/// * `text` - Extracted text, one line per source line
/// * `pdf_name` - Name of the source PDF, part of every doc id
/// * `source_path` - Where the text came from
/// * `publication_date` - Issue date, copied to every doc
pub fn run(
    text: &str,
    pdf_name: &str,
    source_path: &str,
    publication_date: Option<NaiveDate>,
) -> Result<Bundle> {
    Pipeline::new().run(
        &ExtractedText::from_text(text),
        pdf_name,
        source_path,
        publication_date,
    )
}

/// Recover the documents of one issue with custom options.
///
/// # Example
///
/// ```
/// use gazette::{run_with_options, PipelineOptions};
///
/// let options = PipelineOptions::new().keep_orphans();
/// let bundle = run_with_options("Aviso 1/2024\ncorpo", "dr.pdf", "dr.txt", None, options).unwrap();
/// assert_eq!(bundle.len(), 1);
/// ```
pub fn run_with_options(
    text: &str,
    pdf_name: &str,
    source_path: &str,
    publication_date: Option<NaiveDate>,
    options: PipelineOptions,
) -> Result<Bundle> {
    Pipeline::new().with_options(options).run(
        &ExtractedText::from_text(text),
        pdf_name,
        source_path,
        publication_date,
    )
}

/// Read a text file and recover its documents.
///
/// The PDF name is the file's parent directory name plus `.pdf`, matching
/// the `<stem>/completo.txt` layout, or the file stem when there is no parent.
///
/// # Example
///
/// ```no_run
/// let bundle = gazette::run_file("input/dr-2025-001/completo.txt").unwrap();
/// println!("{} docs", bundle.len());
/// ```
pub fn run_file<P: AsRef<Path>>(path: P) -> Result<Bundle> {
    let path = path.as_ref();
    Pipeline::new().run_file(path, &pdf_name_for(path))
}

/// Derive a PDF name from a text file path.
pub fn pdf_name_for(path: &Path) -> String {
    let parent = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned());
    let stem = path
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}.pdf", parent.unwrap_or(stem))
}

/// Parse an ISO-8601 (`YYYY-MM-DD`) publication date.
pub fn parse_publication_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidDate(format!("{}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_convenience() {
        let bundle = run("Sumário\nAviso 1/2024\n\nAviso 1/2024\ncorpo", "dr.pdf", "dr.txt", None)
            .unwrap();
        assert_eq!(bundle.pdf_name, "dr.pdf");
        assert_eq!(bundle.source_path, "dr.txt");
    }

    #[test]
    fn test_run_empty_input() {
        let bundle = run("", "dr.pdf", "dr.txt", None).unwrap();
        assert!(bundle.is_empty());
    }

    #[test]
    fn test_pdf_name_for() {
        assert_eq!(
            pdf_name_for(Path::new("input/dr-2025-001/completo.txt")),
            "dr-2025-001.pdf"
        );
        assert_eq!(pdf_name_for(Path::new("solto.txt")), "solto.pdf");
    }

    #[test]
    fn test_parse_publication_date() {
        assert_eq!(
            parse_publication_date("2025-01-02").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
        );
        assert!(matches!(
            parse_publication_date("02/01/2025"),
            Err(Error::InvalidDate(_))
        ));
    }
}
