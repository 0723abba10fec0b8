//! Doc construction from link results.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::{Doc, LinkResult, Provenance};
use crate::text::{normalize_tipo, UNKNOWN_TIPO};

/// Flag set when a doc's type is outside the allow-list.
pub const FLAG_TIPO_UNKNOWN: &str = "tipo:unknown";

/// Flag set when a doc has no body text.
pub const FLAG_BODY_EMPTY: &str = "body:empty";

/// Flag set when a doc's id had to be suffixed to stay unique.
pub const FLAG_ID_DUPLICATE: &str = "id:duplicate";

/// Stable doc id: `{tipo}-{number|na}-{year|na}@{pdf_name}`.
///
/// ```
/// use gazette::link::make_doc_id;
///
/// assert_eq!(
///     make_doc_id("despacho", Some("10"), Some("2025"), "dr.pdf"),
///     "despacho-10-2025@dr.pdf"
/// );
/// assert_eq!(make_doc_id("aviso", None, None, "dr.pdf"), "aviso-na-na@dr.pdf");
/// ```
pub fn make_doc_id(tipo: &str, number: Option<&str>, year: Option<&str>, pdf_name: &str) -> String {
    format!(
        "{}-{}-{}@{}",
        tipo,
        number.unwrap_or("na"),
        year.unwrap_or("na"),
        pdf_name
    )
}

/// Builds docs for one PDF.
#[derive(Debug, Clone)]
pub struct DocAssembler {
    pdf_name: String,
    source_path: String,
    publication_date: Option<NaiveDate>,
}

impl DocAssembler {
    /// Create an assembler for one PDF.
    pub fn new(
        pdf_name: impl Into<String>,
        source_path: impl Into<String>,
        publication_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            pdf_name: pdf_name.into(),
            source_path: source_path.into(),
            publication_date,
        }
    }

    /// Build one doc. Never fails; problems become quality flags.
    pub fn build(&self, link: &LinkResult) -> Doc {
        let item = link.item.as_ref();
        let slice = link.slice.as_ref();

        let raw_tipo = item
            .map(|i| i.tipo.as_str())
            .or_else(|| slice.and_then(|s| s.tipo.as_deref()));
        let tipo = normalize_tipo(raw_tipo);
        let number = item
            .and_then(|i| i.number.as_deref())
            .or_else(|| slice.and_then(|s| s.number.as_deref()));
        let year = item
            .and_then(|i| i.year.as_deref())
            .or_else(|| slice.and_then(|s| s.year.as_deref()));

        let id = make_doc_id(&tipo, number, year, &self.pdf_name);
        let mut doc = Doc::new(id, self.pdf_name.clone(), tipo);
        doc.source_path = self.source_path.clone();
        doc.publication_date = self.publication_date;
        doc.body_text = slice.map(|s| s.text.clone()).unwrap_or_default();
        doc.summary_text = item.map(|i| i.summary_text()).unwrap_or_default();
        doc.header_text = slice
            .map(|s| s.header_text.clone())
            .or_else(|| item.map(|i| i.header_text.clone()));

        let span = slice
            .map(|s| s.line_span())
            .or_else(|| item.map(|i| i.line_range));
        doc.provenance = span.map(|s| Provenance {
            line_start: s.start,
            line_end: s.end,
        });

        match (item, slice) {
            (Some(item), _) => {
                doc.section_body = item.org.primary.clone();
                doc.section_body_raw = item.org.raw.clone();
                doc.section_orgs = item.org.orgs.clone();
            }
            (None, Some(slice)) => {
                doc.section_body = slice.section_org.clone();
                doc.section_orgs = slice.section_org.iter().cloned().collect();
            }
            (None, None) => {}
        }

        doc.flag(link.quality_flag());
        if doc.tipo == UNKNOWN_TIPO {
            doc.flag(FLAG_TIPO_UNKNOWN);
        }
        if doc.body_text.is_empty() {
            doc.flag(FLAG_BODY_EMPTY);
        }
        doc
    }

    /// Build every doc, keeping ids unique within the bundle.
    ///
    /// The second doc with a given id becomes `{id}#2`, the third `{id}#3`,
    /// and each renamed doc is flagged `id:duplicate`.
    pub fn assemble(&self, links: &[LinkResult]) -> Vec<Doc> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        links
            .iter()
            .map(|link| {
                let mut doc = self.build(link);
                let count = seen.entry(doc.id.clone()).or_insert(0);
                *count += 1;
                if *count > 1 {
                    log::warn!("Duplicate doc id {} in {}", doc.id, self.pdf_name);
                    doc.id = format!("{}#{}", doc.id, count);
                    doc.flag(FLAG_ID_DUPLICATE);
                }
                doc
            })
            .collect()
    }
}
