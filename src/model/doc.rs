//! Document-level output types.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::text::is_allowed_tipo;

/// An issuing or mentioned organization (filled by later enrichment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization name
    pub name: String,
    /// Organization kind, if classified
    pub kind: Option<String>,
    /// Extraction confidence (0.0-1.0)
    pub confidence: Option<f32>,
}

/// A person mentioned in a document (filled by later enrichment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Person name
    pub name: String,
    /// Role in the document
    pub role: Option<String>,
    /// Extraction confidence (0.0-1.0)
    pub confidence: Option<f32>,
}

/// Character span of evidence text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    /// Start offset
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Covered text
    pub text: String,
}

/// Subject or object of a relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationParty {
    /// Free text
    Text(String),
    /// An organization
    Organization(Organization),
    /// A person
    Person(Person),
}

/// A relation between parties (filled by later enrichment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Relation subject
    pub subject: RelationParty,
    /// Predicate
    pub predicate: String,
    /// Relation object
    pub object: RelationParty,
    /// Supporting text
    pub evidence: Option<TextSpan>,
}

/// Lines a document was recovered from (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// First line
    pub line_start: usize,
    /// Last line
    pub line_end: usize,
}

/// One recovered gazette document.
///
/// Identity is the `id`: two docs are equal when their ids are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doc {
    /// Stable key: `{tipo}-{number|na}-{year|na}@{pdf_name}`
    pub id: String,

    /// Source PDF name
    pub pdf_name: String,

    /// Path the lines were read from
    pub source_path: String,

    /// Normalized document type, or `unknown`
    pub tipo: String,

    /// Full body text; empty only when flagged
    pub body_text: String,

    /// Summary header plus captured title
    pub summary_text: String,

    /// Issue publication date
    pub publication_date: Option<NaiveDate>,

    /// Issuing organizations (reserved for enrichment)
    #[serde(default)]
    pub issuers: Vec<Organization>,

    /// Organizations mentioned (reserved for enrichment)
    #[serde(default)]
    pub organizations: Vec<Organization>,

    /// Persons mentioned (reserved for enrichment)
    #[serde(default)]
    pub persons: Vec<Person>,

    /// Relations (reserved for enrichment)
    #[serde(default)]
    pub relations: Vec<Relation>,

    /// Owning organization
    pub section_body: Option<String>,

    /// Raw organization block from the Sumário
    pub section_body_raw: Option<String>,

    /// All organizations of the owning block
    #[serde(default)]
    pub section_orgs: Vec<String>,

    /// Header line the doc was anchored on
    pub header_text: Option<String>,

    /// Source lines
    pub provenance: Option<Provenance>,

    /// Non-fatal diagnostics (`link:matched`, `tipo:unknown`, ...)
    #[serde(default)]
    pub quality_flags: BTreeSet<String>,
}

impl Doc {
    /// Create a doc with empty content and metadata.
    pub fn new(
        id: impl Into<String>,
        pdf_name: impl Into<String>,
        tipo: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            pdf_name: pdf_name.into(),
            source_path: String::new(),
            tipo: tipo.into(),
            body_text: String::new(),
            summary_text: String::new(),
            publication_date: None,
            issuers: Vec::new(),
            organizations: Vec::new(),
            persons: Vec::new(),
            relations: Vec::new(),
            section_body: None,
            section_body_raw: None,
            section_orgs: Vec::new(),
            header_text: None,
            provenance: None,
            quality_flags: BTreeSet::new(),
        }
    }

    /// Add a quality flag.
    pub fn flag(&mut self, flag: impl Into<String>) {
        self.quality_flags.insert(flag.into());
    }

    /// Check for a quality flag.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.quality_flags.contains(flag)
    }

    /// Lightweight validation; returns human-readable issues.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.body_text.trim().is_empty() {
            issues.push("body text is empty".to_string());
        }
        if self.tipo.is_empty() {
            issues.push("tipo missing".to_string());
        } else if !is_allowed_tipo(&self.tipo) {
            issues.push(format!("tipo '{}' not in allowed set", self.tipo));
        }
        issues
    }
}

impl PartialEq for Doc {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Doc {}

impl Hash for Doc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
