//! Per-PDF output bundle.

use serde::{Deserialize, Serialize};

use super::Doc;

/// All documents recovered from one PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bundle {
    /// Source PDF name
    pub pdf_name: String,

    /// Path the lines were read from
    pub source_path: String,

    /// Extraction notes passed through from the input
    #[serde(default)]
    pub notes: Vec<String>,

    /// Recovered documents, in body order
    #[serde(default)]
    pub docs: Vec<Doc>,
}

impl Bundle {
    /// Create an empty bundle.
    pub fn new(pdf_name: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            pdf_name: pdf_name.into(),
            source_path: source_path.into(),
            notes: Vec::new(),
            docs: Vec::new(),
        }
    }

    /// Look up a doc by id.
    pub fn get(&self, id: &str) -> Option<&Doc> {
        self.docs.iter().find(|d| d.id == id)
    }

    /// Number of docs.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Check if the bundle has no docs.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Validate the bundle and its docs; never fails.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.pdf_name.trim().is_empty() {
            issues.push("bundle pdf_name empty".to_string());
        }
        if self.source_path.is_empty() {
            issues.push("bundle source_path empty".to_string());
        }
        if self.docs.is_empty() {
            issues.push("bundle has no docs".to_string());
        }
        for doc in &self.docs {
            issues.extend(
                doc.validate()
                    .into_iter()
                    .map(|issue| format!("{}: {}", doc.id, issue)),
            );
        }
        issues
    }
}
