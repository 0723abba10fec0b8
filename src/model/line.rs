//! Line-level input types.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One line of extracted gazette text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Position of the line in the full sequence (0-indexed)
    pub index: usize,

    /// Raw line text
    pub text: String,
}

impl Line {
    /// Create a new line.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Line text without surrounding whitespace.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Check whether the line has no visible content.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Ordered line sequence plus the extraction collaborator's notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Lines, indexed by position
    pub lines: Vec<Line>,

    /// Free-text extraction notes (e.g. "forced OCR on page 2")
    pub notes: Vec<String>,
}

impl ExtractedText {
    /// Build from already split lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines
                .into_iter()
                .enumerate()
                .map(|(i, text)| Line::new(i, text))
                .collect(),
            notes: Vec::new(),
        }
    }

    /// Split combined text into lines.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    /// Join per-page text with a blank line between pages, the way the
    /// extractor combines them, then split into lines.
    pub fn from_pages<S: AsRef<str>>(pages: &[S], notes: Vec<String>) -> Self {
        let combined = pages
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join("\n\n");
        Self::from_text(&combined).with_notes(notes)
    }

    /// Read a UTF-8 text file; invalid sequences are replaced.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_text(&String::from_utf8_lossy(&bytes)))
    }

    /// Add an extraction note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Append extraction notes.
    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes.extend(notes);
        self
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if there are no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Line span of the Sumário block. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRange {
    /// Line of the "Sumário" marker
    pub start: usize,
    /// First line after the block
    pub end: usize,
}

impl SummaryRange {
    /// Create a new range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Check whether a line index falls inside the block.
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// Number of lines in the block.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the block has no lines.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inclusive line span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    /// First line
    pub start: usize,
    /// Last line (inclusive)
    pub end: usize,
}

impl LineSpan {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_indexes_lines() {
        let text = ExtractedText::from_text("Sumário\n\nAviso 1/2024");
        assert_eq!(text.len(), 3);
        assert_eq!(text.lines[2], Line::new(2, "Aviso 1/2024"));
        assert!(text.lines[1].is_blank());
    }

    #[test]
    fn test_from_pages_inserts_blank_line() {
        let text = ExtractedText::from_pages(
            &["página um", "página dois"],
            vec!["forced OCR on page 2".to_string()],
        );
        let lines: Vec<&str> = text.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(lines, vec!["página um", "", "página dois"]);
        assert_eq!(text.notes, vec!["forced OCR on page 2"]);
    }

    #[test]
    fn test_summary_range_contains() {
        let range = SummaryRange::new(2, 5);
        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(4));
        assert!(!range.contains(5));
        assert_eq!(range.len(), 3);
    }
}
