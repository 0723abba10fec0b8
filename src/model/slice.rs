//! Body slice types.

use serde::{Deserialize, Serialize};

use super::LineSpan;

/// Contiguous body text belonging to one detected document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodySlice {
    /// Header line
    pub start_line: usize,

    /// Last line of the slice (inclusive)
    pub end_line: usize,

    /// Header line text, trimmed
    pub header_text: String,

    /// Slice lines joined with newlines, trimmed
    pub text: String,

    /// Most recent organization heading at or before the header
    pub section_org: Option<String>,

    /// Folded document type re-derived from the header
    pub tipo: Option<String>,

    /// Document number re-derived from the header
    pub number: Option<String>,

    /// Document year re-derived from the header
    pub year: Option<String>,
}

impl BodySlice {
    /// Lines covered by the slice.
    pub fn line_span(&self) -> LineSpan {
        LineSpan::new(self.start_line, self.end_line)
    }

    /// Number of lines in the slice.
    pub fn line_count(&self) -> usize {
        self.end_line + 1 - self.start_line
    }
}
