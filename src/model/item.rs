//! Summary (Sumário) item types.

use serde::{Deserialize, Serialize};

use super::LineSpan;
use crate::text::split_orgs;

/// Organizations owning a run of summary items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgAttribution {
    /// First organization of the block
    pub primary: Option<String>,

    /// All organizations of the block, ordered and deduplicated
    pub orgs: Vec<String>,

    /// Raw heading lines joined with spaces
    pub raw: Option<String>,
}

impl OrgAttribution {
    /// Build from consecutive heading lines.
    pub fn from_block<S: AsRef<str>>(lines: &[S]) -> Self {
        let raw = lines
            .iter()
            .map(|l| l.as_ref().trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if raw.is_empty() {
            return Self::default();
        }

        let orgs = split_orgs(&raw);
        Self {
            primary: orgs.first().cloned(),
            orgs,
            raw: Some(raw),
        }
    }

    /// Check if no organization is attributed.
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.orgs.is_empty() && self.raw.is_none()
    }
}

/// One entry of the Sumário.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryItem {
    /// Folded document type (not yet checked against the allow-list)
    pub tipo: String,

    /// Document number, digits only
    pub number: Option<String>,

    /// Document year (1900–2100)
    pub year: Option<String>,

    /// The item line as it appears in the summary
    pub header_text: String,

    /// Continuation lines up to the next item or organization block, kept
    /// verbatim and joined by `\n`. Leading and trailing blank lines are
    /// dropped.
    pub title: String,

    /// Lines covered by the item, in absolute indices
    pub line_range: LineSpan,

    /// Organizations active when the item was parsed
    pub org: OrgAttribution,
}

impl SummaryItem {
    /// Header plus title, separated by a newline when a title exists.
    pub fn summary_text(&self) -> String {
        if self.title.is_empty() {
            self.header_text.clone()
        } else {
            format!("{}\n{}", self.header_text, self.title)
        }
    }
}
