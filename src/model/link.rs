//! Results of linking summary items to body slices.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BodySlice, SummaryItem};

/// Outcome of linking one item or slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    /// Item matched a body slice
    Matched,
    /// Item had no available slice with its key
    Unmatched,
    /// The body had no headers at all
    Unanchored,
    /// Slice without a summary item, kept under the fallback policy
    Fallback,
}

impl LinkStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Matched => "matched",
            LinkStatus::Unmatched => "unmatched",
            LinkStatus::Unanchored => "unanchored",
            LinkStatus::Fallback => "fallback",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a result is not a plain match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkReason {
    /// No body slice carries the item's key
    NoBodyAnchor,
    /// No body headers were detected
    NoBodyHeaders,
    /// No summary item carries the slice's key
    #[serde(rename = "no_sumario_match")]
    NoSummaryMatch,
}

impl LinkReason {
    /// Wire name of the reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkReason::NoBodyAnchor => "no_body_anchor",
            LinkReason::NoBodyHeaders => "no_body_headers",
            LinkReason::NoSummaryMatch => "no_sumario_match",
        }
    }
}

impl fmt::Display for LinkReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A linked (item, slice) pair or a leftover from either side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkResult {
    /// Summary item, if any
    pub item: Option<SummaryItem>,

    /// Body slice, if any
    pub slice: Option<BodySlice>,

    /// Link outcome
    pub status: LinkStatus,

    /// Reason for a non-matched outcome
    pub reason: Option<LinkReason>,
}

impl LinkResult {
    /// An item matched to a slice.
    pub fn matched(item: SummaryItem, slice: BodySlice) -> Self {
        Self {
            item: Some(item),
            slice: Some(slice),
            status: LinkStatus::Matched,
            reason: None,
        }
    }

    /// An item with no available slice.
    pub fn unmatched(item: SummaryItem) -> Self {
        Self {
            item: Some(item),
            slice: None,
            status: LinkStatus::Unmatched,
            reason: Some(LinkReason::NoBodyAnchor),
        }
    }

    /// An item from a document whose body has no headers.
    pub fn unanchored(item: SummaryItem) -> Self {
        Self {
            item: Some(item),
            slice: None,
            status: LinkStatus::Unanchored,
            reason: Some(LinkReason::NoBodyHeaders),
        }
    }

    /// A slice with no summary item.
    pub fn fallback(slice: BodySlice) -> Self {
        Self {
            item: None,
            slice: Some(slice),
            status: LinkStatus::Fallback,
            reason: Some(LinkReason::NoSummaryMatch),
        }
    }

    /// Sort key: the slice's start line, or past every line without one.
    pub fn order_key(&self) -> usize {
        self.slice
            .as_ref()
            .map(|s| s.start_line)
            .unwrap_or(usize::MAX)
    }

    /// Quality flag mirroring the outcome (`link:matched`, `link:<reason>`).
    pub fn quality_flag(&self) -> String {
        match self.reason {
            Some(reason) => format!("link:{}", reason),
            None => format!("link:{}", self.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&LinkStatus::Unanchored).unwrap(),
            "\"unanchored\""
        );
        assert_eq!(
            serde_json::to_string(&LinkReason::NoSummaryMatch).unwrap(),
            "\"no_sumario_match\""
        );
        assert_eq!(
            serde_json::to_string(&LinkReason::NoBodyAnchor).unwrap(),
            "\"no_body_anchor\""
        );
    }
}
