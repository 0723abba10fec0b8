//! Entity tagging contract consumed by the structure parsers.
//!
//! The parsers depend only on three span labels (`DOC_TYPE`, `DOC_NUM`,
//! `DOC_YEAR`) and an organization-heading classifier. Any implementation
//! of [`EntityTagger`] can be plugged into a [`crate::Pipeline`], rule-based
//! or model-based; [`RuleTagger`] is the built-in one.
//!
//! # Example
//!
//! ```
//! use gazette::tagger::{EntityTagger, RuleTagger, TagLabel};
//!
//! let tagger = RuleTagger::shared();
//! let tags = tagger.tag("Despacho n.º 10/2025");
//! assert_eq!(tags[0].label, TagLabel::DocType);
//! assert!(tagger.is_org_heading("CÂMARA MUNICIPAL DE LISBOA"));
//! ```

mod rules;

pub use rules::{RuleTagger, TaggerConfig};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Label of a tagged span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagLabel {
    /// Document type word ("Despacho", "Aviso", ...)
    DocType,
    /// Document number
    DocNum,
    /// Document year
    DocYear,
}

impl TagLabel {
    /// Wire name of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            TagLabel::DocType => "DOC_TYPE",
            TagLabel::DocNum => "DOC_NUM",
            TagLabel::DocYear => "DOC_YEAR",
        }
    }
}

/// A labelled token span. `end_token` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTag {
    /// Span label
    pub label: TagLabel,
    /// First token of the span
    pub start_token: usize,
    /// One past the last token of the span
    pub end_token: usize,
    /// Surface text of the span
    pub text: String,
}

impl EntityTag {
    /// Create a new tag.
    pub fn new(label: TagLabel, start_token: usize, end_token: usize, text: impl Into<String>) -> Self {
        Self {
            label,
            start_token,
            end_token,
            text: text.into(),
        }
    }

    /// Check the label.
    pub fn is(&self, label: TagLabel) -> bool {
        self.label == label
    }
}

/// Capability the structure parsers consume.
///
/// Implementations must be deterministic for identical input and must not
/// fail: unrecognized text yields no tags. They are shared read-only across
/// concurrent runs.
pub trait EntityTagger: Send + Sync {
    /// Split text into the token space that tag spans index into.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Tag a line. Spans are ordered and non-overlapping.
    fn tag(&self, text: &str) -> Vec<EntityTag>;

    /// Decide whether a line is an organization heading.
    fn is_org_heading(&self, text: &str) -> bool;

    /// Name of this tagger, for diagnostics.
    fn name(&self) -> &str {
        "custom"
    }
}

/// Check that tags are ordered, non-overlapping, non-empty and in bounds.
pub fn validate_tags(tags: &[EntityTag], token_count: usize) -> Result<()> {
    let mut previous_end = 0;
    for (i, tag) in tags.iter().enumerate() {
        if tag.start_token >= tag.end_token {
            return Err(Error::MalformedTags(format!(
                "{} span {}..{} is empty",
                tag.label.as_str(),
                tag.start_token,
                tag.end_token
            )));
        }
        if tag.end_token > token_count {
            return Err(Error::MalformedTags(format!(
                "{} span {}..{} exceeds {} tokens",
                tag.label.as_str(),
                tag.start_token,
                tag.end_token,
                token_count
            )));
        }
        if i > 0 && tag.start_token < previous_end {
            return Err(Error::MalformedTags(format!(
                "{} span {}..{} overlaps or precedes the previous span",
                tag.label.as_str(),
                tag.start_token,
                tag.end_token
            )));
        }
        previous_end = tag.end_token;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_serde_names() {
        let json = serde_json::to_string(&TagLabel::DocYear).unwrap();
        assert_eq!(json, "\"DOC_YEAR\"");
        assert_eq!(TagLabel::DocType.as_str(), "DOC_TYPE");
    }

    #[test]
    fn test_validate_tags_ok() {
        let tags = vec![
            EntityTag::new(TagLabel::DocType, 0, 1, "Aviso"),
            EntityTag::new(TagLabel::DocNum, 1, 2, "3"),
            EntityTag::new(TagLabel::DocYear, 3, 4, "2024"),
        ];
        assert!(validate_tags(&tags, 4).is_ok());
        assert!(validate_tags(&[], 0).is_ok());
    }

    #[test]
    fn test_validate_tags_rejects_overlap() {
        let tags = vec![
            EntityTag::new(TagLabel::DocType, 0, 2, "Aviso n"),
            EntityTag::new(TagLabel::DocNum, 1, 2, "3"),
        ];
        assert!(matches!(
            validate_tags(&tags, 4),
            Err(Error::MalformedTags(_))
        ));
    }

    #[test]
    fn test_validate_tags_rejects_out_of_bounds() {
        let tags = vec![EntityTag::new(TagLabel::DocNum, 2, 5, "3")];
        assert!(validate_tags(&tags, 4).is_err());

        let tags = vec![EntityTag::new(TagLabel::DocNum, 2, 2, "")];
        assert!(validate_tags(&tags, 4).is_err());
    }
}
