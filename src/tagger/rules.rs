//! Rule-based tagger built from an immutable pattern table.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{EntityTag, EntityTagger, TagLabel};
use crate::text::{fold, parse_year, ALLOWED_TIPOS};

/// Thousands-grouped numbers first so "1.234" stays one token.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,3}(?:\.\d{3})+|\w+|[^\w\s]").unwrap());

static SHARED: Lazy<Arc<RuleTagger>> =
    Lazy::new(|| Arc::new(RuleTagger::new(TaggerConfig::default())));

/// Configuration for [`RuleTagger`].
#[derive(Debug, Clone)]
pub struct TaggerConfig {
    /// Words tagged as `DOC_TYPE` (matched on their folded form).
    /// Defaults to the allowed tipos.
    pub doc_types: Vec<String>,

    /// Minimum number of letters on an organization heading
    pub org_min_letters: usize,

    /// Share of uppercase letters an organization heading must exceed
    pub org_upper_ratio: f32,
}

impl TaggerConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the document-type vocabulary.
    pub fn with_doc_types<I, S>(mut self, doc_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.doc_types = doc_types.into_iter().map(Into::into).collect();
        self
    }

    /// Add one document type to the vocabulary.
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_types.push(doc_type.into());
        self
    }

    /// Set the uppercase ratio threshold for organization headings.
    pub fn with_org_upper_ratio(mut self, ratio: f32) -> Self {
        self.org_upper_ratio = ratio;
        self
    }
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            doc_types: ALLOWED_TIPOS.iter().map(|s| s.to_string()).collect(),
            org_min_letters: 3,
            org_upper_ratio: 0.75,
        }
    }
}

/// Tagger driven by a fixed vocabulary and token shape rules.
///
/// - `DOC_TYPE`: a token whose folded form is in the vocabulary, unless it
///   opens a hyphenated compound such as "Decreto-Lei".
/// - `DOC_YEAR`: a four-digit token in 1900–2100 preceded by `/` or `de`.
/// - `DOC_NUM`: any other numeric token.
///
/// Built once and never mutated; use [`RuleTagger::shared`] to get the
/// process-wide instance.
#[derive(Debug)]
pub struct RuleTagger {
    config: TaggerConfig,
    doc_types: HashSet<String>,
}

impl RuleTagger {
    /// Build a tagger from a configuration.
    pub fn new(config: TaggerConfig) -> Self {
        let doc_types = config
            .doc_types
            .iter()
            .map(|t| fold(t))
            .filter(|t| !t.is_empty())
            .collect();
        Self { config, doc_types }
    }

    /// The process-wide tagger with the default configuration.
    pub fn shared() -> Arc<RuleTagger> {
        Arc::clone(&SHARED)
    }

    /// Configuration this tagger was built from.
    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    fn is_doc_type(&self, token: &str) -> bool {
        self.doc_types.contains(&fold(token))
    }

    /// Tokens with their byte offsets in `text`.
    fn spans<'t>(&self, text: &'t str) -> Vec<(usize, usize, &'t str)> {
        TOKEN_RE
            .find_iter(text)
            .map(|m| (m.start(), m.end(), m.as_str()))
            .collect()
    }

    /// `word-word` written without spaces.
    fn opens_compound(spans: &[(usize, usize, &str)], i: usize) -> bool {
        match (spans.get(i + 1), spans.get(i + 2)) {
            (Some(&(hs, he, "-")), Some(&(ns, _, next))) => {
                hs == spans[i].1 && ns == he && next.chars().all(char::is_alphabetic)
            }
            _ => false,
        }
    }

    fn classify_number(token: &str, previous: Option<&str>) -> Option<TagLabel> {
        let numeric = token.chars().all(|c| c.is_ascii_digit() || c == '.')
            && token.chars().any(|c| c.is_ascii_digit());
        if !numeric {
            return None;
        }

        let after_separator = matches!(previous, Some(p) if p == "/" || fold(p) == "de");
        if after_separator && parse_year(token).is_some() {
            Some(TagLabel::DocYear)
        } else {
            Some(TagLabel::DocNum)
        }
    }
}

impl Default for RuleTagger {
    fn default() -> Self {
        Self::new(TaggerConfig::default())
    }
}

impl EntityTagger for RuleTagger {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.spans(text)
            .into_iter()
            .map(|(_, _, token)| token.to_string())
            .collect()
    }

    fn tag(&self, text: &str) -> Vec<EntityTag> {
        let spans = self.spans(text);
        let mut tags = Vec::new();

        for (i, &(_, _, token)) in spans.iter().enumerate() {
            let label = if self.is_doc_type(token) {
                (!Self::opens_compound(&spans, i)).then_some(TagLabel::DocType)
            } else {
                let previous = i.checked_sub(1).map(|p| spans[p].2);
                Self::classify_number(token, previous)
            };

            if let Some(label) = label {
                tags.push(EntityTag::new(label, i, i + 1, token));
            }
        }

        tags
    }

    fn is_org_heading(&self, text: &str) -> bool {
        let trimmed = text.trim();
        let letters: Vec<char> = trimmed.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.len() < self.config.org_min_letters {
            return false;
        }
        if fold(trimmed) == "sumario" {
            return false;
        }

        let tokens = self.tokenize(trimmed);
        if tokens.first().is_some_and(|t| self.is_doc_type(t)) {
            return false;
        }
        let has_upper_word = tokens.iter().any(|t| {
            t.chars().count() >= 2 && t.chars().all(|c| c.is_alphabetic() && c.is_uppercase())
        });
        if !has_upper_word {
            return false;
        }

        let upper = letters.iter().filter(|c| c.is_uppercase()).count();
        upper as f32 / letters.len() as f32 > self.config.org_upper_ratio
    }

    fn name(&self) -> &str {
        "rules"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(tags: &[EntityTag]) -> Vec<(TagLabel, &str)> {
        tags.iter().map(|t| (t.label, t.text.as_str())).collect()
    }

    #[test]
    fn test_tokenize() {
        let tagger = RuleTagger::default();
        assert_eq!(
            tagger.tokenize("Despacho n.º 1.234/2025"),
            vec!["Despacho", "n", ".", "º", "1.234", "/", "2025"]
        );
    }

    #[test]
    fn test_tag_number_and_year() {
        let tagger = RuleTagger::default();
        let tags = tagger.tag("Despacho 10/2025");
        assert_eq!(
            labels(&tags),
            vec![
                (TagLabel::DocType, "Despacho"),
                (TagLabel::DocNum, "10"),
                (TagLabel::DocYear, "2025"),
            ]
        );
        assert_eq!(tags[2].start_token, 3);
        assert_eq!(tags[2].end_token, 4);
    }

    #[test]
    fn test_tag_year_after_de() {
        let tagger = RuleTagger::default();
        let tags = tagger.tag("Aviso n.º 7 de 2024");
        assert_eq!(
            labels(&tags),
            vec![
                (TagLabel::DocType, "Aviso"),
                (TagLabel::DocNum, "7"),
                (TagLabel::DocYear, "2024"),
            ]
        );
    }

    #[test]
    fn test_tag_out_of_range_year_is_number() {
        let tagger = RuleTagger::default();
        let tags = tagger.tag("Edital 5/1850");
        assert_eq!(tags[2].label, TagLabel::DocNum);
    }

    #[test]
    fn test_tag_diacritics_and_case() {
        let tagger = RuleTagger::default();
        let tags = tagger.tag("DECLARAÇÃO de retificação");
        assert_eq!(labels(&tags), vec![(TagLabel::DocType, "DECLARAÇÃO")]);
    }

    #[test]
    fn test_default_vocabulary_is_allow_list() {
        let tagger = RuleTagger::default();
        assert!(tagger.tag("Portaria n.º 12/2024").iter().all(|t| t.label != TagLabel::DocType));
        assert!(tagger.tag("Decreto 305/2009").iter().all(|t| t.label != TagLabel::DocType));
        assert!(tagger.tag("Relatório 3/2025").iter().all(|t| t.label != TagLabel::DocType));
    }

    #[test]
    fn test_hyphenated_compound_is_not_doc_type() {
        let tagger = RuleTagger::new(TaggerConfig::new().with_doc_type("decreto"));
        let tags = tagger.tag("Decreto-Lei n.º 305/2009, de 23 de outubro,");
        assert!(tags.iter().all(|t| t.label != TagLabel::DocType));

        let spaced = tagger.tag("Decreto - 305/2009");
        assert_eq!(spaced[0].label, TagLabel::DocType);
        assert_eq!(tagger.tag("Despacho-10/2025")[0].label, TagLabel::DocType);
    }

    #[test]
    fn test_tag_nothing_recognized() {
        let tagger = RuleTagger::default();
        assert!(tagger.tag("corpo do despachante.").is_empty());
        assert!(tagger.tag("").is_empty());
    }

    #[test]
    fn test_org_heading() {
        let tagger = RuleTagger::default();
        assert!(tagger.is_org_heading("CÂMARA MUNICIPAL DE LISBOA"));
        assert!(tagger.is_org_heading("DIREÇÃO-GERAL DA SAÚDE"));
        assert!(tagger.is_org_heading("  MUNICÍPIO DE SINTRA, FREGUESIA DE BELAS "));
        assert!(!tagger.is_org_heading("Câmara Municipal de Lisboa"));
        assert!(!tagger.is_org_heading("II"));
        assert!(!tagger.is_org_heading("SUMÁRIO"));
        assert!(!tagger.is_org_heading("DESPACHO N.º 10/2025"));
        assert!(!tagger.is_org_heading(""));
    }

    #[test]
    fn test_custom_vocabulary() {
        let tagger = RuleTagger::new(TaggerConfig::new().with_doc_types(["Circular"]));
        assert_eq!(tagger.tag("Circular 4/2023")[0].label, TagLabel::DocType);
        assert_eq!(tagger.tag("Despacho 4/2023")[0].label, TagLabel::DocNum);
    }

    #[test]
    fn test_shared_is_single_instance() {
        let a = RuleTagger::shared();
        let b = RuleTagger::shared();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.name(), "rules");
    }

    #[test]
    fn test_deterministic() {
        let tagger = RuleTagger::default();
        let line = "Deliberação n.º 3/2025, de 2 de janeiro";
        assert_eq!(tagger.tag(line), tagger.tag(line));
    }
}
