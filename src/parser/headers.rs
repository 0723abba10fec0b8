//! Recognition of document-start lines shared by the summary and body parsers.

use crate::error::Result;
use crate::tagger::{validate_tags, EntityTag, EntityTagger, TagLabel};
use crate::text::{digits_only, fold, parse_year};

use super::options::{HeaderPurity, TypePosition};

/// Type, number and year read from a document-start line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocKey {
    /// Folded document type
    pub tipo: String,
    /// Digits of the document number
    pub number: Option<String>,
    /// Four-digit year
    pub year: Option<String>,
}

/// Rules for recognizing a document-start line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeaderRule {
    pub position: TypePosition,
    pub purity: HeaderPurity,
}

impl HeaderRule {
    /// Recognize `text` as a document-start line.
    ///
    /// Returns `Ok(None)` when the line does not qualify and an error when
    /// the tagger breaks its span contract.
    pub fn recognize(&self, tagger: &dyn EntityTagger, text: &str) -> Result<Option<DocKey>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let tokens = tagger.tokenize(text);
        let tags = tagger.tag(text);
        validate_tags(&tags, tokens.len())?;

        let Some(kind) = tags.iter().find(|t| t.is(TagLabel::DocType)) else {
            return Ok(None);
        };

        if self.position == TypePosition::Leading
            && tokens[..kind.start_token].iter().any(|t| is_alphanumeric(t))
        {
            return Ok(None);
        }

        let after = |t: &&EntityTag| t.start_token >= kind.end_token;
        let number_tag = tags
            .iter()
            .filter(after)
            .find(|t| t.is(TagLabel::DocNum) && digits_only(&t.text).is_some());
        let year_tag = tags
            .iter()
            .filter(after)
            .find(|t| t.is(TagLabel::DocYear) && parse_year(&t.text).is_some());

        if self.purity == HeaderPurity::Strict {
            let last = [Some(kind), number_tag, year_tag]
                .into_iter()
                .flatten()
                .map(|t| t.end_token)
                .max()
                .unwrap_or(kind.end_token);
            if tokens[last..].iter().any(|t| is_alphanumeric(t)) {
                return Ok(None);
            }
        }

        Ok(Some(DocKey {
            tipo: fold(&kind.text),
            number: number_tag.and_then(|t| digits_only(&t.text)),
            year: year_tag.and_then(|t| parse_year(&t.text)),
        }))
    }
}

fn is_alphanumeric(token: &str) -> bool {
    token.chars().any(|c| c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::RuleTagger;

    fn rule(position: TypePosition, purity: HeaderPurity) -> HeaderRule {
        HeaderRule { position, purity }
    }

    fn key(tipo: &str, number: Option<&str>, year: Option<&str>) -> DocKey {
        DocKey {
            tipo: tipo.to_string(),
            number: number.map(String::from),
            year: year.map(String::from),
        }
    }

    #[test]
    fn test_recognize_basic_header() {
        let tagger = RuleTagger::default();
        let found = rule(TypePosition::Leading, HeaderPurity::Loose)
            .recognize(&tagger, "Despacho n.º 10/2025")
            .unwrap();
        assert_eq!(found, Some(key("despacho", Some("10"), Some("2025"))));
    }

    #[test]
    fn test_recognize_thousands_number() {
        let tagger = RuleTagger::default();
        let found = rule(TypePosition::Leading, HeaderPurity::Loose)
            .recognize(&tagger, "Aviso n.º 1.234/2024")
            .unwrap();
        assert_eq!(found, Some(key("aviso", Some("1234"), Some("2024"))));
    }

    #[test]
    fn test_leading_position() {
        let tagger = RuleTagger::default();
        let leading = rule(TypePosition::Leading, HeaderPurity::Loose);
        let anywhere = rule(TypePosition::Anywhere, HeaderPurity::Loose);
        let line = "Nos termos do Despacho 5/2020 foi aprovado";

        assert_eq!(leading.recognize(&tagger, line).unwrap(), None);
        assert_eq!(
            anywhere.recognize(&tagger, line).unwrap(),
            Some(key("despacho", Some("5"), Some("2020")))
        );
        // Bullets before the type are not content.
        assert!(leading
            .recognize(&tagger, "— Edital 3/2024")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_strict_purity() {
        let tagger = RuleTagger::default();
        let strict = rule(TypePosition::Leading, HeaderPurity::Strict);
        let loose = rule(TypePosition::Leading, HeaderPurity::Loose);

        assert!(strict.recognize(&tagger, "Despacho 10/2025.").unwrap().is_some());
        assert!(strict
            .recognize(&tagger, "Despacho 10/2025 — Nomeação de júri")
            .unwrap()
            .is_none());
        assert!(loose
            .recognize(&tagger, "Despacho 10/2025 — Nomeação de júri")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_missing_number_and_year() {
        let tagger = RuleTagger::default();
        let found = rule(TypePosition::Leading, HeaderPurity::Strict)
            .recognize(&tagger, "Aviso")
            .unwrap();
        assert_eq!(found, Some(key("aviso", None, None)));
    }

    #[test]
    fn test_not_a_header() {
        let tagger = RuleTagger::default();
        let loose = rule(TypePosition::Anywhere, HeaderPurity::Loose);
        assert_eq!(loose.recognize(&tagger, "corpo do texto").unwrap(), None);
        assert_eq!(loose.recognize(&tagger, "   ").unwrap(), None);
    }
}
