//! Text normalization helpers shared by the tagger, parsers and assembler.

use std::ops::RangeInclusive;

use unicode_normalization::UnicodeNormalization;

/// Document types a `Doc` may carry; anything else becomes [`UNKNOWN_TIPO`].
pub const ALLOWED_TIPOS: &[&str] = &[
    "despacho",
    "aviso",
    "declaracao",
    "edital",
    "deliberacao",
    "contrato",
    "resolucao",
    "revogacao",
    "caducidade",
    "ato",
    "acto",
];

/// Tipo assigned when normalization fails.
pub const UNKNOWN_TIPO: &str = "unknown";

/// Years accepted on a document header.
pub const YEAR_RANGE: RangeInclusive<u32> = 1900..=2100;

/// Strip diacritics, lower-case and trim.
///
/// Characters without an ASCII decomposition (e.g. `—`) are dropped.
pub fn fold(text: &str) -> String {
    let ascii: String = text.nfkd().filter(|c| c.is_ascii()).collect();
    ascii.to_lowercase().trim().to_string()
}

/// Check whether a folded tipo is in the allow-list.
pub fn is_allowed_tipo(tipo: &str) -> bool {
    ALLOWED_TIPOS.contains(&tipo)
}

/// Normalize a raw type token against the allow-list.
pub fn normalize_tipo(raw: Option<&str>) -> String {
    let folded = raw.map(fold).unwrap_or_default();
    if is_allowed_tipo(&folded) {
        folded
    } else {
        UNKNOWN_TIPO.to_string()
    }
}

/// Keep only ASCII digits; `None` when nothing is left.
pub fn digits_only(text: &str) -> Option<String> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// Accept a token as a year: four digits within [`YEAR_RANGE`].
pub fn parse_year(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.len() != 4 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value: u32 = trimmed.parse().ok()?;
    if YEAR_RANGE.contains(&value) {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// Split a raw organization block into an ordered, deduplicated list.
///
/// Only commas and semicolons separate entries; hyphens belong to names
/// such as "DIREÇÃO-GERAL DA SAÚDE". Duplicates are detected on the folded
/// form and the first spelling wins.
pub fn split_orgs(block: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut orgs = Vec::new();

    for part in block.split([',', ';']) {
        let name = part.split_whitespace().collect::<Vec<_>>().join(" ");
        if name.is_empty() {
            continue;
        }
        let key = fold(&name);
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        orgs.push(name);
    }

    orgs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold() {
        assert_eq!(fold("  Sumário "), "sumario");
        assert_eq!(fold("CÂMARA MUNICIPAL"), "camara municipal");
        assert_eq!(fold("Declaração"), "declaracao");
        assert_eq!(fold("n.º"), "n.o");
        assert_eq!(fold("—"), "");
    }

    #[test]
    fn test_normalize_tipo() {
        assert_eq!(normalize_tipo(Some("Despacho")), "despacho");
        assert_eq!(normalize_tipo(Some("DELIBERAÇÃO")), "deliberacao");
        assert_eq!(normalize_tipo(Some("relatório")), UNKNOWN_TIPO);
        assert_eq!(normalize_tipo(Some("")), UNKNOWN_TIPO);
        assert_eq!(normalize_tipo(None), UNKNOWN_TIPO);
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("1.234"), Some("1234".to_string()));
        assert_eq!(digits_only("n.º 10"), Some("10".to_string()));
        assert_eq!(digits_only("abc"), None);
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2025"), Some("2025".to_string()));
        assert_eq!(parse_year("1900"), Some("1900".to_string()));
        assert_eq!(parse_year("2100"), Some("2100".to_string()));
        assert_eq!(parse_year("1899"), None);
        assert_eq!(parse_year("2101"), None);
        assert_eq!(parse_year("025"), None);
        assert_eq!(parse_year("20a5"), None);
    }

    #[test]
    fn test_split_orgs() {
        let orgs = split_orgs(
            "MUNICÍPIO DE SINTRA, Câmara Municipal; DIREÇÃO-GERAL DA SAÚDE, município de sintra",
        );
        assert_eq!(
            orgs,
            vec![
                "MUNICÍPIO DE SINTRA".to_string(),
                "Câmara Municipal".to_string(),
                "DIREÇÃO-GERAL DA SAÚDE".to_string(),
            ]
        );
    }

    #[test]
    fn test_split_orgs_empty_parts() {
        assert!(split_orgs(" , ;").is_empty());
    }
}
