//! Plain text report for bundles.

use std::fmt::Write;

use crate::model::{Bundle, Doc};

/// Render a bundle as a human-readable report, one block per doc.
pub fn to_text(bundle: &Bundle) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{} ({} docs)", bundle.pdf_name, bundle.len());
    for note in &bundle.notes {
        let _ = writeln!(output, "note: {}", note);
    }

    for (i, doc) in bundle.docs.iter().enumerate() {
        output.push('\n');
        write_doc(&mut output, i + 1, doc);
    }

    output.trim_end().to_string()
}

fn write_doc(output: &mut String, ordinal: usize, doc: &Doc) {
    let _ = writeln!(output, "[{}] {}", ordinal, doc.id);
    if let Some(org) = &doc.section_body {
        let _ = writeln!(output, "org: {}", org);
    }
    if let Some(p) = &doc.provenance {
        let _ = writeln!(output, "lines: {}-{}", p.line_start, p.line_end);
    }
    if !doc.quality_flags.is_empty() {
        let flags: Vec<&str> = doc.quality_flags.iter().map(String::as_str).collect();
        let _ = writeln!(output, "flags: {}", flags.join(", "));
    }
    if !doc.summary_text.is_empty() {
        let _ = writeln!(output, "summary: {}", doc.summary_text.replace('\n', " "));
    }
    if !doc.body_text.is_empty() {
        let _ = writeln!(output, "{}", doc.body_text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text() {
        let mut doc = Doc::new("aviso-1-2024@dr.pdf", "dr.pdf", "aviso");
        doc.body_text = "Aviso 1/2024\ncorpo".to_string();
        doc.summary_text = "Aviso 1/2024\nAbertura".to_string();
        doc.section_body = Some("MUNICÍPIO DE SINTRA".to_string());
        doc.flag("link:matched");

        let mut bundle = Bundle::new("dr.pdf", "dr/completo.txt");
        bundle.docs.push(doc);

        let result = to_text(&bundle);
        assert!(result.starts_with("dr.pdf (1 docs)"));
        assert!(result.contains("[1] aviso-1-2024@dr.pdf"));
        assert!(result.contains("org: MUNICÍPIO DE SINTRA"));
        assert!(result.contains("flags: link:matched"));
        assert!(result.contains("summary: Aviso 1/2024 Abertura"));
        assert!(result.ends_with("corpo"));
    }
}
