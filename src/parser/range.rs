//! Location of the Sumário block.

use crate::error::{Error, Result};
use crate::model::{Line, SummaryRange};
use crate::tagger::EntityTagger;
use crate::text::fold;

use super::options::PipelineOptions;

/// Folded text of the line that opens the Sumário.
const SUMMARY_MARKER: &str = "sumario";

/// Finds the `[start, end)` line span of the Sumário.
///
/// The summary's first organization heading (anchor A) is repeated verbatim
/// as the first body heading; that repetition closes the block. All scans
/// are single-pass and the earliest match wins.
pub struct SummaryRangeLocator<'a> {
    tagger: &'a dyn EntityTagger,
    anchor_window: usize,
    end_window: usize,
}

impl<'a> SummaryRangeLocator<'a> {
    /// Create a locator with the windows from `options`.
    pub fn new(tagger: &'a dyn EntityTagger, options: &PipelineOptions) -> Self {
        Self {
            tagger,
            anchor_window: options.anchor_window,
            end_window: options.end_window,
        }
    }

    /// Locate the block; `Ok(None)` when there is no "Sumário" line.
    pub fn find_range(&self, lines: &[Line]) -> Result<Option<SummaryRange>> {
        let len = lines.len();
        let Some(start) = lines
            .iter()
            .position(|l| fold(&l.text) == SUMMARY_MARKER)
        else {
            log::debug!("No Sumário marker in {} lines", len);
            return Ok(None);
        };

        let anchor_limit = len.min(start.saturating_add(self.anchor_window.max(1)));
        let end_limit = len.min(start.saturating_add(self.end_window.max(1)));

        let anchor = (start + 1..anchor_limit).find(|&j| self.is_org(&lines[j]));
        let end = match anchor {
            None => {
                log::debug!(
                    "No organization heading within {} lines of the Sumário",
                    self.anchor_window
                );
                anchor_limit
            }
            Some(a) => {
                let target = fold(&lines[a].text);
                let repeated = (a + 1..len).find(|&k| fold(&lines[k].text) == target);
                match repeated {
                    Some(k) => k,
                    None => {
                        log::debug!(
                            "Anchor heading at line {} never repeats; falling back",
                            a
                        );
                        (a + 1..end_limit)
                            .find(|&k| self.is_org(&lines[k]))
                            .unwrap_or(end_limit)
                    }
                }
            }
        };

        if start >= end || end > len {
            return Err(Error::InvalidRange { start, end, len });
        }
        Ok(Some(SummaryRange::new(start, end)))
    }

    fn is_org(&self, line: &Line) -> bool {
        !line.is_blank() && self.tagger.is_org_heading(line.trimmed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExtractedText;
    use crate::tagger::RuleTagger;

    fn locate(lines: &[&str], options: &PipelineOptions) -> Option<SummaryRange> {
        let text = ExtractedText::from_lines(lines.iter().copied());
        let tagger = RuleTagger::default();
        SummaryRangeLocator::new(&tagger, options)
            .find_range(&text.lines)
            .unwrap()
    }

    #[test]
    fn test_repeated_anchor_closes_block() {
        let lines = [
            "Sumário",
            "CÂMARA MUNICIPAL DE LISBOA",
            "Despacho 10/2025",
            "texto.",
            "",
            "CÂMARA MUNICIPAL DE LISBOA",
            "Despacho 10/2025",
            "corpo do despacho.",
        ];
        assert_eq!(
            locate(&lines, &PipelineOptions::default()),
            Some(SummaryRange::new(0, 5))
        );
    }

    #[test]
    fn test_marker_is_case_and_diacritic_insensitive() {
        let lines = ["capa", "  SUMARIO ", "texto"];
        let range = locate(&lines, &PipelineOptions::default()).unwrap();
        assert_eq!(range.start, 1);
        assert_eq!(range.end, 3);
    }

    #[test]
    fn test_no_marker() {
        let lines = ["CÂMARA MUNICIPAL DE LISBOA", "Despacho 10/2025"];
        assert_eq!(locate(&lines, &PipelineOptions::default()), None);
        assert_eq!(locate(&[], &PipelineOptions::default()), None);
    }

    #[test]
    fn test_no_anchor_caps_at_anchor_window() {
        let mut lines = vec!["Sumário"];
        lines.extend(std::iter::repeat("linha sem cabeçalho").take(10));
        let options = PipelineOptions::new().with_anchor_window(4);
        assert_eq!(locate(&lines, &options), Some(SummaryRange::new(0, 4)));
    }

    #[test]
    fn test_unrepeated_anchor_falls_back_to_next_heading() {
        let lines = [
            "Sumário",
            "MUNICÍPIO DE SINTRA",
            "Aviso 1/2024",
            "FREGUESIA DE BELAS",
            "Edital 2/2024",
        ];
        assert_eq!(
            locate(&lines, &PipelineOptions::default()),
            Some(SummaryRange::new(0, 3))
        );
    }

    #[test]
    fn test_unrepeated_anchor_caps_at_end_window() {
        let lines = [
            "Sumário",
            "MUNICÍPIO DE SINTRA",
            "Aviso 1/2024",
            "texto",
            "texto",
            "texto",
        ];
        let options = PipelineOptions::new().with_end_window(4);
        assert_eq!(locate(&lines, &options), Some(SummaryRange::new(0, 4)));

        // The window never runs past the input.
        assert_eq!(
            locate(&lines, &PipelineOptions::default()),
            Some(SummaryRange::new(0, 6))
        );
    }

    #[test]
    fn test_range_invariant_on_marker_as_last_line() {
        let lines = ["corpo", "Sumário"];
        let range = locate(&lines, &PipelineOptions::default()).unwrap();
        assert!(range.start < range.end && range.end <= lines.len());
    }
}
