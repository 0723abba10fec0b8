//! Body header detection and slicing.

use crate::error::{Error, Result};
use crate::model::{BodySlice, Line, SummaryRange};
use crate::tagger::EntityTagger;

use super::headers::HeaderRule;
use super::options::PipelineOptions;

/// Detects document-start lines in the body and cuts the body into slices.
///
/// Body headers are authoritative: each slice re-derives its type, number
/// and year from its own header, independently of the summary.
pub struct BodySlicer<'a> {
    tagger: &'a dyn EntityTagger,
    rule: HeaderRule,
}

impl<'a> BodySlicer<'a> {
    /// Create a slicer with the configured type position and header purity.
    pub fn new(tagger: &'a dyn EntityTagger, options: &PipelineOptions) -> Self {
        Self {
            tagger,
            rule: HeaderRule {
                position: options.type_position,
                purity: options.header_purity,
            },
        }
    }

    /// Positions of header lines, in order, skipping the excluded range.
    pub fn detect_headers(&self, lines: &[Line], exclude: Option<SummaryRange>) -> Result<Vec<usize>> {
        let mut headers = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            if exclude.is_some_and(|r| r.contains(i)) || line.is_blank() {
                continue;
            }
            if self.tagger.is_org_heading(line.trimmed()) {
                continue;
            }
            if self.rule.recognize(self.tagger, &line.text)?.is_some() {
                headers.push(i);
            }
        }
        log::debug!("Detected {} body headers", headers.len());
        Ok(headers)
    }

    /// Cut the body into one slice per header.
    ///
    /// A slice runs from its header to the line before the next header, or
    /// to the line before the excluded range when that range starts after
    /// the header, or to the end of input.
    pub fn slices(
        &self,
        lines: &[Line],
        headers: &[usize],
        exclude: Option<SummaryRange>,
    ) -> Result<Vec<BodySlice>> {
        let mut starts = headers.to_vec();
        starts.sort_unstable();
        starts.dedup();
        if let Some(&index) = starts.iter().find(|&&h| h >= lines.len()) {
            return Err(Error::HeaderOutOfBounds {
                index,
                len: lines.len(),
            });
        }

        let orgs = self.section_orgs(lines, exclude);
        let mut slices = Vec::with_capacity(starts.len());

        for (n, &start) in starts.iter().enumerate() {
            let mut end = starts.get(n + 1).copied().unwrap_or(lines.len());
            if let Some(range) = exclude {
                if range.start > start && range.start < end {
                    end = range.start;
                }
            }

            let body = &lines[start..end];
            let text = body
                .iter()
                .map(|l| l.text.as_str())
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string();
            let header_text = lines[start].trimmed().to_string();
            let key = self.rule.recognize(self.tagger, &header_text)?;

            slices.push(BodySlice {
                start_line: lines[start].index,
                end_line: lines[end - 1].index,
                header_text,
                text,
                section_org: orgs[start].clone(),
                tipo: key.as_ref().map(|k| k.tipo.clone()),
                number: key.as_ref().and_then(|k| k.number.clone()),
                year: key.and_then(|k| k.year),
            });
        }

        Ok(slices)
    }

    /// Most recent organization heading at or before each line.
    fn section_orgs(&self, lines: &[Line], exclude: Option<SummaryRange>) -> Vec<Option<String>> {
        let mut current: Option<String> = None;
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let excluded = exclude.is_some_and(|r| r.contains(i));
                if !excluded && !line.is_blank() && self.tagger.is_org_heading(line.trimmed()) {
                    current = Some(line.trimmed().to_string());
                }
                current.clone()
            })
            .collect()
    }
}
