//! Sumário item parsing.

use crate::error::Result;
use crate::model::{Line, LineSpan, OrgAttribution, SummaryItem};
use crate::tagger::EntityTagger;

use super::headers::{DocKey, HeaderRule};
use super::options::{HeaderPurity, PipelineOptions};

/// Parses the lines of a Sumário into ordered items.
///
/// Every non-blank line is either part of an organization block, an item
/// start, or the continuation (title) of the current item.
pub struct SummaryItemParser<'a> {
    tagger: &'a dyn EntityTagger,
    rule: HeaderRule,
    title_line_cap: Option<usize>,
}

impl<'a> SummaryItemParser<'a> {
    /// Create a parser; item lines follow the configured type position.
    pub fn new(tagger: &'a dyn EntityTagger, options: &PipelineOptions) -> Self {
        Self {
            tagger,
            rule: HeaderRule {
                position: options.type_position,
                // Item lines carry their titles inline.
                purity: HeaderPurity::Loose,
            },
            title_line_cap: options.title_line_cap,
        }
    }

    /// Parse the summary lines in one left-to-right scan.
    pub fn parse_items(&self, lines: &[Line]) -> Result<Vec<SummaryItem>> {
        let mut items = Vec::new();
        let mut active = OrgAttribution::default();
        let mut current: Option<PendingItem> = None;

        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];

            if line.is_blank() {
                if let Some(pending) = current.as_mut() {
                    pending.push(line);
                }
                i += 1;
                continue;
            }

            if self.is_org(line) {
                if let Some(pending) = current.take() {
                    items.push(pending.finish());
                }
                let block_start = i;
                while i < lines.len() && !lines[i].is_blank() && self.is_org(&lines[i]) {
                    i += 1;
                }
                let block: Vec<&str> = lines[block_start..i].iter().map(|l| l.trimmed()).collect();
                active = OrgAttribution::from_block(&block);
                log::debug!("Summary org block at line {}: {:?}", line.index, active.primary);
                continue;
            }

            if let Some(key) = self.rule.recognize(self.tagger, &line.text)? {
                if let Some(pending) = current.take() {
                    items.push(pending.finish());
                }
                current = Some(PendingItem::new(line, key, active.clone(), self.title_line_cap));
            } else if let Some(pending) = current.as_mut() {
                pending.push(line);
            }
            i += 1;
        }

        if let Some(pending) = current {
            items.push(pending.finish());
        }
        Ok(items)
    }

    fn is_org(&self, line: &Line) -> bool {
        self.tagger.is_org_heading(line.trimmed())
    }
}

/// An item whose title is still being captured.
struct PendingItem {
    key: DocKey,
    header_text: String,
    org: OrgAttribution,
    first_line: usize,
    last_line: usize,
    title: Vec<String>,
    captured: usize,
    cap: Option<usize>,
}

impl PendingItem {
    fn new(line: &Line, key: DocKey, org: OrgAttribution, cap: Option<usize>) -> Self {
        Self {
            key,
            header_text: line.trimmed().to_string(),
            org,
            first_line: line.index,
            last_line: line.index,
            title: Vec::new(),
            captured: 0,
            cap,
        }
    }

    /// Extend the item's range by one line, capturing it unless capped.
    fn push(&mut self, line: &Line) {
        self.last_line = line.index;
        if self.cap.is_some_and(|cap| self.captured >= cap) {
            return;
        }
        if !line.is_blank() {
            self.captured += 1;
        }
        self.title.push(line.text.clone());
    }

    fn finish(self) -> SummaryItem {
        let first = self.title.iter().position(|t| !t.trim().is_empty());
        let last = self.title.iter().rposition(|t| !t.trim().is_empty());
        let title = match (first, last) {
            (Some(first), Some(last)) => self.title[first..=last].join("\n"),
            _ => String::new(),
        };

        SummaryItem {
            tipo: self.key.tipo,
            number: self.key.number,
            year: self.key.year,
            header_text: self.header_text,
            title,
            line_range: LineSpan::new(self.first_line, self.last_line),
            org: self.org,
        }
    }
}
