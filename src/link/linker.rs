//! Matching summary items to body slices.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{Error, Result};
use crate::model::{BodySlice, LinkResult, LinkStatus, SummaryItem};
use crate::parser::OrphanPolicy;
use crate::text::UNKNOWN_TIPO;

/// Lookup key shared by items and slices.
type LinkKey = (String, Option<String>, Option<String>);

/// Output of [`Linker::link_detailed`].
#[derive(Debug, Clone, Default)]
pub struct Linkage {
    /// Ordered link results
    pub results: Vec<LinkResult>,

    /// Slices no item claimed that the policy dropped, in body order
    pub dropped: Vec<BodySlice>,
}

/// Links summary items to body slices by `(tipo, number, year)`.
///
/// Candidates per key are kept in body order and the first available one
/// wins. Each slice is consumed at most once.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linker {
    orphans: OrphanPolicy,
}

impl Linker {
    /// Create a linker with the given orphan policy.
    pub fn new(orphans: OrphanPolicy) -> Self {
        Self { orphans }
    }

    /// Link items to slices and return the ordered results.
    pub fn link(&self, items: Vec<SummaryItem>, slices: Vec<BodySlice>) -> Vec<LinkResult> {
        self.link_detailed(items, slices).results
    }

    /// Link items to slices, also returning the dropped orphan slices.
    ///
    /// Results with a slice come first in slice start-line order; results
    /// without one follow in summary order.
    pub fn link_detailed(&self, items: Vec<SummaryItem>, slices: Vec<BodySlice>) -> Linkage {
        if slices.is_empty() {
            return Linkage {
                results: items.into_iter().map(LinkResult::unanchored).collect(),
                dropped: Vec::new(),
            };
        }

        let mut candidates: HashMap<LinkKey, VecDeque<usize>> = HashMap::new();
        for (i, slice) in slices.iter().enumerate() {
            candidates.entry(slice_key(slice)).or_default().push_back(i);
        }

        let mut available: Vec<Option<BodySlice>> = slices.into_iter().map(Some).collect();
        let mut results = Vec::with_capacity(items.len());

        for item in items {
            let claimed = candidates
                .get_mut(&item_key(&item))
                .and_then(|queue| queue.pop_front())
                .and_then(|i| available[i].take());
            match claimed {
                Some(slice) => results.push(LinkResult::matched(item, slice)),
                None => {
                    log::debug!(
                        "No body slice for {} {:?}/{:?}",
                        item.tipo,
                        item.number,
                        item.year
                    );
                    results.push(LinkResult::unmatched(item));
                }
            }
        }

        let mut dropped = Vec::new();
        for slice in available.into_iter().flatten() {
            match self.orphans {
                OrphanPolicy::Drop => dropped.push(slice),
                OrphanPolicy::Fallback => results.push(LinkResult::fallback(slice)),
            }
        }

        results.sort_by_key(LinkResult::order_key);
        Linkage { results, dropped }
    }
}

fn item_key(item: &SummaryItem) -> LinkKey {
    (item.tipo.clone(), item.number.clone(), item.year.clone())
}

fn slice_key(slice: &BodySlice) -> LinkKey {
    (
        slice
            .tipo
            .clone()
            .unwrap_or_else(|| UNKNOWN_TIPO.to_string()),
        slice.number.clone(),
        slice.year.clone(),
    )
}

/// Verify no slice was consumed twice and matches do not exceed either side.
pub fn check_conservation(results: &[LinkResult], items: usize, slices: usize) -> Result<()> {
    let mut seen = HashSet::new();
    for slice in results.iter().filter_map(|r| r.slice.as_ref()) {
        if !seen.insert(slice.start_line) {
            return Err(Error::Invariant(format!(
                "body slice at line {} linked more than once",
                slice.start_line
            )));
        }
    }

    let matched = results
        .iter()
        .filter(|r| r.status == LinkStatus::Matched)
        .count();
    if matched > items.min(slices) {
        return Err(Error::Invariant(format!(
            "{} matches for {} items and {} slices",
            matched, items, slices
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineSpan, LinkReason, OrgAttribution};

    fn item(tipo: &str, number: &str, year: &str, line: usize) -> SummaryItem {
        SummaryItem {
            tipo: tipo.to_string(),
            number: Some(number.to_string()),
            year: Some(year.to_string()),
            header_text: format!("{} {}/{}", tipo, number, year),
            title: String::new(),
            line_range: LineSpan::new(line, line),
            org: OrgAttribution::default(),
        }
    }

    fn slice(tipo: &str, number: &str, year: &str, start: usize) -> BodySlice {
        BodySlice {
            start_line: start,
            end_line: start + 1,
            header_text: format!("{} {}/{}", tipo, number, year),
            text: format!("{} {}/{}\ncorpo", tipo, number, year),
            section_org: None,
            tipo: Some(tipo.to_string()),
            number: Some(number.to_string()),
            year: Some(year.to_string()),
        }
    }

    #[test]
    fn test_match_orders_by_slice_start() {
        let items = vec![item("aviso", "2", "2024", 1), item("aviso", "1", "2024", 2)];
        let slices = vec![slice("aviso", "1", "2024", 10), slice("aviso", "2", "2024", 20)];

        let results = Linker::default().link(items, slices);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.status == LinkStatus::Matched));
        assert_eq!(results[0].order_key(), 10);
        assert_eq!(results[0].item.as_ref().unwrap().number.as_deref(), Some("1"));
        check_conservation(&results, 2, 2).unwrap();
    }

    #[test]
    fn test_unmatched_goes_last_in_summary_order() {
        let items = vec![
            item("edital", "9", "2024", 1),
            item("aviso", "1", "2024", 2),
            item("edital", "8", "2024", 3),
        ];
        let slices = vec![slice("aviso", "1", "2024", 10)];

        let results = Linker::default().link(items, slices);
        let statuses: Vec<LinkStatus> = results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![LinkStatus::Matched, LinkStatus::Unmatched, LinkStatus::Unmatched]
        );
        assert_eq!(results[1].item.as_ref().unwrap().number.as_deref(), Some("9"));
        assert_eq!(results[2].reason, Some(LinkReason::NoBodyAnchor));
    }

    #[test]
    fn test_duplicate_keys_first_available_wins() {
        let items = vec![item("aviso", "1", "2024", 1), item("aviso", "1", "2024", 2)];
        let slices = vec![
            slice("aviso", "1", "2024", 10),
            slice("aviso", "1", "2024", 30),
            slice("aviso", "1", "2024", 50),
        ];

        let linkage = Linker::default().link_detailed(items, slices);
        let starts: Vec<usize> = linkage.results.iter().map(|r| r.order_key()).collect();
        assert_eq!(starts, vec![10, 30]);
        assert_eq!(linkage.results[0].item.as_ref().unwrap().line_range.start, 1);
        assert_eq!(linkage.results[1].item.as_ref().unwrap().line_range.start, 2);
        assert_eq!(linkage.dropped.len(), 1);
        assert_eq!(linkage.dropped[0].start_line, 50);
    }

    #[test]
    fn test_no_slices_means_unanchored() {
        let items = vec![item("aviso", "1", "2024", 1)];
        let results = Linker::new(OrphanPolicy::Fallback).link(items, Vec::new());
        assert_eq!(results[0].status, LinkStatus::Unanchored);
        assert_eq!(results[0].reason, Some(LinkReason::NoBodyHeaders));
    }

    #[test]
    fn test_orphan_policies() {
        let slices = vec![slice("aviso", "1", "2024", 4), slice("edital", "2", "2024", 8)];

        let dropped = Linker::new(OrphanPolicy::Drop).link(Vec::new(), slices.clone());
        assert!(dropped.is_empty());

        let kept = Linker::new(OrphanPolicy::Fallback).link(Vec::new(), slices);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.status == LinkStatus::Fallback));
        assert_eq!(kept[0].quality_flag(), "link:no_sumario_match");
    }

    #[test]
    fn test_untyped_slice_keys_as_unknown() {
        let mut untyped = slice("x", "3", "2025", 5);
        untyped.tipo = None;
        let items = vec![item(UNKNOWN_TIPO, "3", "2025", 1)];

        let results = Linker::default().link(items, vec![untyped]);
        assert_eq!(results[0].status, LinkStatus::Matched);
    }

    #[test]
    fn test_conservation_rejects_reuse() {
        let reused = slice("aviso", "1", "2024", 10);
        let results = vec![
            LinkResult::matched(item("aviso", "1", "2024", 1), reused.clone()),
            LinkResult::matched(item("aviso", "1", "2024", 2), reused),
        ];
        let err = check_conservation(&results, 2, 2).unwrap_err();
        assert!(matches!(err, Error::Invariant(_)));
    }
}
