//! Package and class stage of a search.

use crate::catalog::{Catalog, NameRecord};
use crate::query::candidates::CandidateIndex;
use crate::query::pattern::{compile_exact_case_insensitive, compile_exact_case_sensitive};
use crate::search::{Content, NameListing, SearchContext};
use std::sync::Arc;

/// Pick the entry most likely meant by `query` among `records`.
///
/// Returns a position in `records`. Nothing is singled out when every entry
/// is already an exact match. Otherwise exact matches win, case-sensitive
/// ones first, then the shallowest, then the earliest.
pub fn best_match(query: &str, records: &[&NameRecord]) -> Option<usize> {
    let insensitive = compile_exact_case_insensitive(query);
    let exact: Vec<usize> = (0..records.len())
        .filter(|&i| insensitive.matches(records[i]))
        .collect();

    if exact.len() == records.len() {
        return None;
    }

    let sensitive = compile_exact_case_sensitive(query);
    let narrowed: Vec<usize> = exact
        .iter()
        .copied()
        .filter(|&i| sensitive.matches(records[i]))
        .collect();
    let candidates = if narrowed.is_empty() { exact } else { narrowed };

    let min_depth = candidates.iter().map(|&i| records[i].depth()).min()?;
    candidates
        .into_iter()
        .find(|&i| records[i].depth() == min_depth)
}

/// Entry the search navigates to: the best match, else the first result.
pub fn top_entry(results: &[usize], best: Option<usize>) -> Option<usize> {
    best.or_else(|| results.first().copied())
}

pub struct NameStage {
    index: CandidateIndex,
    best: Option<usize>,
    top: Option<usize>,
}

impl NameStage {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            index: CandidateIndex::new(catalog),
            best: None,
            top: None,
        }
    }

    pub fn perform(&mut self, ctx: &mut SearchContext, query: &str) {
        if self.index.filter(query) {
            let catalog = self.index.catalog();
            let records: Vec<&NameRecord> = self
                .index
                .current()
                .iter()
                .filter_map(|&i| catalog.get(i))
                .collect();

            self.best = best_match(query, &records).map(|pos| self.index.current()[pos]);
            self.top = top_entry(self.index.current(), self.best);
        }

        let catalog = Arc::clone(self.index.catalog());
        if let Some(record) = self.top.and_then(|i| catalog.get(i)) {
            ctx.top_name_url = Some(catalog.url_of(record));
            ctx.top_name = Some(record.clone());
        }

        let listing = NameListing::new(catalog, self.index.current().to_vec(), self.best);
        ctx.set_render(move || {
            if listing.is_empty() {
                Content::NoResults
            } else {
                Content::Names(listing)
            }
        });
    }
}
