use crate::catalog::{Catalog, NameRecord};
use crate::query::pattern::compile_fuzzy;
use std::sync::Arc;

/// Filter `catalog` for `new_query`, reusing `previous_results` when the new
/// query only appends characters to `previous_query`.
///
/// Appending to a fuzzy query never widens its match set, so both paths
/// return the same records. Results are catalog indices in catalog order.
pub fn filter_incremental(
    previous_query: Option<&str>,
    previous_results: &[usize],
    new_query: &str,
    catalog: &[NameRecord],
) -> Vec<usize> {
    let predicate = compile_fuzzy(new_query);

    match previous_query {
        Some(previous) if new_query.starts_with(previous) => previous_results
            .iter()
            .copied()
            .filter(|&i| catalog.get(i).is_some_and(|record| predicate.matches(record)))
            .collect(),
        _ => catalog
            .iter()
            .enumerate()
            .filter(|(_, record)| predicate.matches(*record))
            .map(|(i, _)| i)
            .collect(),
    }
}

/// Narrowing view over the catalog for the name search
#[derive(Debug, Clone)]
pub struct CandidateIndex {
    catalog: Arc<Catalog>,
    previous_query: Option<String>,
    current: Vec<usize>,
}

impl CandidateIndex {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            previous_query: None,
            current: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Apply `query`, returning whether the result set was recomputed.
    pub fn filter(&mut self, query: &str) -> bool {
        if self.previous_query.as_deref() == Some(query) {
            return false;
        }

        self.current = filter_incremental(
            self.previous_query.as_deref(),
            &self.current,
            query,
            self.catalog.records(),
        );
        self.previous_query = Some(query.to_string());
        true
    }

    /// Catalog indices of the current results
    pub fn current(&self) -> &[usize] {
        &self.current
    }

    pub fn records(&self) -> impl Iterator<Item = &NameRecord> + '_ {
        self.current.iter().filter_map(|&i| self.catalog.get(i))
    }

    pub fn previous_query(&self) -> Option<&str> {
        self.previous_query.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ClassKind;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(
            "",
            vec![
                NameRecord::package("java.io"),
                NameRecord::class(ClassKind::Interface, "java.io", "Closeable"),
                NameRecord::package("java.lang"),
                NameRecord::class(ClassKind::Class, "java.lang", "Object"),
            ],
        ))
    }

    #[test]
    fn test_first_filter_scans_catalog() {
        let mut index = CandidateIndex::new(catalog());
        assert!(index.filter("java.io"));
        assert_eq!(index.current(), &[0, 1]);
    }

    #[test]
    fn test_unchanged_query_is_noop() {
        let mut index = CandidateIndex::new(catalog());
        index.filter("java");
        assert!(!index.filter("java"));
        assert_eq!(index.current(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_extension_and_backtrack() {
        let mut index = CandidateIndex::new(catalog());
        index.filter("java.l");
        assert_eq!(index.current(), &[2, 3]);

        index.filter("java.lang.O");
        assert_eq!(index.current(), &[3]);

        // Not an extension: rescans the full catalog
        index.filter("java.i");
        assert_eq!(index.current(), &[0, 1]);
    }

    #[test]
    fn test_incremental_matches_full_scan() {
        let catalog = catalog();
        let first = filter_incremental(None, &[], "J", catalog.records());
        let incremental = filter_incremental(Some("J"), &first, "JLO", catalog.records());
        let full = filter_incremental(None, &[], "JLO", catalog.records());
        assert_eq!(incremental, full);
        assert_eq!(full, vec![3]);
    }
}
