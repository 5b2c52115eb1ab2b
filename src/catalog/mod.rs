//! Catalog of searchable Javadoc names.
//!
//! - [`types`] - Package, class and member records
//! - [`scrape`] - Building records from a Javadoc class listing page
//! - [`store`] - Persisting imported catalogs in the app data directory

pub mod scrape;
pub mod store;
pub mod types;

pub use types::*;

/// Immutable snapshot of every package and class of one documentation root
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    base_url: String,
    records: Vec<NameRecord>,
}

impl Catalog {
    /// Create a catalog whose relative record URLs resolve against `base_url`
    pub fn new(base_url: impl Into<String>, records: Vec<NameRecord>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.is_empty() && !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url, records }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn records(&self) -> &[NameRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&NameRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Absolute URL of a record's documentation page
    pub fn url_of(&self, record: &NameRecord) -> String {
        format!("{}{}", self.base_url, record.relative_url())
    }
}
