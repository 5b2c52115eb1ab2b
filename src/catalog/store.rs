//! Imported catalogs, one JSON file per documentation root.

use crate::catalog::scrape::ClassListParser;
use crate::catalog::{Catalog, ClassKind, NameRecord};
use crate::utils::app_data::{catalog_file_in, get_catalogs_dir};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Class listing pages, in order of preference
const CLASS_LIST_PAGES: [&str; 2] = ["allclasses-frame.html", "allclasses-noframe.html"];

/// On-disk form of a catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    pub docs_root: PathBuf,
    pub base_url: String,
    pub entries: Vec<CatalogEntry>,
}

/// One package (no class) or class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ClassKind>,
}

impl CatalogFile {
    pub fn from_catalog(docs_root: &Path, catalog: &Catalog) -> Self {
        let entries = catalog
            .records()
            .iter()
            .map(|record| match record {
                NameRecord::Package(package) => CatalogEntry {
                    package: package.name().to_string(),
                    class: None,
                    kind: None,
                },
                NameRecord::Class(class) => CatalogEntry {
                    package: class.package().to_string(),
                    class: Some(class.class_name().to_string()),
                    kind: Some(class.kind()),
                },
            })
            .collect();

        Self {
            docs_root: docs_root.to_path_buf(),
            base_url: catalog.base_url().to_string(),
            entries,
        }
    }

    pub fn into_catalog(self) -> Catalog {
        let records = self
            .entries
            .into_iter()
            .map(|entry| match entry.class {
                Some(class) => {
                    NameRecord::class(entry.kind.unwrap_or(ClassKind::Class), entry.package, class)
                }
                None => NameRecord::package(entry.package),
            })
            .collect();
        Catalog::new(self.base_url, records)
    }
}

/// Summary of a stored catalog for `jdsearch list`
#[derive(Debug, Clone)]
pub struct StoredCatalog {
    pub docs_root: PathBuf,
    pub base_url: String,
    pub entries: usize,
    pub path: PathBuf,
}

/// `file://` URL of a documentation directory
pub fn file_url(docs_root: &Path) -> String {
    let canonical = docs_root
        .canonicalize()
        .unwrap_or_else(|_| docs_root.to_path_buf());
    format!("file://{}", canonical.display())
}

/// Find the class listing page of a documentation directory
pub fn class_list_page(docs_root: &Path) -> Option<PathBuf> {
    CLASS_LIST_PAGES
        .iter()
        .map(|page| docs_root.join(page))
        .find(|path| path.is_file())
}

/// Scrape a Javadoc directory into a catalog.
pub fn import_docs(docs_root: &Path, base_url: Option<&str>, include_packages: bool) -> Result<Catalog> {
    let Some(page) = class_list_page(docs_root) else {
        bail!(
            "No {} found in {}",
            CLASS_LIST_PAGES[0],
            docs_root.display()
        );
    };

    let html = fs::read_to_string(&page)
        .with_context(|| format!("Failed to read {}", page.display()))?;
    let records = ClassListParser::new()?.name_records(&html, include_packages);
    let base_url = base_url.map_or_else(|| file_url(docs_root), str::to_string);

    info!(
        page = %page.display(),
        records = records.len(),
        "imported class listing"
    );
    Ok(Catalog::new(base_url, records))
}

/// Directory of catalog files
pub struct CatalogStore {
    dir: PathBuf,
}

impl CatalogStore {
    /// Store in the app data directory
    pub fn open() -> Result<Self> {
        Ok(Self::at(get_catalogs_dir()?))
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, docs_root: &Path) -> PathBuf {
        catalog_file_in(&self.dir, docs_root)
    }

    pub fn save(&self, docs_root: &Path, catalog: &Catalog) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.path_for(docs_root);
        let file = CatalogFile::from_catalog(docs_root, catalog);
        let content = serde_json::to_string(&file).context("Failed to serialize catalog")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!(path = %path.display(), "saved catalog");
        Ok(path)
    }

    /// Stored catalog for `docs_root`, if it was imported before
    pub fn load(&self, docs_root: &Path) -> Result<Option<Catalog>> {
        let path = self.path_for(docs_root);
        if !path.exists() {
            return Ok(None);
        }

        let file = read_catalog_file(&path)?;
        debug!(path = %path.display(), entries = file.entries.len(), "loaded catalog");
        Ok(Some(file.into_catalog()))
    }

    /// Load the stored catalog, importing the directory on first use.
    pub fn load_or_import(&self, docs_root: &Path, include_packages: bool) -> Result<Catalog> {
        if let Some(catalog) = self.load(docs_root)? {
            return Ok(catalog);
        }

        let catalog = import_docs(docs_root, None, include_packages)?;
        self.save(docs_root, &catalog)?;
        Ok(catalog)
    }

    pub fn list(&self) -> Result<Vec<StoredCatalog>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut catalogs = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            // Unreadable files are skipped rather than failing the listing
            if let Ok(file) = read_catalog_file(&path) {
                catalogs.push(StoredCatalog {
                    docs_root: file.docs_root,
                    base_url: file.base_url,
                    entries: file.entries.len(),
                    path,
                });
            }
        }

        catalogs.sort_by(|a, b| a.docs_root.cmp(&b.docs_root));
        Ok(catalogs)
    }

    /// Delete the catalog of `docs_root`. Returns false if there was none.
    pub fn remove(&self, docs_root: &Path) -> Result<bool> {
        let path = self.path_for(docs_root);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
        Ok(true)
    }
}

fn read_catalog_file(path: &Path) -> Result<CatalogFile> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
