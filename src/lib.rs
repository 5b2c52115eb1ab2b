//! # jdsearch - incremental Javadoc name search
//!
//! Type a few letters of a package, class or member name and the result list
//! narrows on every keystroke. Abbreviations work the way Java names are
//! written: `JLO` finds `java.lang.Object`, `PoiD` finds `Point2D` and
//! `java.*.o*e` finds everything ending in `o...e` two levels deep.
//!
//! ## Architecture
//!
//! - [`catalog`] - Package, class and member records, scraping and storage
//! - [`query`] - Pattern compiler, compound query state, incremental filtering
//! - [`loader`] - Single-flight documentation page loader with cancellation
//! - [`search`] - Name, member and menu stages plus the orchestrator
//! - [`tui`] - Interactive terminal UI
//! - [`output`] - Colored result printing
//! - [`utils`] - Config and app data locations
//!
//! ## Quick Start
//!
//! ```no_run
//! use jdsearch::catalog::{Catalog, ClassKind, NameRecord};
//! use jdsearch::loader::FileTransport;
//! use jdsearch::search::{SearchOrchestrator, SearchSettings};
//! use std::sync::Arc;
//!
//! let catalog = Catalog::new(
//!     "file:///opt/jdk/docs/api",
//!     vec![
//!         NameRecord::package("java.lang"),
//!         NameRecord::class(ClassKind::Class, "java.lang", "Object"),
//!     ],
//! );
//!
//! let mut search =
//!     SearchOrchestrator::new(Arc::new(catalog), FileTransport, &SearchSettings::default()).unwrap();
//! search.update("JLO");
//! let payload = search.search();
//!
//! assert_eq!(
//!     payload.top_url.as_deref(),
//!     Some("file:///opt/jdk/docs/api/java/lang/Object.html")
//! );
//! ```
//!
//! ## Queries
//!
//! One search field carries up to three sub-queries, `name#member@menu`:
//!
//! 1. **Name** - fuzzy search over packages and classes
//! 2. **Member** (after `#`) - fuzzy search over the anchors of the top
//!    result's page, fetched in the background
//! 3. **Menu** (after `@`) - command menu for the selection, `@N` opens item N

pub mod catalog;
pub mod loader;
pub mod output;
pub mod query;
pub mod search;
#[cfg(feature = "interactive")]
pub mod tui;
pub mod utils;
