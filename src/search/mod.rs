//! Three stage search over a catalog.
//!
//! Every search runs the same pipeline against a fresh [`SearchContext`]:
//!
//! 1. [`names::NameStage`] filters packages and classes and picks the top entry
//! 2. [`members::MemberStage`] fetches the top entry's page and filters its anchors
//! 3. [`menu::MenuStage`] expands the command menu for the selection
//!
//! Each stage may replace the pending render, so the last stage that had
//! something to show decides the [`Content`].

pub mod members;
pub mod menu;
pub mod names;

use crate::catalog::{Catalog, MemberRecord, NameRecord, RecordKind};
use crate::loader::{ResourceLoader, Transport};
use crate::query::state::QueryState;
use anyhow::Result;
use members::MemberStage;
use menu::{MenuItem, MenuStage};
use names::NameStage;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

pub const DEFAULT_PACKAGE_MENU: &str = "@1:search(Ohloh) -> http://code.ohloh.net/?s=##PACKAGE_NAME##\n\
@2:search(Docjar) -> http://www.docjar.com/s.jsp?q=##PACKAGE_NAME##";

pub const DEFAULT_CLASS_MENU: &str = "@1:search(Ohloh) -> http://code.ohloh.net/?s=##PACKAGE_NAME##+##CLASS_NAME##+##MEMBER_NAME##\n\
@2:search(Docjar) -> http://www.docjar.com/s.jsp?q=##CLASS_NAME##\n\
@3:source(Docjar) -> http://www.docjar.com/html/api/##PACKAGE_PATH##/##CLASS_NAME##.java.html";

/// Settings resolved once when an orchestrator is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub class_menu: String,
    pub package_menu: String,
    pub member_cache_size: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            class_menu: DEFAULT_CLASS_MENU.to_string(),
            package_menu: DEFAULT_PACKAGE_MENU.to_string(),
            member_cache_size: 64,
        }
    }
}

/// Outcome of the member stage for the current search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopMember {
    NotSearched,
    NoMatch,
    Found(MemberRecord),
}

/// Per-search handoff between the stages
pub struct SearchContext {
    pub top_name: Option<NameRecord>,
    pub top_name_url: Option<String>,
    pub top_member: TopMember,
    pub members_loading: bool,
    /// Menu item picked by the current query
    pub opened_url: Option<String>,
    render: Option<Box<dyn FnOnce() -> Content>>,
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchContext {
    pub fn new() -> Self {
        Self {
            top_name: None,
            top_name_url: None,
            top_member: TopMember::NotSearched,
            members_loading: false,
            opened_url: None,
            render: None,
        }
    }

    /// Replace whatever an earlier stage wanted to show
    pub fn set_render(&mut self, render: impl FnOnce() -> Content + 'static) {
        self.render = Some(Box::new(render));
    }

    /// URL the search navigates to: the top member, else the top name
    pub fn top_url(&self) -> Option<String> {
        let page_url = self.top_name_url.as_deref()?;
        match &self.top_member {
            TopMember::Found(member) => Some(member.url(page_url)),
            _ => Some(page_url.to_string()),
        }
    }

    pub fn into_content(self) -> Content {
        match self.render {
            Some(render) => render(),
            None => Content::NoResults,
        }
    }
}

/// Structured search results, independent of how they are drawn
#[derive(Debug)]
pub enum Content {
    NoResults,
    Names(NameListing),
    Members {
        owner: NameRecord,
        page_url: String,
        members: Vec<MemberRecord>,
    },
    /// Page of the selection is loading or failed to load
    Loading {
        owner: NameRecord,
        page_url: String,
        status: String,
    },
    Menu {
        owner: NameRecord,
        member: Option<MemberRecord>,
        items: Vec<MenuItem>,
    },
}

/// Filtered packages and classes of one search
#[derive(Debug, Clone)]
pub struct NameListing {
    catalog: Arc<Catalog>,
    hits: Vec<usize>,
    best: Option<usize>,
}

impl NameListing {
    pub fn new(catalog: Arc<Catalog>, hits: Vec<usize>, best: Option<usize>) -> Self {
        Self { catalog, hits, best }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn best_match(&self) -> Option<&NameRecord> {
        self.best.and_then(|i| self.catalog.get(i))
    }

    pub fn records(&self) -> impl Iterator<Item = &NameRecord> + '_ {
        self.hits.iter().filter_map(|&i| self.catalog.get(i))
    }

    pub fn url_of(&self, record: &NameRecord) -> String {
        self.catalog.url_of(record)
    }

    /// Consecutive runs of hits of the same kind, in hit order
    pub fn groups(&self) -> Vec<(RecordKind, Vec<&NameRecord>)> {
        let mut groups: Vec<(RecordKind, Vec<&NameRecord>)> = Vec::new();
        for record in self.records() {
            let kind = record.kind();
            match groups.last_mut() {
                Some((last, records)) if *last == kind => records.push(record),
                _ => groups.push((kind, vec![record])),
            }
        }
        groups
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Normal,
    Highlight,
    Dim,
}

/// One line of rendered content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayLine {
    Heading(String),
    Entry {
        text: String,
        detail: Option<String>,
        url: Option<String>,
        style: LineStyle,
    },
    Text(String),
    Blank,
}

const NO_RESULTS: &str = "No search results.";

fn name_entry(listing: &NameListing, record: &NameRecord, style: LineStyle) -> DisplayLine {
    let detail = (!record.is_package()).then(|| record.package_name().to_string());
    DisplayLine::Entry {
        text: record.display_name().to_string(),
        detail: detail.filter(|d| !d.is_empty()),
        url: Some(listing.url_of(record)),
        style,
    }
}

fn owner_heading(owner: &NameRecord) -> DisplayLine {
    DisplayLine::Heading(format!("{} {}", owner.kind().label(), owner.qualified_name()))
}

impl Content {
    /// Flatten the content into display lines
    pub fn lines(&self) -> Vec<DisplayLine> {
        let mut lines = Vec::new();

        match self {
            Content::NoResults => lines.push(DisplayLine::Text(NO_RESULTS.to_string())),
            Content::Names(listing) => {
                if let Some(best) = listing.best_match().filter(|_| listing.len() > 1) {
                    lines.push(DisplayLine::Heading("Best Match".to_string()));
                    lines.push(name_entry(listing, best, LineStyle::Highlight));
                    lines.push(DisplayLine::Blank);
                }
                for (kind, records) in listing.groups() {
                    lines.push(DisplayLine::Heading(kind.heading().to_string()));
                    lines.extend(
                        records
                            .into_iter()
                            .map(|record| name_entry(listing, record, LineStyle::Normal)),
                    );
                    lines.push(DisplayLine::Blank);
                }
            }
            Content::Members {
                owner,
                page_url,
                members,
            } => {
                lines.push(owner_heading(owner));
                if members.is_empty() {
                    lines.push(DisplayLine::Text(NO_RESULTS.to_string()));
                }
                let mut current = None;
                for member in members {
                    if current != Some(member.kind()) {
                        current = Some(member.kind());
                        lines.push(DisplayLine::Blank);
                        lines.push(DisplayLine::Heading(member.kind().heading().to_string()));
                    }
                    lines.push(DisplayLine::Entry {
                        text: member.display_name().to_string(),
                        detail: None,
                        url: Some(member.url(page_url)),
                        style: if member.is_keyword() {
                            LineStyle::Dim
                        } else {
                            LineStyle::Normal
                        },
                    });
                }
            }
            Content::Loading { owner, status, .. } => {
                lines.push(owner_heading(owner));
                lines.push(DisplayLine::Text(status.clone()));
            }
            Content::Menu {
                owner,
                member,
                items,
            } => {
                lines.push(owner_heading(owner));
                if let Some(member) = member {
                    lines.push(DisplayLine::Text(member.display_name().to_string()));
                }
                lines.push(DisplayLine::Blank);
                lines.extend(items.iter().map(|item| DisplayLine::Entry {
                    text: format!("{}:{}", item.mnemonic, item.label),
                    detail: None,
                    url: Some(item.url.clone()),
                    style: LineStyle::Normal,
                }));
            }
        }

        while lines.last() == Some(&DisplayLine::Blank) {
            lines.pop();
        }
        lines
    }
}

/// Result of one search
#[derive(Debug)]
pub struct RenderPayload {
    pub content: Content,
    pub top_url: Option<String>,
    /// Menu item opened by this search, the menu has already collapsed
    pub opened_url: Option<String>,
}

/// Owns the query, the stages and the loader for one catalog
pub struct SearchOrchestrator {
    query: QueryState,
    catalog: Arc<Catalog>,
    names: NameStage,
    members: MemberStage,
    menu: MenuStage,
    /// Entire query string of the last search
    last_query: Option<String>,
    /// Set by loader progress callbacks
    refresh: Rc<Cell<bool>>,
    top_url: Option<String>,
}

impl SearchOrchestrator {
    pub fn new(
        catalog: Arc<Catalog>,
        transport: impl Transport + 'static,
        settings: &SearchSettings,
    ) -> Result<Self> {
        Ok(Self {
            query: QueryState::new(),
            names: NameStage::new(Arc::clone(&catalog)),
            members: MemberStage::new(transport, settings.member_cache_size)?,
            menu: MenuStage::new(&settings.class_menu, &settings.package_menu)?,
            catalog,
            last_query: None,
            refresh: Rc::new(Cell::new(false)),
            top_url: None,
        })
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// Feed the current search field text
    pub fn update(&mut self, raw: &str) {
        self.query.update(raw);
    }

    pub fn erase(&mut self) {
        self.query.erase();
    }

    pub fn erase_segment(&mut self) {
        self.query.erase_segment();
    }

    pub fn loader(&self) -> &ResourceLoader {
        self.members.loader()
    }

    /// Loader progress text while a page is in flight or failed
    pub fn loader_status(&self) -> Option<String> {
        let loader = self.members.loader();
        (loader.url().is_some() && !loader.is_complete()).then(|| loader.status_message())
    }

    /// Top URL of the last search
    pub fn top_url(&self) -> Option<&str> {
        self.top_url.as_deref()
    }

    /// Apply loader events. Returns true when the results need a refresh.
    pub fn poll(&mut self) -> bool {
        let changed = self.members.poll();
        changed | self.refresh.replace(false)
    }

    /// Run all stages for the current query.
    pub fn search(&mut self) -> RenderPayload {
        let start = Instant::now();

        let mut ctx = self.run_stages();
        let opened_url = ctx.opened_url.take();
        if opened_url.is_some() {
            // Collapse the menu once an item was picked
            self.query.update("");
            ctx = self.run_stages();
        }

        let entire = self.query.entire_query_string();
        debug!("'{}' in {} ms", entire, start.elapsed().as_millis());

        self.last_query = Some(entire);
        self.top_url = ctx.top_url();

        RenderPayload {
            top_url: self.top_url.clone(),
            content: ctx.into_content(),
            opened_url,
        }
    }

    /// Search again only if the query changed or a page made progress.
    pub fn search_if_changed(&mut self) -> Option<RenderPayload> {
        let progressed = self.poll();
        let entire = self.query.entire_query_string();
        if !progressed && self.last_query.as_deref() == Some(entire.as_str()) {
            return None;
        }
        Some(self.search())
    }

    fn run_stages(&mut self) -> SearchContext {
        let mut ctx = SearchContext::new();

        self.names.perform(&mut ctx, self.query.name_query());

        let refresh = Rc::clone(&self.refresh);
        self.members
            .perform(&mut ctx, self.query.member_query(), move || refresh.set(true));

        self.menu.perform(&mut ctx, self.query.menu_query());
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ClassKind;
    use crate::loader::Transfer;

    /// Transport that completes every transfer immediately
    struct StaticTransport {
        page: String,
    }

    impl Transport for StaticTransport {
        fn start(&self, _url: &str) -> Transfer {
            let (sink, transfer) = Transfer::channel();
            sink.progress(self.page.len() as u64);
            sink.loaded(self.page.clone());
            transfer
        }
    }

    const OBJECT_PAGE: &str = r#"
<a name="method.summary"></a>
<a name="wait-long-"></a>
<a name="hashCode--"></a>
"#;

    fn orchestrator() -> SearchOrchestrator {
        let catalog = Catalog::new(
            "docs",
            vec![
                NameRecord::package("java.io"),
                NameRecord::class(ClassKind::Interface, "java.io", "Closeable"),
                NameRecord::package("java.lang"),
                NameRecord::class(ClassKind::Class, "java.lang", "Object"),
            ],
        );
        let transport = StaticTransport {
            page: OBJECT_PAGE.to_string(),
        };
        SearchOrchestrator::new(Arc::new(catalog), transport, &SearchSettings::default()).unwrap()
    }

    #[test]
    fn test_name_search() {
        let mut search = orchestrator();
        search.update("java.io");
        let payload = search.search();

        assert_eq!(payload.top_url.as_deref(), Some("docs/java/io/package-summary.html"));
        match payload.content {
            Content::Names(listing) => {
                let names: Vec<&str> = listing.records().map(|r| r.qualified_name()).collect();
                assert_eq!(names, vec!["java.io", "java.io.Closeable"]);
                assert_eq!(listing.best_match().map(|r| r.qualified_name()), Some("java.io"));
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_member_search_waits_for_page() {
        let mut search = orchestrator();
        search.update("Object#wa");

        let payload = search.search();
        assert!(matches!(payload.content, Content::Loading { .. }));
        assert_eq!(payload.top_url.as_deref(), Some("docs/java/lang/Object.html"));

        let payload = search.search_if_changed().expect("page arrived");
        assert_eq!(
            payload.top_url.as_deref(),
            Some("docs/java/lang/Object.html#wait-long-")
        );
        match payload.content {
            Content::Members { members, .. } => {
                assert_eq!(members.len(), 1);
                assert_eq!(members[0].display_name(), "wait(long)");
            }
            other => panic!("unexpected content {:?}", other),
        }

        assert!(search.search_if_changed().is_none());
    }

    #[test]
    fn test_menu_opens_and_collapses() {
        let mut search = orchestrator();
        search.update("Object#wa");
        search.search();
        search.poll();
        search.update("#wa@2");

        let payload = search.search();
        assert_eq!(
            payload.opened_url.as_deref(),
            Some("http://www.docjar.com/s.jsp?q=Object")
        );
        assert_eq!(search.query().entire_query_string(), "Object#wa");
        assert!(matches!(payload.content, Content::Members { .. }));
    }

    #[test]
    fn test_menu_listing_without_pick() {
        let mut search = orchestrator();
        search.update("Object@");

        let payload = search.search();
        assert_eq!(payload.opened_url, None);
        match payload.content {
            Content::Menu { items, member, .. } => {
                assert_eq!(items.len(), 3);
                assert_eq!(member, None);
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_no_results_lines() {
        let mut search = orchestrator();
        search.update("zzz");
        let payload = search.search();

        assert_eq!(payload.top_url, None);
        assert_eq!(
            payload.content.lines(),
            vec![DisplayLine::Text("No search results.".to_string())]
        );
    }

    #[test]
    fn test_name_lines_grouped() {
        let mut search = orchestrator();
        search.update("java.io");
        let lines = search.search().content.lines();

        assert_eq!(lines[0], DisplayLine::Heading("Best Match".to_string()));
        assert!(lines.contains(&DisplayLine::Heading("Packages".to_string())));
        assert!(lines.contains(&DisplayLine::Heading("Interfaces".to_string())));
        assert_ne!(lines.last(), Some(&DisplayLine::Blank));
    }

    #[test]
    fn test_first_rendered_entry_is_top_url() {
        let catalog = Catalog::new(
            "",
            vec![
                NameRecord::class(ClassKind::Class, "java.lang", "Object"),
                NameRecord::package("java.lang"),
            ],
        );
        let transport = StaticTransport {
            page: String::new(),
        };
        let mut search =
            SearchOrchestrator::new(Arc::new(catalog), transport, &SearchSettings::default())
                .unwrap();
        search.update("java.l*");
        let payload = search.search();

        let first_url = payload.content.lines().into_iter().find_map(|line| match line {
            DisplayLine::Entry { url, .. } => url,
            _ => None,
        });
        assert_eq!(payload.top_url.as_deref(), Some("java/lang/Object.html"));
        assert_eq!(first_url, payload.top_url);

        let headings: Vec<DisplayLine> = payload
            .content
            .lines()
            .into_iter()
            .filter(|line| matches!(line, DisplayLine::Heading(_)))
            .collect();
        assert_eq!(
            headings,
            vec![
                DisplayLine::Heading("Classes".to_string()),
                DisplayLine::Heading("Packages".to_string()),
            ]
        );
    }
}
