use crate::catalog::store::CatalogStore;
use crate::catalog::Catalog;
use crate::loader::FileTransport;
use crate::query::state::QueryMode;
use crate::search::{DisplayLine, RenderPayload, SearchOrchestrator};
use crate::utils::AppConfig;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::warn;

/// Lines moved by PageUp/PageDown
const PAGE_SIZE: usize = 20;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Search,
    Help,
}

/// Catalog loading state for background loading
pub enum CatalogLoadState {
    /// Catalog is loading (or being imported) in background
    Loading(Receiver<Result<Arc<Catalog>, String>>),
    Ready,
    /// Loading failed (error message stored in status_message)
    Failed,
}

/// Application state
pub struct App {
    pub docs_root: PathBuf,
    config: AppConfig,
    search: Option<SearchOrchestrator>,
    load_state: CatalogLoadState,
    /// Text of the search field
    pub field: String,
    pub lines: Vec<DisplayLine>,
    pub scroll: usize,
    pub mode: Mode,
    pub status_message: String,
    pub top_url: Option<String>,
    pub last_search_ms: Option<u128>,
    /// Entire query of the rendered results, scroll resets when it changes
    rendered_query: String,
}

impl App {
    /// Create the app and load the catalog in the background
    pub fn new(docs_root: PathBuf, config: AppConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let root_for_thread = docs_root.clone();
        let include_packages = config.include_packages;

        thread::spawn(move || {
            let result = CatalogStore::open()
                .and_then(|store| store.load_or_import(&root_for_thread, include_packages))
                .map(Arc::new)
                .map_err(|e| format!("{:#}", e));
            let _ = tx.send(result);
        });

        Self {
            docs_root,
            config,
            search: None,
            load_state: CatalogLoadState::Loading(rx),
            field: String::new(),
            lines: Vec::new(),
            scroll: 0,
            mode: Mode::Search,
            status_message: "Loading catalog...".to_string(),
            top_url: None,
            last_search_ms: None,
            rendered_query: String::new(),
        }
    }

    /// Create the app over an already loaded catalog
    #[cfg(test)]
    pub fn with_catalog(docs_root: PathBuf, config: AppConfig, catalog: Arc<Catalog>) -> Result<Self> {
        let mut app = Self {
            docs_root,
            config,
            search: None,
            load_state: CatalogLoadState::Ready,
            field: String::new(),
            lines: Vec::new(),
            scroll: 0,
            mode: Mode::Search,
            status_message: String::new(),
            top_url: None,
            last_search_ms: None,
            rendered_query: String::new(),
        };
        app.attach(catalog)?;
        Ok(app)
    }

    fn attach(&mut self, catalog: Arc<Catalog>) -> Result<()> {
        let count = catalog.len();
        let mut search = SearchOrchestrator::new(
            catalog,
            FileTransport,
            &self.config.search_settings(),
        )
        .context("Failed to set up search")?;

        // Apply whatever was typed while the catalog was loading
        search.update(&self.field);
        self.field = search.query().field_value().to_string();
        self.search = Some(search);
        self.status_message = format!("{} names", count);
        self.refresh();
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load_state, CatalogLoadState::Loading(_))
    }

    /// Check for background catalog load completion (call this in event loop)
    pub fn poll_catalog_load(&mut self) {
        let current_state = std::mem::replace(&mut self.load_state, CatalogLoadState::Ready);

        if let CatalogLoadState::Loading(rx) = current_state {
            match rx.try_recv() {
                Ok(Ok(catalog)) => {
                    if let Err(e) = self.attach(catalog) {
                        self.status_message = format!("Error: {:#}", e);
                        self.load_state = CatalogLoadState::Failed;
                    }
                }
                Ok(Err(e)) => {
                    self.status_message = format!("Error: {}", e);
                    self.load_state = CatalogLoadState::Failed;
                }
                Err(TryRecvError::Empty) => {
                    self.load_state = CatalogLoadState::Loading(rx);
                }
                Err(TryRecvError::Disconnected) => {
                    self.status_message = "Catalog loader terminated unexpectedly".to_string();
                    self.load_state = CatalogLoadState::Failed;
                }
            }
        }
    }

    /// Poll loader and catalog, re-searching when something changed
    pub fn tick(&mut self) {
        self.poll_catalog_load();
        self.refresh();
    }

    fn refresh(&mut self) {
        let Some(search) = self.search.as_mut() else {
            return;
        };

        let start = Instant::now();
        if let Some(payload) = search.search_if_changed() {
            self.last_search_ms = Some(start.elapsed().as_millis());
            self.apply(payload);
        }
    }

    fn apply(&mut self, payload: RenderPayload) {
        let Some(search) = self.search.as_ref() else {
            return;
        };

        let entire = search.query().entire_query_string();
        if entire != self.rendered_query {
            self.scroll = 0;
            self.rendered_query = entire;
        }
        self.field = search.query().field_value().to_string();
        self.lines = payload.content.lines();

        if let Some(url) = payload.opened_url {
            self.open(&url);
        }

        let top_changed = payload.top_url != self.top_url;
        self.top_url = payload.top_url;
        if top_changed && self.config.auto_open {
            if let Some(url) = self.top_url.clone() {
                self.open(&url);
            }
        }
    }

    fn set_field(&mut self, text: String) {
        self.field = text;
        if let Some(search) = self.search.as_mut() {
            search.update(&self.field);
            self.field = search.query().field_value().to_string();
        }
        self.refresh();
    }

    pub fn set_query(&mut self, query: &str) {
        self.set_field(query.to_string());
    }

    pub fn push_char(&mut self, c: char) {
        let mut text = self.field.clone();
        text.push(c);
        self.set_field(text);
    }

    pub fn backspace(&mut self) {
        let mut text = self.field.clone();
        text.pop();
        self.set_field(text);
    }

    /// Erase the active segment. Returns true if the query was already empty.
    pub fn erase_segment(&mut self) -> bool {
        match self.search.as_mut() {
            Some(search) => {
                if search.query().entire_query_string().is_empty() {
                    return true;
                }
                search.erase_segment();
                self.field = search.query().field_value().to_string();
            }
            None => {
                if self.field.is_empty() {
                    return true;
                }
                self.field.clear();
            }
        }
        self.refresh();
        false
    }

    pub fn erase_all(&mut self) {
        if let Some(search) = self.search.as_mut() {
            search.erase();
        }
        self.field.clear();
        self.refresh();
    }

    pub fn query_mode(&self) -> QueryMode {
        self.search
            .as_ref()
            .map_or(QueryMode::Name, |search| search.query().mode())
    }

    /// Progress or error text of the member page loader
    pub fn loader_status(&self) -> Option<String> {
        self.search.as_ref().and_then(|search| search.loader_status())
    }

    pub fn open_top(&mut self) {
        if let Some(url) = self.top_url.clone() {
            self.open(&url);
        }
    }

    fn open(&mut self, url: &str) {
        match open_url(url) {
            Ok(()) => self.status_message = format!("Opened {}", url),
            Err(e) => {
                warn!(url, error = %e, "failed to open browser");
                self.status_message = format!("Error: {:#}", e);
            }
        }
    }

    pub fn scroll_down(&mut self) {
        if self.scroll + 1 < self.lines.len() {
            self.scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_page_down(&mut self) {
        self.scroll = (self.scroll + PAGE_SIZE).min(self.lines.len().saturating_sub(1));
    }

    pub fn scroll_page_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(PAGE_SIZE);
    }

    pub fn show_help(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn hide_help(&mut self) {
        self.mode = Mode::Search;
    }
}

/// Open a URL with `$BROWSER`, falling back to the platform opener
pub fn open_url(url: &str) -> Result<()> {
    let opener = std::env::var("BROWSER").unwrap_or_else(|_| {
        if cfg!(target_os = "macos") {
            "open".to_string()
        } else {
            "xdg-open".to_string()
        }
    });

    Command::new(&opener)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to run {}", opener))?;
    Ok(())
}
