//! Single-flight loading of one documentation page at a time.
//!
//! The loader owns one transfer slot. Asking for the URL it is already
//! loading (or has loaded) does nothing, asking for a different URL cancels
//! the running transfer first. Events are applied on the caller's thread by
//! [`ResourceLoader::poll`], which the UI loop calls between frames.

pub mod transport;

pub use transport::{FileTransport, Transfer, TransferEvent, TransferSink, Transport};

use std::sync::mpsc::TryRecvError;
use tracing::{debug, warn};

/// Invoked on every progress tick, on completion and on failure
pub type ProgressCallback = Box<dyn FnMut()>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderState {
    Idle,
    Loading { url: String, bytes: u64 },
    Loaded { url: String, content: String },
    Errored { url: String, message: String },
}

pub struct ResourceLoader {
    transport: Box<dyn Transport>,
    state: LoaderState,
    transfer: Option<Transfer>,
    on_progress: Option<ProgressCallback>,
}

impl ResourceLoader {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            state: LoaderState::Idle,
            transfer: None,
            on_progress: None,
        }
    }

    /// Start loading `url` unless it is already loading or loaded.
    pub fn load(&mut self, url: &str, on_progress: ProgressCallback) {
        self.on_progress = Some(on_progress);

        if self.url() == Some(url) {
            return;
        }

        self.abort();
        debug!(url, "loading page");
        self.transfer = Some(self.transport.start(url));
        self.state = LoaderState::Loading {
            url: url.to_string(),
            bytes: 0,
        };
    }

    /// Apply pending transfer events. Returns true if the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        while let Some(transfer) = &self.transfer {
            let next = transfer.try_next();
            let url = match &self.state {
                LoaderState::Loading { url, .. } => url.clone(),
                _ => break,
            };

            match next {
                Ok(TransferEvent::Progress(bytes)) => {
                    self.state = LoaderState::Loading { url, bytes };
                }
                Ok(TransferEvent::Loaded(content)) => {
                    debug!(url = %url, bytes = content.len(), "page loaded");
                    self.state = LoaderState::Loaded { url, content };
                    self.transfer = None;
                }
                Ok(TransferEvent::Failed(message)) => {
                    warn!(url = %url, error = %message, "page load failed");
                    self.state = LoaderState::Errored { url, message };
                    self.transfer = None;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!(url = %url, "transfer ended without a result");
                    self.state = LoaderState::Errored {
                        url,
                        message: "ERROR".to_string(),
                    };
                    self.transfer = None;
                }
            }

            changed = true;
            if let Some(callback) = self.on_progress.as_mut() {
                callback();
            }
        }

        changed
    }

    /// Cancel any transfer and forget the current page.
    pub fn abort(&mut self) {
        if let Some(transfer) = self.transfer.take() {
            transfer.cancel();
        }
        if self.state != LoaderState::Idle {
            debug!(url = ?self.url(), "loader reset");
        }
        self.state = LoaderState::Idle;
    }

    pub fn state(&self) -> &LoaderState {
        &self.state
    }

    /// URL currently loading, loaded or failed
    pub fn url(&self) -> Option<&str> {
        match &self.state {
            LoaderState::Idle => None,
            LoaderState::Loading { url, .. }
            | LoaderState::Loaded { url, .. }
            | LoaderState::Errored { url, .. } => Some(url),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, LoaderState::Loaded { .. })
    }

    pub fn is_errored(&self) -> bool {
        matches!(self.state, LoaderState::Errored { .. })
    }

    pub fn resource(&self) -> Option<&str> {
        match &self.state {
            LoaderState::Loaded { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Human readable progress or error text
    pub fn status_message(&self) -> String {
        let bytes = match &self.state {
            LoaderState::Errored { message, .. } => return message.clone(),
            LoaderState::Loading { bytes, .. } => *bytes,
            LoaderState::Loaded { content, .. } => content.len() as u64,
            LoaderState::Idle => 0,
        };
        format_progress(bytes)
    }
}

fn format_progress(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes > MB {
        format!("loading... ({} MB)", bytes / MB)
    } else if bytes > KB {
        format!("loading... ({} kB)", bytes / KB)
    } else if bytes > 0 {
        format!("loading... ({} bytes)", bytes)
    } else {
        "loading...".to_string()
    }
}
