//! Background transfers feeding the resource loader.
//!
//! A transport starts a transfer and hands back a [`Transfer`]: the
//! receiving end of an event channel plus a shared cancel flag. The
//! producing side ([`TransferSink`]) runs wherever the transport likes,
//! usually a worker thread.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::debug;

/// Read size for file transfers
const CHUNK_SIZE: usize = 16 * 1024;

/// One step of a transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEvent {
    /// Total bytes received so far
    Progress(u64),
    Loaded(String),
    Failed(String),
}

/// Consumer side of a running transfer. Dropping it cancels the transfer.
pub struct Transfer {
    events: Receiver<TransferEvent>,
    cancel: Arc<AtomicBool>,
}

impl Transfer {
    /// Create a connected sink/transfer pair
    pub fn channel() -> (TransferSink, Transfer) {
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let sink = TransferSink {
            events: tx,
            cancel: Arc::clone(&cancel),
        };
        (sink, Transfer { events: rx, cancel })
    }

    pub fn try_next(&self) -> Result<TransferEvent, TryRecvError> {
        self.events.try_recv()
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

impl Drop for Transfer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Producer side of a transfer
#[derive(Clone)]
pub struct TransferSink {
    events: Sender<TransferEvent>,
    cancel: Arc<AtomicBool>,
}

impl TransferSink {
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Report progress; false once the consumer is gone or cancelled.
    pub fn progress(&self, bytes: u64) -> bool {
        !self.is_cancelled() && self.events.send(TransferEvent::Progress(bytes)).is_ok()
    }

    pub fn loaded(&self, content: String) {
        let _ = self.events.send(TransferEvent::Loaded(content));
    }

    pub fn failed(&self, message: impl Into<String>) {
        let _ = self.events.send(TransferEvent::Failed(message.into()));
    }
}

/// Starts fetches for the loader
pub trait Transport {
    fn start(&self, url: &str) -> Transfer;
}

/// Reads local documentation pages (`file://` URLs or plain paths).
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTransport;

impl FileTransport {
    /// Filesystem path addressed by a page URL, without any `#fragment`
    pub fn resolve(url: &str) -> PathBuf {
        let without_fragment = url.split_once('#').map_or(url, |(path, _)| path);
        let path = without_fragment
            .strip_prefix("file://")
            .unwrap_or(without_fragment);
        PathBuf::from(path)
    }
}

impl Transport for FileTransport {
    fn start(&self, url: &str) -> Transfer {
        let (sink, transfer) = Transfer::channel();
        let path = Self::resolve(url);

        thread::spawn(move || {
            let mut file = match File::open(&path) {
                Ok(file) => file,
                Err(e) => {
                    sink.failed(format!("ERROR: {}: {}", path.display(), e));
                    return;
                }
            };

            let mut content = Vec::new();
            let mut chunk = vec![0u8; CHUNK_SIZE];
            loop {
                if sink.is_cancelled() {
                    debug!(path = %path.display(), "transfer cancelled");
                    return;
                }
                match file.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => {
                        content.extend_from_slice(&chunk[..n]);
                        if !sink.progress(content.len() as u64) {
                            return;
                        }
                    }
                    Err(e) => {
                        sink.failed(format!("ERROR: {}: {}", path.display(), e));
                        return;
                    }
                }
            }

            sink.loaded(String::from_utf8_lossy(&content).into_owned());
        });

        transfer
    }
}
