//! Document-provider adapter: the callback-driven object a print
//! subsystem uses to pull metadata and byte content on demand.
//!
//! The platform's print service drives the adapter in two steps, on its
//! own thread:
//!
//! 1. **Layout**: the service asks for document metadata. Cancellation
//!    can arrive here; the adapter acknowledges it instead of proceeding.
//! 2. **Write**: the service supplies an output sink and the adapter
//!    streams the byte source into it in bounded-size chunks.
//!
//! The boundary is callback-based, not panic-based: I/O failures during
//! the write step are reported as a [`WriteOutcome::Failed`] value, and
//! the terminal state is observable through [`DocumentProvider::state`].
//!
//! State machine:
//!
//! ```text
//! Created ──▶ LayingOut ──▶ Ready ──▶ Writing ──▶ Finished
//!                 │                      │
//!                 ▼                      ▼
//!             Cancelled               Failed
//! ```

use std::io::{Read, Write};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::resolve::{ByteSource, ResolvedSource};

/// Lifecycle state of a [`DocumentProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    /// Constructed, no platform callback received yet.
    Created,
    /// Metadata requested, not yet supplied.
    LayingOut,
    /// Metadata supplied; waiting for a write request.
    Ready,
    /// Byte content being copied to the platform sink.
    Writing,
    /// Entire byte source copied successfully.
    Finished,
    /// I/O error during the write step.
    Failed,
    /// Cancelled before layout completed.
    Cancelled,
}

/// Asynchronous cancellation flag, set by the platform and observed by
/// the adapter at the layout step.
///
/// Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    cancelled: Arc<AtomicBool>,
}

impl CancelSignal {
    /// A fresh, un-cancelled signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the job as cancelled.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Document metadata supplied at the layout step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// User-visible document name.
    pub name: String,
    /// Effective MIME type of the content.
    pub mime_type: String,
    /// Total size in bytes, when the source knows it. Content-reference
    /// streams typically do not.
    pub size_hint: Option<u64>,
}

/// Result of the layout step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutOutcome {
    /// Metadata supplied; the service may proceed to the write step.
    Ready(DocumentInfo),
    /// Cancellation acknowledged; the job ends without output.
    Cancelled,
}

/// Result of the write step, reported as a value across the callback
/// boundary rather than panicking into the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The entire byte source was copied to the sink.
    Finished {
        /// Total bytes copied.
        bytes_written: u64,
    },
    /// Reading the source or writing the sink failed.
    Failed(String),
}

/// Callback-driven bridge between a resolved byte source and the
/// platform's print service.
///
/// Safe to drive from the print service's own thread; all interior state
/// sits behind a mutex.
pub struct DocumentProvider {
    source: ByteSource,
    display_name: String,
    mime_type: String,
    chunk_bytes: usize,
    state: Mutex<AdapterState>,
}

impl DocumentProvider {
    /// Bind a resolved source to the adapter.
    pub fn new(resolved: ResolvedSource, chunk_bytes: usize) -> Self {
        Self {
            source: resolved.source,
            display_name: resolved.display_name,
            mime_type: resolved.mime_type,
            chunk_bytes: chunk_bytes.max(1),
            state: Mutex::new(AdapterState::Created),
        }
    }

    /// Build an adapter over in-memory bytes, as produced by a markup
    /// rendering surface.
    pub fn from_bytes(
        display_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
        chunk_bytes: usize,
    ) -> Self {
        Self {
            source: ByteSource::Memory(Arc::from(bytes)),
            display_name: display_name.into(),
            mime_type: mime_type.into(),
            chunk_bytes: chunk_bytes.max(1),
            state: Mutex::new(AdapterState::Created),
        }
    }

    /// User-visible document name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Effective MIME type of the content.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AdapterState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, next: AdapterState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = next;
    }

    /// Layout step: supply document metadata, or acknowledge
    /// cancellation if the signal fired first.
    ///
    /// The platform may retry layout; each call re-checks the signal and
    /// re-derives metadata.
    pub fn layout(&self, cancel: &CancelSignal) -> LayoutOutcome {
        self.set_state(AdapterState::LayingOut);

        if cancel.is_cancelled() {
            log::debug!("Layout cancelled for '{}'", self.display_name);
            self.set_state(AdapterState::Cancelled);
            return LayoutOutcome::Cancelled;
        }

        let info = DocumentInfo {
            name: self.display_name.clone(),
            mime_type: self.mime_type.clone(),
            size_hint: self.source.len_hint(),
        };

        self.set_state(AdapterState::Ready);
        LayoutOutcome::Ready(info)
    }

    /// Write step: stream the byte source into the platform sink in
    /// bounded chunks.
    ///
    /// Never buffers more than one chunk, since content-reference
    /// streams may have no known total length. Failures come back as
    /// [`WriteOutcome::Failed`], never as a panic across the callback
    /// boundary.
    pub fn write_to(&self, sink: &mut dyn Write) -> WriteOutcome {
        match self.state() {
            AdapterState::Ready => {}
            AdapterState::Cancelled => {
                return WriteOutcome::Failed("job was cancelled".to_string());
            }
            other => {
                return WriteOutcome::Failed(format!(
                    "write requested in state {:?}, expected Ready",
                    other
                ));
            }
        }

        self.set_state(AdapterState::Writing);

        match self.copy_chunks(sink) {
            Ok(bytes_written) => {
                log::debug!(
                    "Wrote {} bytes for '{}' ({})",
                    bytes_written,
                    self.display_name,
                    self.mime_type
                );
                self.set_state(AdapterState::Finished);
                WriteOutcome::Finished { bytes_written }
            }
            Err(e) => {
                log::error!("Write failed for '{}': {}", self.display_name, e);
                self.set_state(AdapterState::Failed);
                WriteOutcome::Failed(e.to_string())
            }
        }
    }

    fn copy_chunks(&self, sink: &mut dyn Write) -> std::io::Result<u64> {
        let mut reader = self.source.open()?;
        let mut buffer = vec![0u8; self.chunk_bytes];
        let mut total: u64 = 0;

        loop {
            let read = reader.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            sink.write_all(&buffer[..read])?;
            total += read as u64;
        }

        sink.flush()?;
        Ok(total)
    }
}

impl std::fmt::Debug for DocumentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentProvider")
            .field("display_name", &self.display_name)
            .field("mime_type", &self.mime_type)
            .field("chunk_bytes", &self.chunk_bytes)
            .field("state", &self.state())
            .finish()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn provider_over(bytes: &[u8], chunk: usize) -> DocumentProvider {
        DocumentProvider::from_bytes("doc.pdf", "application/pdf", bytes.to_vec(), chunk)
    }

    /// A sink that fails after accepting a fixed number of bytes,
    /// simulating a platform descriptor going away mid-write.
    struct FailingSink {
        accepted: usize,
        limit: usize,
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.accepted + buf.len() > self.limit {
                return Err(std::io::Error::other("sink closed"));
            }
            self.accepted += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Verifies the happy path walks Created -> LayingOut -> Ready ->
    /// Writing -> Finished and copies every byte.
    #[test]
    fn test_layout_then_write_finishes() {
        let provider = provider_over(b"hello print subsystem", 4);
        assert_eq!(provider.state(), AdapterState::Created);

        let cancel = CancelSignal::new();
        let outcome = provider.layout(&cancel);
        match outcome {
            LayoutOutcome::Ready(info) => {
                assert_eq!(info.name, "doc.pdf");
                assert_eq!(info.mime_type, "application/pdf");
                assert_eq!(info.size_hint, Some(21));
            }
            LayoutOutcome::Cancelled => panic!("Unexpected cancellation"),
        }
        assert_eq!(provider.state(), AdapterState::Ready);

        let mut sink = Cursor::new(Vec::new());
        let outcome = provider.write_to(&mut sink);
        assert_eq!(outcome, WriteOutcome::Finished { bytes_written: 21 });
        assert_eq!(provider.state(), AdapterState::Finished);
        assert_eq!(sink.into_inner(), b"hello print subsystem");
    }

    /// Verifies a chunk size smaller than the payload still copies the
    /// whole source, exercising the bounded-copy loop.
    #[test]
    fn test_chunked_copy_exact() {
        let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 256) as u8).collect();
        let provider = DocumentProvider::from_bytes("big.bin", "application/octet-stream", payload.clone(), 333);

        let cancel = CancelSignal::new();
        assert!(matches!(provider.layout(&cancel), LayoutOutcome::Ready(_)));

        let mut sink = Cursor::new(Vec::new());
        let outcome = provider.write_to(&mut sink);
        assert_eq!(
            outcome,
            WriteOutcome::Finished {
                bytes_written: payload.len() as u64
            }
        );
        assert_eq!(sink.into_inner(), payload);
    }

    /// Verifies cancellation before layout is acknowledged, not
    /// panicked, and blocks the write step.
    #[test]
    fn test_cancel_before_layout() {
        let provider = provider_over(b"never printed", 8);
        let cancel = CancelSignal::new();
        cancel.cancel();

        assert_eq!(provider.layout(&cancel), LayoutOutcome::Cancelled);
        assert_eq!(provider.state(), AdapterState::Cancelled);

        let mut sink = Cursor::new(Vec::new());
        match provider.write_to(&mut sink) {
            WriteOutcome::Failed(msg) => assert!(msg.contains("cancelled")),
            other => panic!("Expected failure after cancellation, got {:?}", other),
        }
    }

    /// Verifies sink failures surface as Failed with the terminal state
    /// set, never as a panic.
    #[test]
    fn test_write_failure_reports_through_outcome() {
        let provider = provider_over(&[7u8; 4096], 512);
        let cancel = CancelSignal::new();
        assert!(matches!(provider.layout(&cancel), LayoutOutcome::Ready(_)));

        let mut sink = FailingSink {
            accepted: 0,
            limit: 1024,
        };
        match provider.write_to(&mut sink) {
            WriteOutcome::Failed(msg) => assert!(msg.contains("sink closed")),
            other => panic!("Expected write failure, got {:?}", other),
        }
        assert_eq!(provider.state(), AdapterState::Failed);
    }

    /// Verifies a write request before layout is rejected as a value.
    #[test]
    fn test_write_before_layout_rejected() {
        let provider = provider_over(b"x", 8);
        let mut sink = Cursor::new(Vec::new());
        assert!(matches!(provider.write_to(&mut sink), WriteOutcome::Failed(_)));
    }

    /// Verifies the platform can retry layout after a first pass.
    #[test]
    fn test_layout_retry() {
        let provider = provider_over(b"retry me", 8);
        let cancel = CancelSignal::new();

        assert!(matches!(provider.layout(&cancel), LayoutOutcome::Ready(_)));
        assert!(matches!(provider.layout(&cancel), LayoutOutcome::Ready(_)));
        assert_eq!(provider.state(), AdapterState::Ready);
    }

    /// Verifies the cancel signal is shared across clones.
    #[test]
    fn test_cancel_signal_shared() {
        let signal = CancelSignal::new();
        let clone = signal.clone();
        assert!(!clone.is_cancelled());
        signal.cancel();
        assert!(clone.is_cancelled());
    }
}
