//! Mock host platform for testing.
//!
//! [`MockHost`] scripts every capability the pipeline reaches for:
//! in-memory files and content entries, a raster codec and renderer with
//! failure knobs, and a print registry that drives each registered
//! document provider synchronously and records the result.
//!
//! Available in unit tests and, with the `test-utils` feature, to
//! downstream crates.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "test-utils")] {
//! use print_bridge::host::mock::MockHost;
//!
//! let mut host = MockHost::new();
//! host.add_file("/docs/report.pdf", b"pdf bytes".to_vec());
//! host.fail_rendering("tab crashed");
//! # }
//! ```

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::adapter::{AdapterState, CancelSignal, DocumentProvider, LayoutOutcome};
use crate::error::{PrintError, Result};
use crate::host::{
    ContentResolver, Filesystem, HostPlatform, MarkupRenderer, PrintJobRegistry, RasterCodec,
    RenderedSurface, ResolvedContent,
};

/// MIME type the mock renderer stamps on rendered surfaces.
pub const RENDERED_MIME: &str = "application/pdf";

/// One job the mock print registry accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedJob {
    /// A job that went through the single-image helper.
    Image {
        /// Job name as registered.
        job_name: String,
        /// Decoded image width in pixels.
        width: u32,
        /// Decoded image height in pixels.
        height: u32,
    },
    /// A job that went through a document-provider adapter.
    Document {
        /// Job name as registered.
        job_name: String,
        /// Display name the adapter reported at layout.
        display_name: String,
        /// MIME type the adapter reported at layout.
        mime_type: String,
        /// Bytes the adapter streamed into the mock sink.
        bytes: Vec<u8>,
        /// Terminal adapter state after the mock drove it.
        final_state: AdapterState,
    },
}

impl RecordedJob {
    /// Job name regardless of branch.
    pub fn job_name(&self) -> &str {
        match self {
            RecordedJob::Image { job_name, .. } => job_name,
            RecordedJob::Document { job_name, .. } => job_name,
        }
    }
}

struct ContentEntry {
    display_name: String,
    mime_type: Option<String>,
    bytes: Vec<u8>,
}

/// A fully scripted host platform.
///
/// Configure it mutably, then hand it to the printer behind an `Arc`.
/// Invocation counters and recorded jobs stay observable afterwards.
pub struct MockHost {
    files: HashMap<String, Vec<u8>>,
    content_entries: HashMap<String, ContentEntry>,

    raster_fails: bool,
    render_failure: Option<String>,
    print_service_unavailable: bool,
    cancel_before_layout: bool,

    recorded: Mutex<Vec<RecordedJob>>,
    image_prints: AtomicUsize,
    document_registrations: AtomicUsize,
    renders: AtomicUsize,
}

impl MockHost {
    /// A host with no files, no content entries, and everything
    /// succeeding.
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            content_entries: HashMap::new(),
            raster_fails: false,
            render_failure: None,
            print_service_unavailable: false,
            cancel_before_layout: false,
            recorded: Mutex::new(Vec::new()),
            image_prints: AtomicUsize::new(0),
            document_registrations: AtomicUsize::new(0),
            renders: AtomicUsize::new(0),
        }
    }

    /// Add a file at a direct path.
    pub fn add_file(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    /// Add a content-reference entry with optional MIME metadata.
    pub fn add_content_entry(
        &mut self,
        uri: impl Into<String>,
        display_name: impl Into<String>,
        mime_type: Option<&str>,
        bytes: Vec<u8>,
    ) {
        self.content_entries.insert(
            uri.into(),
            ContentEntry {
                display_name: display_name.into(),
                mime_type: mime_type.map(str::to_string),
                bytes,
            },
        );
    }

    /// Make raster decoding fail for every payload.
    pub fn fail_raster_decode(&mut self) {
        self.raster_fails = true;
    }

    /// Make markup rendering fail with the given message.
    pub fn fail_rendering(&mut self, message: impl Into<String>) {
        self.render_failure = Some(message.into());
    }

    /// Make the print registry report no available print service.
    pub fn without_print_service(&mut self) {
        self.print_service_unavailable = true;
    }

    /// Fire the cancellation signal before each layout step, so every
    /// registered document ends in the cancelled state.
    pub fn cancel_before_layout(&mut self) {
        self.cancel_before_layout = true;
    }

    /// Jobs the registry accepted, in registration order.
    pub fn recorded_jobs(&self) -> Vec<RecordedJob> {
        self.recorded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Remove and return all recorded jobs.
    pub fn drain_jobs(&self) -> Vec<RecordedJob> {
        std::mem::take(&mut *self.recorded.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// How many image jobs reached the registry.
    pub fn image_print_count(&self) -> usize {
        self.image_prints.load(Ordering::SeqCst)
    }

    /// How many document-provider registrations reached the registry.
    pub fn document_register_count(&self) -> usize {
        self.document_registrations.load(Ordering::SeqCst)
    }

    /// How many markup renders were attempted.
    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }

    fn record(&self, job: RecordedJob) {
        self.recorded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(job);
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHost")
            .field("files", &self.files.len())
            .field("content_entries", &self.content_entries.len())
            .field("raster_fails", &self.raster_fails)
            .field("render_failure", &self.render_failure)
            .field("print_service_unavailable", &self.print_service_unavailable)
            .field("cancel_before_layout", &self.cancel_before_layout)
            .field("recorded_jobs", &self.recorded_jobs().len())
            .finish()
    }
}

impl ContentResolver for MockHost {
    fn open(&self, uri: &str) -> Result<ResolvedContent> {
        let entry = self
            .content_entries
            .get(uri)
            .ok_or_else(|| PrintError::SourceNotFound(uri.to_string()))?;

        Ok(ResolvedContent {
            reader: Box::new(Cursor::new(entry.bytes.clone())),
            display_name: entry.display_name.clone(),
            mime_type: entry.mime_type.clone(),
        })
    }
}

impl Filesystem for MockHost {
    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn open(&self, path: &str) -> std::io::Result<Box<dyn std::io::Read + Send>> {
        match self.files.get(path) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                path.to_string(),
            )),
        }
    }
}

impl RasterCodec for MockHost {
    /// Accepts any non-empty payload as a 1x1 image, so tests don't need
    /// real encoded pixels.
    fn decode(&self, bytes: &[u8]) -> Result<image::DynamicImage> {
        if self.raster_fails || bytes.is_empty() {
            return Err(PrintError::ImageDecode("mock decode failure".to_string()));
        }
        Ok(image::DynamicImage::new_rgba8(1, 1))
    }
}

impl PrintJobRegistry for MockHost {
    fn print_image(&self, job_name: &str, image: &image::DynamicImage) -> Result<()> {
        if self.print_service_unavailable {
            return Err(PrintError::PrintServiceUnavailable(
                "no print service in mock context".to_string(),
            ));
        }

        self.image_prints.fetch_add(1, Ordering::SeqCst);
        self.record(RecordedJob::Image {
            job_name: job_name.to_string(),
            width: image.width(),
            height: image.height(),
        });
        Ok(())
    }

    /// Drives the provider synchronously: layout (optionally cancelled),
    /// then a write into an in-memory sink. Returning `Ok` models the
    /// dialog having been presented; write failures show up only in the
    /// recorded terminal state.
    fn register_document(&self, job_name: &str, provider: DocumentProvider) -> Result<()> {
        if self.print_service_unavailable {
            return Err(PrintError::PrintServiceUnavailable(
                "no print service in mock context".to_string(),
            ));
        }

        self.document_registrations.fetch_add(1, Ordering::SeqCst);

        let cancel = CancelSignal::new();
        if self.cancel_before_layout {
            cancel.cancel();
        }

        let display_name = provider.display_name().to_string();
        let mime_type = provider.mime_type().to_string();

        let mut sink = Vec::new();
        match provider.layout(&cancel) {
            LayoutOutcome::Ready(_) => {
                let _ = provider.write_to(&mut sink);
            }
            LayoutOutcome::Cancelled => {}
        }

        self.record(RecordedJob::Document {
            job_name: job_name.to_string(),
            display_name,
            mime_type,
            bytes: sink,
            final_state: provider.state(),
        });
        Ok(())
    }
}

impl MarkupRenderer for MockHost {
    fn render(&self, markup: &str, _timeout: Duration) -> Result<RenderedSurface> {
        self.renders.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.render_failure {
            return Err(PrintError::RenderingFailed(message.clone()));
        }

        // The "rendered" document is just the markup bytes; enough to
        // assert the content flowed through the document branch.
        let provider = DocumentProvider::from_bytes(
            "rendered.pdf",
            RENDERED_MIME,
            markup.as_bytes().to_vec(),
            1024,
        );
        Ok(RenderedSurface::new(provider))
    }
}

impl HostPlatform for MockHost {
    fn content_resolver(&self) -> &dyn ContentResolver {
        self
    }

    fn filesystem(&self) -> &dyn Filesystem {
        self
    }

    fn raster_codec(&self) -> &dyn RasterCodec {
        self
    }

    fn print_registry(&self) -> &dyn PrintJobRegistry {
        self
    }

    fn markup_renderer(&self) -> &dyn MarkupRenderer {
        self
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
