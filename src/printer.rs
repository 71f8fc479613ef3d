//! The printer facade: one entry point per inbound operation.
//!
//! [`Printer`] ties the pipeline together. For any request the order is
//! fixed: resolve the source, settle classification on the effective
//! MIME type, dispatch to the host primitive, and bridge the outcome
//! back to the caller. Independent requests overlap freely; there is no
//! internal queue or worker pool.
//!
//! # Blocking and Async
//!
//! The core pipeline is **synchronous/blocking** - it does file I/O and,
//! for markup, drives a browser. The async `print_*` methods wrap it in
//! `tokio::task::spawn_blocking` so callers on an async runtime never
//! stall a worker thread; [`print_blocking`](Printer::print_blocking) is
//! available for synchronous callers.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              Application layer (async)               │
//! └──────────────────────────┬───────────────────────────┘
//!                            │ spawn_blocking
//!                            ▼
//! ┌──────────────────────────────────────────────────────┐
//! │  resolve ──▶ classify ──▶ dispatch ──▶ outcome        │
//! └──────────────────────────┬───────────────────────────┘
//!                            │ capability traits
//!                            ▼
//! ┌──────────────────────────────────────────────────────┐
//! │      HostPlatform (print registry, renderer, ...)    │
//! └──────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::oneshot;

use crate::classify::classify;
use crate::config::PrinterConfig;
use crate::dispatch::dispatch;
use crate::error::{PrintError, Result};
use crate::handle::PrintJobHandle;
use crate::host::{HostPlatform, RenderedSurface};
use crate::request::PrintRequest;
use crate::resolve::resolve;

/// Crate version, stable for the lifetime of the process.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Cross-platform print bridge over a [`HostPlatform`].
///
/// Cheap to clone; clones share the host.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use print_bridge::{Printer, PrinterConfig};
/// use print_bridge::host::native::NativeHost;
///
/// let printer = Printer::new(Arc::new(NativeHost::new()), PrinterConfig::default());
///
/// printer.print_pdf_path("/docs/report.pdf", "Report").await?;
/// ```
#[derive(Clone)]
pub struct Printer {
    host: Arc<dyn HostPlatform>,
    config: PrinterConfig,
}

impl Printer {
    /// Create a printer over the given host.
    pub fn new(host: Arc<dyn HostPlatform>, config: PrinterConfig) -> Self {
        Self { host, config }
    }

    /// Create a printer with the default configuration.
    pub fn with_default_config(host: Arc<dyn HostPlatform>) -> Self {
        Self::new(host, PrinterConfig::default())
    }

    /// The active configuration.
    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    /// Run the full pipeline for one request, blocking the calling
    /// thread.
    ///
    /// Resolution, classification and dispatch run strictly in order;
    /// the first error rejects the request before any print UI is shown.
    /// `Ok(())` means the host has presented its print UI - not that the
    /// user finished printing.
    pub fn print_blocking(&self, request: PrintRequest) -> Result<()> {
        let (payload, job_name) = request.into_parts();

        let resolved = resolve(&payload, &job_name, self.host.as_ref(), &self.config)?;
        let category = classify(&payload, resolved.as_ref().map(|r| r.mime_type.as_str()));

        log::info!("Print job '{}' classified as {}", job_name, category);

        dispatch(
            category,
            payload,
            resolved,
            &job_name,
            self.host.as_ref(),
            &self.config,
        )
    }

    /// Run the pipeline for one request without blocking the async
    /// runtime.
    pub async fn print(&self, request: PrintRequest) -> Result<()> {
        let printer = self.clone();
        tokio::task::spawn_blocking(move || printer.print_blocking(request))
            .await
            .map_err(|e| {
                log::error!("Print pipeline task failed: {}", e);
                PrintError::Internal
            })?
    }

    /// Submit a request and get a detached, awaitable handle.
    ///
    /// Must be called from within a tokio runtime. The pipeline runs to
    /// completion even if the handle is dropped.
    pub fn submit(&self, request: PrintRequest) -> PrintJobHandle {
        let (tx, rx) = oneshot::channel();
        let job_name = request.job_name().to_string();
        let printer = self.clone();

        tokio::spawn(async move {
            let outcome = printer.print(request).await;
            // The caller may have dropped the handle; the job itself is
            // already done either way.
            let _ = tx.send(outcome);
        });

        PrintJobHandle::new(job_name, rx)
    }

    // ------------------------------------------------------------------
    // Convenience operations, one per inbound call surface entry
    // ------------------------------------------------------------------

    /// Print base64-encoded data with an explicit MIME type.
    ///
    /// Image types go through the single-image helper; everything else
    /// through the generic document adapter.
    pub async fn print_from_encoded_data(
        &self,
        data: impl Into<String>,
        mime_type: impl Into<String>,
        job_name: impl Into<String>,
    ) -> Result<()> {
        self.print(PrintRequest::encoded_data(data, mime_type, job_name))
            .await
    }

    /// Print a file by path, `file://` URI, or content-reference URI.
    ///
    /// When `mime_type` is `None` the type is inferred from content
    /// metadata or the path extension.
    pub async fn print_from_path(
        &self,
        path: impl Into<String>,
        mime_type: Option<&str>,
        job_name: impl Into<String>,
    ) -> Result<()> {
        self.print(PrintRequest::from_path(path, mime_type, job_name))
            .await
    }

    /// Render a markup string off-screen and print the result.
    pub async fn print_markup(
        &self,
        markup: impl Into<String>,
        job_name: impl Into<String>,
    ) -> Result<()> {
        self.print(PrintRequest::markup(markup, job_name)).await
    }

    /// Print a PDF document by path or URI.
    pub async fn print_pdf_path(
        &self,
        path: impl Into<String>,
        job_name: impl Into<String>,
    ) -> Result<()> {
        self.print(PrintRequest::pdf_path(path, job_name)).await
    }

    /// Print an already-rendered surface supplied by the caller.
    pub async fn print_live_surface(
        &self,
        surface: RenderedSurface,
        job_name: impl Into<String>,
    ) -> Result<()> {
        self.print(PrintRequest::live_surface(surface, job_name))
            .await
    }
}

impl std::fmt::Debug for Printer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Printer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::AdapterState;
    use crate::host::mock::{MockHost, RecordedJob};
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;

    fn printer_over(host: MockHost) -> (Printer, Arc<MockHost>) {
        let host = Arc::new(host);
        let printer = Printer::with_default_config(host.clone());
        (printer, host)
    }

    /// Verifies version is a non-empty literal and idempotent.
    #[test]
    fn test_version_idempotent() {
        let first = version();
        assert!(!first.is_empty());
        assert_eq!(first, version());
        assert_eq!(first, env!("CARGO_PKG_VERSION"));
    }

    /// Verifies the blocking entry point end to end with a document.
    #[test]
    fn test_print_blocking_document() {
        let (printer, host) = printer_over(MockHost::new());
        let data = BASE64.encode(b"%PDF-1.4 fake");

        printer
            .print_blocking(PrintRequest::encoded_data(data, "application/pdf", "Doc"))
            .unwrap();

        match &host.recorded_jobs()[0] {
            RecordedJob::Document {
                bytes, final_state, ..
            } => {
                assert_eq!(bytes, b"%PDF-1.4 fake");
                assert_eq!(*final_state, AdapterState::Finished);
            }
            other => panic!("Expected document job, got {:?}", other),
        }
    }

    /// Verifies the async image path takes the image branch only.
    #[tokio::test]
    async fn test_print_from_encoded_data_image() {
        let (printer, host) = printer_over(MockHost::new());
        let data = BASE64.encode(b"fake image payload");

        printer
            .print_from_encoded_data(data, "image/png", "Test Image")
            .await
            .unwrap();

        assert_eq!(host.image_print_count(), 1);
        assert_eq!(host.document_register_count(), 0);
    }

    /// Verifies pre-dispatch errors reject before the registry is hit.
    #[tokio::test]
    async fn test_missing_content_uri_rejects_early() {
        let (printer, host) = printer_over(MockHost::new());

        let result = printer
            .print_from_path("content://absent/doc", None, "X")
            .await;

        assert!(matches!(result, Err(PrintError::SourceNotFound(_))));
        assert!(host.recorded_jobs().is_empty());
    }

    /// Verifies markup success through the async facade.
    #[tokio::test]
    async fn test_print_markup() {
        let (printer, host) = printer_over(MockHost::new());

        printer
            .print_markup("<html><body>Hi</body></html>", "Note")
            .await
            .unwrap();

        assert_eq!(host.render_count(), 1);
        assert_eq!(host.document_register_count(), 1);
    }

    /// Verifies submit produces a handle that settles with the outcome.
    #[tokio::test]
    async fn test_submit_handle() {
        let (printer, host) = printer_over(MockHost::new());

        let handle = printer.submit(PrintRequest::markup("<p>hi</p>", "Detached"));
        assert_eq!(handle.job_name(), "Detached");
        handle.settled().await.unwrap();

        assert_eq!(host.document_register_count(), 1);
    }

    /// Verifies a pdf path with no file rejects with SourceNotFound.
    #[tokio::test]
    async fn test_print_pdf_path_missing() {
        let (printer, _host) = printer_over(MockHost::new());

        let result = printer.print_pdf_path("/no/such.pdf", "Missing").await;
        assert!(matches!(result, Err(PrintError::SourceNotFound(_))));
    }
}
