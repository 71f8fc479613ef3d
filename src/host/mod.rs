//! Host platform capabilities.
//!
//! The bridge never talks to a print subsystem, filesystem, or renderer
//! directly; it goes through the small capability traits in this module.
//! A host supplies all of them through [`HostPlatform`], and the rest of
//! the pipeline stays identical across hosts.
//!
//! Provided implementations:
//!
//! - [`NativeHost`](native::NativeHost): local filesystem, raster codec,
//!   and a spool-directory print registry.
//! - [`ChromeMarkupRenderer`](chrome::ChromeMarkupRenderer): off-screen
//!   markup rendering through a headless browser.
//! - [`MockHost`](mock::MockHost) (requires the `test-utils` feature or
//!   `cfg(test)`): fully scripted host for tests.

use std::io::Read;
use std::time::Duration;

use crate::adapter::DocumentProvider;
use crate::error::Result;

pub mod chrome;
pub mod native;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

/// What the content-resolution service hands back for an opaque
/// content-reference URI.
pub struct ResolvedContent {
    /// Readable bytes; typically a stream with no known total length.
    pub reader: Box<dyn Read + Send>,
    /// User-visible name of the referenced document.
    pub display_name: String,
    /// MIME type from the service's metadata, when it has one.
    pub mime_type: Option<String>,
}

impl std::fmt::Debug for ResolvedContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedContent")
            .field("display_name", &self.display_name)
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Resolves opaque content-reference URIs into readable byte streams.
///
/// Content URIs are permission-scoped references without a filesystem
/// location; only this service can open them.
pub trait ContentResolver: Send + Sync {
    /// Open the referenced content.
    ///
    /// # Errors
    ///
    /// [`PrintError::SourceNotFound`](crate::PrintError::SourceNotFound)
    /// when the reference does not exist or is unreadable.
    fn open(&self, uri: &str) -> Result<ResolvedContent>;
}

/// Direct filesystem access for plain path payloads.
pub trait Filesystem: Send + Sync {
    /// Whether a file exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Open the file for reading.
    fn open(&self, path: &str) -> std::io::Result<Box<dyn Read + Send>>;
}

/// Decodes raw bytes into a displayable raster image.
pub trait RasterCodec: Send + Sync {
    /// Decode, or fail with
    /// [`PrintError::ImageDecode`](crate::PrintError::ImageDecode) when
    /// the bytes are not a recognizable image.
    fn decode(&self, bytes: &[u8]) -> Result<image::DynamicImage>;
}

/// The platform's print-job registry.
///
/// Registration is fire-and-forget: a successful return means the print
/// UI has been presented, and all further feedback arrives through the
/// document provider's own callbacks.
pub trait PrintJobRegistry: Send + Sync {
    /// Print a single decoded image through the platform's image helper.
    fn print_image(&self, job_name: &str, image: &image::DynamicImage) -> Result<()>;

    /// Register a document-provider adapter under `job_name`.
    ///
    /// # Errors
    ///
    /// [`PrintError::PrintServiceUnavailable`](crate::PrintError::PrintServiceUnavailable)
    /// when the execution context has no print capability.
    fn register_document(&self, job_name: &str, provider: DocumentProvider) -> Result<()>;
}

/// Off-screen markup rendering.
pub trait MarkupRenderer: Send + Sync {
    /// Render a markup string into a printable surface, or fail with
    /// [`PrintError::RenderingFailed`](crate::PrintError::RenderingFailed).
    fn render(&self, markup: &str, timeout: Duration) -> Result<RenderedSurface>;
}

/// The full set of capabilities a host environment provides.
///
/// One small per-host implementation of these five accessors replaces
/// what would otherwise be a per-platform copy of the whole pipeline.
pub trait HostPlatform: Send + Sync {
    /// Content-reference URI resolution.
    fn content_resolver(&self) -> &dyn ContentResolver;

    /// Direct filesystem access.
    fn filesystem(&self) -> &dyn Filesystem;

    /// Raster image decoding.
    fn raster_codec(&self) -> &dyn RasterCodec;

    /// The print-job registry.
    fn print_registry(&self) -> &dyn PrintJobRegistry;

    /// Off-screen markup rendering.
    fn markup_renderer(&self) -> &dyn MarkupRenderer;
}

/// A rendered, printable representation of some markup (or any other
/// caller-prepared content), ready to hand to the print registry.
///
/// Wraps the document provider the surface exposes; no rendering wait is
/// needed once one of these exists.
#[derive(Debug)]
pub struct RenderedSurface {
    provider: DocumentProvider,
}

impl RenderedSurface {
    /// Wrap a document provider as a rendered surface.
    pub fn new(provider: DocumentProvider) -> Self {
        Self { provider }
    }

    /// User-visible name of the rendered document.
    pub fn document_name(&self) -> &str {
        self.provider.display_name()
    }

    /// Extract the document provider for registration.
    pub fn into_provider(self) -> DocumentProvider {
        self.provider
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// The pipeline stores hosts behind `Arc<dyn HostPlatform>` and the
    /// platform drives adapters from its own threads; every seam must be
    /// object-safe, Send and Sync.
    #[test]
    fn test_traits_are_object_safe_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ContentResolver>();
        assert_send_sync::<dyn Filesystem>();
        assert_send_sync::<dyn RasterCodec>();
        assert_send_sync::<dyn PrintJobRegistry>();
        assert_send_sync::<dyn MarkupRenderer>();
        assert_send_sync::<dyn HostPlatform>();
    }

    /// Verifies the surface hands back its provider intact.
    #[test]
    fn test_surface_into_provider() {
        let provider =
            DocumentProvider::from_bytes("note.pdf", "application/pdf", b"pdf".to_vec(), 1024);
        let surface = RenderedSurface::new(provider);
        assert_eq!(surface.document_name(), "note.pdf");

        let provider = surface.into_provider();
        assert_eq!(provider.display_name(), "note.pdf");
        assert_eq!(provider.mime_type(), "application/pdf");
    }
}
