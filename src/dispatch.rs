//! Adapter dispatch: routing a classified, resolved payload to the
//! right host printing primitive.
//!
//! Each branch ends with the host presenting its print UI; the call is
//! fire-and-forget once the registry accepts the job. All errors here
//! surface before any UI is shown.

use crate::adapter::DocumentProvider;
use crate::classify::Category;
use crate::config::PrinterConfig;
use crate::error::{PrintError, Result};
use crate::host::{HostPlatform, RenderedSurface};
use crate::request::PrintPayload;
use crate::resolve::ResolvedSource;

/// Route a classified payload to its host printing primitive.
///
/// `resolved` carries the byte source for byte-backed payloads and is
/// `None` for markup and live-surface payloads, which dispatch on the
/// payload itself.
pub fn dispatch(
    category: Category,
    payload: PrintPayload,
    resolved: Option<ResolvedSource>,
    job_name: &str,
    host: &dyn HostPlatform,
    config: &PrinterConfig,
) -> Result<()> {
    log::debug!("Dispatching '{}' to the {} branch", job_name, category);

    match (category, payload, resolved) {
        (Category::Image, _, Some(resolved)) => dispatch_image(resolved, job_name, host),
        (Category::Document, _, Some(resolved)) => {
            dispatch_document(resolved, job_name, host, config)
        }
        (Category::Markup, PrintPayload::Markup { markup }, _) => {
            dispatch_markup(&markup, job_name, host, config)
        }
        (Category::LiveSurface, PrintPayload::LiveSurface(surface), _) => {
            dispatch_surface(surface, job_name, host)
        }
        // Classification and resolution keep category and payload in
        // step; reaching this arm means a category without its input.
        (category, payload, _) => Err(PrintError::UnsupportedType(format!(
            "cannot dispatch {:?} payload to the {} branch",
            payload, category
        ))),
    }
}

/// Image branch: decode an in-memory bitmap and hand it to the
/// platform's single-image print helper.
fn dispatch_image(resolved: ResolvedSource, job_name: &str, host: &dyn HostPlatform) -> Result<()> {
    let bytes = resolved
        .source
        .read_all()
        .map_err(|e| PrintError::ImageDecode(e.to_string()))?;

    let image = host.raster_codec().decode(&bytes)?;

    log::debug!(
        "Decoded {}x{} image for job '{}'",
        image.width(),
        image.height(),
        job_name
    );

    host.print_registry().print_image(job_name, &image)
}

/// Document branch: bind a document-provider adapter to the byte source
/// and register it with the print-job registry.
///
/// The adapter owns the resolved source from here on; any temporary
/// artifact lives exactly as long as the adapter needs it.
fn dispatch_document(
    resolved: ResolvedSource,
    job_name: &str,
    host: &dyn HostPlatform,
    config: &PrinterConfig,
) -> Result<()> {
    let provider = DocumentProvider::new(resolved, config.copy_chunk_bytes);
    host.print_registry().register_document(job_name, provider)
}

/// Markup branch: render off-screen, then register the surface's
/// document provider.
///
/// Rendering is the one step with true asynchrony behind it; the
/// registry is never touched when it fails.
fn dispatch_markup(
    markup: &str,
    job_name: &str,
    host: &dyn HostPlatform,
    config: &PrinterConfig,
) -> Result<()> {
    let surface = host
        .markup_renderer()
        .render(markup, config.render_timeout)?;

    log::debug!(
        "Markup rendered into '{}' for job '{}'",
        surface.document_name(),
        job_name
    );

    dispatch_surface(surface, job_name, host)
}

/// Live-surface branch: the surface is already rendered; extract its
/// provider and register it directly.
fn dispatch_surface(
    surface: RenderedSurface,
    job_name: &str,
    host: &dyn HostPlatform,
) -> Result<()> {
    host.print_registry()
        .register_document(job_name, surface.into_provider())
}

// ============================================================================
// Unit Tests
// ============================================================================
