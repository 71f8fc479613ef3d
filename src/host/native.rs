//! Native host platform: local filesystem, raster codec, and a
//! spool-directory print registry.
//!
//! [`NativeHost`] is the host used in headless environments. Instead of a
//! desktop print dialog it spools accepted jobs into a directory, driving
//! each document provider on a background thread the way a platform print
//! service would; a downstream spooler (CUPS, `lp`, a watcher) picks the
//! files up from there. Markup rendering defaults to
//! [`ChromeMarkupRenderer`](crate::host::chrome::ChromeMarkupRenderer).

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

use crate::adapter::{CancelSignal, DocumentProvider, LayoutOutcome, WriteOutcome};
use crate::error::{PrintError, Result};
use crate::host::chrome::ChromeMarkupRenderer;
use crate::host::{
    ContentResolver, Filesystem, HostPlatform, MarkupRenderer, PrintJobRegistry, ResolvedContent,
};
use crate::resolve::extension_for_mime;

/// Direct filesystem access backed by `std::fs`.
#[derive(Debug, Default)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }

    fn open(&self, path: &str) -> std::io::Result<Box<dyn std::io::Read + Send>> {
        let file = std::fs::File::open(path)?;
        Ok(Box::new(file))
    }
}

/// Content resolution on a host without a content-resolution service.
///
/// Content-reference URIs are permission-scoped handles owned by mobile
/// platforms; there is nothing to resolve them against here, so every
/// lookup reports the source as not found.
#[derive(Debug, Default)]
pub struct NoContentService;

impl ContentResolver for NoContentService {
    fn open(&self, uri: &str) -> Result<ResolvedContent> {
        Err(PrintError::SourceNotFound(format!(
            "no content-resolution service on this host: {}",
            uri
        )))
    }
}

/// Raster decoding through the `image` crate.
#[derive(Debug, Default)]
pub struct ImageRasterCodec;

impl crate::host::RasterCodec for ImageRasterCodec {
    fn decode(&self, bytes: &[u8]) -> Result<image::DynamicImage> {
        image::load_from_memory(bytes).map_err(|e| PrintError::ImageDecode(e.to_string()))
    }
}

/// Print registry that spools accepted jobs into a directory.
///
/// `register_document` returns as soon as the job is accepted (the
/// "dialog presented" point); the provider is then driven to completion
/// on a background thread, matching how a platform print service invokes
/// layout and write callbacks on its own scheduler. Write failures are
/// logged and left in the spooled job's absence; they never reject the
/// original outcome.
pub struct SpoolPrintRegistry {
    spool_dir: PathBuf,
    job_counter: AtomicU64,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl SpoolPrintRegistry {
    /// A registry spooling into the given directory.
    pub fn new(spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            spool_dir: spool_dir.into(),
            job_counter: AtomicU64::new(0),
            workers: Mutex::new(Vec::new()),
        }
    }

    /// A registry spooling under the OS temp directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join("print-bridge-spool"))
    }

    /// Where accepted jobs are written.
    pub fn spool_dir(&self) -> &Path {
        &self.spool_dir
    }

    /// Block until all in-flight spool workers have finished.
    ///
    /// Tests and orderly shutdown use this; normal operation never needs
    /// to wait.
    pub fn wait_idle(&self) {
        let handles = std::mem::take(&mut *self.workers.lock().unwrap_or_else(|e| e.into_inner()));
        for handle in handles {
            if handle.join().is_err() {
                log::warn!("A spool worker panicked");
            }
        }
    }

    fn next_job_path(&self, job_name: &str, mime_type: &str) -> PathBuf {
        let seq = self.job_counter.fetch_add(1, Ordering::SeqCst);
        let safe_name: String = job_name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.spool_dir
            .join(format!("{:06}-{}{}", seq, safe_name, extension_for_mime(mime_type)))
    }

    fn ensure_spool_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.spool_dir).map_err(|e| {
            PrintError::PrintServiceUnavailable(format!(
                "cannot create spool directory {}: {}",
                self.spool_dir.display(),
                e
            ))
        })
    }
}

impl std::fmt::Debug for SpoolPrintRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpoolPrintRegistry")
            .field("spool_dir", &self.spool_dir)
            .field("jobs_accepted", &self.job_counter.load(Ordering::SeqCst))
            .finish()
    }
}

impl PrintJobRegistry for SpoolPrintRegistry {
    fn print_image(&self, job_name: &str, image: &image::DynamicImage) -> Result<()> {
        self.ensure_spool_dir()?;
        let path = self.next_job_path(job_name, "image/png");

        let mut encoded = Cursor::new(Vec::new());
        image
            .write_to(&mut encoded, image::ImageFormat::Png)
            .map_err(|e| {
                PrintError::PrintServiceUnavailable(format!("cannot spool image job: {}", e))
            })?;
        std::fs::write(&path, encoded.into_inner()).map_err(|e| {
            PrintError::PrintServiceUnavailable(format!("cannot spool image job: {}", e))
        })?;

        log::info!("Spooled image job '{}' at {}", job_name, path.display());
        Ok(())
    }

    fn register_document(&self, job_name: &str, provider: DocumentProvider) -> Result<()> {
        self.ensure_spool_dir()?;
        let path = self.next_job_path(job_name, provider.mime_type());
        let job_name = job_name.to_string();

        // Accepted: drive the provider off the caller's thread, the way
        // a print service invokes its callbacks on its own scheduler.
        let worker = std::thread::spawn(move || {
            drive_provider(&provider, &path, &job_name);
        });

        // Reap finished workers so the handle list stays bounded by the
        // number of in-flight jobs.
        let mut workers = self.workers.lock().unwrap_or_else(|e| e.into_inner());
        workers.retain(|handle| !handle.is_finished());
        workers.push(worker);
        Ok(())
    }
}

/// Run layout and write against a spool file.
fn drive_provider(provider: &DocumentProvider, path: &Path, job_name: &str) {
    let cancel = CancelSignal::new();

    match provider.layout(&cancel) {
        LayoutOutcome::Cancelled => {
            log::info!("Job '{}' cancelled before layout completed", job_name);
            return;
        }
        LayoutOutcome::Ready(info) => {
            log::debug!(
                "Job '{}' laid out: {} ({}, {:?} bytes)",
                job_name,
                info.name,
                info.mime_type,
                info.size_hint
            );
        }
    }

    let mut sink = match std::fs::File::create(path) {
        Ok(file) => file,
        Err(e) => {
            log::error!("Cannot create spool file {}: {}", path.display(), e);
            return;
        }
    };

    match provider.write_to(&mut sink) {
        WriteOutcome::Finished { bytes_written } => {
            log::info!(
                "Spooled document job '{}' ({} bytes) at {}",
                job_name,
                bytes_written,
                path.display()
            );
        }
        WriteOutcome::Failed(reason) => {
            log::error!("Document job '{}' failed during write: {}", job_name, reason);
            if let Err(e) = std::fs::remove_file(path) {
                log::warn!("Cannot remove partial spool file {}: {}", path.display(), e);
            }
        }
    }
}

/// The full native host.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use print_bridge::{Printer, PrinterConfig};
/// use print_bridge::host::native::NativeHost;
///
/// let host = Arc::new(NativeHost::new());
/// let printer = Printer::new(host, PrinterConfig::default());
/// ```
pub struct NativeHost {
    filesystem: LocalFilesystem,
    content: NoContentService,
    codec: ImageRasterCodec,
    registry: SpoolPrintRegistry,
    renderer: Box<dyn MarkupRenderer>,
}

impl NativeHost {
    /// Host with a temp-dir spool and an auto-detected Chrome renderer.
    pub fn new() -> Self {
        Self {
            filesystem: LocalFilesystem,
            content: NoContentService,
            codec: ImageRasterCodec,
            registry: SpoolPrintRegistry::in_temp_dir(),
            renderer: Box::new(ChromeMarkupRenderer::with_defaults()),
        }
    }

    /// Host spooling into a specific directory.
    pub fn with_spool_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            registry: SpoolPrintRegistry::new(dir),
            ..Self::new()
        }
    }

    /// Replace the markup renderer.
    pub fn with_renderer(mut self, renderer: Box<dyn MarkupRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// The spool registry, for inspecting accepted jobs.
    pub fn spool(&self) -> &SpoolPrintRegistry {
        &self.registry
    }
}

impl Default for NativeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NativeHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeHost")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl HostPlatform for NativeHost {
    fn content_resolver(&self) -> &dyn ContentResolver {
        &self.content
    }

    fn filesystem(&self) -> &dyn Filesystem {
        &self.filesystem
    }

    fn raster_codec(&self) -> &dyn crate::host::RasterCodec {
        &self.codec
    }

    fn print_registry(&self) -> &dyn PrintJobRegistry {
        &self.registry
    }

    fn markup_renderer(&self) -> &dyn MarkupRenderer {
        &*self.renderer
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RasterCodec;
    use std::io::Read;

    fn temp_spool_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "print-bridge-test-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    /// Verifies filesystem existence checks and reads against real files.
    #[test]
    fn test_local_filesystem() {
        let fs = LocalFilesystem;
        assert!(!fs.exists("/definitely/not/a/real/path.pdf"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"payload").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        assert!(fs.exists(&path));
        let mut reader = fs.open(&path).unwrap();
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).unwrap();
        assert_eq!(bytes, b"payload");
    }

    /// Verifies the codec round-trips a real encoded image and rejects
    /// garbage.
    #[test]
    fn test_image_codec() {
        let codec = ImageRasterCodec;

        let mut encoded = Cursor::new(Vec::new());
        image::DynamicImage::new_rgba8(2, 3)
            .write_to(&mut encoded, image::ImageFormat::Png)
            .unwrap();

        let decoded = codec.decode(&encoded.into_inner()).unwrap();
        assert_eq!(decoded.width(), 2);
        assert_eq!(decoded.height(), 3);

        assert!(matches!(
            codec.decode(b"not an image"),
            Err(PrintError::ImageDecode(_))
        ));
    }

    /// Verifies the content resolver reports every URI as missing.
    #[test]
    fn test_no_content_service() {
        let resolver = NoContentService;
        assert!(matches!(
            resolver.open("content://any/doc"),
            Err(PrintError::SourceNotFound(_))
        ));
    }

    /// Verifies a registered document ends up spooled byte-exactly.
    #[test]
    fn test_spool_registry_document() {
        let dir = temp_spool_dir("doc");
        let registry = SpoolPrintRegistry::new(&dir);

        let provider = DocumentProvider::from_bytes(
            "report.pdf",
            "application/pdf",
            b"pdf payload".to_vec(),
            4,
        );
        registry.register_document("Monthly Report", provider).unwrap();
        registry.wait_idle();

        let entries: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let path = entries[0].as_ref().unwrap().path();
        assert!(path.to_string_lossy().ends_with(".pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"pdf payload");

        let _ = std::fs::remove_dir_all(&dir);
    }

    /// Verifies image jobs are spooled as PNG files.
    #[test]
    fn test_spool_registry_image() {
        let dir = temp_spool_dir("img");
        let registry = SpoolPrintRegistry::new(&dir);

        let image = image::DynamicImage::new_rgba8(1, 1);
        registry.print_image("Photo", &image).unwrap();

        let entries: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let path = entries[0].as_ref().unwrap().path();
        assert!(path.to_string_lossy().ends_with(".png"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    /// Verifies finished spool workers are reaped on the next
    /// registration instead of accumulating one handle per job.
    #[test]
    fn test_spool_registry_reaps_finished_workers() {
        let dir = temp_spool_dir("reap");
        let registry = SpoolPrintRegistry::new(&dir);

        let first = DocumentProvider::from_bytes(
            "first.pdf",
            "application/pdf",
            b"first".to_vec(),
            4,
        );
        registry.register_document("First", first).unwrap();

        // Wait for the first worker to finish without draining the list.
        loop {
            let finished = registry
                .workers
                .lock()
                .unwrap()
                .first()
                .map(|handle| handle.is_finished())
                .unwrap_or(true);
            if finished {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        let second = DocumentProvider::from_bytes(
            "second.pdf",
            "application/pdf",
            b"second".to_vec(),
            4,
        );
        registry.register_document("Second", second).unwrap();

        assert_eq!(registry.workers.lock().unwrap().len(), 1);
        registry.wait_idle();

        let _ = std::fs::remove_dir_all(&dir);
    }

    /// Verifies job file names stay filesystem-safe.
    #[test]
    fn test_job_path_sanitized() {
        let registry = SpoolPrintRegistry::new("/spool");
        let path = registry.next_job_path("weird/..name ?", "application/pdf");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(!name.contains('/'));
        assert!(!name.contains('?'));
        assert!(name.ends_with(".pdf"));
    }
}
