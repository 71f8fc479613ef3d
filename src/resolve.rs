//! Source resolution: turning a request payload into readable bytes.
//!
//! The resolver is the first pipeline stage. It decodes base64 payloads,
//! distinguishes content-reference URIs from direct filesystem paths,
//! infers MIME types, and materializes temporary artifacts where the
//! downstream document facility needs a seekable handle rather than an
//! in-memory buffer.
//!
//! Resolution either yields a [`ResolvedSource`] whose bytes are readable
//! at the moment of return, or fails explicitly; it never hands out a
//! source that silently yields zero bytes.

use std::io::{Cursor, Read, Write};
use std::sync::{Arc, Mutex};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tempfile::TempPath;
use url::Url;

use crate::config::PrinterConfig;
use crate::error::{PrintError, Result};
use crate::host::HostPlatform;
use crate::request::PrintPayload;

/// Generic fallback for payloads whose MIME type cannot be inferred.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Extension used for temporary artifacts with an unmapped MIME type.
pub const GENERIC_TEMP_EXTENSION: &str = ".tmp";

// ============================================================================
// MIME lookup tables
// ============================================================================

/// Fixed extension-to-MIME lookup table, matched case-insensitively.
///
/// Extensions outside the table resolve to [`OCTET_STREAM`] (or fail,
/// under strict MIME configuration).
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "pdf" => Some("application/pdf"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Reverse lookup: MIME type to temp-artifact extension (with dot).
///
/// Unmapped types get [`GENERIC_TEMP_EXTENSION`].
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type.to_ascii_lowercase().as_str() {
        "application/pdf" => ".pdf",
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        _ => GENERIC_TEMP_EXTENSION,
    }
}

/// Infer a MIME type from the extension of a path or display name.
fn mime_for_path(path: &str) -> Option<&'static str> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let (_, extension) = name.rsplit_once('.')?;
    mime_for_extension(extension)
}

/// File name component of a path or URI, for display purposes.
fn display_name_for_path(path: &str) -> String {
    path.trim_end_matches('/')
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(path)
        .to_string()
}

// ============================================================================
// Byte sources
// ============================================================================

/// The readable bytes behind a [`ResolvedSource`].
///
/// Three shapes cover every input kind:
///
/// - [`Memory`](ByteSource::Memory): decoded bytes held in memory; used
///   for image payloads handed straight to the raster decoder.
/// - [`TempFile`](ByteSource::TempFile): a request-scoped temporary
///   artifact; the backing file is deleted when the source drops, on
///   both success and failure paths.
/// - [`Stream`](ByteSource::Stream): a one-shot reader opened from the
///   filesystem or the content-resolution service; may have no known
///   total length.
pub enum ByteSource {
    /// Bytes held in memory.
    Memory(Arc<[u8]>),
    /// A temporary file, removed when this value drops.
    TempFile(TempPath),
    /// A one-shot reader; consumed by the first call to [`open`](Self::open).
    Stream(Mutex<Option<Box<dyn Read + Send>>>),
}

impl ByteSource {
    /// Wrap an already-opened reader.
    pub fn from_reader(reader: Box<dyn Read + Send>) -> Self {
        ByteSource::Stream(Mutex::new(Some(reader)))
    }

    /// Open a reader over the bytes.
    ///
    /// Memory and temp-file sources can be opened repeatedly; a stream
    /// source yields its reader exactly once and errors afterwards.
    pub fn open(&self) -> std::io::Result<Box<dyn Read + Send>> {
        match self {
            ByteSource::Memory(bytes) => Ok(Box::new(Cursor::new(Arc::clone(bytes)))),
            ByteSource::TempFile(path) => {
                let file = std::fs::File::open(path)?;
                Ok(Box::new(file))
            }
            ByteSource::Stream(slot) => {
                let mut guard = slot.lock().unwrap_or_else(|e| e.into_inner());
                guard.take().ok_or_else(|| {
                    std::io::Error::other("byte stream already consumed")
                })
            }
        }
    }

    /// Read the entire source into memory.
    ///
    /// Only used by the image branch, where the raster decoder needs the
    /// full buffer; the document write phase streams in chunks instead.
    pub fn read_all(&self) -> std::io::Result<Vec<u8>> {
        let mut reader = self.open()?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Known total length, when the source has one.
    pub fn len_hint(&self) -> Option<u64> {
        match self {
            ByteSource::Memory(bytes) => Some(bytes.len() as u64),
            ByteSource::TempFile(path) => std::fs::metadata(path).ok().map(|m| m.len()),
            ByteSource::Stream(_) => None,
        }
    }

    /// Whether the source is backed by a temporary artifact.
    pub fn is_temp_artifact(&self) -> bool {
        matches!(self, ByteSource::TempFile(_))
    }
}

impl std::fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteSource::Memory(bytes) => {
                f.debug_tuple("Memory").field(&bytes.len()).finish()
            }
            ByteSource::TempFile(path) => f.debug_tuple("TempFile").field(path).finish(),
            ByteSource::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// A request payload resolved into readable bytes with a settled MIME
/// type and display name.
///
/// Lives only for the duration of handing data to the printing facility;
/// any temporary artifact it owns is removed on drop.
#[derive(Debug)]
pub struct ResolvedSource {
    /// The readable bytes.
    pub source: ByteSource,
    /// Effective MIME type; never empty (falls back to
    /// [`OCTET_STREAM`] rather than failing, unless strict MIME is on).
    pub mime_type: String,
    /// Name shown by the platform print UI.
    pub display_name: String,
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve a payload into a [`ResolvedSource`].
///
/// Returns `Ok(None)` for markup and live-surface payloads, which carry
/// no byte source and are dispatched directly.
///
/// # Errors
///
/// - [`PrintError::Decode`] for malformed base64
/// - [`PrintError::SourceNotFound`] for missing paths or content URIs
/// - [`PrintError::UnsupportedType`] when strict MIME is enabled and no
///   type can be inferred
pub fn resolve(
    payload: &PrintPayload,
    job_name: &str,
    host: &dyn HostPlatform,
    config: &PrinterConfig,
) -> Result<Option<ResolvedSource>> {
    match payload {
        PrintPayload::EncodedData { data, mime_type } => {
            resolve_encoded(data, mime_type, job_name, config).map(Some)
        }
        PrintPayload::FilePath { path, mime_type } => {
            resolve_path(path, mime_type.as_deref(), host, config).map(Some)
        }
        PrintPayload::PdfPath { path } => {
            resolve_path(path, Some(crate::request::PDF_MIME), host, config).map(Some)
        }
        PrintPayload::Markup { .. } | PrintPayload::LiveSurface(_) => Ok(None),
    }
}

/// Decode a base64 payload and materialize it for its MIME family.
///
/// Image payloads stay in memory for the raster decoder; everything else
/// is written to a scoped temporary artifact so the document facility
/// gets a seekable handle.
fn resolve_encoded(
    data: &str,
    mime_type: &str,
    job_name: &str,
    config: &PrinterConfig,
) -> Result<ResolvedSource> {
    let bytes = BASE64
        .decode(data.trim())
        .map_err(|e| PrintError::Decode(e.to_string()))?;

    log::debug!(
        "Decoded {} base64 chars into {} bytes ({})",
        data.len(),
        bytes.len(),
        mime_type
    );

    if mime_type.starts_with("image/") {
        return Ok(ResolvedSource {
            source: ByteSource::Memory(Arc::from(bytes)),
            mime_type: mime_type.to_string(),
            display_name: job_name.to_string(),
        });
    }

    let extension = extension_for_mime(mime_type);
    let temp_path = write_temp_artifact(&bytes, extension, config)
        .map_err(|e| PrintError::SourceNotFound(format!("temp artifact: {}", e)))?;

    log::debug!("Materialized payload at {:?}", temp_path);

    Ok(ResolvedSource {
        source: ByteSource::TempFile(temp_path),
        mime_type: mime_type.to_string(),
        display_name: job_name.to_string(),
    })
}

/// Write decoded bytes to a request-scoped temporary file.
fn write_temp_artifact(
    bytes: &[u8],
    extension: &str,
    config: &PrinterConfig,
) -> std::io::Result<TempPath> {
    let dir = config
        .temp_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);

    let mut file = tempfile::Builder::new()
        .prefix("print-job-")
        .suffix(extension)
        .tempfile_in(dir)?;

    file.write_all(bytes)?;
    file.flush()?;
    Ok(file.into_temp_path())
}

/// Resolve a path or URI.
///
/// Strings that parse as a `content` URI are opened through the host's
/// content-resolution service; `file://` URIs are converted to plain
/// paths; everything else is treated as a direct filesystem path, which
/// must exist before use.
fn resolve_path(
    path: &str,
    declared_mime: Option<&str>,
    host: &dyn HostPlatform,
    config: &PrinterConfig,
) -> Result<ResolvedSource> {
    match Url::parse(path) {
        Ok(url) if url.scheme() == "content" => {
            resolve_content_uri(path, declared_mime, host, config)
        }
        Ok(url) if url.scheme() == "file" => {
            let local = url
                .to_file_path()
                .map_err(|_| PrintError::SourceNotFound(path.to_string()))?;
            let local = local.to_string_lossy().into_owned();
            resolve_direct_path(&local, declared_mime, host, config)
        }
        // Not a URI (or an unrecognized scheme): treat as a direct path.
        _ => resolve_direct_path(path, declared_mime, host, config),
    }
}

/// Open a content-reference URI through the content-resolution service.
fn resolve_content_uri(
    uri: &str,
    declared_mime: Option<&str>,
    host: &dyn HostPlatform,
    config: &PrinterConfig,
) -> Result<ResolvedSource> {
    let content = host.content_resolver().open(uri)?;

    // MIME order: declared -> resolver metadata -> extension -> fallback.
    let mime_type = match declared_mime {
        Some(m) => m.to_string(),
        None => match content.mime_type {
            Some(m) => m,
            None => effective_mime_from_name(&content.display_name, config)?,
        },
    };

    log::debug!("Opened content URI {} as {} ({})", uri, content.display_name, mime_type);

    Ok(ResolvedSource {
        source: ByteSource::from_reader(content.reader),
        mime_type,
        display_name: content.display_name,
    })
}

/// Open a direct filesystem path, checking existence first.
fn resolve_direct_path(
    path: &str,
    declared_mime: Option<&str>,
    host: &dyn HostPlatform,
    config: &PrinterConfig,
) -> Result<ResolvedSource> {
    let fs = host.filesystem();

    if !fs.exists(path) {
        return Err(PrintError::SourceNotFound(path.to_string()));
    }

    let reader = fs
        .open(path)
        .map_err(|e| PrintError::SourceNotFound(format!("{}: {}", path, e)))?;

    let mime_type = match declared_mime {
        Some(m) => m.to_string(),
        None => effective_mime_from_name(path, config)?,
    };

    Ok(ResolvedSource {
        source: ByteSource::from_reader(reader),
        mime_type,
        display_name: display_name_for_path(path),
    })
}

/// Extension-table lookup with the configured fallback behavior.
fn effective_mime_from_name(name: &str, config: &PrinterConfig) -> Result<String> {
    match mime_for_path(name) {
        Some(m) => Ok(m.to_string()),
        None if config.strict_mime => Err(PrintError::UnsupportedType(name.to_string())),
        None => Ok(OCTET_STREAM.to_string()),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
