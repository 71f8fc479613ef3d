//! Error types for the print bridge.
//!
//! This module provides [`PrintError`], a unified error type for all
//! print-bridge operations, and a convenient [`Result`] type alias.
//!
//! # Example
//!
//! ```rust
//! use print_bridge::{PrintError, Result};
//!
//! fn submit_job() -> Result<()> {
//!     // Your logic here...
//!     Err(PrintError::SourceNotFound("content://missing/doc".to_string()))
//! }
//!
//! match submit_job() {
//!     Ok(()) => println!("Print dialog presented"),
//!     Err(PrintError::SourceNotFound(uri)) => eprintln!("Nothing at {}", uri),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

/// Errors that can occur while preparing or dispatching a print job.
///
/// Every variant corresponds to a failure that is surfaced to the caller
/// *before* any print UI is shown. Failures during the write phase (after
/// the dialog has been presented) are reported through the document
/// provider's own failure channel instead, see
/// [`WriteOutcome`](crate::adapter::WriteOutcome).
///
/// # Example
///
/// ```rust
/// use print_bridge::PrintError;
///
/// fn handle_error(error: PrintError) {
///     match error {
///         PrintError::Decode(msg) => eprintln!("Bad payload: {}", msg),
///         PrintError::SourceNotFound(path) => eprintln!("Missing: {}", path),
///         other => eprintln!("Print failed: {}", other),
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    /// The encoded payload could not be decoded.
    ///
    /// Returned when a base64 payload contains invalid characters or
    /// broken padding.
    ///
    /// # Example
    ///
    /// ```rust
    /// use print_bridge::PrintError;
    ///
    /// let error = PrintError::Decode("invalid padding".to_string());
    /// println!("{}", error); // "Failed to decode payload: invalid padding"
    /// ```
    #[error("Failed to decode payload: {0}")]
    Decode(String),

    /// A referenced path or URI does not exist or is unreadable.
    ///
    /// # Common Causes
    ///
    /// - A filesystem path that does not exist
    /// - A content-reference URI the content-resolution service reports
    ///   as absent
    /// - A `file://` URI that cannot be converted to a local path
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    /// The payload's MIME type is not handled by any print category.
    ///
    /// Only produced when strict MIME checking is enabled via
    /// [`PrinterConfig`](crate::PrinterConfig); by default unknown types
    /// fall back to the generic document branch.
    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    /// Bytes declared as an image could not be decoded as a raster image.
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    /// No print service is available in the current execution context.
    ///
    /// The host platform's print-job registry refused to accept the job,
    /// typically because the process has no printing capability at all.
    #[error("Print service unavailable: {0}")]
    PrintServiceUnavailable(String),

    /// The markup string failed to render.
    ///
    /// The off-screen rendering surface reported an error before a
    /// printable representation was produced; the print registry is never
    /// reached in this case.
    #[error("Markup rendering failed: {0}")]
    RenderingFailed(String),

    /// The job was cancelled before content was requested.
    ///
    /// Reserved for host print-registry implementations whose platform
    /// rejects a registration outright on cancellation. The bundled
    /// hosts never construct it: the platform signals cancellation
    /// during the layout step, and the document provider acknowledges
    /// it through [`LayoutOutcome::Cancelled`](crate::adapter::LayoutOutcome::Cancelled)
    /// while the registration itself still succeeds.
    #[error("Print job cancelled")]
    Cancelled,

    /// Invalid configuration provided.
    ///
    /// # Common Causes
    ///
    /// - `copy_chunk_bytes` set to 0
    /// - a zero render timeout
    /// - unparseable environment variable values
    ///
    /// # Prevention
    ///
    /// Use [`PrinterConfigBuilder`](crate::PrinterConfigBuilder) which
    /// validates configuration at build time.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The completion bridge was lost before an outcome arrived.
    ///
    /// Indicates the task driving the pipeline panicked or was aborted;
    /// callers should treat this as a bug rather than a user error.
    #[error("Print pipeline ended without reporting an outcome")]
    Internal,
}

/// Convenience conversion from [`String`] to [`PrintError::Configuration`].
///
/// Allows using the `?` operator with functions that return `String` errors
/// in contexts expecting [`PrintError`].
///
/// # Example
///
/// ```rust
/// use print_bridge::PrintError;
///
/// let error: PrintError = "invalid configuration".to_string().into();
/// assert!(matches!(error, PrintError::Configuration(_)));
/// ```
impl From<String> for PrintError {
    fn from(msg: String) -> Self {
        PrintError::Configuration(msg)
    }
}

/// Convenience conversion from `&str` to [`PrintError::Configuration`].
impl From<&str> for PrintError {
    fn from(msg: &str) -> Self {
        PrintError::Configuration(msg.to_string())
    }
}

/// Result type alias using [`PrintError`].
///
/// This is the standard result type returned by print-bridge operations.
///
/// # Example
///
/// ```rust
/// use print_bridge::Result;
///
/// fn my_function() -> Result<String> {
///     Ok("success".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, PrintError>;

// ============================================================================
// Unit Tests
// ============================================================================
