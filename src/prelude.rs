//! Convenient imports for common usage patterns.
//!
//! This module re-exports the most commonly used types from `print-bridge`,
//! allowing you to quickly get started with a single import.
//!
//! # Usage
//!
//! ```rust,ignore
//! use print_bridge::prelude::*;
//! ```
//!
//! This imports:
//!
//! - [`Printer`] - Main entry point
//! - [`PrinterConfig`] - Configuration struct
//! - [`PrinterConfigBuilder`] - Configuration builder
//! - [`PrintRequest`] / [`PrintPayload`] - Job description types
//! - [`PrintError`] - Error type
//! - [`Result`] - Result type alias
//! - [`PrintJobHandle`] - Handle for submitted jobs
//! - [`Category`] - Payload classification
//! - [`DocumentProvider`] - Chunk-streaming document adapter
//! - [`HostPlatform`] and the host traits
//! - [`NativeHost`] / [`ChromeMarkupRenderer`] - Provided host pieces
//!
//! # Example
//!
//! ```rust,ignore
//! use print_bridge::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PrinterConfigBuilder::new()
//!         .strict_mime(true)
//!         .build()?;
//!
//!     let printer = Printer::new(Arc::new(NativeHost::new()), config);
//!     printer.print_pdf_path("/tmp/invoice.pdf", "Invoice").await?;
//!
//!     Ok(())
//! }
//! ```

// Core types
pub use crate::adapter::{
    AdapterState, CancelSignal, DocumentInfo, DocumentProvider, LayoutOutcome, WriteOutcome,
};
pub use crate::classify::Category;
pub use crate::config::{PrinterConfig, PrinterConfigBuilder};
pub use crate::error::{PrintError, Result};
pub use crate::handle::PrintJobHandle;
pub use crate::host::chrome::ChromeMarkupRenderer;
pub use crate::host::native::NativeHost;
pub use crate::host::{
    ContentResolver, Filesystem, HostPlatform, MarkupRenderer, PrintJobRegistry, RasterCodec,
    RenderedSurface, ResolvedContent,
};
pub use crate::printer::{Printer, version};
pub use crate::request::{PDF_MIME, PrintPayload, PrintRequest};
pub use crate::resolve::{ByteSource, ResolvedSource};

// Feature-gated exports
#[cfg(feature = "env-config")]
pub use crate::config::env::{chrome_path_from_env, from_env};

#[cfg(any(test, feature = "test-utils"))]
pub use crate::host::mock::MockHost;

// Re-export Arc for convenience (hosts are shared via Arc<dyn HostPlatform>)
pub use std::sync::Arc;
