//! # print-bridge
//!
//! Cross-platform "print a document" pipeline: classify a payload,
//! resolve its bytes, and hand it to the host's print service.
//!
//! This crate turns a heterogeneous print request (base64 blob, file
//! path, `content://` URI, raw HTML markup, or a pre-rendered surface)
//! into a concrete print job: raster images go straight to the host's
//! image print helper, everything else is wrapped in a chunk-streaming
//! [`DocumentProvider`](adapter::DocumentProvider) and registered with
//! the host's print job registry.
//!
//! ## Features
//!
//! - **Payload Classification**: MIME-driven routing of images, documents,
//!   markup, and live surfaces
//! - **Source Resolution**: base64 decoding, `content://` and `file://`
//!   URIs, direct paths, with scoped temp artifacts that clean themselves up
//! - **Markup Rendering**: HTML to PDF via headless Chrome
//! - **Bounded Streaming**: documents are copied to the print target in
//!   fixed-size chunks, never loaded wholesale when a stream will do
//! - **Early Rejection**: resolution errors surface before any print UI
//!   is involved
//! - **Host Abstraction**: the platform surface is five small traits,
//!   with a full mock for testing
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Your Application               │
//! └─────────────────┬───────────────────────────┘
//!                   │ PrintRequest
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │                 Printer                     │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │  resolve   (bytes + MIME + name)        │ │
//! │ └─────────────────────────────────────────┘ │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │  classify  (image / document /          │ │
//! │ │             markup / live surface)      │ │
//! │ └─────────────────────────────────────────┘ │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │  dispatch  (raster decode, markup       │ │
//! │ │             render, provider wrap)      │ │
//! │ └─────────────────────────────────────────┘ │
//! └─────────────────┬───────────────────────────┘
//!                   │ DocumentProvider / image
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │             HostPlatform                    │
//! │  (content resolver, filesystem, raster      │
//! │   codec, print registry, markup renderer)   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use print_bridge::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PrinterConfigBuilder::new()
//!         .copy_chunk_bytes(16 * 1024)
//!         .build()?;
//!
//!     let printer = Printer::new(Arc::new(NativeHost::new()), config);
//!
//!     // Print a PDF from disk
//!     printer.print_pdf_path("/tmp/report.pdf", "Quarterly Report").await?;
//!
//!     // Print rendered HTML
//!     printer.print_markup("<h1>Hello</h1>", "Greeting").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Configuration
//!
//! When the `env-config` feature is enabled, configuration can be read
//! from environment variables (loaded from an `app.env` file or the
//! system environment):
//!
//! ```rust,no_run
//! # #[cfg(feature = "env-config")] {
//! use print_bridge::config::env::from_env;
//!
//! let config = from_env().unwrap();
//! # }
//! ```
//!
//! ### Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `PRINT_TEMP_DIR` | String | system temp | Directory for temp artifacts |
//! | `PRINT_COPY_CHUNK_BYTES` | usize | 8192 | Streaming copy chunk size |
//! | `PRINT_RENDER_TIMEOUT_SECONDS` | u64 | 30 | Markup render timeout |
//! | `PRINT_STRICT_MIME` | bool | false | Reject unknown MIME types |
//! | `CHROME_PATH` | String | auto | Custom Chrome binary path |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `env-config` | Enable environment-based configuration |
//! | `test-utils` | Enable the mock host platform for testing |
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, PrintError>`](Result).
//! Errors raised during resolution or classification are reported
//! before any host print service is touched:
//!
//! ```rust,ignore
//! use print_bridge::{PrintError, PrintRequest};
//!
//! match printer.print(request).await {
//!     Ok(()) => {}
//!     Err(PrintError::SourceNotFound(what)) => {
//!         eprintln!("nothing to print: {}", what);
//!     }
//!     Err(PrintError::RenderingFailed(msg)) => {
//!         eprintln!("markup render failed: {}", msg);
//!     }
//!     Err(e) => eprintln!("print failed: {}", e),
//! }
//! ```
//!
//! ## Testing
//!
//! For testing without a real print service or Chrome, enable the
//! `test-utils` feature and use [`MockHost`](host::mock::MockHost):
//!
//! ```rust,ignore
//! use print_bridge::host::mock::MockHost;
//!
//! let mut host = MockHost::new();
//! host.fail_rendering("boom");
//! let printer = Printer::with_default_config(Arc::new(host));
//! ```

#![doc(html_root_url = "https://docs.rs/print-bridge/0.2.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// Modules
// ============================================================================

pub mod adapter;
pub mod classify;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handle;
pub mod host;
pub mod prelude;
pub mod printer;
pub mod request;
pub mod resolve;

// ============================================================================
// Re-exports (Public API)
// ============================================================================

// Core types
pub use adapter::{
    AdapterState, CancelSignal, DocumentInfo, DocumentProvider, LayoutOutcome, WriteOutcome,
};
pub use classify::Category;
pub use config::{PrinterConfig, PrinterConfigBuilder};
pub use error::{PrintError, Result};
pub use handle::PrintJobHandle;
pub use host::chrome::{ChromeMarkupRenderer, create_chrome_options};
pub use host::native::NativeHost;
pub use host::{
    ContentResolver, Filesystem, HostPlatform, MarkupRenderer, PrintJobRegistry, RasterCodec,
    RenderedSurface, ResolvedContent,
};
pub use printer::{Printer, version};
pub use request::{PDF_MIME, PrintPayload, PrintRequest};
pub use resolve::{ByteSource, ResolvedSource};

// Feature-gated re-exports
#[cfg(feature = "env-config")]
pub use config::env::{chrome_path_from_env, from_env};

#[cfg(any(test, feature = "test-utils"))]
pub use host::mock::MockHost;
