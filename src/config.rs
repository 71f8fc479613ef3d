//! Configuration for print pipeline behavior and limits.
//!
//! This module provides [`PrinterConfig`] and [`PrinterConfigBuilder`]
//! for configuring temporary-artifact placement, stream chunking,
//! rendering timeouts and MIME handling strictness.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use print_bridge::PrinterConfigBuilder;
//!
//! let config = PrinterConfigBuilder::new()
//!     .copy_chunk_bytes(16 * 1024)
//!     .render_timeout(Duration::from_secs(60))
//!     .build()
//!     .expect("Invalid configuration");
//!
//! assert_eq!(config.copy_chunk_bytes, 16 * 1024);
//! ```
//!
//! # Environment Configuration
//!
//! When the `env-config` feature is enabled, you can load configuration
//! from environment variables and an optional `app.env` file:
//!
//! ```rust,ignore
//! use print_bridge::config::env::from_env;
//!
//! let config = from_env()?;
//! ```
//!
//! See [`mod@env`] module for available environment variables.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for print pipeline behavior and limits.
///
/// Use [`PrinterConfigBuilder`] for validation and convenience.
///
/// # Fields Overview
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `temp_dir` | system temp | Directory for temporary artifacts |
/// | `copy_chunk_bytes` | 8192 | Write-phase chunk size |
/// | `render_timeout` | 30s | Markup rendering time limit |
/// | `strict_mime` | false | Fail unknown MIME types |
///
/// # Example
///
/// ```rust
/// use print_bridge::PrinterConfig;
///
/// // Use defaults
/// let config = PrinterConfig::default();
/// assert_eq!(config.copy_chunk_bytes, 8192);
/// assert!(!config.strict_mime);
/// ```
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    /// Directory where request-scoped temporary artifacts are created.
    ///
    /// `None` uses the operating system's temporary directory. Artifacts
    /// are removed when the resolved source is dropped, regardless of
    /// whether the print job succeeded.
    pub temp_dir: Option<PathBuf>,

    /// Chunk size, in bytes, used when streaming a byte source into the
    /// platform-supplied output sink during the write phase.
    ///
    /// Content-reference streams may have no known total length, so the
    /// copy loop never buffers more than one chunk at a time.
    ///
    /// # Default
    ///
    /// 8192 bytes (8 KiB)
    pub copy_chunk_bytes: usize,

    /// Maximum time allowed for a markup string to render into a
    /// printable surface before the request fails with a rendering error.
    ///
    /// # Default
    ///
    /// 30 seconds
    pub render_timeout: Duration,

    /// Whether an unknown MIME type fails the request.
    ///
    /// When `false` (the default), payloads whose type cannot be inferred
    /// fall back to `application/octet-stream` and are routed through the
    /// generic document branch. When `true`, resolution fails with an
    /// unsupported-type error instead.
    pub strict_mime: bool,
}

impl Default for PrinterConfig {
    /// Production-ready default configuration.
    ///
    /// - Temp dir: operating system default
    /// - Copy chunk: 8 KiB
    /// - Render timeout: 30 seconds
    /// - Strict MIME: off
    ///
    /// # Example
    ///
    /// ```rust
    /// use print_bridge::PrinterConfig;
    /// use std::time::Duration;
    ///
    /// let config = PrinterConfig::default();
    ///
    /// assert!(config.temp_dir.is_none());
    /// assert_eq!(config.copy_chunk_bytes, 8192);
    /// assert_eq!(config.render_timeout, Duration::from_secs(30));
    /// assert!(!config.strict_mime);
    /// ```
    fn default() -> Self {
        Self {
            temp_dir: None,
            copy_chunk_bytes: 8192,
            render_timeout: Duration::from_secs(30),
            strict_mime: false,
        }
    }
}

/// Builder for [`PrinterConfig`] with validation.
///
/// Provides a fluent API for constructing validated configurations.
/// All setter methods can be chained together.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use print_bridge::PrinterConfigBuilder;
///
/// let config = PrinterConfigBuilder::new()
///     .copy_chunk_bytes(4096)
///     .render_timeout(Duration::from_secs(10))
///     .strict_mime(true)
///     .build()
///     .expect("Invalid configuration");
/// ```
///
/// # Validation
///
/// The [`build()`](Self::build) method validates:
/// - `copy_chunk_bytes` must be greater than 0
/// - `render_timeout` must be non-zero
pub struct PrinterConfigBuilder {
    config: PrinterConfig,
}

impl PrinterConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: PrinterConfig::default(),
        }
    }

    /// Set the directory used for temporary artifacts.
    ///
    /// # Example
    ///
    /// ```rust
    /// use print_bridge::PrinterConfigBuilder;
    ///
    /// let config = PrinterConfigBuilder::new()
    ///     .temp_dir("/var/spool/print-bridge")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(config.temp_dir.is_some());
    /// ```
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(dir.into());
        self
    }

    /// Set the write-phase chunk size in bytes (must be > 0).
    pub fn copy_chunk_bytes(mut self, bytes: usize) -> Self {
        self.config.copy_chunk_bytes = bytes;
        self
    }

    /// Set the markup rendering timeout (must be non-zero).
    pub fn render_timeout(mut self, timeout: Duration) -> Self {
        self.config.render_timeout = timeout;
        self
    }

    /// Set whether unknown MIME types fail the request instead of
    /// falling back to the generic document branch.
    pub fn strict_mime(mut self, strict: bool) -> Self {
        self.config.strict_mime = strict;
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// - Returns error if `copy_chunk_bytes` is 0
    /// - Returns error if `render_timeout` is zero
    ///
    /// # Example
    ///
    /// ```rust
    /// use print_bridge::PrinterConfigBuilder;
    ///
    /// // Valid configuration
    /// let config = PrinterConfigBuilder::new()
    ///     .copy_chunk_bytes(1024)
    ///     .build();
    /// assert!(config.is_ok());
    ///
    /// // Invalid: zero chunk size
    /// let config = PrinterConfigBuilder::new()
    ///     .copy_chunk_bytes(0)
    ///     .build();
    /// assert!(config.is_err());
    /// ```
    pub fn build(self) -> std::result::Result<PrinterConfig, String> {
        if self.config.copy_chunk_bytes == 0 {
            return Err("copy_chunk_bytes must be greater than 0".to_string());
        }

        if self.config.render_timeout.is_zero() {
            return Err("render_timeout must be non-zero".to_string());
        }

        Ok(self.config)
    }
}

impl Default for PrinterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Environment Configuration (feature-gated)
// ============================================================================

/// Environment-based configuration loading.
///
/// This module is only available when the `env-config` feature is enabled.
///
/// # Environment File
///
/// This module uses `dotenvy` to load environment variables from an `app.env`
/// file in the current directory. The file is optional - if not found,
/// environment variables and defaults are used.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `PRINT_TEMP_DIR` | path | system temp | Temp artifact directory |
/// | `PRINT_COPY_CHUNK_BYTES` | usize | 8192 | Write-phase chunk size |
/// | `PRINT_RENDER_TIMEOUT_SECONDS` | u64 | 30 | Markup render timeout |
/// | `PRINT_STRICT_MIME` | bool | false | Fail unknown MIME types |
/// | `CHROME_PATH` | String | auto | Custom Chrome binary path |
///
/// # Example `app.env` File
///
/// ```text
/// # Print Bridge Configuration
/// PRINT_COPY_CHUNK_BYTES=8192
/// PRINT_RENDER_TIMEOUT_SECONDS=30
/// PRINT_STRICT_MIME=false
///
/// # Chrome Configuration (optional)
/// # CHROME_PATH=/usr/bin/google-chrome
/// ```
#[cfg(feature = "env-config")]
pub mod env {
    use super::*;
    use crate::error::PrintError;

    /// Default environment file name.
    pub const ENV_FILE_NAME: &str = "app.env";

    /// Load environment variables from `app.env` file.
    ///
    /// Call this early in your application startup to ensure environment
    /// variables are loaded before any configuration functions are called.
    ///
    /// This function is automatically called by [`from_env`], but you can
    /// call it explicitly if you need to load the file earlier or check
    /// for errors.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)` if the file was found and loaded successfully
    /// - `Err(dotenvy::Error)` if the file was not found or couldn't be parsed
    pub fn load_env_file() -> Result<std::path::PathBuf, dotenvy::Error> {
        dotenvy::from_filename(ENV_FILE_NAME)
    }

    /// Load configuration from environment variables.
    ///
    /// Reads configuration from environment variables with sensible defaults.
    /// Also loads `app.env` file if present (via `dotenvy`).
    ///
    /// # Environment Variables
    ///
    /// - `PRINT_TEMP_DIR`: Temp artifact directory (default: system temp)
    /// - `PRINT_COPY_CHUNK_BYTES`: Write-phase chunk size (default: 8192)
    /// - `PRINT_RENDER_TIMEOUT_SECONDS`: Markup render timeout (default: 30)
    /// - `PRINT_STRICT_MIME`: Fail unknown MIME types (default: false)
    ///
    /// # Errors
    ///
    /// Returns [`PrintError::Configuration`] if configuration values are invalid.
    pub fn from_env() -> Result<PrinterConfig, PrintError> {
        // Load app.env file if present (ignore errors if not found)
        match load_env_file() {
            Ok(path) => {
                log::info!("Loaded configuration from: {:?}", path);
            }
            Err(e) => {
                log::debug!(
                    "No {} file found or failed to load: {} (using environment variables and defaults)",
                    ENV_FILE_NAME,
                    e
                );
            }
        }

        let temp_dir = std::env::var("PRINT_TEMP_DIR").ok().map(PathBuf::from);

        let copy_chunk_bytes = std::env::var("PRINT_COPY_CHUNK_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8192usize);

        let render_timeout_seconds = std::env::var("PRINT_RENDER_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30u64);

        let strict_mime = std::env::var("PRINT_STRICT_MIME")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(false);

        log::info!("Loading print configuration from environment:");
        log::info!(
            "   - Temp dir: {}",
            temp_dir
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "system default".to_string())
        );
        log::info!("   - Copy chunk: {} bytes", copy_chunk_bytes);
        log::info!("   - Render timeout: {}s", render_timeout_seconds);
        log::info!("   - Strict MIME: {}", strict_mime);

        let mut builder = PrinterConfigBuilder::new()
            .copy_chunk_bytes(copy_chunk_bytes)
            .render_timeout(Duration::from_secs(render_timeout_seconds))
            .strict_mime(strict_mime);

        if let Some(dir) = temp_dir {
            builder = builder.temp_dir(dir);
        }

        builder.build().map_err(PrintError::Configuration)
    }

    /// Get Chrome path from environment.
    ///
    /// Reads `CHROME_PATH` environment variable, used by the markup
    /// rendering surface when launching a browser.
    ///
    /// **Note:** Call [`from_env`] or [`load_env_file`] first to ensure
    /// `app.env` is loaded if you're using a configuration file.
    ///
    /// # Returns
    ///
    /// - `Some(path)` if `CHROME_PATH` is set
    /// - `None` if not set (will use auto-detection)
    pub fn chrome_path_from_env() -> Option<String> {
        std::env::var("CHROME_PATH").ok()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
