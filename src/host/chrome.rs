//! Off-screen markup rendering through headless Chrome.
//!
//! [`ChromeMarkupRenderer`] implements the markup-rendering capability by
//! loading the markup string into a headless browser tab via a data URL,
//! waiting for the page to settle, and printing the tab to a PDF byte
//! buffer. The buffer becomes a [`RenderedSurface`] the dispatcher hands
//! to the print registry like any other document.
//!
//! # Blocking Behavior
//!
//! **Rendering blocks the calling thread.** The printer facade always
//! calls it from inside `tokio::task::spawn_blocking`; if you drive the
//! renderer directly from an async context, do the same.
//!
//! # Example
//!
//! ```rust,ignore
//! use print_bridge::host::chrome::ChromeMarkupRenderer;
//!
//! // Auto-detect the Chrome installation
//! let renderer = ChromeMarkupRenderer::with_defaults();
//!
//! // Or specify a custom binary path
//! let renderer = ChromeMarkupRenderer::with_path("/usr/bin/chromium".to_string());
//! ```

use std::time::{Duration, Instant};

use headless_chrome::{Browser, LaunchOptions};
use headless_chrome::types::PrintToPdfOptions;

use crate::adapter::DocumentProvider;
use crate::error::{PrintError, Result};
use crate::host::{MarkupRenderer, RenderedSurface};

/// Display name stamped on documents produced from markup.
pub const RENDERED_DOCUMENT_NAME: &str = "document.pdf";

/// Polling interval for the page-settle check in milliseconds.
///
/// After navigation, the renderer polls `document.readyState` at this
/// interval until the page reports `complete` or the render timeout is
/// spent.
const SETTLE_POLL_INTERVAL_MS: u64 = 200;

/// Chunk size used by providers built over rendered bytes.
const RENDERED_CHUNK_BYTES: usize = 8192;

/// Markup renderer backed by a headless Chrome/Chromium browser.
///
/// A fresh browser is launched per render and torn down when the
/// `Browser` value drops; markup printing is rare enough that keeping a
/// warm instance around is not worth the memory.
///
/// # Thread Safety
///
/// The renderer is `Send + Sync` and can be shared across threads.
pub struct ChromeMarkupRenderer {
    /// Function that generates launch options for each render.
    launch_options_fn: Box<dyn Fn() -> Result<LaunchOptions<'static>> + Send + Sync>,
}

impl ChromeMarkupRenderer {
    /// Create a renderer with a custom launch options function.
    pub fn new<F>(launch_options_fn: F) -> Self
    where
        F: Fn() -> Result<LaunchOptions<'static>> + Send + Sync + 'static,
    {
        Self {
            launch_options_fn: Box::new(launch_options_fn),
        }
    }

    /// Create a renderer with an auto-detected Chrome path.
    ///
    /// This is the recommended default - lets headless_chrome find
    /// Chrome. Works on Linux, macOS, and Windows.
    pub fn with_defaults() -> Self {
        log::debug!("Creating ChromeMarkupRenderer with auto-detect");
        Self::new(|| {
            create_chrome_options(None).map_err(|e| PrintError::Configuration(e.to_string()))
        })
    }

    /// Create a renderer with a custom Chrome binary path.
    ///
    /// Use this when Chrome is installed in a non-standard location.
    pub fn with_path(chrome_path: String) -> Self {
        log::debug!(
            "Creating ChromeMarkupRenderer with custom path: {}",
            chrome_path
        );
        Self::new(move || {
            create_chrome_options(Some(&chrome_path))
                .map_err(|e| PrintError::Configuration(e.to_string()))
        })
    }

    /// Create a renderer honoring the `CHROME_PATH` environment variable.
    ///
    /// Falls back to auto-detection when the variable is unset.
    #[cfg(feature = "env-config")]
    pub fn from_env() -> Self {
        match crate::config::env::chrome_path_from_env() {
            Some(path) => Self::with_path(path),
            None => Self::with_defaults(),
        }
    }
}

impl std::fmt::Debug for ChromeMarkupRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromeMarkupRenderer").finish_non_exhaustive()
    }
}

impl MarkupRenderer for ChromeMarkupRenderer {
    /// Render the markup into a printable PDF surface.
    ///
    /// # Errors
    ///
    /// Every failure along the way - empty markup, browser launch, tab
    /// creation, navigation, printing - comes back as
    /// [`PrintError::RenderingFailed`], so the dispatcher can reject the
    /// request before the print registry is ever touched.
    fn render(&self, markup: &str, timeout: Duration) -> Result<RenderedSurface> {
        if markup.trim().is_empty() {
            log::warn!("Empty markup provided");
            return Err(PrintError::RenderingFailed(
                "markup content is empty".to_string(),
            ));
        }

        let start_time = Instant::now();
        log::debug!(
            "Rendering markup ({} bytes, timeout={:?})",
            markup.len(),
            timeout
        );

        let options = (self.launch_options_fn)()?;

        let browser = Browser::new(options).map_err(|e| {
            log::error!("Browser launch failed: {}", e);
            PrintError::RenderingFailed(e.to_string())
        })?;

        let tab = browser.new_tab().map_err(|e| {
            log::error!("Failed to create tab: {}", e);
            PrintError::RenderingFailed(e.to_string())
        })?;

        // Load the markup without a web server by converting it to a
        // data URL; percent-encoding handles special characters.
        let data_url = format!(
            "data:text/html;charset=utf-8,{}",
            urlencoding::encode(markup)
        );
        log::trace!("Data URL length: {} bytes", data_url.len());

        let page = tab
            .navigate_to(&data_url)
            .map_err(|e| {
                log::error!("Failed to navigate to data URL: {}", e);
                PrintError::RenderingFailed(e.to_string())
            })?
            .wait_until_navigated()
            .map_err(|e| {
                log::error!("Navigation timeout: {}", e);
                PrintError::RenderingFailed(e.to_string())
            })?;

        wait_for_page_settled(&tab, timeout.saturating_sub(start_time.elapsed()));

        let pdf_data = page.print_to_pdf(build_print_options()).map_err(|e| {
            log::error!("Failed to print rendered markup: {}", e);
            PrintError::RenderingFailed(e.to_string())
        })?;

        close_tab_safely(&tab);

        log::info!(
            "Markup rendered in {:?} ({} bytes input, {} bytes output)",
            start_time.elapsed(),
            markup.len(),
            pdf_data.len()
        );

        let provider = DocumentProvider::from_bytes(
            RENDERED_DOCUMENT_NAME,
            "application/pdf",
            pdf_data,
            RENDERED_CHUNK_BYTES,
        );
        Ok(RenderedSurface::new(provider))
    }
}

/// Create Chrome launch options with an optional custom binary path.
///
/// Generates launch options tuned for stable headless operation: GPU
/// features off, crash reporting off, container-friendly shared memory
/// usage, and automation flags on.
///
/// # Arguments
///
/// * `chrome_path` - Optional custom Chrome binary path. If None,
///   auto-detects.
///
/// # Errors
///
/// Returns error if the options builder fails (rare, usually a bug).
pub fn create_chrome_options(
    chrome_path: Option<&str>,
) -> std::result::Result<LaunchOptions<'static>, Box<dyn std::error::Error + Send + Sync>> {
    match chrome_path {
        Some(path) => log::debug!("Creating Chrome options with custom path: {}", path),
        None => log::debug!("Creating Chrome options (auto-detect browser)"),
    }

    let mut builder = LaunchOptions::default_builder();

    // Set path if provided, otherwise let headless_chrome auto-detect
    if let Some(path) = chrome_path {
        builder.path(Some(path.to_string().into()));
    }

    builder
        .headless(true)
        .sandbox(false) // required in containers
        .disable_default_args(true)
        .args(vec![
            // Memory and performance
            "--disable-dev-shm-usage".as_ref(), // use /tmp instead of /dev/shm
            "--disable-crash-reporter".as_ref(),
            "--max_old_space_size=1024".as_ref(),
            // GPU and rendering
            "--disable-gpu-compositing".as_ref(),
            "--disable-software-rasterizer".as_ref(),
            "--disable-accelerated-2d-canvas".as_ref(),
            "--disable-gl-drawing-for-tests".as_ref(),
            "--disable-webgl".as_ref(),
            "--disable-webgl2".as_ref(),
            // Unnecessary features
            "--disable-extensions".as_ref(),
            "--disable-plugins".as_ref(),
            "--disable-sync".as_ref(),
            "--disable-default-apps".as_ref(),
            // Automation
            "--enable-automation".as_ref(),
            // Stability
            "--disable-background-timer-throttling".as_ref(),
            "--disable-backgrounding-occluded-windows".as_ref(),
            "--disable-hang-monitor".as_ref(),
            "--disable-popup-blocking".as_ref(),
            "--disable-renderer-backgrounding".as_ref(),
            "--disable-ipc-flooding-protection".as_ref(),
        ])
        .build()
        .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
            let path_msg = chrome_path.unwrap_or("auto-detect");
            log::error!(
                "Failed to build Chrome launch options (path: {}): {}",
                path_msg,
                e
            );
            e.into()
        })
}

/// Build PDF print options for rendered markup.
///
/// Zero margins, no header/footer, backgrounds included.
fn build_print_options() -> Option<PrintToPdfOptions> {
    Some(PrintToPdfOptions {
        landscape: Some(false),
        display_header_footer: Some(false),
        print_background: Some(true),
        margin_top: Some(0.0),
        margin_bottom: Some(0.0),
        margin_left: Some(0.0),
        margin_right: Some(0.0),
        ..Default::default()
    })
}

/// Wait for the page to report `document.readyState === "complete"`.
///
/// Polls every [`SETTLE_POLL_INTERVAL_MS`], returning early when the page
/// settles. Timing out is a normal completion path, not an error: the
/// renderer proceeds with whatever has been laid out so far.
fn wait_for_page_settled(tab: &headless_chrome::Tab, max_wait: Duration) {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(SETTLE_POLL_INTERVAL_MS);

    while start.elapsed() < max_wait {
        let settled = tab
            .evaluate("document.readyState === 'complete'", false)
            .map(|result| result.value.and_then(|v| v.as_bool()).unwrap_or(false))
            .unwrap_or(false);

        if settled {
            log::debug!("Page settled after {:?}", start.elapsed());
            return;
        }

        std::thread::sleep(poll_interval);
    }

    log::debug!(
        "Page settle wait elapsed after {:?} (proceeding anyway)",
        start.elapsed()
    );
}

/// Safely close a browser tab, ignoring errors.
///
/// Cleanup is best-effort: the rendered bytes are already captured and
/// failing here would discard a valid document.
fn close_tab_safely(tab: &headless_chrome::Tab) {
    if let Err(e) = tab.close(true) {
        log::warn!(
            "Failed to close tab (continuing anyway, resources will be cleaned up): {}",
            e
        );
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Verifies that the renderer can be instantiated in both
    /// auto-detect and custom path modes. Does not launch a browser.
    #[test]
    fn test_renderer_creation() {
        let _renderer = ChromeMarkupRenderer::with_defaults();
        let _renderer_with_path =
            ChromeMarkupRenderer::with_path("/custom/chrome/path".to_string());
    }

    /// Verifies that Chrome launch options can be built without a
    /// browser installed; the path is only resolved at launch time.
    #[test]
    fn test_create_chrome_options() {
        let result = create_chrome_options(None);
        assert!(
            result.is_ok(),
            "Auto-detect Chrome options should build successfully: {:?}",
            result.err()
        );

        let result = create_chrome_options(Some("/custom/chrome/path"));
        assert!(
            result.is_ok(),
            "Custom path Chrome options should build successfully: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_build_print_options() {
        let options = build_print_options().unwrap();
        assert_eq!(options.landscape, Some(false));
        assert_eq!(options.display_header_footer, Some(false));
        assert_eq!(options.print_background, Some(true));
        assert_eq!(options.margin_top, Some(0.0));
        assert_eq!(options.margin_bottom, Some(0.0));
        assert_eq!(options.margin_left, Some(0.0));
        assert_eq!(options.margin_right, Some(0.0));
    }

    /// Verifies empty markup is rejected before any browser launch.
    #[test]
    fn test_empty_markup_rejected() {
        let renderer = ChromeMarkupRenderer::with_defaults();
        let result = renderer.render("   ", Duration::from_secs(1));
        assert!(matches!(result, Err(PrintError::RenderingFailed(_))));
    }
}
