//! Integration tests for the print pipeline.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use print_bridge::host::mock::{MockHost, RENDERED_MIME, RecordedJob};
use print_bridge::prelude::*;
use std::time::Duration;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn printer_over(host: MockHost) -> (Printer, Arc<MockHost>) {
    init_logging();
    let host = Arc::new(host);
    let printer = Printer::with_default_config(host.clone());
    (printer, host)
}

/// Test that a base64 image payload prints through the single-image
/// helper without touching the temp directory.
#[tokio::test]
async fn test_image_payload_prints_in_memory() {
    init_logging();
    let spool = tempfile::tempdir().unwrap();
    let config = PrinterConfigBuilder::new()
        .temp_dir(spool.path())
        .build()
        .unwrap();
    let host = Arc::new(MockHost::new());
    let printer = Printer::new(host.clone(), config);

    let data = BASE64.encode(b"pretend these are PNG pixels");
    printer
        .print_from_encoded_data(data, "image/png", "Test Image")
        .await
        .unwrap();

    assert_eq!(host.image_print_count(), 1);
    assert_eq!(host.document_register_count(), 0);
    match &host.recorded_jobs()[0] {
        RecordedJob::Image {
            job_name,
            width,
            height,
        } => {
            assert_eq!(job_name, "Test Image");
            assert_eq!((*width, *height), (1, 1));
        }
        other => panic!("Expected image job, got {:?}", other),
    }

    // No temp artifact for in-memory image payloads.
    assert_eq!(std::fs::read_dir(spool.path()).unwrap().count(), 0);
}

/// Test that non-image base64 round-trips byte-exact through the
/// document adapter.
#[tokio::test]
async fn test_base64_pdf_round_trip() {
    let original = b"%PDF-1.4 three pages of nothing".to_vec();
    let (printer, host) = printer_over(MockHost::new());

    printer
        .print_from_encoded_data(BASE64.encode(&original), "application/pdf", "Invoice")
        .await
        .unwrap();

    assert_eq!(host.document_register_count(), 1);
    match &host.recorded_jobs()[0] {
        RecordedJob::Document {
            job_name,
            mime_type,
            bytes,
            final_state,
            ..
        } => {
            assert_eq!(job_name, "Invoice");
            assert_eq!(mime_type, PDF_MIME);
            assert_eq!(bytes, &original);
            assert_eq!(*final_state, AdapterState::Finished);
        }
        other => panic!("Expected document job, got {:?}", other),
    }
}

/// Test that malformed base64 is rejected before the registry is touched.
#[tokio::test]
async fn test_invalid_base64_rejected_early() {
    let (printer, host) = printer_over(MockHost::new());

    let result = printer
        .print_from_encoded_data("not!!!base64", "application/pdf", "Broken")
        .await;

    assert!(matches!(result, Err(PrintError::Decode(_))));
    assert!(host.recorded_jobs().is_empty());
}

/// Test that a missing content reference fails with SourceNotFound
/// before any print UI would be shown.
#[tokio::test]
async fn test_missing_content_uri_rejected_before_registry() {
    let (printer, host) = printer_over(MockHost::new());

    let result = printer
        .print_from_path("content://docs/absent", None, "Gone")
        .await;

    assert!(matches!(result, Err(PrintError::SourceNotFound(_))));
    assert_eq!(host.document_register_count(), 0);
    assert!(host.recorded_jobs().is_empty());
}

/// Test that content metadata supplies the MIME type when the caller
/// declared none.
#[tokio::test]
async fn test_content_metadata_mime_wins_over_extension() {
    let mut host = MockHost::new();
    host.add_content_entry(
        "content://docs/42",
        "scan.dat",
        Some("image/jpeg"),
        b"jpeg-ish".to_vec(),
    );
    let (printer, host) = printer_over(host);

    printer
        .print_from_path("content://docs/42", None, "Scan")
        .await
        .unwrap();

    // image/* metadata routes through the image branch.
    assert_eq!(host.image_print_count(), 1);
}

/// Test that markup rendering failures surface as RenderingFailed and
/// never reach the registry.
#[tokio::test]
async fn test_failed_render_never_registers() {
    let mut host = MockHost::new();
    host.fail_rendering("tab crashed");
    let (printer, host) = printer_over(host);

    let result = printer.print_markup("<h1>Doc</h1>", "Note").await;

    assert!(matches!(result, Err(PrintError::RenderingFailed(_))));
    assert_eq!(host.render_count(), 1);
    assert_eq!(host.document_register_count(), 0);
}

/// Test the markup happy path: rendered surface registered as a PDF
/// document.
#[tokio::test]
async fn test_markup_renders_and_registers() {
    let (printer, host) = printer_over(MockHost::new());

    printer.print_markup("<h1>Hello</h1>", "Note").await.unwrap();

    assert_eq!(host.render_count(), 1);
    match &host.recorded_jobs()[0] {
        RecordedJob::Document {
            job_name,
            display_name,
            mime_type,
            bytes,
            ..
        } => {
            assert_eq!(job_name, "Note");
            assert_eq!(display_name, "rendered.pdf");
            assert_eq!(mime_type, RENDERED_MIME);
            assert_eq!(bytes, b"<h1>Hello</h1>");
        }
        other => panic!("Expected document job, got {:?}", other),
    }
}

/// Test that a user cancellation still resolves the call successfully;
/// only the adapter records the cancelled outcome.
#[tokio::test]
async fn test_cancel_resolves_call_successfully() {
    let mut host = MockHost::new();
    host.add_file("/docs/report.pdf", b"%PDF".to_vec());
    host.cancel_before_layout();
    let (printer, host) = printer_over(host);

    printer
        .print_pdf_path("/docs/report.pdf", "Report")
        .await
        .unwrap();

    match &host.recorded_jobs()[0] {
        RecordedJob::Document {
            bytes, final_state, ..
        } => {
            assert!(bytes.is_empty());
            assert_eq!(*final_state, AdapterState::Cancelled);
        }
        other => panic!("Expected document job, got {:?}", other),
    }
}

/// Test configuration validation.
#[test]
fn test_config_validation() {
    // Zero chunk size should fail
    let result = PrinterConfigBuilder::new().copy_chunk_bytes(0).build();
    assert!(result.is_err());

    // Zero render timeout should fail
    let result = PrinterConfigBuilder::new()
        .render_timeout(Duration::ZERO)
        .build();
    assert!(result.is_err());

    // Valid config should succeed
    let result = PrinterConfigBuilder::new()
        .copy_chunk_bytes(16 * 1024)
        .render_timeout(Duration::from_secs(10))
        .strict_mime(true)
        .build();
    assert!(result.is_ok());
}

/// Test the MIME tables the resolver routes on.
#[test]
fn test_mime_tables() {
    use print_bridge::resolve::{extension_for_mime, mime_for_extension};

    assert_eq!(mime_for_extension("pdf"), Some("application/pdf"));
    assert_eq!(mime_for_extension("jpg"), Some("image/jpeg"));
    assert_eq!(mime_for_extension("jpeg"), Some("image/jpeg"));
    assert_eq!(mime_for_extension("png"), Some("image/png"));
    assert_eq!(mime_for_extension("gif"), Some("image/gif"));
    assert_eq!(mime_for_extension("docx"), None);

    assert_eq!(extension_for_mime("application/pdf"), ".pdf");
    assert_eq!(extension_for_mime("image/png"), ".png");
    assert_eq!(extension_for_mime("text/unknown"), ".tmp");
}

/// Test that the version string is stable across calls.
#[test]
fn test_version_is_stable() {
    let first = version();
    assert!(!first.is_empty());
    assert_eq!(first, version());
    assert_eq!(first, env!("CARGO_PKG_VERSION"));
}
