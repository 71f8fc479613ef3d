//! Request value objects for the print pipeline.
//!
//! A [`PrintRequest`] pairs a job name with a [`PrintPayload`], the enum
//! carrying exactly one kind of printable input. Requests are created by
//! the caller, consumed once by the dispatcher, then discarded; nothing
//! persists beyond a single print invocation.

use crate::host::RenderedSurface;

/// MIME type implied by the PDF path request kind.
pub const PDF_MIME: &str = "application/pdf";

/// The printable input carried by a [`PrintRequest`].
///
/// One variant per request kind; each variant holds only the payload
/// shape that kind accepts, so a request can never mix, say, raw bytes
/// with a markup string.
pub enum PrintPayload {
    /// A base64-encoded payload with an explicit MIME type.
    EncodedData {
        /// Base64 text (standard alphabet, padded).
        data: String,
        /// Declared MIME type of the decoded bytes.
        mime_type: String,
    },

    /// A filesystem path, `file://` URI, or content-reference URI.
    FilePath {
        /// The path or URI as given by the caller.
        path: String,
        /// Declared MIME type, if the caller knows it.
        mime_type: Option<String>,
    },

    /// A markup string to render off-screen before printing.
    Markup {
        /// The markup document, e.g. an HTML page.
        markup: String,
    },

    /// A path or URI known to reference a PDF document.
    PdfPath {
        /// The path or URI as given by the caller.
        path: String,
    },

    /// A caller-supplied, already-rendered surface.
    LiveSurface(RenderedSurface),
}

impl std::fmt::Debug for PrintPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrintPayload::EncodedData { data, mime_type } => f
                .debug_struct("EncodedData")
                .field("data_len", &data.len())
                .field("mime_type", mime_type)
                .finish(),
            PrintPayload::FilePath { path, mime_type } => f
                .debug_struct("FilePath")
                .field("path", path)
                .field("mime_type", mime_type)
                .finish(),
            PrintPayload::Markup { markup } => f
                .debug_struct("Markup")
                .field("markup_len", &markup.len())
                .finish(),
            PrintPayload::PdfPath { path } => {
                f.debug_struct("PdfPath").field("path", path).finish()
            }
            PrintPayload::LiveSurface(_) => f.write_str("LiveSurface(..)"),
        }
    }
}

/// One user-facing request to print a document.
///
/// # Example
///
/// ```rust
/// use print_bridge::PrintRequest;
///
/// let request = PrintRequest::from_path("/tmp/report.pdf", None, "Report");
/// assert_eq!(request.job_name(), "Report");
/// ```
#[derive(Debug)]
pub struct PrintRequest {
    payload: PrintPayload,
    job_name: String,
}

impl PrintRequest {
    /// Build a request from base64-encoded data and its MIME type.
    pub fn encoded_data(
        data: impl Into<String>,
        mime_type: impl Into<String>,
        job_name: impl Into<String>,
    ) -> Self {
        Self {
            payload: PrintPayload::EncodedData {
                data: data.into(),
                mime_type: mime_type.into(),
            },
            job_name: job_name.into(),
        }
    }

    /// Build a request from a path or URI, with an optional declared
    /// MIME type.
    pub fn from_path(
        path: impl Into<String>,
        mime_type: Option<&str>,
        job_name: impl Into<String>,
    ) -> Self {
        Self {
            payload: PrintPayload::FilePath {
                path: path.into(),
                mime_type: mime_type.map(str::to_string),
            },
            job_name: job_name.into(),
        }
    }

    /// Build a request from a markup string.
    pub fn markup(markup: impl Into<String>, job_name: impl Into<String>) -> Self {
        Self {
            payload: PrintPayload::Markup {
                markup: markup.into(),
            },
            job_name: job_name.into(),
        }
    }

    /// Build a request from a path known to reference a PDF document.
    pub fn pdf_path(path: impl Into<String>, job_name: impl Into<String>) -> Self {
        Self {
            payload: PrintPayload::PdfPath { path: path.into() },
            job_name: job_name.into(),
        }
    }

    /// Build a request from an already-rendered surface.
    pub fn live_surface(surface: RenderedSurface, job_name: impl Into<String>) -> Self {
        Self {
            payload: PrintPayload::LiveSurface(surface),
            job_name: job_name.into(),
        }
    }

    /// The user-visible job name.
    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    /// The MIME type declared by the caller, if any.
    ///
    /// PDF path requests always declare `application/pdf`; markup and
    /// live-surface requests never declare one.
    pub fn declared_mime_type(&self) -> Option<&str> {
        match &self.payload {
            PrintPayload::EncodedData { mime_type, .. } => Some(mime_type),
            PrintPayload::FilePath { mime_type, .. } => mime_type.as_deref(),
            PrintPayload::PdfPath { .. } => Some(PDF_MIME),
            PrintPayload::Markup { .. } | PrintPayload::LiveSurface(_) => None,
        }
    }

    /// The payload, borrowed.
    pub fn payload(&self) -> &PrintPayload {
        &self.payload
    }

    /// Consume the request into its parts.
    pub fn into_parts(self) -> (PrintPayload, String) {
        (self.payload, self.job_name)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Verifies constructors pair the right payload variant with the
    /// declared MIME type each kind implies.
    #[test]
    fn test_declared_mime_per_kind() {
        let req = PrintRequest::encoded_data("aGk=", "image/png", "Job");
        assert_eq!(req.declared_mime_type(), Some("image/png"));

        let req = PrintRequest::from_path("/tmp/a.bin", Some("application/pdf"), "Job");
        assert_eq!(req.declared_mime_type(), Some("application/pdf"));

        let req = PrintRequest::from_path("/tmp/a.bin", None, "Job");
        assert_eq!(req.declared_mime_type(), None);

        let req = PrintRequest::pdf_path("/tmp/a.pdf", "Job");
        assert_eq!(req.declared_mime_type(), Some(PDF_MIME));

        let req = PrintRequest::markup("<html></html>", "Job");
        assert_eq!(req.declared_mime_type(), None);
    }

    /// Verifies the job name survives construction unchanged.
    #[test]
    fn test_job_name() {
        let req = PrintRequest::markup("<p>hi</p>", "Quarterly Report");
        assert_eq!(req.job_name(), "Quarterly Report");
    }

    /// Verifies into_parts hands back the payload and name.
    #[test]
    fn test_into_parts() {
        let req = PrintRequest::pdf_path("/docs/x.pdf", "X");
        let (payload, name) = req.into_parts();
        assert_eq!(name, "X");
        match payload {
            PrintPayload::PdfPath { path } => assert_eq!(path, "/docs/x.pdf"),
            other => panic!("Expected PdfPath payload, got {:?}", other),
        }
    }

    /// Verifies Debug does not dump raw payload contents.
    #[test]
    fn test_debug_redacts_payload() {
        let req = PrintRequest::encoded_data("c2VjcmV0IGJ5dGVz", "application/pdf", "Job");
        let rendered = format!("{:?}", req);
        assert!(rendered.contains("data_len"));
        assert!(!rendered.contains("c2VjcmV0"));
    }
}
