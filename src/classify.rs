//! Payload classification: choosing the printable representation.
//!
//! Classification is deliberately simple. The only subtlety is ordering:
//! for path-based payloads the effective MIME type may come from the
//! resolver (extension table or content metadata), so final
//! classification runs after resolution, on the resolved type.

use crate::request::PrintPayload;

/// The printable representation a payload maps to.
///
/// Each category corresponds to one platform printing primitive: the
/// single-image helper, the generic document provider, the off-screen
/// markup renderer, or a caller-supplied rendered surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// A raster image, printed through the platform's image helper.
    Image,
    /// A generic byte document (PDF or unrecognized binary), printed
    /// through a document-provider adapter.
    Document,
    /// A markup string, rendered off-screen before printing.
    Markup,
    /// An already-rendered surface supplied by the caller.
    LiveSurface,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Image => "image",
            Category::Document => "document",
            Category::Markup => "markup",
            Category::LiveSurface => "live-surface",
        };
        f.write_str(name)
    }
}

/// Classify a payload, given the effective MIME type settled by the
/// resolver (when the payload has one).
///
/// - Any `image/*` type wins, regardless of the payload kind.
/// - Markup and live-surface payloads map to their own categories.
/// - Everything else is a generic document.
pub fn classify(payload: &PrintPayload, effective_mime: Option<&str>) -> Category {
    if effective_mime.is_some_and(|m| m.starts_with("image/")) {
        return Category::Image;
    }

    match payload {
        PrintPayload::Markup { .. } => Category::Markup,
        PrintPayload::LiveSurface(_) => Category::LiveSurface,
        PrintPayload::EncodedData { .. }
        | PrintPayload::FilePath { .. }
        | PrintPayload::PdfPath { .. } => Category::Document,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::PrintRequest;

    /// Verifies image MIME types always take the image branch, never
    /// falling through to the generic document branch.
    #[test]
    fn test_image_mime_takes_image_branch() {
        let request = PrintRequest::encoded_data("aGk=", "image/png", "Job");
        assert_eq!(
            classify(request.payload(), Some("image/png")),
            Category::Image
        );

        let request = PrintRequest::from_path("/p/photo.jpg", None, "Job");
        assert_eq!(
            classify(request.payload(), Some("image/jpeg")),
            Category::Image
        );
    }

    /// Verifies non-image byte payloads are generic documents.
    #[test]
    fn test_document_fallthrough() {
        let request = PrintRequest::encoded_data("aGk=", "application/pdf", "Job");
        assert_eq!(
            classify(request.payload(), Some("application/pdf")),
            Category::Document
        );

        let request = PrintRequest::from_path("/p/data.xyz", None, "Job");
        assert_eq!(
            classify(request.payload(), Some("application/octet-stream")),
            Category::Document
        );
    }

    /// Verifies markup payloads map to the markup category.
    #[test]
    fn test_markup_category() {
        let request = PrintRequest::markup("<html></html>", "Note");
        assert_eq!(classify(request.payload(), None), Category::Markup);
    }

    /// Verifies category display names used in log lines.
    #[test]
    fn test_category_display() {
        assert_eq!(Category::Image.to_string(), "image");
        assert_eq!(Category::Document.to_string(), "document");
        assert_eq!(Category::Markup.to_string(), "markup");
        assert_eq!(Category::LiveSurface.to_string(), "live-surface");
    }
}
