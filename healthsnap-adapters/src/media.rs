//! Content types for uploaded documents.

use std::path::Path;

/// Content type used for a document, chosen by file extension.
///
/// Scans from the camera arrive as JPEG and picked files are usually PDF;
/// anything else is sent as raw bytes.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
