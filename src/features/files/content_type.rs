//! Content-type resolution by file extension.
//!
//! Multipart clients frequently send `application/octet-stream` for
//! everything; the extension table recovers a useful MIME type in that case.

/// Extension to MIME type table, extensions lowercase
pub const EXTENSION_MIME_TYPES: &[(&str, &str)] = &[
    // Images
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    // Audio
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
    ("flac", "audio/flac"),
    ("wma", "audio/x-ms-wma"),
    // Video
    ("mp4", "video/mp4"),
    ("avi", "video/x-msvideo"),
    ("mov", "video/quicktime"),
    ("wmv", "video/x-ms-wmv"),
    ("flv", "video/x-flv"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("3gp", "video/3gpp"),
    // Documents
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    // Text
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("csv", "text/csv"),
    // Archives
    ("zip", "application/zip"),
    ("rar", "application/x-rar-compressed"),
    ("7z", "application/x-7z-compressed"),
    ("tar", "application/x-tar"),
    ("gz", "application/gzip"),
];

/// Placeholders that carry no information about the payload
const GENERIC_CONTENT_TYPES: [&str; 2] = ["application/octet-stream", "application/unknown"];

/// Resolve the content type to store for an upload.
///
/// A specific client-supplied type always wins. Otherwise the extension is
/// looked up case-insensitively; when it is missing or unknown the provided
/// value is returned unchanged, even if blank.
pub fn detect(filename: &str, provided: &str) -> String {
    if !provided.trim().is_empty() && !GENERIC_CONTENT_TYPES.contains(&provided) {
        tracing::debug!("Using provided content type: {}", provided);
        return provided.to_string();
    }

    let Some(extension) = extension_of(filename) else {
        tracing::debug!(
            "No file extension found for {}, using provided content type: {}",
            filename,
            provided
        );
        return provided.to_string();
    };

    match mime_for_extension(extension) {
        Some(mime) => {
            tracing::debug!("Detected content type {} for extension {}", mime, extension);
            mime.to_string()
        }
        None => {
            tracing::debug!(
                "Unknown extension {}, using provided content type: {}",
                extension,
                provided
            );
            provided.to_string()
        }
    }
}

/// Text after the last dot, unless the dot is the first or last character
fn extension_of(filename: &str) -> Option<&str> {
    let dot = filename.rfind('.')?;
    if dot == 0 || dot == filename.len() - 1 {
        return None;
    }
    Some(&filename[dot + 1..])
}

fn mime_for_extension(extension: &str) -> Option<&'static str> {
    EXTENSION_MIME_TYPES
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, mime)| *mime)
}

pub fn is_image(content_type: &str) -> bool {
    content_type.starts_with("image/")
}

pub fn is_video(content_type: &str) -> bool {
    content_type.starts_with("video/")
}

pub fn is_text(content_type: &str) -> bool {
    content_type.starts_with("text/")
        || matches!(
            content_type,
            "application/json" | "application/xml" | "application/javascript"
        )
}

pub fn is_pdf(content_type: &str) -> bool {
    content_type == "application/pdf"
}
