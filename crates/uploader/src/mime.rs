//! MIME type resolution for uploaded files.

/// Fallback for files whose type is neither given nor guessable.
pub const DEFAULT_MIMETYPE: &str = "application/octet-stream";

/// Resolve the MIME type for a file.
///
/// An explicit, non-empty mimetype always wins. Otherwise the type is guessed
/// from the extension of `name`, falling back to [`DEFAULT_MIMETYPE`].
///
/// ```
/// use stash_uploader::mime::resolve;
/// assert_eq!(resolve(Some("text/csv"), "data.json"), "text/csv");
/// assert_eq!(resolve(None, "data.json"), "application/json");
/// assert_eq!(resolve(Some(""), "blob"), "application/octet-stream");
/// ```
pub fn resolve(explicit: Option<&str>, name: &str) -> String {
    if let Some(mimetype) = explicit.filter(|m| !m.is_empty()) {
        return mimetype.to_string();
    }
    mime_guess::from_path(name).first_raw().unwrap_or(DEFAULT_MIMETYPE).to_string()
}
