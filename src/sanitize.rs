//! Path segment sanitization for camera directory names

/// Maximum length (in characters) of a sanitized path segment
pub const MAX_SEGMENT_LEN: usize = 50;

/// Turn arbitrary text into a string usable as a single path segment.
///
/// Separators and characters reserved on common filesystems become `_`,
/// everything else outside `[A-Za-z0-9_.-]` is dropped, and the result is
/// capped at [`MAX_SEGMENT_LEN`] characters.
pub fn sanitize_filename(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            '<' | '>' | ':' | '"' | '|' | '?' | '*' => '_',
            other => other,
        })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .take(MAX_SEGMENT_LEN)
        .collect()
}
