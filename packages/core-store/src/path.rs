//! Colon-delimited store paths.
//!
//! A path is a non-empty sequence of keys joined by `:`. There is no escaping
//! and no validation: empty segments (from leading, trailing, or doubled
//! separators) are ordinary empty-string keys.

/// Separator between path segments.
pub const SEPARATOR: char = ':';

/// Split a path into its head key and the remaining path.
///
/// The remainder is `None` when nothing follows the head, which is also the
/// case for a single trailing separator (`"a:"` resolves locally to `"a"`).
///
/// ```rust
/// use permstore_core::path::split;
///
/// assert_eq!(split("a:b:c"), ("a", Some("b:c")));
/// assert_eq!(split("a"), ("a", None));
/// assert_eq!(split(":a"), ("", Some("a")));
/// ```
pub fn split(path: &str) -> (&str, Option<&str>) {
    match path.split_once(SEPARATOR) {
        Some((head, rest)) if !rest.is_empty() => (head, Some(rest)),
        Some((head, _)) => (head, None),
        None => (path, None),
    }
}
