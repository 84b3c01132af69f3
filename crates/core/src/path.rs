//! URL path assembly from parsed route segments.

use crate::segments::RouteSegments;

/// Build the URL path contributed by a route.
///
/// Index routes drop their final segment. Segments whose semantic and raw
/// forms both start with `_` are pathless layouts and are skipped; a
/// trailing `_` on both forms is removed so the segment does not nest
/// under its prefix. Returns `None` when no segment survives.
///
/// ```
/// use routex_core::{create_route_path, get_route_segments};
///
/// let parsed = get_route_segments("_auth.login").unwrap();
/// assert_eq!(create_route_path(&parsed, false).as_deref(), Some("login"));
/// ```
pub fn create_route_path(parsed: &RouteSegments, is_index: bool) -> Option<String> {
    create_route_path_from(&parsed.segments, &parsed.raw_segments, is_index)
}

/// Same as [`create_route_path`] for separately held segment arrays.
pub fn create_route_path_from<S: AsRef<str>>(
    segments: &[S],
    raw_segments: &[S],
    is_index: bool,
) -> Option<String> {
    let count = if is_index {
        segments.len().saturating_sub(1)
    } else {
        segments.len()
    };

    let mut result: Vec<&str> = Vec::with_capacity(count);
    for (segment, raw) in segments.iter().zip(raw_segments).take(count) {
        let (segment, raw) = (segment.as_ref(), raw.as_ref());
        if segment.starts_with('_') && raw.starts_with('_') {
            continue;
        }
        if segment.ends_with('_') && raw.ends_with('_') {
            result.push(&segment[..segment.len() - 1]);
        } else {
            result.push(segment);
        }
    }

    if result.is_empty() {
        None
    } else {
        Some(result.join("/"))
    }
}
