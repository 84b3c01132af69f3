//! Conversions between core types and their NAPI counterparts.

use crate::types::{ConflictEntry, FlatRoutesResult, RouteConfig, RouteEntry, RouteSegmentsResult};
use routex_core::{CompiledRoutes, FlatRoutesOptions, RouteConflict, RouteRecord, RouteSegments};

/// Converts `RouteConfig` to `FlatRoutesOptions`, filling in defaults.
pub fn to_flat_routes_options(config: Option<RouteConfig>) -> napi::Result<FlatRoutesOptions> {
    let cfg = config.unwrap_or_default();
    let mut options = FlatRoutesOptions::default();
    if let Some(dir) = cfg.routes_dir {
        options.routes_dir = dir;
    }
    if let Some(marker) = cfg.route_marker {
        options.route_marker = if marker.is_empty() { None } else { Some(marker) };
    }
    if let Some(patterns) = cfg.ignored_route_files {
        options.ignored_route_files = patterns;
    }
    if let Some(extensions) = cfg.route_module_extensions {
        options.route_module_extensions = extensions;
    }
    if let Some(prefix) = cfg.param_prefix_char {
        options.param_prefix_char = parse_prefix_char(&prefix)?;
    }
    if let Some(root) = cfg.root_route_id {
        options.root_route_id = root;
    }
    Ok(options)
}

/// Accepts exactly one character.
pub fn parse_prefix_char(value: &str) -> napi::Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(napi::Error::from_reason(format!(
            "paramPrefixChar must be a single character, got \"{}\"",
            value
        ))),
    }
}

fn convert_record(record: &RouteRecord) -> RouteEntry {
    RouteEntry {
        id: record.id.clone(),
        file: record.file.clone(),
        path: record.path.clone(),
        index: record.index,
        parent_id: record.parent_id.clone(),
    }
}

fn convert_conflict(conflict: &RouteConflict) -> ConflictEntry {
    ConflictEntry {
        kind: conflict.kind().to_string(),
        key: conflict.key().to_string(),
        files: conflict.files().to_vec(),
        message: conflict.to_string(),
    }
}

/// Converts a compilation into the shape returned to JavaScript.
pub fn convert_compiled(compiled: &CompiledRoutes) -> napi::Result<FlatRoutesResult> {
    let manifest = serde_json::to_value(&compiled.manifest).map_err(|e| {
        napi::Error::from_reason(format!("Failed to serialize route manifest: {}", e))
    })?;
    Ok(FlatRoutesResult {
        manifest,
        routes: compiled.manifest.iter().map(convert_record).collect(),
        conflicts: compiled
            .diagnostics
            .conflicts
            .iter()
            .map(convert_conflict)
            .collect(),
        root_file: compiled.root_file.clone(),
    })
}

/// Converts tokenized segments.
pub fn convert_segments(parsed: RouteSegments) -> RouteSegmentsResult {
    RouteSegmentsResult {
        segments: parsed.segments,
        raw_segments: parsed.raw_segments,
    }
}

/// Maps any displayable core error onto a NAPI error.
pub fn to_napi_error(err: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(err.to_string())
}
