//! WebAssembly bindings for bundlers that cannot load native addons.
//!
//! Discovery needs a file system, so every entry point here takes an
//! explicit file list.

use routex_core::{
    CompiledRoutes, FlatRoutesOptions, RouteConflict, RouteManifest, RoutesFormat,
    absolutize_files, flat_routes_universal,
};
use serde::Serialize;
use std::path::Path;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

fn parse_config(config: JsValue) -> Result<FlatRoutesOptions, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(FlatRoutesOptions::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid route config: {}", e)))
}

fn single_char(value: &str) -> Result<char, JsError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(JsError::new(&format!(
            "paramPrefixChar must be a single character, got \"{}\"",
            value
        ))),
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&e.to_string()))
}

fn compile(
    app_directory: &str,
    files: &[String],
    config: JsValue,
) -> Result<(CompiledRoutes, FlatRoutesOptions), JsError> {
    let options = parse_config(config)?;
    let app = Path::new(app_directory);
    let files = absolutize_files(app, files);
    let compiled = flat_routes_universal(app, &files, &options)?;
    Ok((compiled, options))
}

/// A resolved collision.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictEntry<'a> {
    /// `"route_id"` or `"route_path"`.
    pub kind: &'static str,
    /// The colliding id or URL path.
    pub key: &'a str,
    /// Files involved, winner first.
    pub files: &'a [String],
    /// Human-readable report.
    pub message: String,
}

impl<'a> From<&'a RouteConflict> for ConflictEntry<'a> {
    fn from(conflict: &'a RouteConflict) -> Self {
        Self {
            kind: conflict.kind(),
            key: conflict.key(),
            files: conflict.files(),
            message: conflict.to_string(),
        }
    }
}

/// Result of `flatRoutesFromFiles`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRoutesResult<'a> {
    /// Manifest keyed by route id.
    pub manifest: &'a RouteManifest,
    /// Collisions reported while compiling.
    pub conflicts: Vec<ConflictEntry<'a>>,
}

/// Semantic and raw segments of a route id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSegmentsResult {
    /// Segments with syntax resolved.
    pub segments: Vec<String>,
    /// Segments as written in the id.
    pub raw_segments: Vec<String>,
}

/// Compiles a manifest from an ordered list of route module files.
///
/// `files` may be absolute or relative to `appDirectory`.
#[wasm_bindgen(js_name = flatRoutesFromFiles)]
pub fn flat_routes_from_files(
    app_directory: &str,
    files: Vec<String>,
    config: JsValue,
) -> Result<JsValue, JsError> {
    let (compiled, _) = compile(app_directory, &files, config)?;
    to_js(&FlatRoutesResult {
        manifest: &compiled.manifest,
        conflicts: compiled
            .diagnostics
            .conflicts
            .iter()
            .map(ConflictEntry::from)
            .collect(),
    })
}

/// Splits a route id into semantic and raw segments.
#[wasm_bindgen(js_name = getRouteSegments)]
pub fn get_route_segments(
    route_id: &str,
    param_prefix_char: Option<String>,
) -> Result<JsValue, JsError> {
    let prefix = match param_prefix_char.as_deref() {
        Some(value) => single_char(value)?,
        None => routex_core::DEFAULT_PARAM_PREFIX_CHAR,
    };
    let parsed = routex_core::get_route_segments_with(route_id, prefix)?;
    to_js(&RouteSegmentsResult {
        segments: parsed.segments,
        raw_segments: parsed.raw_segments,
    })
}

/// Builds a URL path from co-indexed segments; `undefined` when empty.
#[wasm_bindgen(js_name = createRoutePath)]
pub fn create_route_path(
    segments: Vec<String>,
    raw_segments: Vec<String>,
    is_index: bool,
) -> Result<Option<String>, JsError> {
    if segments.len() != raw_segments.len() {
        return Err(JsError::new(
            "segments and rawSegments must have the same length",
        ));
    }
    Ok(routex_core::create_route_path_from(
        &segments,
        &raw_segments,
        is_index,
    ))
}

/// Compiles `files` and renders the route tree as `"jsx"` (default) or `"json"`.
#[wasm_bindgen(js_name = formatRoutes)]
pub fn format_routes(
    app_directory: &str,
    files: Vec<String>,
    config: JsValue,
    format: Option<String>,
) -> Result<String, JsError> {
    let format = match format.as_deref() {
        Some(name) => name.parse::<RoutesFormat>()?,
        None => RoutesFormat::default(),
    };
    let (compiled, options) = compile(app_directory, &files, config)?;
    Ok(routex_core::format_routes(
        &compiled,
        &options.root_route_id,
        format,
    )?)
}
