#![deny(missing_docs)]
//! Node.js bindings that surface routex's Rust implementation.

use napi_derive::napi;
use routex_core::FlatRoutesOptions;

/// Batch processing types.
pub mod batch;
/// The stateful compiler.
pub mod compiler;
/// Core to NAPI conversions.
pub mod convert;
/// NAPI-exposed data structures.
pub mod types;

pub use batch::*;
pub use compiler::{RouteCompiler, create_route_compiler};
pub use types::*;

use compiler::{compile_directory, compile_file_list, render};
use convert::{convert_compiled, convert_segments, parse_prefix_char, to_flat_routes_options};

/// Discovers route modules under `appDirectory` and compiles the manifest.
#[napi(js_name = "flatRoutes")]
pub fn flat_routes_napi(
    app_directory: String,
    config: Option<RouteConfig>,
) -> napi::Result<FlatRoutesResult> {
    let options = to_flat_routes_options(config)?;
    let compiled = compile_directory(&app_directory, &options)?;
    convert_compiled(&compiled)
}

/// Compiles the manifest from an explicit, ordered list of route module files.
///
/// Files may be absolute or relative to `appDirectory`. Nothing is read from disk.
#[napi(js_name = "flatRoutesFromFiles")]
pub fn flat_routes_from_files_napi(
    app_directory: String,
    files: Vec<String>,
    config: Option<RouteConfig>,
) -> napi::Result<FlatRoutesResult> {
    let options = to_flat_routes_options(config)?;
    let compiled = compile_file_list(&app_directory, &files, &options)?;
    convert_compiled(&compiled)
}

/// Splits a route id into semantic and raw segments.
#[napi(js_name = "getRouteSegments")]
pub fn get_route_segments_napi(
    route_id: String,
    param_prefix_char: Option<String>,
) -> napi::Result<RouteSegmentsResult> {
    let prefix = match param_prefix_char {
        Some(value) => parse_prefix_char(&value)?,
        None => FlatRoutesOptions::default().param_prefix_char,
    };
    routex_core::get_route_segments_with(&route_id, prefix)
        .map(convert_segments)
        .map_err(convert::to_napi_error)
}

/// Builds a URL path from co-indexed segments. Returns `undefined` for an empty path.
#[napi(js_name = "createRoutePath")]
pub fn create_route_path_napi(
    segments: Vec<String>,
    raw_segments: Vec<String>,
    is_index: Option<bool>,
) -> napi::Result<Option<String>> {
    if segments.len() != raw_segments.len() {
        return Err(napi::Error::from_reason(format!(
            "segments and rawSegments must have the same length ({} != {})",
            segments.len(),
            raw_segments.len()
        )));
    }
    Ok(routex_core::create_route_path_from(
        &segments,
        &raw_segments,
        is_index.unwrap_or(false),
    ))
}

/// Compiles `appDirectory` and renders the route tree as `"jsx"` (default) or `"json"`.
#[napi(js_name = "formatRoutes")]
pub fn format_routes_napi(
    app_directory: String,
    format: Option<String>,
    config: Option<RouteConfig>,
) -> napi::Result<String> {
    let options = to_flat_routes_options(config)?;
    let compiled = compile_directory(&app_directory, &options)?;
    render(&compiled, &options, format.as_deref())
}
