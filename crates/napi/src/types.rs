//! NAPI-exposed data structures.

use napi_derive::napi;
use serde_json::Value as JsonValue;

/// Options passed to the compiler constructor and the one-shot functions.
///
/// Every field falls back to the default convention when omitted.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct RouteConfig {
    /// Routes directory, relative to the app directory.
    pub routes_dir: Option<String>,
    /// Stem suffix marking route modules. An empty string accepts every module file.
    pub route_marker: Option<String>,
    /// Glob patterns for files and directories to skip.
    pub ignored_route_files: Option<Vec<String>>,
    /// Extensions (without the dot) accepted as route modules.
    pub route_module_extensions: Option<Vec<String>>,
    /// Single character introducing dynamic segments.
    pub param_prefix_char: Option<String>,
    /// Id assigned as parent of top-level routes.
    pub root_route_id: Option<String>,
}

/// One entry of the compiled manifest.
#[napi(object)]
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    /// Route id.
    pub id: String,
    /// Module path relative to the app directory.
    pub file: String,
    /// URL path relative to the parent route.
    pub path: Option<String>,
    /// Whether this is an index route.
    pub index: bool,
    /// Id of the parent route.
    pub parent_id: Option<String>,
}

/// A collision that was resolved by dropping the later files.
#[napi(object)]
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictEntry {
    /// `"route_id"` or `"route_path"`.
    pub kind: String,
    /// The colliding id or URL path.
    pub key: String,
    /// Files involved, winner first.
    pub files: Vec<String>,
    /// Human-readable report.
    pub message: String,
}

/// Output of a manifest compilation.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct FlatRoutesResult {
    /// Manifest keyed by route id.
    pub manifest: JsonValue,
    /// Manifest entries in id order.
    pub routes: Vec<RouteEntry>,
    /// Collisions reported while compiling.
    pub conflicts: Vec<ConflictEntry>,
    /// Root module path relative to the app directory, when discovered.
    pub root_file: Option<String>,
}

/// Semantic and raw segments of a route id.
#[napi(object)]
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegmentsResult {
    /// Segments with syntax resolved.
    pub segments: Vec<String>,
    /// Segments as written in the id.
    pub raw_segments: Vec<String>,
}
