#![deny(missing_docs)]
//! routex core: compiles flat route file names into a nested route manifest.

/// Compile options and naming conventions.
pub mod config;
/// Route module discovery on disk.
pub mod discovery;
/// Fatal errors and reported collisions.
pub mod error;
/// Manifest renderings (JSX and JSON trees).
pub mod format;
/// Manifest assembly and conflict resolution.
pub mod manifest;
/// URL path assembly from segments.
pub mod path;
/// Route id tokenizer.
pub mod segments;
/// Prefix trie used for parent lookup.
pub mod trie;

pub use config::{
    DEFAULT_PARAM_PREFIX_CHAR, DEFAULT_ROUTE_MARKER, DEFAULT_ROUTE_MODULE_EXTENSIONS,
    DEFAULT_ROUTES_DIR, FlatRoutesOptions, ROOT_ROUTE_ID,
};
pub use discovery::{IgnoreMatcher, find_root_route, find_route_modules, route_id_for_file};
pub use error::{CompileDiagnostics, RouteConflict, RouteError};
pub use format::{RoutesFormat, UnknownRoutesFormat, format_routes};
pub use manifest::{
    CompiledRoutes, RouteManifest, RouteRecord, absolutize_files, compile_manifest, flat_routes,
    flat_routes_universal,
};
pub use path::{create_route_path, create_route_path_from};
pub use segments::{
    CharContext, RouteSegments, SegmentAction, SegmentState, SegmentStep, advance_segment_state,
    get_route_segments, get_route_segments_with,
};
pub use trie::PrefixLookupTrie;
