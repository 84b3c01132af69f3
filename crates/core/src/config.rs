//! Compile options shared by the discovery and assembly stages.

use serde::Deserialize;

/// Default directory (relative to the app directory) holding route modules.
pub const DEFAULT_ROUTES_DIR: &str = "routes";
/// Default suffix that marks a file stem as a route module.
pub const DEFAULT_ROUTE_MARKER: &str = ".route";
/// Id used as `parentId` for top-level routes, and the root module's basename.
pub const ROOT_ROUTE_ID: &str = "root";
/// File extensions recognized as route modules.
pub const DEFAULT_ROUTE_MODULE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "md", "mdx"];
/// Character that introduces a dynamic segment.
pub const DEFAULT_PARAM_PREFIX_CHAR: char = '$';

/// Options controlling how route files are found and interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlatRoutesOptions {
    /// Routes directory, relative to the app directory.
    #[serde(alias = "routesDir")]
    pub routes_dir: String,
    /// Stem suffix identifying route modules; `None` accepts every module file.
    #[serde(alias = "routeMarker")]
    pub route_marker: Option<String>,
    /// Glob patterns for files and directories to skip.
    #[serde(alias = "ignoredRouteFiles")]
    pub ignored_route_files: Vec<String>,
    /// Extensions (without the dot) accepted as route modules.
    #[serde(alias = "routeModuleExtensions")]
    pub route_module_extensions: Vec<String>,
    /// Character that introduces dynamic and splat segments.
    #[serde(alias = "paramPrefixChar")]
    pub param_prefix_char: char,
    /// Id assigned as parent of top-level routes.
    #[serde(alias = "rootRouteId")]
    pub root_route_id: String,
}

impl Default for FlatRoutesOptions {
    fn default() -> Self {
        Self {
            routes_dir: DEFAULT_ROUTES_DIR.to_string(),
            route_marker: Some(DEFAULT_ROUTE_MARKER.to_string()),
            ignored_route_files: Vec::new(),
            route_module_extensions: DEFAULT_ROUTE_MODULE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            param_prefix_char: DEFAULT_PARAM_PREFIX_CHAR,
            root_route_id: ROOT_ROUTE_ID.to_string(),
        }
    }
}

impl FlatRoutesOptions {
    /// Creates options with the default conventions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the ignore patterns.
    pub fn with_ignored_route_files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_route_files = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the route marker; `None` treats every module file as a route.
    pub fn with_route_marker(mut self, marker: Option<&str>) -> Self {
        self.route_marker = marker.map(str::to_string);
        self
    }

    /// Sets the routes directory.
    pub fn with_routes_dir(mut self, dir: impl Into<String>) -> Self {
        self.routes_dir = dir.into();
        self
    }

    /// Sets the dynamic segment prefix.
    pub fn with_param_prefix_char(mut self, ch: char) -> Self {
        self.param_prefix_char = ch;
        self
    }

    /// Returns true if `ext` (without the dot) is a route module extension.
    pub fn is_route_module_extension(&self, ext: &str) -> bool {
        self.route_module_extensions
            .iter()
            .any(|known| known.trim_start_matches('.') == ext)
    }

    /// Strips the route marker from a file stem.
    ///
    /// Returns `None` when a marker is configured and the stem does not end
    /// with it, or when nothing is left after stripping.
    pub fn strip_route_marker<'a>(&self, stem: &'a str) -> Option<&'a str> {
        let id = match self.route_marker.as_deref() {
            Some(marker) if !marker.is_empty() => stem.strip_suffix(marker)?,
            _ => stem,
        };
        if id.is_empty() { None } else { Some(id) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_marker() {
        let options = FlatRoutesOptions::default();
        assert_eq!(options.strip_route_marker("posts.$slug.route"), Some("posts.$slug"));
        assert_eq!(options.strip_route_marker("posts.$slug"), None);
        assert_eq!(options.strip_route_marker(".route"), None);
    }

    #[test]
    fn no_marker_accepts_any_stem() {
        let options = FlatRoutesOptions::default().with_route_marker(None);
        assert_eq!(options.strip_route_marker("posts.$slug"), Some("posts.$slug"));
    }

    #[test]
    fn extensions_accept_leading_dot() {
        let mut options = FlatRoutesOptions::default();
        assert!(options.is_route_module_extension("tsx"));
        assert!(!options.is_route_module_extension("css"));
        options.route_module_extensions = vec![".vue".to_string()];
        assert!(options.is_route_module_extension("vue"));
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let options: FlatRoutesOptions = serde_json::from_str(
            r#"{ "ignoredRouteFiles": ["**/*.css"], "routeMarker": null }"#,
        )
        .unwrap();
        assert_eq!(options.ignored_route_files, vec!["**/*.css".to_string()]);
        assert_eq!(options.route_marker, None);
        assert_eq!(options.routes_dir, DEFAULT_ROUTES_DIR);
        assert_eq!(options.param_prefix_char, '$');
    }
}
