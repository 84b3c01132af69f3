//! Human- and tool-readable renderings of a compiled manifest.

use crate::manifest::{CompiledRoutes, RouteManifest, RouteRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::str::FromStr;
use thiserror::Error;

/// Output format for [`format_routes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutesFormat {
    /// Nested `<Route>` elements.
    #[default]
    Jsx,
    /// Nested JSON array.
    Json,
}

/// Returned when parsing an unknown format name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown routes format \"{0}\", expected \"jsx\" or \"json\"")]
pub struct UnknownRoutesFormat(pub String);

impl FromStr for RoutesFormat {
    type Err = UnknownRoutesFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jsx" => Ok(RoutesFormat::Jsx),
            "json" => Ok(RoutesFormat::Json),
            _ => Err(UnknownRoutesFormat(s.to_string())),
        }
    }
}

/// Renders the route tree below `root_route_id`.
///
/// When the root module file is known it is rendered as the outermost route.
pub fn format_routes(
    compiled: &CompiledRoutes,
    root_route_id: &str,
    format: RoutesFormat,
) -> Result<String, serde_json::Error> {
    match format {
        RoutesFormat::Jsx => Ok(format_routes_as_jsx(compiled, root_route_id)),
        RoutesFormat::Json => format_routes_as_json(compiled, root_route_id),
    }
}

/// Renders routes as a `<Routes>` JSX tree.
pub fn format_routes_as_jsx(compiled: &CompiledRoutes, root_route_id: &str) -> String {
    let tree = RouteTree::new(&compiled.manifest);
    let mut output = String::from("<Routes>");
    match compiled.root_file.as_deref() {
        Some(root_file) => {
            let _ = write!(output, "\n  <Route file={}", quote(root_file));
            close_jsx_element(&mut output, &tree, root_route_id, 1);
        }
        None => write_jsx_children(&mut output, &tree, root_route_id, 1),
    }
    output.push_str("\n</Routes>");
    output
}

fn write_jsx_children(output: &mut String, tree: &RouteTree<'_>, parent_id: &str, level: usize) {
    let indent = " ".repeat(level * 2);
    for route in tree.children(parent_id) {
        output.push('\n');
        output.push_str(&indent);
        output.push_str("<Route");
        if let Some(path) = route.path.as_deref() {
            let _ = write!(output, " path={}", quote(path));
        }
        if route.index {
            output.push_str(" index");
        }
        let _ = write!(output, " file={}", quote(&route.file));
        close_jsx_element(output, tree, &route.id, level);
    }
}

/// Ends an opened `<Route` tag at `level`, nesting the children of `id`.
fn close_jsx_element(output: &mut String, tree: &RouteTree<'_>, id: &str, level: usize) {
    if !tree.has_children(id) {
        output.push_str(" />");
        return;
    }
    output.push('>');
    write_jsx_children(output, tree, id, level + 1);
    output.push('\n');
    output.push_str(&" ".repeat(level * 2));
    output.push_str("</Route>");
}

#[derive(Debug, Serialize)]
struct RouteNode<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    index: bool,
    file: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<RouteNode<'a>>,
}

/// Renders routes as a pretty-printed nested JSON array.
pub fn format_routes_as_json(
    compiled: &CompiledRoutes,
    root_route_id: &str,
) -> Result<String, serde_json::Error> {
    let tree = RouteTree::new(&compiled.manifest);
    let nodes = json_children(&tree, root_route_id);
    match compiled.root_file.as_deref() {
        Some(root_file) => serde_json::to_string_pretty(&[RouteNode {
            id: root_route_id,
            path: None,
            index: false,
            file: root_file,
            children: nodes,
        }]),
        None => serde_json::to_string_pretty(&nodes),
    }
}

fn json_children<'a>(tree: &RouteTree<'a>, parent_id: &str) -> Vec<RouteNode<'a>> {
    tree.children(parent_id)
        .map(|route| RouteNode {
            id: &route.id,
            path: route.path.as_deref(),
            index: route.index,
            file: &route.file,
            children: json_children(tree, &route.id),
        })
        .collect()
}

/// Child lookup built once per render.
struct RouteTree<'a> {
    manifest: &'a RouteManifest,
    children: BTreeMap<&'a str, Vec<&'a str>>,
}

impl<'a> RouteTree<'a> {
    fn new(manifest: &'a RouteManifest) -> Self {
        let mut children = manifest.children_index();
        // A route is never rendered inside itself.
        for (parent, ids) in children.iter_mut() {
            ids.retain(|id| id != parent);
        }
        Self { manifest, children }
    }

    fn has_children(&self, parent_id: &str) -> bool {
        self.children.get(parent_id).is_some_and(|ids| !ids.is_empty())
    }

    fn children(&self, parent_id: &str) -> impl Iterator<Item = &'a RouteRecord> {
        self.children
            .get(parent_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.manifest.get(id))
    }
}

fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}
