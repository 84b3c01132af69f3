//! Route manifest assembly.
//!
//! Turns a list of route module files into a manifest keyed by route id,
//! nesting each route under the longest other route id that prefixes it at
//! a `.` or `/` boundary. Duplicate ids and duplicate URL paths are reported
//! and resolved by keeping the first route.

use crate::config::FlatRoutesOptions;
use crate::discovery::{find_root_route, find_route_modules, route_id_for_file, to_posix_relative};
use crate::error::{CompileDiagnostics, RouteConflict, RouteError};
use crate::path::create_route_path;
use crate::segments::get_route_segments_with;
use crate::trie::PrefixLookupTrie;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

const INDEX_ROUTE_SUFFIX: &str = "_index";
const INDEX_CONFLICT_SUFFIX: &str = "?index";

/// A single route in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    /// Route module path relative to the app directory, `/`-separated.
    pub file: String,
    /// Route id.
    pub id: String,
    /// URL path relative to the parent route; absent for layout routes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Whether this is the index route of its parent.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub index: bool,
    /// Id of the enclosing route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Routes keyed by id, in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteManifest {
    routes: BTreeMap<String, RouteRecord>,
}

impl RouteManifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a route by id.
    pub fn get(&self, id: &str) -> Option<&RouteRecord> {
        self.routes.get(id)
    }

    /// True if the manifest has a route with this id.
    pub fn contains(&self, id: &str) -> bool {
        self.routes.contains_key(id)
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when the manifest has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteRecord> {
        self.routes.values()
    }

    /// Direct children of `parent_id`, in id order.
    pub fn children_of(&self, parent_id: &str) -> Vec<&RouteRecord> {
        self.routes
            .values()
            .filter(|route| route.parent_id.as_deref() == Some(parent_id))
            .collect()
    }

    /// Parent id to child ids, both in id order.
    pub fn children_index(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut index: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for route in self.routes.values() {
            if let Some(parent) = route.parent_id.as_deref() {
                index.entry(parent).or_default().push(&route.id);
            }
        }
        index
    }

    /// Serializes the manifest as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a RouteManifest {
    type Item = &'a RouteRecord;
    type IntoIter = std::collections::btree_map::Values<'a, String, RouteRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.values()
    }
}

/// Output of a compile pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledRoutes {
    /// The route manifest.
    pub manifest: RouteManifest,
    /// Collisions found while building the manifest.
    pub diagnostics: CompileDiagnostics,
    /// Root route module relative to the app directory, when discovered.
    pub root_file: Option<String>,
}

/// Discovers route modules under `app_directory` and compiles the manifest.
///
/// Fails if the app directory has no root route module, the routes
/// directory is missing or unreadable, an ignore pattern is invalid, or a
/// route id contains a reserved character.
pub fn flat_routes(
    app_directory: &Path,
    options: &FlatRoutesOptions,
) -> Result<CompiledRoutes, RouteError> {
    let root = find_root_route(app_directory, options)?;
    let files = find_route_modules(app_directory, options)?;
    let mut compiled = flat_routes_universal(app_directory, &files, options)?;
    compiled.root_file = Some(to_posix_relative(app_directory, &root));
    Ok(compiled)
}

/// Compiles the manifest from an explicit list of route module files.
///
/// Files may be absolute or relative to `app_directory`; their order
/// decides which file wins a collision. No file-system access happens here.
pub fn flat_routes_universal<P: AsRef<Path>>(
    app_directory: &Path,
    files: &[P],
    options: &FlatRoutesOptions,
) -> Result<CompiledRoutes, RouteError> {
    let mut diagnostics = CompileDiagnostics::new();
    let routes = claim_route_ids(app_directory, files, options, &mut diagnostics)?;
    let mut manifest = build_records(routes, options)?;
    resolve_paths(&mut manifest, options, &mut diagnostics);

    for conflict in &diagnostics.conflicts {
        log::warn!("{}", conflict);
    }

    Ok(CompiledRoutes {
        manifest: RouteManifest {
            routes: manifest.records.into_iter().collect(),
        },
        diagnostics,
        root_file: None,
    })
}

/// `(route_id, relative_file)` pairs, first claimant per id.
fn claim_route_ids<P: AsRef<Path>>(
    app_directory: &Path,
    files: &[P],
    options: &FlatRoutesOptions,
    diagnostics: &mut CompileDiagnostics,
) -> Result<Vec<(String, String)>, RouteError> {
    let mut claimed: Vec<(String, String)> = Vec::with_capacity(files.len());
    let mut owner: HashMap<String, usize> = HashMap::new();
    let mut id_conflicts: Vec<RouteConflict> = Vec::new();
    let mut conflict_index: HashMap<String, usize> = HashMap::new();

    for file in files {
        let file = file.as_ref();
        let Some(route_id) = route_id_for_file(file, options) else {
            log::debug!("skipping non-route file {}", file.display());
            continue;
        };
        let relative = to_posix_relative(app_directory, file);
        if route_id == options.root_route_id {
            return Err(RouteError::RootRouteIdTaken {
                route_id,
                file: relative,
            });
        }

        match owner.get(&route_id) {
            Some(&winner) => {
                let slot = *conflict_index.entry(route_id.clone()).or_insert_with(|| {
                    id_conflicts.push(RouteConflict::RouteIdCollision {
                        route_id: route_id.clone(),
                        files: vec![claimed[winner].1.clone()],
                    });
                    id_conflicts.len() - 1
                });
                id_conflicts[slot].push_file(relative);
            }
            None => {
                owner.insert(route_id.clone(), claimed.len());
                claimed.push((route_id, relative));
            }
        }
    }

    for conflict in id_conflicts {
        diagnostics.add_conflict(conflict);
    }
    Ok(claimed)
}

/// Records under construction, plus the longest-first processing order.
struct WorkingManifest {
    records: HashMap<String, RouteRecord>,
    order: Vec<String>,
}

fn build_records(
    mut routes: Vec<(String, String)>,
    options: &FlatRoutesOptions,
) -> Result<WorkingManifest, RouteError> {
    // Children must be seen before their ancestors for the trie lookup.
    routes.sort_by(|(a, _), (b, _)| b.chars().count().cmp(&a.chars().count()));

    let mut records: HashMap<String, RouteRecord> = HashMap::with_capacity(routes.len());
    let mut order = Vec::with_capacity(routes.len());
    let mut lookup = PrefixLookupTrie::new();

    for (route_id, file) in routes {
        let index = route_id.ends_with(INDEX_ROUTE_SUFFIX);
        let parsed = get_route_segments_with(&route_id, options.param_prefix_char)?;
        let path = create_route_path(&parsed, index);
        log::debug!("route {} -> {:?} ({})", route_id, path, file);

        let children = lookup.find_and_remove(&route_id, |candidate| {
            matches!(candidate[route_id.len()..].chars().next(), Some('.' | '/'))
        });
        lookup.add(&route_id);
        for child in children {
            if let Some(record) = records.get_mut(&child) {
                record.parent_id = Some(route_id.clone());
            }
        }

        records.insert(
            route_id.clone(),
            RouteRecord {
                file,
                id: route_id.clone(),
                path,
                index,
                parent_id: None,
            },
        );
        order.push(route_id);
    }

    Ok(WorkingManifest { records, order })
}

fn resolve_paths(
    manifest: &mut WorkingManifest,
    options: &FlatRoutesOptions,
    diagnostics: &mut CompileDiagnostics,
) {
    let mut winners: HashMap<String, String> = HashMap::new();
    let mut path_conflicts: Vec<RouteConflict> = Vec::new();
    let mut conflict_index: HashMap<String, usize> = HashMap::new();
    let mut losers: HashSet<String> = HashSet::new();

    for route_id in &manifest.order {
        // Parents are shorter and come later in `order`, so their paths
        // are still absolute here.
        let parent_path = manifest
            .records
            .get(route_id)
            .and_then(|route| route.parent_id.as_ref())
            .and_then(|parent| manifest.records.get(parent))
            .and_then(|parent| parent.path.clone());

        let Some(route) = manifest.records.get_mut(route_id) else {
            continue;
        };
        let original_path = route.path.clone().unwrap_or_default();
        if let (Some(parent_path), Some(path)) = (parent_path, route.path.as_deref()) {
            route.path = relative_to_parent(path, &parent_path);
        }
        if route.parent_id.is_none() {
            route.parent_id = Some(options.root_route_id.clone());
        }

        if is_pathless_layout(route_id) {
            continue;
        }

        let conflict_key = if route.index {
            format!("{}{}", original_path, INDEX_CONFLICT_SUFFIX)
        } else {
            original_path.clone()
        };
        match winners.get(&conflict_key) {
            Some(winner_file) if !original_path.is_empty() || route.index => {
                let slot = *conflict_index
                    .entry(conflict_key.clone())
                    .or_insert_with(|| {
                        path_conflicts.push(RouteConflict::RoutePathCollision {
                            path: original_path.clone(),
                            files: vec![winner_file.clone()],
                        });
                        path_conflicts.len() - 1
                    });
                path_conflicts[slot].push_file(route.file.clone());
                losers.insert(route_id.clone());
            }
            Some(_) => {}
            None => {
                winners.insert(conflict_key, route.file.clone());
            }
        }
    }

    for loser in &losers {
        manifest.records.remove(loser);
    }
    manifest.order.retain(|id| !losers.contains(id));
    for conflict in path_conflicts {
        diagnostics.add_conflict(conflict);
    }
}

/// Strips the parent's path and one leading and trailing `/`.
fn relative_to_parent(path: &str, parent_path: &str) -> Option<String> {
    let rest = path.get(parent_path.len()..).unwrap_or(path);
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

/// Last id segment starts with `_` and is not the index marker.
fn is_pathless_layout(route_id: &str) -> bool {
    route_id
        .rsplit(['.', '/'])
        .next()
        .is_some_and(|last| last.starts_with('_') && last != INDEX_ROUTE_SUFFIX)
}

/// Compiles an app directory and returns only the manifest.
pub fn compile_manifest(
    app_directory: impl AsRef<Path>,
    options: &FlatRoutesOptions,
) -> Result<RouteManifest, RouteError> {
    flat_routes(app_directory.as_ref(), options).map(|compiled| compiled.manifest)
}

/// Resolves `files` against `app_directory` when they are relative.
pub fn absolutize_files<S: AsRef<str>>(app_directory: &Path, files: &[S]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|file| {
            let path = Path::new(file.as_ref());
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                app_directory.join(path)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(files: &[&str]) -> CompiledRoutes {
        let app = Path::new("/app");
        let files = absolutize_files(app, files);
        flat_routes_universal(app, &files, &FlatRoutesOptions::default()).unwrap()
    }

    fn route<'a>(compiled: &'a CompiledRoutes, id: &str) -> &'a RouteRecord {
        compiled
            .manifest
            .get(id)
            .unwrap_or_else(|| panic!("missing route {id}"))
    }

    #[test]
    fn infers_parents_at_separator_boundaries() {
        let compiled = compile(&[
            "routes/posts.route.tsx",
            "routes/posts.$id.route.tsx",
            "routes/posts.$id.edit.route.tsx",
            "routes/post-drafts.route.tsx",
        ]);

        assert_eq!(route(&compiled, "posts.$id").parent_id.as_deref(), Some("posts"));
        assert_eq!(
            route(&compiled, "posts.$id.edit").parent_id.as_deref(),
            Some("posts.$id")
        );
        assert_eq!(route(&compiled, "posts").parent_id.as_deref(), Some("root"));
        assert_eq!(route(&compiled, "post-drafts").parent_id.as_deref(), Some("root"));
        assert!(!compiled.diagnostics.has_conflicts());
    }

    #[test]
    fn child_paths_are_relative_to_parent() {
        let compiled = compile(&[
            "routes/posts.route.tsx",
            "routes/posts.$id.route.tsx",
            "routes/posts.$id.edit.route.tsx",
            "routes/posts._index.route.tsx",
        ]);

        assert_eq!(route(&compiled, "posts").path.as_deref(), Some("posts"));
        assert_eq!(route(&compiled, "posts.$id").path.as_deref(), Some(":id"));
        assert_eq!(route(&compiled, "posts.$id.edit").path.as_deref(), Some("edit"));

        let index = route(&compiled, "posts._index");
        assert!(index.index);
        assert_eq!(index.path, None);
        assert_eq!(index.parent_id.as_deref(), Some("posts"));
    }

    #[test]
    fn ancestor_is_skipped_when_intermediate_missing() {
        let compiled = compile(&["routes/a.route.tsx", "routes/a.b.c.route.tsx"]);
        let child = route(&compiled, "a.b.c");
        assert_eq!(child.parent_id.as_deref(), Some("a"));
        assert_eq!(child.path.as_deref(), Some("b/c"));
    }

    #[test]
    fn pathless_layouts_nest_without_path() {
        let compiled = compile(&[
            "routes/_auth.route.tsx",
            "routes/_auth.login.route.tsx",
            "routes/_auth.signup.route.tsx",
        ]);
        let layout = route(&compiled, "_auth");
        assert_eq!(layout.path, None);
        assert_eq!(layout.parent_id.as_deref(), Some("root"));

        let login = route(&compiled, "_auth.login");
        assert_eq!(login.parent_id.as_deref(), Some("_auth"));
        assert_eq!(login.path.as_deref(), Some("login"));
    }

    #[test]
    fn trailing_underscore_escapes_nesting() {
        let compiled = compile(&["routes/posts.route.tsx", "routes/posts_.$id.edit.route.tsx"]);
        let edit = route(&compiled, "posts_.$id.edit");
        assert_eq!(edit.parent_id.as_deref(), Some("root"));
        assert_eq!(edit.path.as_deref(), Some("posts/:id/edit"));
    }

    #[test]
    fn duplicate_path_keeps_first_and_reports() {
        let compiled = compile(&[
            "routes/blog.route.tsx",
            "routes/(blog).route.tsx",
            "routes/[blog].route.tsx",
        ]);

        // longer ids are assembled first, so `[blog]` claims "blog" before `blog`
        assert!(compiled.manifest.contains("[blog]"));
        assert!(compiled.manifest.contains("(blog)"));
        assert!(!compiled.manifest.contains("blog"));

        let conflicts: Vec<_> = compiled.diagnostics.route_path_conflicts().collect();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].key(), "blog");
        assert_eq!(
            conflicts[0].files(),
            ["routes/[blog].route.tsx", "routes/blog.route.tsx"]
        );
    }

    #[test]
    fn index_and_layout_share_a_path() {
        let compiled = compile(&["routes/blog.route.tsx", "routes/blog._index.route.tsx"]);
        assert_eq!(compiled.manifest.len(), 2);
        assert!(!compiled.diagnostics.has_conflicts());
    }

    #[test]
    fn two_index_routes_for_same_path_conflict() {
        let compiled = compile(&["routes/_index.route.tsx", "routes/_landing._index.route.tsx"]);
        assert_eq!(compiled.manifest.len(), 1);
        let conflict = compiled.diagnostics.route_path_conflicts().next().unwrap();
        assert_eq!(conflict.key(), "");
        assert_eq!(conflict.losers(), ["routes/_index.route.tsx".to_string()]);
    }

    #[test]
    fn duplicate_route_id_across_directories() {
        let compiled = compile(&[
            "routes/about.route.tsx",
            "routes/legacy/about.route.tsx",
            "routes/old/about.route.mdx",
        ]);

        assert_eq!(compiled.manifest.len(), 1);
        assert_eq!(route(&compiled, "about").file, "routes/about.route.tsx");

        let conflicts: Vec<_> = compiled.diagnostics.route_id_conflicts().collect();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].key(), "about");
        assert_eq!(
            conflicts[0].files(),
            [
                "routes/about.route.tsx",
                "routes/legacy/about.route.tsx",
                "routes/old/about.route.mdx",
            ]
        );
        assert_eq!(compiled.diagnostics.route_path_conflicts().count(), 0);
    }

    #[test]
    fn reserved_character_aborts_compile() {
        let app = Path::new("/app");
        let files = absolutize_files(app, &["routes/ok.route.tsx", "routes/a:b.route.tsx"]);
        let err = flat_routes_universal(app, &files, &FlatRoutesOptions::default()).unwrap_err();
        assert!(matches!(err, RouteError::ReservedCharacter { character: ':', .. }));
    }

    #[test]
    fn route_module_cannot_take_root_id() {
        let app = Path::new("/app");
        let files = absolutize_files(app, &["routes/root.route.tsx", "routes/root.x.route.tsx"]);
        let err = flat_routes_universal(app, &files, &FlatRoutesOptions::default()).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @r#"Route module "routes/root.route.tsx" resolves to the root route id "root"; rename it so it does not shadow the root route."#);
    }

    #[test]
    fn custom_root_id_frees_the_default_name() {
        let app = Path::new("/app");
        let mut options = FlatRoutesOptions::default();
        options.root_route_id = "app".to_string();
        let files = absolutize_files(app, &["routes/root.route.tsx"]);
        let compiled = flat_routes_universal(app, &files, &options).unwrap();
        assert_eq!(route(&compiled, "root").parent_id.as_deref(), Some("app"));
    }

    #[test]
    fn files_outside_app_directory_get_relative_paths() {
        let compiled = compile(&["/other/routes/x.route.tsx", "routes/y.route.tsx"]);
        assert_eq!(route(&compiled, "x").file, "../other/routes/x.route.tsx");
        assert_eq!(route(&compiled, "y").file, "routes/y.route.tsx");
    }

    #[test]
    fn non_route_files_are_skipped() {
        let compiled = compile(&["routes/helpers.ts", "routes/home.route.tsx"]);
        assert_eq!(compiled.manifest.len(), 1);
    }

    #[test]
    fn pathless_detection() {
        assert!(is_pathless_layout("_auth"));
        assert!(is_pathless_layout("app._layout"));
        assert!(!is_pathless_layout("app._index"));
        assert!(!is_pathless_layout("app.settings"));
    }

    #[test]
    fn relative_path_trimming() {
        assert_eq!(relative_to_parent("posts/:id", "posts").as_deref(), Some(":id"));
        assert_eq!(relative_to_parent("posts", "posts"), None);
        assert_eq!(relative_to_parent("a/b/", "a").as_deref(), Some("b"));
    }

    #[test]
    fn manifest_serializes_router_shape() {
        let compiled = compile(&["routes/posts.route.tsx", "routes/posts._index.route.tsx"]);
        insta::assert_snapshot!(compiled.manifest.to_json().unwrap(), @r#"
        {
          "posts": {
            "file": "routes/posts.route.tsx",
            "id": "posts",
            "path": "posts",
            "parentId": "root"
          },
          "posts._index": {
            "file": "routes/posts._index.route.tsx",
            "id": "posts._index",
            "index": true,
            "parentId": "posts"
          }
        }
        "#);
    }

    #[test]
    fn children_index_groups_by_parent() {
        let compiled = compile(&[
            "routes/a.route.tsx",
            "routes/a.x.route.tsx",
            "routes/a.y.route.tsx",
            "routes/b.route.tsx",
        ]);
        let index = compiled.manifest.children_index();
        assert_eq!(index["root"], ["a", "b"]);
        assert_eq!(index["a"], ["a.x", "a.y"]);
        let children: Vec<_> = compiled
            .manifest
            .children_of("a")
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(children, ["a.x", "a.y"]);
    }
}
