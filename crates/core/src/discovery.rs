//! Route module discovery.
//!
//! Walks `<app>/<routes_dir>` and returns every file whose stem carries the
//! route marker and whose extension is a route module extension. Entries
//! matching an ignore glob (by name or by app-relative path) are skipped,
//! and ignored directories are not descended into.

use crate::config::FlatRoutesOptions;
use crate::error::RouteError;
use glob::{MatchOptions, Pattern};
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Compiled ignore globs.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    patterns: Vec<Pattern>,
}

impl IgnoreMatcher {
    /// Compiles the given glob patterns.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, RouteError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Pattern::new(pattern).map_err(|source| RouteError::InvalidIgnorePattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// True if either the file name or the app-relative path matches a pattern.
    pub fn is_ignored(&self, file_name: &str, relative_path: &str) -> bool {
        self.patterns.iter().any(|pattern| {
            pattern.matches_with(file_name, MATCH_OPTIONS)
                || pattern.matches_with(relative_path, MATCH_OPTIONS)
        })
    }
}

/// Converts `path` to a `/`-separated string relative to `base`.
///
/// Paths outside `base` climb out with `..`. Relative paths are taken to be
/// relative to `base` already. Root and drive prefixes never appear in the
/// result.
pub fn to_posix_relative(base: &Path, path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    let rest: Vec<Component<'_>> = if path.is_relative() {
        path.components().collect()
    } else if let Ok(inside) = path.strip_prefix(base) {
        inside.components().collect()
    } else {
        let base_parts: Vec<Component<'_>> = base.components().collect();
        let path_parts: Vec<Component<'_>> = path.components().collect();
        let common = base_parts
            .iter()
            .zip(&path_parts)
            .take_while(|(a, b)| a == b)
            .count();
        parts.extend(
            base_parts[common..]
                .iter()
                .filter(|c| matches!(c, Component::Normal(_)))
                .map(|_| "..".to_string()),
        );
        path_parts[common..].to_vec()
    };
    for component in rest {
        match component {
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
            Component::ParentDir => parts.push("..".to_string()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    parts.join("/")
}

/// Locates `<dir>/<basename>.<ext>` for the first matching module extension.
pub fn find_config(dir: &Path, basename: &str, options: &FlatRoutesOptions) -> Option<PathBuf> {
    options
        .route_module_extensions
        .iter()
        .map(|ext| dir.join(format!("{}.{}", basename, ext.trim_start_matches('.'))))
        .find(|candidate| candidate.is_file())
}

/// Returns the route id encoded in a file name, if it is a route module.
pub fn route_id_for_file(path: &Path, options: &FlatRoutesOptions) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if !options.is_route_module_extension(ext) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    options.strip_route_marker(stem).map(str::to_string)
}

/// Finds the root route module of an app directory.
pub fn find_root_route(
    app_directory: &Path,
    options: &FlatRoutesOptions,
) -> Result<PathBuf, RouteError> {
    find_config(app_directory, &options.root_route_id, options).ok_or_else(|| {
        RouteError::MissingRootRoute {
            app_directory: app_directory.to_path_buf(),
        }
    })
}

/// Lists route module files below the routes directory, sorted by path.
pub fn find_route_modules(
    app_directory: &Path,
    options: &FlatRoutesOptions,
) -> Result<Vec<PathBuf>, RouteError> {
    let ignore = IgnoreMatcher::new(&options.ignored_route_files)?;
    let routes_dir = app_directory.join(&options.routes_dir);
    if !routes_dir.is_dir() {
        return Err(RouteError::MissingRoutesDirectory { path: routes_dir });
    }

    let not_ignored = |entry: &DirEntry| {
        let name = entry.file_name().to_string_lossy();
        let relative = to_posix_relative(app_directory, entry.path());
        if ignore.is_ignored(&name, &relative) {
            log::debug!("ignoring {}", relative);
            false
        } else {
            true
        }
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(&routes_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(not_ignored)
    {
        let entry = entry?;
        // Follows symlinks to route modules.
        if !entry.path().is_file() {
            continue;
        }
        if route_id_for_file(entry.path(), options).is_some() {
            files.push(entry.into_path());
        }
    }

    log::debug!(
        "found {} route modules in {}",
        files.len(),
        routes_dir.display()
    );
    Ok(files)
}
