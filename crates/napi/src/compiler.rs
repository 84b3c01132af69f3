//! The stateful compiler and its configuration.

use crate::batch::{BatchOptions, BatchProcessingResult, BatchResult, BatchStats};
use crate::convert::{convert_compiled, to_flat_routes_options, to_napi_error};
use crate::types::{FlatRoutesResult, RouteConfig};
use napi_derive::napi;
use rayon::prelude::*;
use routex_core::{
    CompiledRoutes, FlatRoutesOptions, RoutesFormat, absolutize_files, flat_routes,
    flat_routes_universal, format_routes,
};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

/// Stateful compiler exposed to Node callers.
///
/// Options are validated once at construction and reused for every call.
#[napi]
pub struct RouteCompiler {
    pub(crate) options: FlatRoutesOptions,
}

#[napi]
impl RouteCompiler {
    #[napi(constructor)]
    /// Creates a compiler that can be reused across dev-server rebuilds.
    pub fn new(config: Option<RouteConfig>) -> napi::Result<Self> {
        Ok(Self {
            options: to_flat_routes_options(config)?,
        })
    }

    /// Discovers route modules under `appDirectory` and compiles the manifest.
    #[napi]
    pub fn compile(&self, app_directory: String) -> napi::Result<FlatRoutesResult> {
        let compiled = compile_directory(&app_directory, &self.options)?;
        convert_compiled(&compiled)
    }

    /// Compiles the manifest from an explicit, ordered list of files.
    #[napi(js_name = "compileFiles")]
    pub fn compile_files(
        &self,
        app_directory: String,
        files: Vec<String>,
    ) -> napi::Result<FlatRoutesResult> {
        let compiled = compile_file_list(&app_directory, &files, &self.options)?;
        convert_compiled(&compiled)
    }

    /// Renders the route tree of `appDirectory` as `"jsx"` (default) or `"json"`.
    #[napi(js_name = "formatRoutes")]
    pub fn format_routes(
        &self,
        app_directory: String,
        format: Option<String>,
    ) -> napi::Result<String> {
        let compiled = compile_directory(&app_directory, &self.options)?;
        render(&compiled, &self.options, format.as_deref())
    }

    /// Compiles several app directories in parallel using Rayon.
    ///
    /// # Arguments
    ///
    /// * `app_directories` - Directories to compile
    /// * `options` - Optional batch processing options (thread count, error handling)
    ///
    /// # Returns
    ///
    /// Returns a `BatchProcessingResult` with one entry per processed directory,
    /// in input order, and statistics.
    #[napi(js_name = "compileBatch")]
    pub fn compile_batch(
        &self,
        app_directories: Vec<String>,
        options: Option<BatchOptions>,
    ) -> napi::Result<BatchProcessingResult> {
        let start = Instant::now();
        let opts = options.unwrap_or_default();
        let continue_on_error = opts.continue_on_error.unwrap_or(true);

        let pool = if let Some(max_threads) = opts.max_threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(max_threads as usize)
                .build()
                .ok()
        } else {
            None
        };

        let total = app_directories.len() as u32;
        let succeeded = AtomicU32::new(0);
        let failed = AtomicU32::new(0);

        let process_input = |app_directory: String| -> BatchResult {
            let outcome = compile_directory(&app_directory, &self.options)
                .and_then(|compiled| convert_compiled(&compiled));
            match outcome {
                Ok(result) => {
                    succeeded.fetch_add(1, Ordering::Relaxed);
                    BatchResult {
                        app_directory,
                        result: Some(result),
                        error: None,
                    }
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    BatchResult {
                        app_directory,
                        result: None,
                        error: Some(e.reason.clone()),
                    }
                }
            }
        };

        let results: Vec<BatchResult> = if continue_on_error {
            if let Some(pool) = pool {
                pool.install(|| app_directories.into_par_iter().map(process_input).collect())
            } else {
                app_directories
                    .into_par_iter()
                    .map(process_input)
                    .collect()
            }
        } else {
            // Stop on first error, so this path runs sequentially.
            let mut results = Vec::with_capacity(app_directories.len());
            for app_directory in app_directories {
                let result = process_input(app_directory);
                let had_error = result.error.is_some();
                results.push(result);
                if had_error {
                    break;
                }
            }
            results
        };

        Ok(BatchProcessingResult {
            results,
            stats: BatchStats {
                total,
                succeeded: succeeded.load(Ordering::Relaxed),
                failed: failed.load(Ordering::Relaxed),
                processing_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            },
        })
    }
}

/// Factory mirroring the constructor for callers that prefer functions.
#[napi(js_name = "createRouteCompiler")]
pub fn create_route_compiler(config: Option<RouteConfig>) -> napi::Result<RouteCompiler> {
    RouteCompiler::new(config)
}

pub(crate) fn compile_directory(
    app_directory: &str,
    options: &FlatRoutesOptions,
) -> napi::Result<CompiledRoutes> {
    flat_routes(Path::new(app_directory), options).map_err(to_napi_error)
}

pub(crate) fn compile_file_list(
    app_directory: &str,
    files: &[String],
    options: &FlatRoutesOptions,
) -> napi::Result<CompiledRoutes> {
    let app = Path::new(app_directory);
    let files = absolutize_files(app, files);
    flat_routes_universal(app, &files, options).map_err(to_napi_error)
}

pub(crate) fn render(
    compiled: &CompiledRoutes,
    options: &FlatRoutesOptions,
    format: Option<&str>,
) -> napi::Result<String> {
    let format = match format {
        Some(name) => name.parse::<RoutesFormat>().map_err(to_napi_error)?,
        None => RoutesFormat::default(),
    };
    format_routes(compiled, &options.root_route_id, format).map_err(to_napi_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn app_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for rel in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        dir
    }

    #[test]
    fn batch_reports_each_directory_in_order() {
        let good = app_with(&["root.tsx", "routes/home.route.tsx"]);
        let missing_root = app_with(&["routes/home.route.tsx"]);
        let compiler = RouteCompiler::new(None).unwrap();

        let output = compiler
            .compile_batch(
                vec![
                    good.path().to_string_lossy().into_owned(),
                    missing_root.path().to_string_lossy().into_owned(),
                ],
                Some(BatchOptions {
                    max_threads: Some(2),
                    continue_on_error: None,
                }),
            )
            .unwrap();

        assert_eq!(output.stats.total, 2);
        assert_eq!(output.stats.succeeded, 1);
        assert_eq!(output.stats.failed, 1);
        assert_eq!(output.results.len(), 2);
        assert!(output.results[0].result.is_some());
        assert!(output.results[1].error.is_some());
    }

    #[test]
    fn batch_stops_on_first_error_when_asked() {
        let missing_root = app_with(&["routes/home.route.tsx"]);
        let good = app_with(&["root.tsx", "routes/home.route.tsx"]);
        let compiler = RouteCompiler::new(None).unwrap();

        let output = compiler
            .compile_batch(
                vec![
                    missing_root.path().to_string_lossy().into_owned(),
                    good.path().to_string_lossy().into_owned(),
                ],
                Some(BatchOptions {
                    max_threads: None,
                    continue_on_error: Some(false),
                }),
            )
            .unwrap();

        assert_eq!(output.results.len(), 1);
        assert_eq!(output.stats.total, 2);
        assert_eq!(output.stats.failed, 1);
        assert_eq!(output.stats.succeeded, 0);
    }

    #[test]
    fn compile_files_uses_configured_marker() {
        let compiler = RouteCompiler::new(Some(RouteConfig {
            route_marker: Some(String::new()),
            ..RouteConfig::default()
        }))
        .unwrap();
        let result = compiler
            .compile_files(
                "/app".to_string(),
                vec![
                    "routes/users.tsx".to_string(),
                    "routes/users.$id.tsx".to_string(),
                ],
            )
            .unwrap();

        assert_eq!(result.routes.len(), 2);
        assert_eq!(result.routes[1].id, "users.$id");
        assert_eq!(result.routes[1].path.as_deref(), Some(":id"));
        assert_eq!(result.routes[1].parent_id.as_deref(), Some("users"));
        assert_eq!(result.manifest["users"]["path"], "users");
    }

    #[test]
    fn rejects_unknown_format() {
        let app = app_with(&["root.tsx", "routes/home.route.tsx"]);
        let compiler = RouteCompiler::new(None).unwrap();
        let err = compiler
            .format_routes(
                app.path().to_string_lossy().into_owned(),
                Some("yaml".to_string()),
            )
            .unwrap_err();
        assert!(err.reason.contains("Unknown routes format"));
    }
}
