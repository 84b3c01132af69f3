//! Batch processing types for compiling many app directories at once.

use crate::types::FlatRoutesResult;
use napi_derive::napi;

/// Result for a single app directory in a batch.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// App directory matching the input.
    pub app_directory: String,
    /// Compilation result (present on success).
    pub result: Option<FlatRoutesResult>,
    /// Error message (present on failure).
    pub error: Option<String>,
}

/// Statistics for batch processing.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchStats {
    /// Total number of app directories submitted.
    pub total: u32,
    /// Number of successful compilations.
    pub succeeded: u32,
    /// Number of failed compilations.
    pub failed: u32,
    /// Total processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Options for batch processing.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to number of CPU cores.
    pub max_threads: Option<u32>,
    /// Whether to continue processing after an error. Defaults to true.
    pub continue_on_error: Option<bool>,
}

/// Result of batch processing containing all results and statistics.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchProcessingResult {
    /// Individual results, in input order.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}
