//! Batch diagnostics for parallel processing of many documents.

use crate::diagnostics::{Diagnostic, diagnose};
use crate::options::LanguageOptions;
use deckscan_core::SourceDocument;
use serde::{Deserialize, Serialize};

/// Input for batch processing - a single document to diagnose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchInput {
    /// Document identifier (typically the file path or URI).
    pub id: String,
    /// Markdown source.
    pub source: String,
}

/// Result for a single document in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    /// Document identifier matching the input.
    pub id: String,
    /// Diagnostics (present on success).
    pub diagnostics: Option<Vec<Diagnostic>>,
    /// Error message (present on failure).
    pub error: Option<String>,
}

/// Statistics for batch processing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    /// Total number of documents processed.
    pub total: u32,
    /// Number of documents that parsed.
    pub succeeded: u32,
    /// Number of documents that failed to parse.
    pub failed: u32,
    /// Total number of diagnostics reported.
    pub diagnostics: u32,
    /// Total processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Options for batch processing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to the rayon global pool.
    #[serde(default)]
    pub max_threads: Option<u32>,
    /// Options applied to every document.
    #[serde(default)]
    pub options: LanguageOptions,
}

/// Result of batch processing containing all results and statistics.
#[derive(Debug, Clone, Serialize)]
pub struct BatchProcessingResult {
    /// Individual results, in input order.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}

/// Diagnoses every input in parallel.
///
/// Each document gets its own parse pass; a failing document is reported in
/// its result and does not stop the others.
pub fn diagnose_batch(inputs: Vec<BatchInput>, options: BatchOptions) -> BatchProcessingResult {
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    let start = Instant::now();
    let resolved = options.options.resolve();

    // Configure thread pool if max_threads is specified
    let pool = options.max_threads.and_then(|max_threads| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(max_threads as usize)
            .build()
            .ok()
    });

    let total = inputs.len() as u32;
    let succeeded = AtomicU32::new(0);
    let failed = AtomicU32::new(0);
    let reported = AtomicU32::new(0);

    let process_input = |input: BatchInput| -> BatchResult {
        let document = SourceDocument::new(input.source);
        match diagnose(&document, &resolved) {
            Ok(diagnostics) => {
                succeeded.fetch_add(1, Ordering::Relaxed);
                reported.fetch_add(diagnostics.len() as u32, Ordering::Relaxed);
                BatchResult {
                    id: input.id,
                    diagnostics: Some(diagnostics),
                    error: None,
                }
            }
            Err(e) => {
                failed.fetch_add(1, Ordering::Relaxed);
                log::warn!("{}: {e}", input.id);
                BatchResult {
                    id: input.id,
                    diagnostics: None,
                    error: Some(e.to_string()),
                }
            }
        }
    };

    let results: Vec<BatchResult> = if let Some(pool) = pool {
        pool.install(|| inputs.into_par_iter().map(process_input).collect())
    } else {
        inputs.into_par_iter().map(process_input).collect()
    };

    let elapsed = start.elapsed();
    log::debug!("diagnosed {total} documents in {elapsed:?}");

    BatchProcessingResult {
        results,
        stats: BatchStats {
            total,
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            diagnostics: reported.load(Ordering::Relaxed),
            processing_time_ms: elapsed.as_secs_f64() * 1000.0,
        },
    }
}
