//! Concurrent fan-out across provider adapters.
//!
//! A single user query may be served by several adapters (e.g. landscape
//! and portrait art pulled from sibling endpoints). They run concurrently,
//! each under its own timeout; one adapter failing never aborts the others.
//! The merge order is fixed (adapter order, then payload order) so the
//! normalizer sees deterministic input.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use posterforged_common::{Error, Result};
use tracing::warn;

use crate::posters::SourceInfo;
use crate::providers::{PlatformQuery, PosterProvider, ProviderResult};

/// One adapter's failure, kept as a user-presentable note.
#[derive(Debug, Clone)]
pub struct ProviderFailure {
    pub source: SourceInfo,
    pub message: String,
}

/// The merged outcome of a fan-out: surviving batches plus failure notes.
#[derive(Debug)]
pub struct AggregateOutcome {
    /// Successful extractions, in adapter order.
    pub batches: Vec<(SourceInfo, Vec<ProviderResult>)>,
    /// Adapters that failed; non-empty alongside `batches` means a partial
    /// result.
    pub failures: Vec<ProviderFailure>,
}

/// Run every adapter against `query` concurrently.
///
/// Each call is bounded by `timeout`. Partial results are kept; only when
/// every adapter fails does the first failure propagate as the overall
/// error.
pub async fn fetch_all(
    adapters: &[Arc<dyn PosterProvider>],
    query: &PlatformQuery,
    timeout: Duration,
) -> Result<AggregateOutcome> {
    let calls = adapters.iter().map(|adapter| {
        let adapter = Arc::clone(adapter);
        let source = SourceInfo {
            key: adapter.name().to_string(),
            display_name: adapter.display_name().to_string(),
        };
        async move {
            let result = match tokio::time::timeout(timeout, adapter.fetch(query)).await {
                Ok(result) => result,
                Err(_) => Err(Error::fetch(format!(
                    "{}: timed out after {}s",
                    source.display_name,
                    timeout.as_secs()
                ))),
            };
            (source, result)
        }
    });

    let mut batches = Vec::new();
    let mut failures = Vec::new();
    let mut first_error = None;

    for (source, result) in join_all(calls).await {
        match result {
            Ok(results) => batches.push((source, results)),
            Err(e) => {
                warn!(provider = %source.key, "adapter failed: {e}");
                failures.push(ProviderFailure {
                    source,
                    message: e.to_string(),
                });
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if batches.is_empty() {
        if let Some(e) = first_error {
            return Err(e);
        }
    }

    Ok(AggregateOutcome { batches, failures })
}
