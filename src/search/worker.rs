//! Per-target worker: fetch one catalog page and extract its record

use super::models::Target;
use crate::metrics::Metrics;
use crate::network::{FetchError, Fetcher};
use crate::providers::{ExtractError, Provider};
use crate::results::{AbsentReason, Outcome};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// What a worker sends back to the executor
#[derive(Debug)]
pub struct WorkerReport {
    pub domain: String,
    pub outcome: Outcome,
}

/// Everything a worker needs besides its target
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub provider: Arc<dyn Provider>,
    pub fetcher: Arc<dyn Fetcher>,
    pub metrics: Arc<Metrics>,
    pub timeout: Duration,
}

/// Probe one target and send exactly one report
///
/// Fetch errors, extraction failures and panics all become
/// `Outcome::Absent`, so the executor can always count on one report per
/// launched worker.
pub(crate) async fn run(target: Target, ctx: WorkerContext, results: mpsc::Sender<WorkerReport>) {
    let start = Instant::now();

    let outcome = AssertUnwindSafe(probe(&target, &ctx))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| {
            error!("Worker for {} panicked", target.domain);
            Outcome::Absent(AbsentReason::WorkerFailed)
        });

    let elapsed = start.elapsed();
    ctx.metrics
        .record_outcome(&target.domain, &outcome, elapsed.as_millis() as u64);

    debug!(
        "Request to {} completed in {:?} (found: {})",
        target.domain,
        elapsed,
        outcome.is_found()
    );

    let report = WorkerReport {
        domain: target.domain,
        outcome,
    };
    if results.send(report).await.is_err() {
        debug!("Search ended before the report could be delivered");
    }
}

async fn probe(target: &Target, ctx: &WorkerContext) -> Outcome {
    info!("Making GET request to {} ({})", target.url, target.provider);

    let body = match tokio::time::timeout(ctx.timeout, ctx.fetcher.fetch(target.url.as_str())).await
    {
        Ok(Ok(body)) => body,
        Ok(Err(FetchError::Timeout)) | Err(_) => {
            warn!("Timeout for {}", target.domain);
            return Outcome::Absent(AbsentReason::Timeout);
        }
        Ok(Err(e)) => {
            warn!("Request failed for {}: {}", target.domain, e);
            return Outcome::Absent(AbsentReason::FetchFailed);
        }
    };

    match ctx.provider.extract(&body) {
        Ok(record) => {
            info!("Found {} results for {}", ctx.provider.display_name(), record.library);
            Outcome::Found(record)
        }
        Err(ExtractError::NoData) => {
            debug!("No catalog data from {}", target.domain);
            Outcome::Absent(AbsentReason::NoData)
        }
        Err(e @ ExtractError::MissingIdentifier) => {
            warn!("Discarding result from {}: {}", target.domain, e);
            Outcome::Absent(AbsentReason::MissingIdentifier)
        }
    }
}
