//! Bounded worker pool that reads every path of a batch.
//!
//! The pool is static fan-out/fan-in: a job channel sized to the batch is
//! filled once and closed, `workers` tasks drain it through a shared
//! receiver, and the caller collects exactly one [`FileOutcome`] per path.
//! Failures are isolated per file and come back as data.

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use nwm_common::StreamflowSource;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, instrument, warn};

use crate::error::DispatchError;
use crate::metadata::{classify_product, valid_time_label};
use crate::record::{FileOutcome, StreamflowRecord};

/// Fans a batch of paths out over a fixed number of workers.
pub struct Dispatcher<S> {
    source: Arc<S>,
    workers: usize,
}

impl<S> Dispatcher<S>
where
    S: StreamflowSource + 'static,
{
    pub fn new(source: Arc<S>, workers: usize) -> Result<Self, DispatchError> {
        if workers == 0 {
            return Err(DispatchError::NoWorkers);
        }
        Ok(Self { source, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Read every path and return one outcome per path, in arrival order.
    ///
    /// All workers are running before the first job is queued. Returns
    /// [`DispatchError::Incomplete`] if every worker exits before the last
    /// result arrives.
    #[instrument(skip(self, paths, positions), fields(files = paths.len(), workers = self.workers))]
    pub async fn run(
        &self,
        paths: Vec<String>,
        positions: Arc<[u64]>,
    ) -> Result<Vec<FileOutcome>, DispatchError> {
        let expected = paths.len();
        if expected == 0 {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let (job_tx, job_rx) = mpsc::channel::<String>(expected);
        let (result_tx, result_rx) = mpsc::channel::<FileOutcome>(expected);
        let job_rx = Arc::new(Mutex::new(job_rx));

        let handles: Vec<_> = (0..self.workers)
            .map(|id| {
                let jobs = job_rx.clone();
                let results = result_tx.clone();
                let source = self.source.clone();
                let positions = positions.clone();
                tokio::spawn(worker(id, jobs, results, source, positions))
            })
            .collect();

        // Workers hold the only remaining result senders
        drop(result_tx);
        drop(job_rx);

        for path in paths {
            if job_tx.send(path).await.is_err() {
                warn!("All workers exited before the job queue was loaded");
                break;
            }
        }
        drop(job_tx);

        let outcomes = collect(result_rx, expected).await;

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Worker task failed");
            }
        }

        let outcomes = outcomes?;
        let failed = outcomes.iter().filter(|o| o.is_failed()).count();
        info!(
            files = expected,
            failed = failed,
            duration_ms = start.elapsed().as_millis() as u64,
            "Dispatch complete"
        );
        Ok(outcomes)
    }
}

async fn worker<S>(
    id: usize,
    jobs: Arc<Mutex<mpsc::Receiver<String>>>,
    results: mpsc::Sender<FileOutcome>,
    source: Arc<S>,
    positions: Arc<[u64]>,
) where
    S: StreamflowSource + 'static,
{
    let mut processed = 0usize;
    loop {
        let job = jobs.lock().await.recv().await;
        let Some(path) = job else {
            break;
        };

        let outcome = read_on_blocking_pool(source.clone(), path, positions.clone()).await;
        processed += 1;
        if results.send(outcome).await.is_err() {
            break;
        }
    }
    debug!(worker = id, processed = processed, "Worker finished");
}

/// Run [`process_file`] on the blocking thread pool.
async fn read_on_blocking_pool<S>(source: Arc<S>, path: String, positions: Arc<[u64]>) -> FileOutcome
where
    S: StreamflowSource + 'static,
{
    let task_path = path.clone();
    match tokio::task::spawn_blocking(move || process_file(&*source, &task_path, &positions)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(path = %path, error = %e, "Extraction task panicked");
            counter!("fetch_file_failures_total").increment(1);
            FileOutcome::failed(path, format!("extraction task failed: {}", e))
        }
    }
}

/// Receive exactly `expected` outcomes, or fail if the channel closes first.
async fn collect(
    mut results: mpsc::Receiver<FileOutcome>,
    expected: usize,
) -> Result<Vec<FileOutcome>, DispatchError> {
    let mut outcomes = Vec::with_capacity(expected);
    while outcomes.len() < expected {
        match results.recv().await {
            Some(outcome) => outcomes.push(outcome),
            None => {
                return Err(DispatchError::Incomplete {
                    expected,
                    received: outcomes.len(),
                })
            }
        }
    }
    Ok(outcomes)
}

/// Read `positions` from one archive file and label the values.
///
/// Values are converted to physical units. Anything that prevents reading the
/// file as a whole (malformed path, missing file, unreadable file, missing
/// variable) yields [`FileOutcome::Failed`].
pub fn process_file<S>(source: &S, path: &str, positions: &[u64]) -> FileOutcome
where
    S: StreamflowSource + ?Sized,
{
    let start = Instant::now();
    let outcome = label_and_read(source, path, positions);

    match &outcome {
        FileOutcome::Batch(_) => {
            histogram!("fetch_file_duration_seconds").record(start.elapsed().as_secs_f64());
        }
        FileOutcome::Failed { reason, .. } => {
            warn!(path = %path, reason = %reason, "Failed to read file");
            counter!("fetch_file_failures_total").increment(1);
        }
    }
    counter!("fetch_files_total").increment(1);
    outcome
}

fn label_and_read<S>(source: &S, path: &str, positions: &[u64]) -> FileOutcome
where
    S: StreamflowSource + ?Sized,
{
    let product = match classify_product(path) {
        Ok(product) => product,
        Err(e) => return FileOutcome::failed(path, e),
    };
    let time = match valid_time_label(path, &product) {
        Ok(time) => time,
        Err(e) => return FileOutcome::failed(path, e),
    };

    let reads = match source.read_positions(path, positions) {
        Ok(reads) => reads,
        Err(e) => return FileOutcome::failed(path, e),
    };
    if reads.len() != positions.len() {
        return FileOutcome::failed(
            path,
            format!("expected {} values, source returned {}", positions.len(), reads.len()),
        );
    }

    let sentinels = reads.iter().filter(|r| !r.ok).count();
    if sentinels > 0 {
        debug!(path = %path, count = sentinels, "Positions replaced with sentinel");
        counter!("fetch_position_sentinels_total").increment(sentinels as u64);
    }

    let records = positions
        .iter()
        .zip(reads)
        .map(|(&location_index, read)| StreamflowRecord {
            time: time.clone(),
            value: read.scaled(),
            product: product.clone(),
            location_index,
        })
        .collect();

    FileOutcome::Batch(records)
}
