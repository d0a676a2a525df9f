// Worker pool for parallel pair conversion

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use super::error::EngineError;
use super::pipeline::{self, Backends};
use super::types::{AssetPair, PairOutcome, RunReport, UnpairedAsset};

/// Hard ceiling on conversion workers: each one drives an ffmpeg process
/// that is already multi-threaded, so a wider pool only adds contention
const MAX_WORKERS: usize = 4;

/// Default pool size: half the available cores, clamped to 1..=MAX_WORKERS
pub fn default_workers() -> usize {
    let cpus = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2);
    (cpus / 2).clamp(1, MAX_WORKERS)
}

/// Message from a worker (or the copy loop) to the aggregating thread
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    /// A pair entered its pipeline
    PairStarted { base_name: String },

    /// A pair's pipeline finished, successfully or not
    PairFinished { outcome: PairOutcome },

    /// An unpaired file was copied verbatim
    SingleCopied { path: PathBuf },

    /// An unpaired file could not be copied
    SingleFailed { path: PathBuf, error: String },
}

/// Fixed-size pool of conversion workers fed from a shared queue.
///
/// Every worker pulls pairs until the queue drains and pushes one
/// `PairFinished` per pair; the message stream ends once all workers exit,
/// which is the caller's join barrier.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    rx: Receiver<WorkerMessage>,
}

impl WorkerPool {
    /// Queue all pairs and spawn `workers` threads to convert them
    pub fn spawn(
        pairs: Vec<AssetPair>,
        output_dir: &Path,
        scratch_root: &Path,
        prefix: &str,
        backends: Backends,
        workers: usize,
    ) -> Self {
        let (work_tx, work_rx) = mpsc::channel::<AssetPair>();
        for pair in pairs {
            // Receiver is alive until every worker exits
            let _ = work_tx.send(pair);
        }
        drop(work_tx); // Workers stop when the queue drains

        let work_rx = Arc::new(Mutex::new(work_rx));
        let (msg_tx, msg_rx) = mpsc::channel::<WorkerMessage>();

        let workers = workers.max(1);
        let handles = (0..workers)
            .map(|worker_id| {
                let work_rx = Arc::clone(&work_rx);
                let msg_tx = msg_tx.clone();
                let backends = backends.clone();
                let output_dir = output_dir.to_path_buf();
                let scratch_root = scratch_root.to_path_buf();
                let prefix = prefix.to_string();

                thread::spawn(move || {
                    loop {
                        let pair = {
                            let rx = work_rx.lock().unwrap();
                            match rx.recv() {
                                Ok(pair) => pair,
                                Err(_) => break,
                            }
                        };

                        let _ = msg_tx.send(WorkerMessage::PairStarted {
                            base_name: pair.base_name.clone(),
                        });

                        let outcome = pipeline::convert_pair(
                            &pair,
                            &output_dir,
                            &scratch_root,
                            &prefix,
                            &backends,
                        );
                        let _ = msg_tx.send(WorkerMessage::PairFinished { outcome });
                    }
                    tracing::debug!(worker_id, "worker drained queue");
                })
            })
            .collect();

        Self {
            handles,
            rx: msg_rx,
        }
    }

    /// Receiver for worker messages; iteration ends when all workers exit
    pub fn messages(&self) -> &Receiver<WorkerMessage> {
        &self.rx
    }

    /// Wait for every worker thread to finish
    pub fn join(self) {
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

/// Run a full conversion: fan pairs out across the pool, copy unpaired
/// files inline, and aggregate everything into a report once all work is
/// done. Individual failures never abort the run.
///
/// `on_event` observes every message as it arrives, for progress printing.
pub fn run<F>(
    pairs: Vec<AssetPair>,
    unpaired: Vec<UnpairedAsset>,
    output_dir: &Path,
    workers: usize,
    prefix: &str,
    backends: Backends,
    mut on_event: F,
) -> Result<RunReport, EngineError>
where
    F: FnMut(&WorkerMessage),
{
    std::fs::create_dir_all(output_dir).map_err(|e| EngineError::Finalize {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    // Run-scoped scratch area inside the export folder, so finalization is a
    // same-filesystem rename. Removed on drop; a crash leaves at most one
    // stale dot-directory behind.
    let scratch = tempfile::Builder::new()
        .prefix(".inflight-")
        .tempdir_in(output_dir)
        .map_err(|e| EngineError::Finalize {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    let pool = WorkerPool::spawn(pairs, output_dir, scratch.path(), prefix, backends, workers);

    let mut report = RunReport::default();

    // Copies are cheap I/O; run them on this thread while the pool works
    for asset in &unpaired {
        match pipeline::copy_unpaired(asset, output_dir) {
            Ok(dest) => {
                on_event(&WorkerMessage::SingleCopied { path: dest.clone() });
                report.copied.push(dest);
            }
            Err(e) => {
                let detail = e.to_string();
                on_event(&WorkerMessage::SingleFailed {
                    path: asset.path.clone(),
                    error: detail.clone(),
                });
                report.copy_failures.push((asset.path.clone(), detail));
            }
        }
    }

    // Join barrier: the iterator ends only after every worker has exited
    for message in pool.messages().iter() {
        on_event(&message);
        if let WorkerMessage::PairFinished { outcome } = message {
            report.record(outcome);
        }
    }
    pool.join();

    Ok(report)
}
