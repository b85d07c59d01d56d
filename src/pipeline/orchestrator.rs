// 全ジョブをワーカープール上で実行し、完了順に回収する

use std::sync::mpsc;

use tracing::info;

use crate::error::{MeshBatchError, Result};
use crate::pipeline::job_runner::{JobDescriptor, Outcome, run_job};
use crate::remote::{MeshService, PollConfig};
use crate::staging::StagingDirs;

/// Run every job with bounded parallelism, collecting outcomes as they
/// complete.
///
/// Each descriptor is moved into exactly one spawned task, so double
/// dispatch is unrepresentable. One job failing — in any of its terminal
/// modes — never disturbs a sibling: `run_job` returns a value for every
/// path, and the mpsc sink tolerates concurrent senders without loss.
/// Returns once every dispatched job has produced its Outcome, in
/// completion order, never submission order.
pub fn run_batch<S: MeshService + Sync>(
    service: &S,
    descriptors: Vec<JobDescriptor>,
    dirs: &StagingDirs,
    poll: &PollConfig,
    workers: usize,
) -> Result<Vec<Outcome>> {
    let job_count = descriptors.len();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|e| MeshBatchError::pool(e.to_string()))?;

    info!(jobs = job_count, workers, "dispatching batch");

    let (sink, outcomes) = mpsc::channel::<Outcome>();
    pool.scope(|scope| {
        for desc in descriptors {
            let sink = sink.clone();
            scope.spawn(move |_| {
                let _ = sink.send(run_job(service, desc, dirs, poll));
            });
        }
    });
    drop(sink);

    Ok(outcomes.into_iter().collect())
}
