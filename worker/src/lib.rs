use log::{debug, error, info};
use shared::{
    errors::{RenderError, RenderResult},
    kernel::Kernel,
    models::{
        buffer::Partition,
        tasks::{completion_signal::CompletionSignal, worker_task::WorkerTask},
    },
};
use tokio::sync::mpsc::UnboundedSender;

/// Runs one rank to completion: a single synchronous kernel invocation
/// over the rows this rank owns, then exactly one completion signal.
///
/// A kernel failure is propagated to the coordinator through the returned
/// error and no signal is sent; the coordinator never treats a missing
/// signal as success. The worker does not touch its partition again after
/// signaling.
pub fn run_worker<K>(
    task: &WorkerTask,
    partition: &mut Partition<'_>,
    kernel: &K,
    tx: &UnboundedSender<CompletionSignal>,
) -> RenderResult<()>
where
    K: Kernel + ?Sized,
{
    if partition.rank() != task.rank || partition.total_workers() != task.total_workers {
        return Err(RenderError::Consistency(format!(
            "task for rank {}/{} was handed a partition for rank {}/{}",
            task.rank,
            task.total_workers,
            partition.rank(),
            partition.total_workers()
        )));
    }

    debug!(
        "Worker rank {} starting, {} rows to compute",
        task.rank,
        partition.row_count()
    );

    if let Err(e) = kernel.compute(partition, &task.config) {
        error!("Worker rank {} kernel invocation failed: {}", task.rank, e);
        return Err(RenderError::Worker {
            rank: task.rank,
            reason: e.to_string(),
        });
    }

    let signal = CompletionSignal::new(task.rank, kernel.buffer_offset());
    if tx.send(signal).is_err() {
        return Err(RenderError::Consistency(format!(
            "completion channel closed before rank {} could report",
            task.rank
        )));
    }

    info!("Worker rank {} completed its partition", task.rank);
    Ok(())
}
