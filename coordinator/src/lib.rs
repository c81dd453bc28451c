pub mod render_state;
pub mod sink;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, error, info};
use shared::{
    errors::{RenderError, RenderResult},
    kernel::Kernel,
    models::{
        buffer::SharedBuffer,
        frame::Frame,
        render_config::RenderConfig,
        tasks::{completion_signal::CompletionSignal, worker_task::WorkerTask},
    },
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time;

use render_state::RenderState;
use sink::Sink;

/// Upper bound on the wait for any single completion signal. A worker
/// that never reports fails the render instead of hanging it.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(300);

/// Owns one render at a time: allocates the shared buffer, dispatches one
/// worker per rank, suspends until every rank has signaled, then extracts
/// the finished frame and hands it to the sink.
pub struct Coordinator<K> {
    kernel: Arc<K>,
    wait_timeout: Duration,
}

impl<K: Kernel + 'static> Coordinator<K> {
    pub fn new(kernel: K) -> Self {
        Self::with_timeout(kernel, DEFAULT_WAIT_TIMEOUT)
    }

    pub fn with_timeout(kernel: K, wait_timeout: Duration) -> Self {
        Self {
            kernel: Arc::new(kernel),
            wait_timeout,
        }
    }

    /// Computes one frame. The grid is striped across `total_workers`
    /// ranks writing the same zero-initialized buffer concurrently; the
    /// coordinator task itself never blocks, it is resumed once per
    /// incoming completion signal. Any worker failure aborts the whole
    /// render, the first failing rank named in the error, and nothing
    /// is emitted.
    pub async fn render(
        &self,
        config: RenderConfig,
        total_workers: usize,
    ) -> RenderResult<Frame> {
        config.validate()?;
        if total_workers == 0 {
            return Err(RenderError::Config(
                "total_workers must be at least 1".to_string(),
            ));
        }

        info!(
            "Render dispatched: {}x{} grid striped across {} worker(s)",
            config.resolution.nx, config.resolution.ny, total_workers
        );

        let buffer = SharedBuffer::new(config.resolution);
        let (tx, rx) = mpsc::unbounded_channel();

        let kernel = Arc::clone(&self.kernel);
        let compute_config = config.clone();
        let compute = tokio::task::spawn_blocking(move || {
            compute_partitions(kernel, compute_config, total_workers, buffer, tx)
        });

        let collected = collect_signals(
            rx,
            total_workers,
            self.wait_timeout,
            self.kernel.buffer_offset(),
        )
        .await;

        // On a timeout there is nothing worth joining: the compute task is
        // stuck by definition, and awaiting it would hang the coordinator.
        // Its handle is dropped and the buffer dies with it.
        let collected = match collected {
            Err(e @ RenderError::Timeout { .. }) => return Err(e),
            other => other,
        };

        let joined = match compute.await {
            Ok(result) => result,
            Err(e) => Err(RenderError::Consistency(format!(
                "compute task panicked: {}",
                e
            ))),
        };

        // A worker failure is the root cause of any missing signal, so it
        // wins over the collector's view of the same event; otherwise the
        // collector saw the defect first.
        let buffer = match (collected, joined) {
            (Ok(()), Ok(buffer)) => buffer,
            (_, Err(e @ RenderError::Worker { .. })) => return Err(e),
            (Err(e), _) => return Err(e),
            (Ok(()), Err(e)) => return Err(e),
        };

        // All ranks have reported: ownership of the buffer is back with
        // the coordinator and the output region can be extracted.
        let offset = self.kernel.buffer_offset();
        let mut bytes = buffer.into_bytes();
        if offset > bytes.len() {
            return Err(RenderError::Consistency(format!(
                "output offset {} beyond buffer of {} bytes",
                offset,
                bytes.len()
            )));
        }
        let frame = Frame::new(bytes.split_off(offset), config.resolution);
        info!("Render complete: {} bytes extracted", frame.len());
        Ok(frame)
    }

    /// Hands the finished frame to the sink. Takes the frame by reference
    /// so a sink failure leaves it with the caller for a sink-only retry.
    pub fn deliver(&self, frame: &Frame, sink: &dyn Sink) -> RenderResult<()> {
        sink.consume(frame)
    }

    pub async fn render_to_sink(
        &self,
        config: RenderConfig,
        total_workers: usize,
        sink: &dyn Sink,
    ) -> RenderResult<Frame> {
        let frame = self.render(config, total_workers).await?;
        self.deliver(&frame, sink)?;
        Ok(frame)
    }
}

/// Blocking side of one render: stripes the buffer into disjoint
/// per-rank row sets, runs one scoped OS thread per rank so the writes
/// overlap in wall-clock time, joins them all, and gives the buffer
/// back once no worker can touch it anymore.
fn compute_partitions<K: Kernel>(
    kernel: Arc<K>,
    config: RenderConfig,
    total_workers: usize,
    mut buffer: SharedBuffer,
    tx: UnboundedSender<CompletionSignal>,
) -> RenderResult<SharedBuffer> {
    let kernel_ref: &K = kernel.as_ref();

    let failure = {
        let partitions = buffer.stripe(total_workers)?;
        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(total_workers);
            for mut partition in partitions {
                let rank = partition.rank();
                let task = WorkerTask::new(rank, total_workers, config.clone());
                let tx = tx.clone();
                handles.push((
                    rank,
                    scope.spawn(move || worker::run_worker(&task, &mut partition, kernel_ref, &tx)),
                ));
            }

            let mut first_failure: Option<RenderError> = None;
            for (rank, handle) in handles {
                let outcome = match handle.join() {
                    Ok(result) => result,
                    Err(_) => Err(RenderError::Worker {
                        rank,
                        reason: "worker thread panicked".to_string(),
                    }),
                };
                if let Err(e) = outcome {
                    error!("Rank {} aborted the render: {}", rank, e);
                    if first_failure.is_none() {
                        first_failure = Some(e);
                    }
                }
            }
            first_failure
        })
    };

    drop(tx);
    match failure {
        Some(e) => Err(e),
        None => Ok(buffer),
    }
}

/// Counts completion signals up to `total_workers`, suspending between
/// arrivals. Arrival order is irrelevant; duplicates, unknown ranks and
/// mismatched offsets abort loudly, and a channel that closes early means
/// some rank never reported.
async fn collect_signals(
    mut rx: UnboundedReceiver<CompletionSignal>,
    total_workers: usize,
    wait_timeout: Duration,
    expected_offset: usize,
) -> RenderResult<()> {
    let mut state = RenderState::new(total_workers);
    state.dispatch()?;

    loop {
        let received = time::timeout(wait_timeout, rx.recv()).await.map_err(|_| {
            RenderError::Timeout {
                waited_secs: wait_timeout.as_secs(),
            }
        })?;

        let signal = match received {
            Some(signal) => signal,
            None => {
                return Err(RenderError::Consistency(format!(
                    "{} rank(s) never reported completion",
                    state.outstanding()
                )))
            }
        };

        debug!(
            "Completion signal from rank {} (offset {}), {} outstanding",
            signal.source_rank,
            signal.buffer_offset,
            state.outstanding()
        );

        if signal.buffer_offset != expected_offset {
            return Err(RenderError::Consistency(format!(
                "rank {} reported offset {}, expected {}",
                signal.source_rank, signal.buffer_offset, expected_offset
            )));
        }

        if state.record_signal(signal.source_rank)? {
            info!("All {} worker(s) reported completion", total_workers);
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::kernel::mandelbrot::MandelbrotKernel;
    use shared::kernel::KernelError;
    use shared::models::buffer::{Partition, BYTES_PER_PIXEL};
    use shared::models::{point::Point, resolution::Resolution};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RankFailingKernel {
        fail_rank: usize,
    }

    impl Kernel for RankFailingKernel {
        fn compute(
            &self,
            partition: &mut Partition<'_>,
            _config: &RenderConfig,
        ) -> Result<(), KernelError> {
            if partition.rank() == self.fail_rank {
                return Err(KernelError("synthetic kernel fault".to_string()));
            }
            Ok(())
        }
    }

    struct SlowKernel;

    impl Kernel for SlowKernel {
        fn compute(
            &self,
            _partition: &mut Partition<'_>,
            _config: &RenderConfig,
        ) -> Result<(), KernelError> {
            thread::sleep(Duration::from_millis(200));
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingSink {
        invocations: AtomicUsize,
    }

    impl Sink for CountingSink {
        fn consume(&self, _frame: &Frame) -> RenderResult<()> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn small_config() -> RenderConfig {
        RenderConfig::new(Point::new(-0.5, 0.0), 0.03, 150, Resolution::new(40, 27))
    }

    fn signal_channel(
        ranks: &[usize],
        offset: usize,
    ) -> UnboundedReceiver<CompletionSignal> {
        let (tx, rx) = mpsc::unbounded_channel();
        for &rank in ranks {
            tx.send(CompletionSignal::new(rank, offset)).unwrap();
        }
        rx
    }

    #[tokio::test]
    async fn collector_accepts_any_signal_order() {
        for order in [vec![0, 1, 2, 3], vec![3, 0, 2, 1], vec![1, 3, 0, 2]] {
            let rx = signal_channel(&order, 0);
            collect_signals(rx, 4, Duration::from_secs(1), 0)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn duplicate_signal_is_a_consistency_error_not_a_second_extraction() {
        let rx = signal_channel(&[0, 1, 1], 0);
        let err = collect_signals(rx, 3, Duration::from_secs(1), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Consistency(_)));
    }

    #[tokio::test]
    async fn mismatched_offset_is_a_consistency_error() {
        let rx = signal_channel(&[0], 7);
        let err = collect_signals(rx, 1, Duration::from_secs(1), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Consistency(_)));
    }

    #[tokio::test]
    async fn channel_closing_early_is_not_success() {
        let rx = signal_channel(&[0, 2], 0);
        let err = collect_signals(rx, 4, Duration::from_secs(1), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Consistency(_)));
    }

    #[tokio::test]
    async fn worker_count_is_a_performance_detail_not_a_semantic_one() {
        let config = small_config();
        let single = Coordinator::new(MandelbrotKernel::default())
            .render(config.clone(), 1)
            .await
            .unwrap();
        // 27 rows over 4 and 5 ranks exercises uneven stripes.
        for n in [4, 5] {
            let striped = Coordinator::new(MandelbrotKernel::default())
                .render(config.clone(), n)
                .await
                .unwrap();
            assert_eq!(striped.bytes, single.bytes, "N={} diverged from N=1", n);
        }
    }

    #[tokio::test]
    async fn repeated_renders_are_byte_identical() {
        let config = small_config();
        let coordinator = Coordinator::new(MandelbrotKernel::default());
        let first = coordinator.render(config.clone(), 3).await.unwrap();
        let second = coordinator.render(config, 3).await.unwrap();
        assert_eq!(first.bytes, second.bytes);
    }

    #[tokio::test]
    async fn full_grid_render_fills_every_pixel() {
        let mut config = RenderConfig::default();
        // Default grid, shallow iteration bound to keep the test quick.
        config.max_iteration = 4;
        let frame = Coordinator::new(MandelbrotKernel::default())
            .render(config, 4)
            .await
            .unwrap();
        assert_eq!(frame.len(), 1200 * 800 * BYTES_PER_PIXEL);
        assert!(frame
            .bytes
            .chunks_exact(BYTES_PER_PIXEL)
            .all(|px| px[3] == 0xff));
    }

    #[tokio::test]
    async fn failing_rank_aborts_render_and_never_reaches_the_sink() {
        let sink = CountingSink::default();
        let coordinator = Coordinator::new(RankFailingKernel { fail_rank: 2 });
        let err = coordinator
            .render_to_sink(small_config(), 4, &sink)
            .await
            .unwrap_err();
        match err {
            RenderError::Worker { rank, .. } => assert_eq!(rank, 2),
            other => panic!("expected worker failure, got {}", other),
        }
        assert_eq!(sink.invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_render_invokes_the_sink_exactly_once() {
        let sink = CountingSink::default();
        let coordinator = Coordinator::new(MandelbrotKernel::default());
        coordinator
            .render_to_sink(small_config(), 2, &sink)
            .await
            .unwrap();
        assert_eq!(sink.invocations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bounded_wait_fails_instead_of_hanging() {
        let coordinator = Coordinator::with_timeout(SlowKernel, Duration::from_millis(10));
        let err = coordinator.render(small_config(), 1).await.unwrap_err();
        assert!(matches!(err, RenderError::Timeout { .. }));
    }

    #[tokio::test]
    async fn zero_workers_is_rejected_before_dispatch() {
        let coordinator = Coordinator::new(MandelbrotKernel::default());
        let err = coordinator.render(small_config(), 0).await.unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }
}
