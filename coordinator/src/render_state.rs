use std::collections::HashSet;

use shared::errors::{RenderError, RenderResult};

/// Lifecycle of one render. `Complete` is terminal and is reached exactly
/// once, on the final completion signal; there is no way back to
/// `Dispatched`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dispatched,
    Complete,
}

/// Tracks which ranks have reported for one render. The signal count can
/// never exceed the worker count: duplicate, unknown, or post-completion
/// signals are consistency defects and abort loudly instead of silently
/// re-triggering extraction.
#[derive(Debug, Clone)]
pub struct RenderState {
    phase: Phase,
    total_workers: usize,
    seen_ranks: HashSet<usize>,
}

impl RenderState {
    pub fn new(total_workers: usize) -> Self {
        RenderState {
            phase: Phase::Idle,
            total_workers,
            seen_ranks: HashSet::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outstanding(&self) -> usize {
        self.total_workers - self.seen_ranks.len()
    }

    pub fn dispatch(&mut self) -> RenderResult<()> {
        if self.phase != Phase::Idle {
            return Err(RenderError::Consistency(
                "render dispatched twice".to_string(),
            ));
        }
        self.phase = Phase::Dispatched;
        Ok(())
    }

    /// Records one completion signal. Returns `true` when it was the
    /// final outstanding one, i.e. exactly once per render.
    pub fn record_signal(&mut self, rank: usize) -> RenderResult<bool> {
        match self.phase {
            Phase::Idle => Err(RenderError::Consistency(format!(
                "completion signal from rank {} before dispatch",
                rank
            ))),
            Phase::Complete => Err(RenderError::Consistency(format!(
                "completion signal from rank {} after extraction was triggered",
                rank
            ))),
            Phase::Dispatched => {
                if rank >= self.total_workers {
                    return Err(RenderError::Consistency(format!(
                        "completion signal from unknown rank {} (total workers {})",
                        rank, self.total_workers
                    )));
                }
                if !self.seen_ranks.insert(rank) {
                    return Err(RenderError::Consistency(format!(
                        "duplicate completion signal from rank {}",
                        rank
                    )));
                }
                if self.seen_ranks.len() == self.total_workers {
                    self.phase = Phase::Complete;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }
    }
}
