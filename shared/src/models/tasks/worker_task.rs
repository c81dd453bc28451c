use serde::{Deserialize, Serialize};

use crate::models::render_config::RenderConfig;

/// One rank's unit of work. Built by the coordinator at dispatch time,
/// consumed once by exactly one worker, never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerTask {
    pub rank: usize,
    pub total_workers: usize,
    pub config: RenderConfig,
}

impl WorkerTask {
    pub fn new(rank: usize, total_workers: usize, config: RenderConfig) -> Self {
        Self {
            rank,
            total_workers,
            config,
        }
    }
}
