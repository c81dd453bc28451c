use std::fmt;

pub type RenderResult<T> = Result<T, RenderError>;

/// Everything that can sink a render, from rejected configuration to a
/// failed output write. Worker and consistency failures abort the whole
/// render: a partial image is never a meaningful output.
#[derive(Debug)]
pub enum RenderError {
    /// Rejected before any worker is spawned.
    Config(String),
    /// The kernel failed for one rank; the render is aborted.
    Worker { rank: usize, reason: String },
    /// Duplicate or spurious completion signals, missing signals after a
    /// clean join, or any other internal bookkeeping defect.
    Consistency(String),
    /// Writing or encoding the finished frame failed. The computed frame
    /// is still held by the caller so only the sink step needs a retry.
    Sink(String),
    /// No completion signal arrived within the coordinator's bounded wait.
    Timeout { waited_secs: u64 },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Config(reason) => write!(f, "invalid render config: {}", reason),
            RenderError::Worker { rank, reason } => {
                write!(f, "worker rank {} failed: {}", rank, reason)
            }
            RenderError::Consistency(reason) => {
                write!(f, "render consistency defect: {}", reason)
            }
            RenderError::Sink(reason) => write!(f, "output sink failed: {}", reason),
            RenderError::Timeout { waited_secs } => {
                write!(
                    f,
                    "render timed out after {}s without all workers reporting",
                    waited_secs
                )
            }
        }
    }
}

impl std::error::Error for RenderError {}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Sink(e.to_string())
    }
}

impl From<image::ImageError> for RenderError {
    fn from(e: image::ImageError) -> Self {
        RenderError::Sink(e.to_string())
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        RenderError::Config(e.to_string())
    }
}
