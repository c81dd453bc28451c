pub mod mandelbrot;

use std::fmt;

use crate::models::{buffer::Partition, render_config::RenderConfig};

/// A kernel invocation failed for one rank. The worker wraps this with
/// its rank before handing it to the coordinator.
#[derive(Debug)]
pub struct KernelError(pub String);

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kernel error: {}", self.0)
    }
}

impl std::error::Error for KernelError {}

/// The pure numeric computation filling pixel values for one rank.
///
/// Implementations must be safe to call concurrently from different
/// ranks against the same render; disjointness of the writes is the
/// caller's responsibility and is upheld by the row striping in
/// [`crate::models::buffer::SharedBuffer::stripe`], which is why
/// `compute` only ever sees the rows its rank owns.
pub trait Kernel: Send + Sync {
    /// Fills every pixel of the given partition in place.
    fn compute(
        &self,
        partition: &mut Partition<'_>,
        config: &RenderConfig,
    ) -> Result<(), KernelError>;

    /// Base offset of the output region inside the shared buffer.
    /// The buffer is singular, so this is the well-known value 0;
    /// queried once after all workers report done and echoed in every
    /// completion signal.
    fn buffer_offset(&self) -> usize {
        0
    }
}
