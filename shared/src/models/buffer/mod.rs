use crate::errors::{RenderError, RenderResult};

use super::resolution::Resolution;

/// RGBA, one byte per channel.
pub const BYTES_PER_PIXEL: usize = 4;

/// The single pixel allocation of one render. Allocated zeroed by the
/// coordinator, written by all workers through disjoint [`Partition`]s,
/// then reclaimed whole once every rank has reported completion.
#[derive(Debug)]
pub struct SharedBuffer {
    data: Vec<u8>,
    resolution: Resolution,
}

impl SharedBuffer {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            data: vec![0u8; resolution.pixel_count() * BYTES_PER_PIXEL],
            resolution,
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Splits the buffer into `total_workers` disjoint row stripes,
    /// assigning row `r` to rank `r % total_workers`. The stripes cover
    /// every row exactly once for any grid height and any N >= 1, uneven
    /// splits included; a rank may end up with zero rows when N exceeds
    /// the grid height. Because each row slice comes out of `chunks_mut`
    /// no two partitions can alias, so workers write without locks.
    pub fn stripe(&mut self, total_workers: usize) -> RenderResult<Vec<Partition<'_>>> {
        if total_workers == 0 {
            return Err(RenderError::Config(
                "total_workers must be at least 1".to_string(),
            ));
        }

        let width = self.resolution.nx as usize;
        let mut partitions: Vec<Partition> = (0..total_workers)
            .map(|rank| Partition {
                rank,
                total_workers,
                width,
                rows: Vec::new(),
            })
            .collect();

        for (row, bytes) in self.data.chunks_mut(width * BYTES_PER_PIXEL).enumerate() {
            partitions[row % total_workers].rows.push((row, bytes));
        }

        Ok(partitions)
    }
}

/// One rank's striped view into the shared buffer: the rows it owns,
/// each tagged with its absolute row index so the kernel can map pixels
/// back onto the complex plane.
#[derive(Debug)]
pub struct Partition<'a> {
    rank: usize,
    total_workers: usize,
    width: usize,
    rows: Vec<(usize, &'a mut [u8])>,
}

impl<'a> Partition<'a> {
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn total_workers(&self) -> usize {
        self.total_workers
    }

    /// Pixels per row.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = (usize, &mut [u8])> + use<'_, 'a> {
        self.rows.iter_mut().map(|(row, bytes)| (*row, &mut **bytes))
    }
}
