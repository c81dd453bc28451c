use complex_rs::complex::Complex;

use crate::graphics::color::PaletteHandler;
use crate::models::buffer::{Partition, BYTES_PER_PIXEL};
use crate::models::render_config::RenderConfig;

use super::{Kernel, KernelError};

/// Escape-time Mandelbrot kernel. Pure arithmetic over the rows it is
/// handed, so identical configs produce byte-identical pixels no matter
/// how the grid was partitioned.
#[derive(Debug, Clone, Copy, Default)]
pub struct MandelbrotKernel {
    pub palette: PaletteHandler,
}

impl MandelbrotKernel {
    pub fn new(palette: PaletteHandler) -> Self {
        Self { palette }
    }

    /// Iterations until escape, or `None` for interior points.
    fn escape_count(&self, c: Complex, max_iteration: u32) -> Option<u32> {
        let mut z = Complex::new(0.0, 0.0);
        for i in 0..max_iteration {
            z = z * z + c;
            if z.arg_sq() > 4.0 {
                return Some(i);
            }
        }
        None
    }
}

impl Kernel for MandelbrotKernel {
    fn compute(
        &self,
        partition: &mut Partition<'_>,
        config: &RenderConfig,
    ) -> Result<(), KernelError> {
        let nx = config.resolution.nx as usize;
        if partition.width() != nx {
            return Err(KernelError(format!(
                "partition width {} does not match grid width {}",
                partition.width(),
                nx
            )));
        }

        let half_x = nx as f64 / 2.0;
        let half_y = config.resolution.ny as f64 / 2.0;

        for (row, bytes) in partition.rows_mut() {
            let y = config.center.y + (row as f64 - half_y) * config.step;
            for (col, pixel) in bytes.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                let x = config.center.x + (col as f64 - half_x) * config.step;
                let (r, g, b) = match self.escape_count(Complex::new(x, y), config.max_iteration)
                {
                    Some(i) => self
                        .palette
                        .calculate_color(i as f64 / config.max_iteration as f64),
                    None => (0, 0, 0),
                };
                pixel.copy_from_slice(&[r, g, b, 0xff]);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{buffer::SharedBuffer, point::Point, resolution::Resolution};

    fn small_config() -> RenderConfig {
        RenderConfig::new(Point::new(-0.5, 0.0), 0.05, 200, Resolution::new(24, 17))
    }

    fn render_single(config: &RenderConfig) -> Vec<u8> {
        let kernel = MandelbrotKernel::default();
        let mut buffer = SharedBuffer::new(config.resolution);
        for mut partition in buffer.stripe(1).unwrap() {
            kernel.compute(&mut partition, config).unwrap();
        }
        buffer.into_bytes()
    }

    #[test]
    fn output_region_starts_at_offset_zero() {
        assert_eq!(MandelbrotKernel::default().buffer_offset(), 0);
    }

    #[test]
    fn identical_configs_render_identical_bytes() {
        let config = small_config();
        assert_eq!(render_single(&config), render_single(&config));
    }

    #[test]
    fn every_pixel_gets_an_opaque_alpha() {
        let config = small_config();
        let bytes = render_single(&config);
        assert_eq!(bytes.len(), config.resolution.pixel_count() * BYTES_PER_PIXEL);
        assert!(bytes.chunks_exact(BYTES_PER_PIXEL).all(|px| px[3] == 0xff));
    }

    #[test]
    fn rejects_partition_with_foreign_width() {
        let kernel = MandelbrotKernel::default();
        let config = small_config();
        let mut buffer = SharedBuffer::new(Resolution::new(10, 4));
        let mut partitions = buffer.stripe(1).unwrap();
        assert!(kernel.compute(&mut partitions[0], &config).is_err());
    }
}
