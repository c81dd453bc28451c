use std::path::PathBuf;

use clap::Parser;

/// 🎨 Render Command
///
/// Computes one frame of the Mandelbrot set across a fixed pool of
/// concurrent workers sharing a single pixel buffer.
#[derive(Parser, Debug)]
#[command(name = "render", about = "🎨 Render one Mandelbrot frame.", long_about = None)]
pub struct RenderCommand {
    /// 👷 Worker count
    ///
    /// Number of concurrent workers the pixel grid is striped across.
    /// Purely a performance knob: any N produces the same bytes.
    /// Default is 4 if not specified.
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// 💾 Raw dump destination
    ///
    /// Receives the finished frame verbatim, 4 bytes per pixel, row-major.
    /// Default is `mandelbrot.bin`.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// 🖼️ Optional PNG encoding of the same frame.
    #[arg(long, value_name = "PATH")]
    pub png: Option<PathBuf>,

    /// 📄 JSON RenderConfig file; the flags below override its fields.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Viewport center, real part.
    #[arg(long, value_name = "X")]
    pub center_x: Option<f64>,

    /// Viewport center, imaginary part.
    #[arg(long, value_name = "Y")]
    pub center_y: Option<f64>,

    /// Complex-plane distance covered by one pixel.
    #[arg(long, value_name = "STEP")]
    pub step: Option<f64>,

    /// Escape-time iteration bound.
    #[arg(long, value_name = "ITERATIONS")]
    pub max_iteration: Option<u32>,

    /// Grid width in pixels.
    #[arg(long, value_name = "PIXELS")]
    pub width: Option<u16>,

    /// Grid height in pixels.
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<u16>,
}
