use clap::Subcommand;

use self::render::RenderCommand;

pub mod render;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 🎨 Render Mode
    ///
    /// Compute one Mandelbrot frame across a pool of workers and write it to disk.
    Render(RenderCommand),
}
