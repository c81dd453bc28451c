use std::fs;
use std::path::PathBuf;

use image::ColorType;
use log::info;
use shared::{errors::RenderResult, models::frame::Frame};

/// Consumes one completed frame. Invoked exactly once per render, only
/// after every rank has reported; a failing sink never leaves a partial
/// render behind because the frame stays with the caller for a retry of
/// the sink step alone.
pub trait Sink {
    fn consume(&self, frame: &Frame) -> RenderResult<()>;
}

/// Writes the raw RGBA dump verbatim and optionally a PNG encoding of
/// the same bytes.
#[derive(Debug, Clone)]
pub struct FileSink {
    raw_path: PathBuf,
    png_path: Option<PathBuf>,
}

impl FileSink {
    pub fn new(raw_path: PathBuf, png_path: Option<PathBuf>) -> Self {
        Self { raw_path, png_path }
    }
}

impl Sink for FileSink {
    fn consume(&self, frame: &Frame) -> RenderResult<()> {
        fs::write(&self.raw_path, &frame.bytes)?;
        info!(
            "Raw frame written to {} ({} bytes)",
            self.raw_path.display(),
            frame.len()
        );

        if let Some(png_path) = &self.png_path {
            image::save_buffer(
                png_path,
                &frame.bytes,
                frame.resolution.nx as u32,
                frame.resolution.ny as u32,
                ColorType::Rgba8,
            )?;
            info!("PNG frame written to {}", png_path.display());
        }

        Ok(())
    }
}
