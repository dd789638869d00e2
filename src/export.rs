use crate::canvas::PixelCanvas;
use crate::cache::SceneCache;
use crate::city::CityConfig;
use crate::overlay::composite;
use crate::theme::theme_for;
use chrono::{DateTime, TimeZone};
use image::ImageFormat;
use std::{fs, io, path::Path};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot export an empty {0}x{1} frame")]
    EmptyCanvas(u32, u32),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("png encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Render one composited frame synchronously, outside any frame loop.
pub fn render_frame(config: &CityConfig, width: u32, height: u32, t_ms: f64) -> PixelCanvas {
    let mut cache = SceneCache::new();
    render_frame_cached(&mut cache, config, width, height, t_ms)
}

/// Same as [`render_frame`] but reusing (and refreshing) an existing cache.
pub fn render_frame_cached(
    cache: &mut SceneCache,
    config: &CityConfig,
    width: u32,
    height: u32,
    t_ms: f64,
) -> PixelCanvas {
    let scene = cache.get_or_render(config, width, height);
    let mut frame = PixelCanvas::new(width, height);
    composite(&mut frame, &scene, config, &theme_for(config.environment), t_ms);
    frame
}

pub fn write_png(canvas: &PixelCanvas, path: &Path) -> Result<(), ExportError> {
    if canvas.is_empty() {
        return Err(ExportError::EmptyCanvas(canvas.w, canvas.h));
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    canvas
        .to_rgba_image()
        .save_with_format(path, ImageFormat::Png)?;
    info!(path = %path.display(), width = canvas.w, height = canvas.h, "frame exported");
    Ok(())
}

pub fn default_file_name<Tz: TimeZone>(now: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("futurecity-{}.png", now.format("%Y%m%d-%H%M%S"))
}
