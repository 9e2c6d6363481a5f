//! Depth map output and file path generation

use crate::depth_map::DepthMap;
use clap::ValueEnum;
use image::{ImageBuffer, Luma, Rgb32FImage};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Encoding of written depth maps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 16-bit grayscale PNG, depth clamped to [0, 1] (default)
    #[default]
    Png16,
    /// 32-bit float OpenEXR, depth stored unchanged
    Exr,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png16 => "png",
            OutputFormat::Exr => "exr",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Png16 => write!(f, "png16"),
            OutputFormat::Exr => write!(f, "exr"),
        }
    }
}

fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Convert depth to 16-bit luma. Values outside [0, 1] are clamped.
pub fn to_luma16(map: &DepthMap) -> ImageBuffer<Luma<u16>, Vec<u16>> {
    let (width, height) = map.dimensions();
    ImageBuffer::from_fn(width, height, |x, y| {
        let d = map.get(x, y);
        let d = if d.is_nan() { 0.0 } else { d.clamp(0.0, 1.0) };
        Luma([(d * u16::MAX as f32).round() as u16])
    })
}

/// Save a depth map as a 16-bit grayscale PNG.
pub fn save_depth_png16(map: &DepthMap, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    to_luma16(map).save(path)?;
    Ok(())
}

/// Save a depth map as a float EXR, depth replicated into RGB.
pub fn save_depth_exr(map: &DepthMap, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    let (width, height) = map.dimensions();
    let image = Rgb32FImage::from_fn(width, height, |x, y| {
        let d = map.get(x, y);
        image::Rgb([d, d, d])
    });
    image.save(path)?;
    Ok(())
}

/// Save a depth map in the given format.
pub fn save_depth(map: &DepthMap, path: &Path, format: OutputFormat) -> Result<(), OutputError> {
    match format {
        OutputFormat::Png16 => save_depth_png16(map, path),
        OutputFormat::Exr => save_depth_exr(map, path),
    }
}

/// Generate the output path for a filtered depth map.
///
/// # Output Naming Rules
///
/// | Scenario | Output |
/// |----------|--------|
/// | No `-o` | `{dir}/{stem}{suffix}.{ext}` next to the input |
/// | `-o out.png`, single input | `out.png` |
/// | `-o out.png`, multiple inputs | `out_{stem}.png` |
/// | `-o dir/` | `dir/{stem}.{ext}` |
pub fn generate_output_path(
    input: &Path,
    output_arg: Option<&Path>,
    suffix: &str,
    format: OutputFormat,
    is_single_input: bool,
) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("depth");
    let ext = format.extension();

    match output_arg {
        None => {
            let parent = input.parent().unwrap_or(Path::new(""));
            parent.join(format!("{}{}.{}", stem, suffix, ext))
        }
        Some(output) => {
            let output_str = output.to_string_lossy();
            if output_str.ends_with('/') || output.is_dir() {
                output.join(format!("{}.{}", stem, ext))
            } else if is_single_input {
                output.to_path_buf()
            } else {
                let out_stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
                let out_ext = output.extension().and_then(|s| s.to_str()).unwrap_or(ext);
                let parent = output.parent().unwrap_or(Path::new(""));
                parent.join(format!("{}_{}.{}", out_stem, stem, out_ext))
            }
        }
    }
}
