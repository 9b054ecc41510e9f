use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::config::{self, Framing, WatermarkConfig};
use crate::imaging;
use crate::watermark::{Extraction, Watermarker};

/// Full extract pipeline: image -> YCbCr -> read luma signs -> text.
///
/// Raw framing reads `cfg.expected_len` characters; checked framing reads
/// the length from the embedded header.
pub fn extract_file(input_path: &Path, cfg: &WatermarkConfig) -> Result<Extraction> {
    let watermarker = Watermarker::new(cfg)?;
    let planes = imaging::load_planes(input_path)?;

    let extraction = match cfg.framing {
        Framing::Raw => watermarker.inspect(&planes.luma, cfg.key, cfg.expected_len * 8),
        Framing::Checked => watermarker.extract_checked(&planes.luma, cfg.key),
    }
    .with_context(|| format!("failed to extract from {}", input_path.display()))?;

    info!(
        "extract complete: {} bits from {} ({:.0}% confidence)",
        extraction.bits.len(),
        input_path.display(),
        extraction.confidence() * 100.0
    );
    Ok(extraction)
}

/// Number of bits an image file can carry.
pub fn capacity_of(input_path: &Path) -> Result<usize> {
    let (width, height) = image::image_dimensions(input_path)
        .with_context(|| format!("failed to read dimensions of {}", input_path.display()))?;
    Ok(config::blocks_in(height as usize, width as usize))
}
