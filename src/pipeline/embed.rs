use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::config::{self, Framing, WatermarkConfig};
use crate::imaging;
use crate::watermark::Watermarker;

/// Summary of a completed embed.
#[derive(Debug, Clone)]
pub struct EmbedReport {
    pub width: usize,
    pub height: usize,
    /// Bits written, frame header included.
    pub bits: usize,
    /// Bits the image could hold.
    pub capacity: usize,
}

/// Full embed pipeline: image -> YCbCr -> mark luma -> RGB -> image.
pub fn embed_file(
    input_path: &Path,
    output_path: &Path,
    payload: &str,
    cfg: &WatermarkConfig,
) -> Result<EmbedReport> {
    let watermarker = Watermarker::new(cfg)?;

    // Step 1: Decode and split into planes
    let planes = imaging::load_planes(input_path)?;
    let (width, height) = (planes.luma.width(), planes.luma.height());
    let capacity = watermarker.capacity(&planes.luma);

    // Step 2: Mark the luminance channel
    let luma = match cfg.framing {
        Framing::Raw => watermarker.embed(&planes.luma, payload, cfg.key),
        Framing::Checked => watermarker.embed_checked(&planes.luma, payload, cfg.key),
    }
    .with_context(|| format!("failed to embed into {}", input_path.display()))?;

    let header_bits = match cfg.framing {
        Framing::Raw => 0,
        Framing::Checked => config::FRAME_HEADER_BITS,
    };
    let bits = header_bits + payload.chars().count() * 8;

    // Step 3: Recombine with the untouched chroma and write
    let marked = planes.with_luma(luma);
    imaging::save_rgb(&marked.to_rgb(), output_path)?;

    info!(
        "embed complete: {} bits of {} available -> {}",
        bits,
        capacity,
        output_path.display()
    );
    Ok(EmbedReport {
        width,
        height,
        bits,
        capacity,
    })
}
