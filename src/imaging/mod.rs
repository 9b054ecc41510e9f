//! Image file collaborator: RGB files in, luma/chroma planes out, and back.
//!
//! Uses full-range BT.601 YCbCr, the same convention as JPEG and OpenCV's
//! `COLOR_BGR2YCrCb`.

use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use log::{info, warn};

use crate::channel::Channel;

/// An image split into a luminance channel and two chroma channels.
#[derive(Debug, Clone)]
pub struct YccPlanes {
    pub luma: Channel,
    pub cb: Channel,
    pub cr: Channel,
}

fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

impl YccPlanes {
    /// Convert RGB pixels. Every plane is rounded to whole 8-bit levels.
    pub fn from_rgb(img: &RgbImage) -> Self {
        let (w, h) = (img.width() as usize, img.height() as usize);
        let mut luma = Vec::with_capacity(w * h);
        let mut cb = Vec::with_capacity(w * h);
        let mut cr = Vec::with_capacity(w * h);

        for Rgb([r, g, b]) in img.pixels() {
            let (r, g, b) = (f64::from(*r), f64::from(*g), f64::from(*b));
            let y = 0.299 * r + 0.587 * g + 0.114 * b;
            luma.push(f64::from(to_u8(y)));
            cr.push(f64::from(to_u8((r - y) * 0.713 + 128.0)));
            cb.push(f64::from(to_u8((b - y) * 0.564 + 128.0)));
        }

        Self {
            luma: Channel::from_fn(w, h, |row, col| luma[row * w + col]),
            cb: Channel::from_fn(w, h, |row, col| cb[row * w + col]),
            cr: Channel::from_fn(w, h, |row, col| cr[row * w + col]),
        }
    }

    /// Recombine the planes into RGB, rounding and saturating each channel.
    pub fn to_rgb(&self) -> RgbImage {
        let (w, h) = (self.luma.width(), self.luma.height());
        let mut img = RgbImage::new(w as u32, h as u32);
        for (i, px) in img.pixels_mut().enumerate() {
            let y = self.luma.samples()[i];
            let cb = self.cb.samples()[i] - 128.0;
            let cr = self.cr.samples()[i] - 128.0;
            *px = Rgb([
                to_u8(y + 1.403 * cr),
                to_u8(y - 0.714 * cr - 0.344 * cb),
                to_u8(y + 1.773 * cb),
            ]);
        }
        img
    }

    /// Replace the luminance channel, keeping chroma untouched.
    pub fn with_luma(self, luma: Channel) -> Self {
        Self { luma, ..self }
    }
}

/// Decode an image file and split it into planes.
pub fn load_planes(path: &Path) -> Result<YccPlanes> {
    let img = image::open(path)
        .with_context(|| format!("failed to load image {}", path.display()))?
        .to_rgb8();
    info!("loaded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(YccPlanes::from_rgb(&img))
}

/// Save an RGB image with format-specific settings.
///
/// JPEG is written at quality 100; lossy output may still damage a mark.
pub fn save_rgb(img: &RgbImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("unsupported output format: {}", path.display()))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let dyn_img = DynamicImage::ImageRgb8(img.clone());
    match format {
        ImageFormat::Jpeg => {
            warn!("writing lossy JPEG {}, the watermark may not survive", path.display());
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 100);
            encoder.encode_image(&dyn_img)?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp => {
            dyn_img.save(path)?;
        }
        other => bail!("unsupported output format: {:?}", other),
    }

    info!("wrote {}", path.display());
    Ok(())
}

/// Check if a file has a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_pixels_have_neutral_chroma() {
        let img = RgbImage::from_pixel(4, 2, Rgb([77, 77, 77]));
        let planes = YccPlanes::from_rgb(&img);
        assert!(planes.luma.samples().iter().all(|&v| v == 77.0));
        assert!(planes.cb.samples().iter().all(|&v| v == 128.0));
        assert!(planes.cr.samples().iter().all(|&v| v == 128.0));
        assert_eq!(planes.to_rgb(), img);
    }

    #[test]
    fn test_color_roundtrip_is_close() {
        let img = RgbImage::from_fn(16, 16, |x, y| {
            Rgb([(x * 15) as u8, (y * 15) as u8, ((x + y) * 7) as u8])
        });
        let back = YccPlanes::from_rgb(&img).to_rgb();
        for (a, b) in img.pixels().zip(back.pixels()) {
            for c in 0..3 {
                assert!((i16::from(a[c]) - i16::from(b[c])).abs() <= 3);
            }
        }
    }

    #[test]
    fn test_with_luma_keeps_chroma() {
        let img = RgbImage::from_pixel(8, 8, Rgb([200, 10, 40]));
        let planes = YccPlanes::from_rgb(&img);
        let cb = planes.cb.clone();
        let replaced = planes.with_luma(Channel::zeroed(8, 8));
        assert_eq!(replaced.cb, cb);
        assert!(replaced.luma.samples().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("photo.PNG")));
        assert!(is_supported_image(Path::new("a/b.jpeg")));
        assert!(!is_supported_image(Path::new("photo.gif")));
        assert!(!is_supported_image(Path::new("photo")));
    }
}
