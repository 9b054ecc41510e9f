use std::path::{Path, PathBuf};

use anyhow::Result;
use image::{Rgb, RgbImage};
use lumamark::{
    capacity_of, embed_file, extract_file, roundtrip, Framing, NoopHook, PipelineHook,
    WatermarkConfig,
};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lumamark_test_{}", name));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Gray texture: neutral chroma keeps the RGB roundtrip exact on luma.
fn write_gray_texture(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let v = (100 + (x * 13 + y * 29) % 41 + ((x / 8 + y / 8) % 5) * 6) as u8;
        Rgb([v, v, v])
    });
    img.save(path).unwrap();
}

fn write_color_texture(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (120 + (x * 7 + y * 3) % 20) as u8,
            (125 + (x * 5 + y * 11) % 16) as u8,
            (115 + (x * 2 + y * 9) % 24) as u8,
        ])
    });
    img.save(path).unwrap();
}

#[test]
fn embed_then_extract_png() {
    let dir = scratch_dir("embed_extract");
    let input = dir.join("input.png");
    let output = dir.join("marked.png");
    write_gray_texture(&input, 128, 96);

    let cfg = WatermarkConfig {
        key: 42,
        ..WatermarkConfig::default()
    };
    let report = embed_file(&input, &output, "owner:1729", &cfg).unwrap();
    assert_eq!(report.bits, 80);
    assert_eq!(report.capacity, 16 * 12);
    assert_eq!((report.width, report.height), (128, 96));

    let read_cfg = WatermarkConfig {
        expected_len: 10,
        ..cfg
    };
    let extraction = extract_file(&output, &read_cfg).unwrap();
    assert_eq!(extraction.text, "owner:1729");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn color_image_roundtrip() {
    let dir = scratch_dir("color");
    let input = dir.join("input.png");
    write_color_texture(&input, 96, 96);

    let result = roundtrip(
        &input,
        &dir.join("marked.png"),
        "AB",
        &WatermarkConfig::default(),
        &NoopHook,
    )
    .unwrap();
    assert!(result.matched, "got {:?}", result.extracted);
    assert_eq!(result.embedded, "AB");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn checked_roundtrip_needs_no_length() {
    let dir = scratch_dir("checked");
    let input = dir.join("input.png");
    let output = dir.join("marked.png");
    write_gray_texture(&input, 128, 128);

    let cfg = WatermarkConfig {
        key: -3,
        framing: Framing::Checked,
        expected_len: 0,
        ..WatermarkConfig::default()
    };
    let report = embed_file(&input, &output, "img-0042", &cfg).unwrap();
    assert_eq!(report.bits, 56 + 64);

    let extraction = extract_file(&output, &cfg).unwrap();
    assert_eq!(extraction.text, "img-0042");

    let wrong_key = WatermarkConfig { key: 4, ..cfg };
    assert!(extract_file(&output, &wrong_key).is_err());

    std::fs::remove_dir_all(&dir).ok();
}

struct BmpTranscodeHook;

impl PipelineHook for BmpTranscodeHook {
    fn after_embed(&self, marked_path: &Path) -> Result<PathBuf> {
        let target = marked_path.with_extension("bmp");
        image::open(marked_path)?.save(&target)?;
        Ok(target)
    }
}

#[test]
fn survives_lossless_transcode() {
    let dir = scratch_dir("transcode");
    let input = dir.join("input.png");
    write_gray_texture(&input, 80, 80);

    let result = roundtrip(
        &input,
        &dir.join("marked.png"),
        "lossless",
        &WatermarkConfig::default(),
        &BmpTranscodeHook,
    )
    .unwrap();
    assert!(result.matched);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn payload_too_large_fails_without_output() {
    let dir = scratch_dir("too_large");
    let input = dir.join("input.png");
    let output = dir.join("marked.png");
    write_gray_texture(&input, 20, 20);

    assert_eq!(capacity_of(&input).unwrap(), 4);
    let err = embed_file(&input, &output, "A", &WatermarkConfig::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("only 4 are available"));
    assert!(!output.exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_input_is_an_error() {
    let dir = scratch_dir("missing");
    let err = extract_file(&dir.join("nope.png"), &WatermarkConfig::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("failed to load image"));
    std::fs::remove_dir_all(&dir).ok();
}
