pub mod embed;
pub mod extract;
pub mod hook;

use std::path::Path;

use anyhow::Result;

use crate::config::WatermarkConfig;
use hook::PipelineHook;

/// Result of a full embed -> hook -> extract roundtrip.
pub struct RoundtripResult {
    /// Payload that was embedded.
    pub embedded: String,
    /// Text read back after the hook ran.
    pub extracted: String,
    /// Share of bits read with full margin.
    pub confidence: f64,
    /// `true` if the payload survived unchanged.
    pub matched: bool,
}

/// Run a full embed -> hook -> extract roundtrip.
///
/// Steps:
/// 1. Embeds `payload` into `input`, writing `marked_path`.
/// 2. Calls `hook.after_embed(marked_path)`.
/// 3. Extracts from the path returned by the hook with the same config.
///    Raw framing reads back exactly the payload's length.
///
/// # Example
///
/// ```rust,no_run
/// use std::path::Path;
/// use lumamark::{roundtrip, NoopHook, WatermarkConfig};
///
/// let result = roundtrip(
///     Path::new("photo.png"),
///     Path::new("marked.png"),
///     "owner:42",
///     &WatermarkConfig::default(),
///     &NoopHook,
/// ).unwrap();
///
/// assert!(result.matched, "mark lost: {:?}", result.extracted);
/// ```
pub fn roundtrip<H: PipelineHook>(
    input: &Path,
    marked_path: &Path,
    payload: &str,
    cfg: &WatermarkConfig,
    hook: &H,
) -> Result<RoundtripResult> {
    embed::embed_file(input, marked_path, payload, cfg)?;

    let extract_from = hook.after_embed(marked_path)?;

    let read_cfg = WatermarkConfig {
        expected_len: payload.chars().count(),
        ..cfg.clone()
    };
    let extraction = extract::extract_file(&extract_from, &read_cfg)?;
    let matched = extraction.text == payload;

    Ok(RoundtripResult {
        embedded: payload.to_string(),
        extracted: extraction.text.clone(),
        confidence: extraction.confidence(),
        matched,
    })
}
