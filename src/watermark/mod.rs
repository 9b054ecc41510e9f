//! Sign-modulation watermark engine.
//!
//! Each payload bit is carried by one keyed 8x8 block of the luminance
//! channel. The block's chosen DCT coefficient is forced positive for a 1
//! and negative for a 0, with magnitude at least `strength` above its
//! original magnitude. Extraction reads the sign back.

use log::{debug, info, warn};
use thiserror::Error;

use crate::bits::{self, BitsError};
use crate::blocks::{self, Block};
use crate::channel::Channel;
use crate::config::{self, Coefficient, WatermarkConfig};
use crate::dct::BlockTransform;
use crate::frame::{self, FrameError, FrameHeader};
use crate::select::{self, SelectError};

/// Slack for transform round-off when judging a coefficient weak.
const MARGIN_TOLERANCE: f64 = 1e-6;

#[derive(Error, Debug)]
pub enum WatermarkError {
    #[error(transparent)]
    Capacity(#[from] SelectError),
    #[error(transparent)]
    Encoding(#[from] BitsError),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Bits read back from a channel, with a confidence signal.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub text: String,
    /// Every bit read, frame header included for checked extraction.
    pub bits: Vec<u8>,
    /// Bits whose coefficient magnitude was below the embedding strength.
    /// Nonzero counts usually mean the image was re-encoded or the key is wrong.
    pub weak_bits: usize,
}

impl Extraction {
    /// Fraction of bits read with full embedding margin.
    pub fn confidence(&self) -> f64 {
        if self.bits.is_empty() {
            return 1.0;
        }
        1.0 - self.weak_bits as f64 / self.bits.len() as f64
    }
}

/// Embeds and extracts payloads. Immutable once built; share freely
/// across threads.
pub struct Watermarker {
    strength: f64,
    coefficient: Coefficient,
    dct: BlockTransform,
}

impl Watermarker {
    pub fn new(cfg: &WatermarkConfig) -> Result<Self, WatermarkError> {
        if !cfg.coefficient.is_valid() {
            return Err(WatermarkError::InvalidConfig(format!(
                "coefficient ({}, {}) lies outside the {}x{} block",
                cfg.coefficient.row,
                cfg.coefficient.col,
                config::BLOCK_SIZE,
                config::BLOCK_SIZE
            )));
        }
        if !cfg.strength.is_finite() || cfg.strength < 0.0 {
            return Err(WatermarkError::InvalidConfig(format!(
                "strength must be a finite non-negative number, got {}",
                cfg.strength
            )));
        }

        Ok(Self {
            strength: cfg.strength,
            coefficient: cfg.coefficient,
            dct: BlockTransform::new(),
        })
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn coefficient(&self) -> Coefficient {
        self.coefficient
    }

    /// Number of bits `channel` can carry.
    pub fn capacity(&self, channel: &Channel) -> usize {
        config::blocks_in(channel.height(), channel.width())
    }

    /// Embed `payload` and return the modified channel, clipped to [0, 255].
    pub fn embed(&self, channel: &Channel, payload: &str, key: i64) -> Result<Channel, WatermarkError> {
        let bits = bits::encode(payload)?;
        self.embed_bits(channel, &bits, key)
    }

    /// Embed `payload` behind a magic/length/CRC header so it can be
    /// extracted without knowing its length.
    pub fn embed_checked(
        &self,
        channel: &Channel,
        payload: &str,
        key: i64,
    ) -> Result<Channel, WatermarkError> {
        let framed = frame::seal(&bits::text_to_bytes(payload)?)?;
        self.embed_bits(channel, &bits::bytes_to_bits(&framed), key)
    }

    /// Embed an arbitrary bit sequence. Nothing is modified unless every
    /// bit has a block.
    pub fn embed_bits(&self, channel: &Channel, bits: &[u8], key: i64) -> Result<Channel, WatermarkError> {
        let total = self.capacity(channel);
        let positions = select::select(total, bits.len(), key)?;
        info!(
            "embedding {} bits into {} of {} blocks ({}x{} channel)",
            bits.len(),
            positions.len(),
            total,
            channel.width(),
            channel.height()
        );

        let mut blocks = blocks::split(channel);
        let idx = self.coefficient.index();
        for (&bit, &pos) in bits.iter().zip(positions.iter()) {
            let mut coeffs = self.dct.forward(&blocks[pos]);
            let magnitude = coeffs[idx].abs() + self.strength;
            coeffs[idx] = if bit == 1 { magnitude } else { -magnitude };
            blocks[pos] = self.dct.inverse(&coeffs);
        }

        let mut marked = blocks::merge(&blocks, channel.height(), channel.width());
        marked.clip(0.0, 255.0);
        Ok(marked)
    }

    /// Extract a payload of `bit_len` bits and decode it to text.
    pub fn extract(&self, channel: &Channel, key: i64, bit_len: usize) -> Result<String, WatermarkError> {
        Ok(self.inspect(channel, key, bit_len)?.text)
    }

    /// Like [`extract`](Self::extract) but also report the raw bits and
    /// how many of them were read with less than full margin.
    pub fn inspect(&self, channel: &Channel, key: i64, bit_len: usize) -> Result<Extraction, WatermarkError> {
        if bit_len % 8 != 0 {
            warn!("bit length {} is not a multiple of 8, trailing bits are dropped", bit_len);
        }

        let blocks = blocks::split(channel);
        let positions = select::select(blocks.len(), bit_len, key)?;
        let (bits, weak_bits) = self.read_bits(&blocks, &positions);
        let extraction = Extraction {
            text: bits::decode(&bits),
            bits,
            weak_bits,
        };
        self.report(&extraction);
        Ok(extraction)
    }

    /// Extract a payload embedded with [`embed_checked`](Self::embed_checked).
    pub fn extract_checked(&self, channel: &Channel, key: i64) -> Result<Extraction, WatermarkError> {
        let blocks = blocks::split(channel);

        let header_positions = select::select(blocks.len(), config::FRAME_HEADER_BITS, key)?;
        let (header_bits, _) = self.read_bits(&blocks, &header_positions);
        let header = FrameHeader::parse(&bits::bits_to_bytes(&header_bits))?;
        debug!("frame header announces {} payload bytes", header.payload_length);

        // The header positions are a prefix of the full selection.
        let positions = select::select(blocks.len(), header.total_bits(), key)?;
        let (bits, weak_bits) = self.read_bits(&blocks, &positions);
        let framed = bits::bits_to_bytes(&bits);
        let payload = frame::open(&framed)?;

        let extraction = Extraction {
            text: bits::bytes_to_text(payload),
            bits,
            weak_bits,
        };
        self.report(&extraction);
        Ok(extraction)
    }

    /// Read one bit per position from the coefficient sign.
    fn read_bits(&self, blocks: &[Block], positions: &[usize]) -> (Vec<u8>, usize) {
        let idx = self.coefficient.index();
        let mut weak = 0usize;
        let bits = positions
            .iter()
            .map(|&pos| {
                let value = self.dct.forward(&blocks[pos])[idx];
                if value.abs() + MARGIN_TOLERANCE < self.strength {
                    weak += 1;
                }
                if value >= 0.0 {
                    1
                } else {
                    0
                }
            })
            .collect();
        (bits, weak)
    }

    fn report(&self, extraction: &Extraction) {
        if extraction.weak_bits > 0 {
            warn!(
                "{} of {} bits read below strength {} ({:.0}% confidence)",
                extraction.weak_bits,
                extraction.bits.len(),
                self.strength,
                extraction.confidence() * 100.0
            );
        } else {
            debug!("read {} bits at full margin", extraction.bits.len());
        }
    }
}
