/// Side length of a square transform block.
pub const BLOCK_SIZE: usize = 8;
/// Samples per block.
pub const BLOCK_AREA: usize = BLOCK_SIZE * BLOCK_SIZE;

// Embedding parameters
pub const DEFAULT_KEY: i64 = 1234;
pub const DEFAULT_STRENGTH: f64 = 20.0;
pub const DEFAULT_COEFFICIENT_ROW: usize = 4;
pub const DEFAULT_COEFFICIENT_COL: usize = 3;

/// Expected payload length in characters when the caller gives none.
pub const DEFAULT_EXPECTED_LEN: usize = 16;

// Integrity frame layout: magic(1) + length(2) + crc(4)
pub const FRAME_MAGIC: u8 = 0xA7;
pub const FRAME_HEADER_SIZE: usize = 7;
pub const FRAME_HEADER_BITS: usize = FRAME_HEADER_SIZE * 8;

/// Compute the number of whole blocks in a `height` x `width` channel.
/// Trailing rows and columns shorter than a block are not counted.
pub fn blocks_in(height: usize, width: usize) -> usize {
    (height / BLOCK_SIZE) * (width / BLOCK_SIZE)
}

/// Compute how many payload characters fit in a channel without framing.
pub fn chars_in(height: usize, width: usize) -> usize {
    blocks_in(height, width) / 8
}

/// Position of the DCT coefficient whose sign carries a bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coefficient {
    pub row: usize,
    pub col: usize,
}

impl Coefficient {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Flat index into a row-major 8x8 block.
    pub fn index(&self) -> usize {
        self.row * BLOCK_SIZE + self.col
    }

    pub fn is_valid(&self) -> bool {
        self.row < BLOCK_SIZE && self.col < BLOCK_SIZE
    }
}

impl Default for Coefficient {
    fn default() -> Self {
        Self::new(DEFAULT_COEFFICIENT_ROW, DEFAULT_COEFFICIENT_COL)
    }
}

/// How the payload is laid out in the embedded bit stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Bare payload bits. The extractor must know the length and key.
    #[default]
    Raw,
    /// Payload prefixed by a magic/length/CRC header.
    Checked,
}

/// Runtime configuration for an embed/extract operation.
#[derive(Debug, Clone)]
pub struct WatermarkConfig {
    pub key: i64,
    pub strength: f64,
    pub coefficient: Coefficient,
    /// Payload length in characters, used by raw extraction.
    pub expected_len: usize,
    pub framing: Framing,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY,
            strength: DEFAULT_STRENGTH,
            coefficient: Coefficient::default(),
            expected_len: DEFAULT_EXPECTED_LEN,
            framing: Framing::Raw,
        }
    }
}
