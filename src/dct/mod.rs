use std::f64::consts::PI;

use crate::blocks::Block;
use crate::config::{BLOCK_AREA, BLOCK_SIZE};

/// Orthonormal 8x8 two-dimensional DCT-II.
///
/// Scaling matches the common image-library convention, so coefficient
/// `(row, col)` carries the same frequency band as `cv2.dct` or JPEG's FDCT
/// divided by its normalization. `inverse(forward(b)) == b` up to rounding.
pub struct BlockTransform {
    /// `basis[k * 8 + n]` = alpha(k) * cos((2n + 1) k pi / 16).
    basis: [f64; BLOCK_AREA],
}

impl BlockTransform {
    pub fn new() -> Self {
        let mut basis = [0.0f64; BLOCK_AREA];
        let n = BLOCK_SIZE as f64;
        for k in 0..BLOCK_SIZE {
            let alpha = if k == 0 {
                (1.0 / n).sqrt()
            } else {
                (2.0 / n).sqrt()
            };
            for x in 0..BLOCK_SIZE {
                basis[k * BLOCK_SIZE + x] =
                    alpha * ((2 * x + 1) as f64 * k as f64 * PI / (2.0 * n)).cos();
            }
        }
        Self { basis }
    }

    /// Spatial samples to frequency coefficients: `C * B * C^T`.
    pub fn forward(&self, block: &Block) -> Block {
        let c = &self.basis;
        let mut tmp = [0.0f64; BLOCK_AREA];
        for k in 0..BLOCK_SIZE {
            for col in 0..BLOCK_SIZE {
                let mut acc = 0.0;
                for row in 0..BLOCK_SIZE {
                    acc += c[k * BLOCK_SIZE + row] * block[row * BLOCK_SIZE + col];
                }
                tmp[k * BLOCK_SIZE + col] = acc;
            }
        }

        let mut out = [0.0f64; BLOCK_AREA];
        for k in 0..BLOCK_SIZE {
            for l in 0..BLOCK_SIZE {
                let mut acc = 0.0;
                for col in 0..BLOCK_SIZE {
                    acc += tmp[k * BLOCK_SIZE + col] * c[l * BLOCK_SIZE + col];
                }
                out[k * BLOCK_SIZE + l] = acc;
            }
        }
        out
    }

    /// Frequency coefficients back to spatial samples: `C^T * X * C`.
    pub fn inverse(&self, coefficients: &Block) -> Block {
        let c = &self.basis;
        let mut tmp = [0.0f64; BLOCK_AREA];
        for row in 0..BLOCK_SIZE {
            for l in 0..BLOCK_SIZE {
                let mut acc = 0.0;
                for k in 0..BLOCK_SIZE {
                    acc += c[k * BLOCK_SIZE + row] * coefficients[k * BLOCK_SIZE + l];
                }
                tmp[row * BLOCK_SIZE + l] = acc;
            }
        }

        let mut out = [0.0f64; BLOCK_AREA];
        for row in 0..BLOCK_SIZE {
            for col in 0..BLOCK_SIZE {
                let mut acc = 0.0;
                for l in 0..BLOCK_SIZE {
                    acc += tmp[row * BLOCK_SIZE + l] * c[l * BLOCK_SIZE + col];
                }
                out[row * BLOCK_SIZE + col] = acc;
            }
        }
        out
    }
}

impl Default for BlockTransform {
    fn default() -> Self {
        Self::new()
    }
}
