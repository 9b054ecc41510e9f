use log::debug;

use crate::channel::Channel;
use crate::config::{self, BLOCK_AREA, BLOCK_SIZE};

/// An 8x8 block of samples, row-major.
pub type Block = [f64; BLOCK_AREA];

/// Split a channel into whole 8x8 blocks in row-major block order.
///
/// Blocks are copied out of the channel. Trailing rows and columns that do
/// not fill a whole block are dropped.
pub fn split(channel: &Channel) -> Vec<Block> {
    let blocks_y = channel.height() / BLOCK_SIZE;
    let blocks_x = channel.width() / BLOCK_SIZE;

    let cropped_rows = channel.height() % BLOCK_SIZE;
    let cropped_cols = channel.width() % BLOCK_SIZE;
    if cropped_rows != 0 || cropped_cols != 0 {
        debug!(
            "cropping {} trailing rows and {} trailing columns from {}x{} channel",
            cropped_rows,
            cropped_cols,
            channel.width(),
            channel.height()
        );
    }

    let mut blocks = Vec::with_capacity(blocks_x * blocks_y);
    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let px = bx * BLOCK_SIZE;
            let py = by * BLOCK_SIZE;
            let mut block = [0.0f64; BLOCK_AREA];
            for row in 0..BLOCK_SIZE {
                let block_offset = row * BLOCK_SIZE;
                block[block_offset..block_offset + BLOCK_SIZE]
                    .copy_from_slice(&channel.row(py + row)[px..px + BLOCK_SIZE]);
            }
            blocks.push(block);
        }
    }

    debug_assert_eq!(blocks.len(), config::blocks_in(channel.height(), channel.width()));
    blocks
}

/// Reassemble blocks into a `height` x `width` channel.
///
/// Block `i` lands at row `(i / blocks_x) * 8`, column `(i % blocks_x) * 8`.
/// Samples not covered by a whole block stay at zero. Blocks past the
/// channel's block capacity are ignored.
pub fn merge(blocks: &[Block], height: usize, width: usize) -> Channel {
    let mut channel = Channel::zeroed(width, height);
    let blocks_x = width / BLOCK_SIZE;
    let capacity = config::blocks_in(height, width);

    for (i, block) in blocks.iter().take(capacity).enumerate() {
        let px = (i % blocks_x) * BLOCK_SIZE;
        let py = (i / blocks_x) * BLOCK_SIZE;
        for row in 0..BLOCK_SIZE {
            let block_offset = row * BLOCK_SIZE;
            channel.row_mut(py + row)[px..px + BLOCK_SIZE]
                .copy_from_slice(&block[block_offset..block_offset + BLOCK_SIZE]);
        }
    }

    channel
}
