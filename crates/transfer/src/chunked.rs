use std::slice::Chunks;

use portal_protocol::constants::BLOCK_SIZE;
use sha2::{Digest, Sha256};

use crate::TransferError;
use crate::types::Block;

// ---------------------------------------------------------------------------
// Checksum helpers
// ---------------------------------------------------------------------------

/// Computes SHA-256 of `data` and returns the hex-encoded digest.
pub fn checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

/// Number of blocks needed for `len` bytes: `ceil(len / block_size)`.
pub fn block_count(len: usize, block_size: usize) -> u32 {
    len.div_ceil(block_size) as u32
}

/// Splits `payload` into ordered blocks of `block_size` bytes.
///
/// If `block_size` is 0, [`BLOCK_SIZE`] (1 MiB) is used. The final block
/// holds the remainder and is never padded; an empty payload yields no
/// blocks.
pub fn split_blocks(payload: &[u8], block_size: usize) -> Blocks<'_> {
    let block_size = if block_size == 0 {
        BLOCK_SIZE
    } else {
        block_size
    };
    Blocks {
        chunks: payload.chunks(block_size),
        total: block_count(payload.len(), block_size),
        next: 1,
    }
}

/// Iterator over the blocks of a payload, in index order.
pub struct Blocks<'a> {
    chunks: Chunks<'a, u8>,
    total: u32,
    next: u32,
}

impl Blocks<'_> {
    /// Total number of blocks in the payload.
    pub fn total(&self) -> u32 {
        self.total
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.chunks.next()?;
        let block = Block {
            index: self.next,
            total: self.total,
            data,
        };
        self.next += 1;
        Some(block)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Blocks<'_> {}

// ---------------------------------------------------------------------------
// BlockSequence
// ---------------------------------------------------------------------------

/// Tracks the blocks received during one download.
///
/// Indices must arrive as exactly `1..=total` with no gaps, repeats or
/// reordering, and `total` is fixed by the first block.
#[derive(Debug, Clone)]
pub struct BlockSequence {
    next: u32,
    total: Option<u32>,
}

impl Default for BlockSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockSequence {
    pub fn new() -> Self {
        Self {
            next: 1,
            total: None,
        }
    }

    /// Index of the next block to request.
    pub fn next_index(&self) -> u32 {
        self.next
    }

    /// Number of blocks accepted so far.
    pub fn received(&self) -> u32 {
        self.next - 1
    }

    /// Records a received block. Returns `true` when it was the last one.
    pub fn accept(&mut self, index: u32, total: u32) -> Result<bool, TransferError> {
        match self.total {
            None if total == 0 => {
                return Err(TransferError::BlockOutOfRange { index, total });
            }
            None => self.total = Some(total),
            Some(expected) if expected != total => {
                return Err(TransferError::TotalBlocksChanged {
                    expected,
                    got: total,
                });
            }
            Some(_) => {}
        }

        if index != self.next {
            return Err(TransferError::OutOfOrderBlock {
                expected: self.next,
                got: index,
            });
        }
        if index > total {
            return Err(TransferError::BlockOutOfRange { index, total });
        }

        self.next += 1;
        Ok(index == total)
    }
}
