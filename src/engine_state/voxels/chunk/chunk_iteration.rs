//! # Chunk Iteration Module
//!
//! This module provides an iterator over the solid blocks of a chunk. It walks
//! the chunk's solid-block index rather than the dense array, so air is never
//! visited.

use cgmath::Point3;

use crate::engine_state::voxels::block::Block;

use super::{Chunk, CHUNK_DIMENSION};

/// An iterator over all non-air blocks in a chunk, in chunk order.
///
/// Yields each block together with its chunk-local position.
pub struct SolidBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Current position in the solid-block index
    cursor: usize,
}

impl<'a> SolidBlockIterator<'a> {
    /// Creates a new `SolidBlockIterator` positioned at the first solid block.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        SolidBlockIterator {
            chunk_ref,
            cursor: 0,
        }
    }
}

impl<'a> Iterator for SolidBlockIterator<'a> {
    type Item = (Point3<usize>, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let index = *self.chunk_ref.solid_blocks.get(self.cursor)? as usize;
        self.cursor += 1;

        let height = self.chunk_ref.height;
        let column = index / height;
        let position = Point3::new(
            column / CHUNK_DIMENSION as usize,
            index % height,
            column % CHUNK_DIMENSION as usize,
        );
        Some((position, &self.chunk_ref.blocks[index]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.chunk_ref.solid_blocks.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SolidBlockIterator<'_> {}
