//! # Chunk Creation Module
//!
//! This module provides the builder that fills a chunk column by column from a
//! height field. It keeps the dense block array, the solid-block index and the
//! shell flags consistent while blocks are pushed in chunk order.
//!
//! ## Shell Computation
//!
//! Column tops are computed for an 18×18 grid: the chunk's own 16×16 columns
//! plus a one-column ring taken from the neighbouring chunks. Those neighbour
//! tops come straight from the height field, so a chunk knows how deep its
//! edges can be exposed before any neighbour is loaded. A block is a shell
//! block when it sits at or above `lowest surrounding top - shell_depth`.

use std::sync::Arc;

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::engine_state::{
    rendering::{meshing::mesh::ChunkMesh, texture::BlockPalette},
    voxels::{
        block::{block_type::Material, Block},
        height_field::HeightField,
    },
};

use super::{Chunk, ChunkCoord, TerrainSettings, CHUNK_COLUMNS, CHUNK_DIMENSION};

/// The column grid including a one-column ring from each neighbour.
const CHUNK_DIMENSION_WRAPPED: usize = (CHUNK_DIMENSION + 2) as usize;

/// A builder that appends blocks in `[x][z][y]` order.
pub struct ChunkBuilder<'s> {
    /// Chunk coordinate of the chunk being created
    position: ChunkCoord,
    /// World position of the chunk's minimum corner
    origin: Point3<i32>,
    settings: &'s TerrainSettings,
    /// Every cell, air included, in chunk order
    blocks: Vec<Block>,
    /// Linear indices of the solid cells pushed so far
    solid_blocks: Vec<u32>,
    /// One bit per cell, parallel to `blocks`
    shell: BitVec,
}

impl<'s> ChunkBuilder<'s> {
    /// Creates a new `ChunkBuilder` for the chunk at `position`.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinate
    /// * `origin` - The world position of the chunk's minimum corner
    /// * `settings` - Height, sea level, shell depth and footprint
    pub fn new(position: ChunkCoord, origin: Point3<i32>, settings: &'s TerrainSettings) -> Self {
        let volume = CHUNK_COLUMNS * settings.world_height;
        ChunkBuilder {
            position,
            origin,
            settings,
            blocks: Vec::with_capacity(volume),
            solid_blocks: Vec::new(),
            shell: BitVec::with_capacity(volume),
        }
    }

    /// Adds a block at the next position in chunk order.
    ///
    /// Solid blocks are also appended to the solid-block index.
    pub fn push_block(&mut self, block: Block, is_shell: bool) {
        if block.is_solid() {
            self.solid_blocks.push(self.blocks.len() as u32);
        }
        self.blocks.push(block);
        self.shell.push(is_shell);
    }

    /// Terrain top of the column at chunk-local `(x, z)`, which may lie one
    /// column outside the chunk.
    fn column_top(&self, height_field: &dyn HeightField, x: i32, z: i32) -> i32 {
        let footprint = self.settings.footprint as i32;
        if x.rem_euclid(CHUNK_DIMENSION) >= footprint || z.rem_euclid(CHUNK_DIMENSION) >= footprint
        {
            return 0;
        }

        let world_x = self.origin.x.saturating_add(x);
        let world_z = self.origin.z.saturating_add(z);
        let top = self
            .settings
            .sea_level
            .saturating_add(height_field.height(world_x, world_z));
        top.clamp(0, self.settings.world_height as i32)
    }

    /// Fills every column from `height_field`.
    ///
    /// The top cell of a column is grass, the next few are dirt and the rest
    /// stone. Cells at or above the column top are air.
    pub fn fill_from_height_field(mut self, height_field: &dyn HeightField) -> Self {
        let mut tops = [0i32; CHUNK_DIMENSION_WRAPPED * CHUNK_DIMENSION_WRAPPED];
        for gx in 0..CHUNK_DIMENSION_WRAPPED {
            for gz in 0..CHUNK_DIMENSION_WRAPPED {
                tops[gx * CHUNK_DIMENSION_WRAPPED + gz] =
                    self.column_top(height_field, gx as i32 - 1, gz as i32 - 1);
            }
        }
        let top_at = |gx: usize, gz: usize| tops[gx * CHUNK_DIMENSION_WRAPPED + gz];

        for x in 1..=CHUNK_DIMENSION as usize {
            for z in 1..=CHUNK_DIMENSION as usize {
                let top = top_at(x, z);
                let lowest = [
                    top,
                    top_at(x - 1, z),
                    top_at(x + 1, z),
                    top_at(x, z - 1),
                    top_at(x, z + 1),
                ]
                .into_iter()
                .min()
                .unwrap_or(top);
                let shell_floor = lowest - self.settings.shell_depth;

                for y in 0..self.settings.world_height as i32 {
                    let block = if y < top {
                        Block::solid(Material::for_depth(top - 1 - y))
                    } else {
                        Block::AIR
                    };
                    self.push_block(block, y >= shell_floor);
                }
            }
        }

        self
    }

    /// Finalizes the chunk. Faces are all hidden until the chunk is culled.
    ///
    /// # Returns
    /// The constructed `Chunk`, flagged for meshing
    pub fn build(self, palette: Arc<BlockPalette>) -> Chunk {
        log::trace!(
            "Chunk {} built with {} solid blocks",
            self.position,
            self.solid_blocks.len()
        );
        Chunk {
            position: self.position,
            height: self.settings.world_height,
            blocks: self.blocks,
            solid_blocks: self.solid_blocks,
            shell: self.shell,
            palette,
            mesh: ChunkMesh::new(),
            buffers: None,
            needs_update: true,
        }
    }
}
