//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask` which builds one chunk on a
//! worker thread. This task is scheduled for every coordinate that enters the
//! load window as the observer moves through the world.

use std::sync::Arc;

use crate::{
    engine_state::{
        rendering::texture::BlockPalette,
        task_management::task::Task,
        voxels::{
            chunk::{Chunk, ChunkCoord, TerrainSettings},
            height_field::HeightField,
        },
    },
    error::Result,
};

/// A task that generates and locally culls one chunk.
///
/// The task borrows the world's generation inputs for the duration of the
/// load pass. Boundary culling and buffer allocation happen on the owning
/// thread after every task of the pass has been joined.
pub struct ChunkGenerationTask<'a> {
    /// The position of the chunk to generate (in chunk coordinates)
    position: ChunkCoord,
    height_field: &'a dyn HeightField,
    settings: &'a TerrainSettings,
    palette: &'a Arc<BlockPalette>,
}

impl<'a> ChunkGenerationTask<'a> {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates where the chunk should be generated
    /// * `height_field` - Terrain source shared by every task of the pass
    /// * `settings` - World height, sea level and shell depth
    /// * `palette` - Texture palette cloned into the new chunk
    ///
    /// # Returns
    /// A new `ChunkGenerationTask` instance
    pub fn new(
        position: ChunkCoord,
        height_field: &'a dyn HeightField,
        settings: &'a TerrainSettings,
        palette: &'a Arc<BlockPalette>,
    ) -> Self {
        ChunkGenerationTask {
            position,
            height_field,
            settings,
            palette,
        }
    }
}

impl Task for ChunkGenerationTask<'_> {
    type Key = ChunkCoord;
    type Output = Chunk;

    fn key(&self) -> ChunkCoord {
        self.position
    }

    /// Generates the chunk data and culls it against no neighbours.
    fn process(&self) -> Result<Chunk> {
        Chunk::generate(
            self.position,
            self.height_field,
            self.settings,
            Arc::clone(self.palette),
        )
    }
}
