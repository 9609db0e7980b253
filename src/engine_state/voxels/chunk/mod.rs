//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a 16×16 column of blocks spanning
//! the full world height. A chunk owns its block data, runs face culling,
//! generates its mesh and holds the GPU buffers the mesh was uploaded to.
//!
//! ## Storage
//!
//! Blocks are stored densely, ordered `[x][z][y]`, so the linear index of a
//! block is `(x * 16 + z) * height + y` and a column is a contiguous run.
//! Next to the dense array the chunk keeps:
//! - `solid_blocks`: linear indices of every non-air block, in chunk order,
//!   so culling and meshing run in O(solid count) instead of O(volume)
//! - `shell`: one bit per block, set for blocks close enough to the lowest
//!   surrounding surface that a neighbouring column could expose them
//!
//! ## Culling Rules
//!
//! A face is visible when the cell it faces is air. Cells above or below the
//! chunk count as air. A cell across a horizontal chunk edge is looked up in
//! the neighbouring chunk; when that chunk is not loaded the face is hidden.
//!
//! ### Performance Characteristics
//! - **Block Lookup**: O(1)
//! - **Full Cull / Mesh**: O(solid blocks)
//! - **Edge Re-cull**: O(edge shell blocks)

use std::{collections::HashMap, fmt, sync::Arc};

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::{
    engine_state::{
        buffer_state::{BufferHandle, GpuBufferSink},
        rendering::{
            meshing::mesh::{ChunkMesh, Face},
            texture::BlockPalette,
        },
        voxels::{
            block::{block_side::BlockSide, Block},
            height_field::HeightField,
            light::Light,
        },
    },
    error::{Result, WorldError},
};

use chunk_creation::ChunkBuilder;
use chunk_iteration::SolidBlockIterator;

mod chunk_creation;
pub mod chunk_iteration;

/// The horizontal dimension (width and depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// Number of columns in a chunk.
pub const CHUNK_COLUMNS: usize = (CHUNK_DIMENSION * CHUNK_DIMENSION) as usize;

/// Position of a chunk on the horizontal chunk grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// The chunk containing the world position `(x, z)`.
    pub fn from_world_position(x: f32, z: f32) -> Self {
        let size = CHUNK_DIMENSION as f32;
        ChunkCoord {
            x: (x / size).floor() as i32,
            z: (z / size).floor() as i32,
        }
    }

    /// The adjacent chunk across `side`. Vertical sides return `self`.
    pub fn neighbour(self, side: BlockSide) -> Self {
        let [dx, _, dz] = side.offset();
        ChunkCoord {
            x: self.x.saturating_add(dx),
            z: self.z.saturating_add(dz),
        }
    }

    /// World position of the chunk's minimum corner, `None` when it does not fit in `i32`.
    pub fn origin(self) -> Option<Point3<i32>> {
        Some(Point3::new(
            self.x.checked_mul(CHUNK_DIMENSION)?,
            0,
            self.z.checked_mul(CHUNK_DIMENSION)?,
        ))
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// The parts of the world configuration a chunk is generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainSettings {
    pub world_height: usize,
    pub sea_level: i32,
    pub shell_depth: i32,
    /// Number of filled columns along x and z, starting at the chunk origin.
    /// Columns beyond the footprint are air.
    pub footprint: usize,
}

impl TerrainSettings {
    pub fn with_footprint(self, footprint: usize) -> Self {
        TerrainSettings {
            footprint: footprint.clamp(1, CHUNK_DIMENSION as usize),
            ..self
        }
    }
}

/// Linear index of the block at chunk-local `(x, y, z)` in a chunk of the
/// given height, or `None` when the position is outside the chunk.
#[inline]
pub fn local_index(x: i32, y: i32, z: i32, height: usize) -> Option<usize> {
    let range = 0..CHUNK_DIMENSION;
    if !range.contains(&x) || !range.contains(&z) || y < 0 || y as usize >= height {
        return None;
    }
    Some((x * CHUNK_DIMENSION + z) as usize * height + y as usize)
}

/// The loaded chunks adjacent to a chunk, indexed by the side they touch.
#[derive(Clone, Copy, Default)]
pub struct ChunkNeighbours<'a> {
    sides: [Option<&'a Chunk>; BlockSide::COUNT],
}

impl<'a> ChunkNeighbours<'a> {
    /// No neighbour loaded on any side.
    pub fn none() -> Self {
        Self::default()
    }

    /// Looks up the four horizontal neighbours of `coord` in `chunks`.
    pub fn from_map(chunks: &'a HashMap<ChunkCoord, Chunk>, coord: ChunkCoord) -> Self {
        let mut neighbours = Self::none();
        for side in BlockSide::horizontal() {
            neighbours.sides[side.index()] = chunks.get(&coord.neighbour(side));
        }
        neighbours
    }

    pub fn with(mut self, side: BlockSide, chunk: Option<&'a Chunk>) -> Self {
        self.sides[side.index()] = chunk;
        self
    }

    #[inline]
    pub fn get(&self, side: BlockSide) -> Option<&'a Chunk> {
        self.sides[side.index()]
    }
}

/// Represents a 16×16×H column of voxel blocks in the world.
pub struct Chunk {
    position: ChunkCoord,
    height: usize,
    blocks: Vec<Block>,
    solid_blocks: Vec<u32>,
    shell: BitVec,
    palette: Arc<BlockPalette>,
    mesh: ChunkMesh,
    buffers: Option<BufferHandle>,
    needs_update: bool,
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("position", &self.position)
            .field("height", &self.height)
            .field("solid_blocks", &self.solid_blocks.len())
            .field("faces", &self.mesh.face_count())
            .field("buffers", &self.buffers)
            .field("needs_update", &self.needs_update)
            .finish()
    }
}

impl Chunk {
    /// Generates the chunk at `position` from a height field and culls it
    /// with no neighbours loaded.
    ///
    /// # Arguments
    /// * `position` - Chunk coordinate to generate
    /// * `height_field` - Terrain height offsets from sea level
    /// * `settings` - World height, sea level, shell depth and footprint
    /// * `palette` - Shared texture palette used when meshing
    ///
    /// # Errors
    /// [`WorldError::CoordinateOutOfRange`] when the chunk origin does not fit in `i32`.
    pub fn generate(
        position: ChunkCoord,
        height_field: &dyn HeightField,
        settings: &TerrainSettings,
        palette: Arc<BlockPalette>,
    ) -> Result<Self> {
        let origin = position.origin().ok_or(WorldError::CoordinateOutOfRange {
            x: position.x,
            z: position.z,
        })?;

        let mut chunk = ChunkBuilder::new(position, origin, settings)
            .fill_from_height_field(height_field)
            .build(palette);
        chunk.cull_all(&ChunkNeighbours::none());
        Ok(chunk)
    }

    pub fn position(&self) -> ChunkCoord {
        self.position
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// World position of the minimum corner.
    pub fn origin(&self) -> Point3<i32> {
        Point3::new(
            self.position.x * CHUNK_DIMENSION,
            0,
            self.position.z * CHUNK_DIMENSION,
        )
    }

    /// The block at chunk-local coordinates, `None` outside the chunk.
    pub fn block(&self, x: i32, y: i32, z: i32) -> Option<&Block> {
        local_index(x, y, z, self.height).map(|i| &self.blocks[i])
    }

    #[inline]
    fn is_solid_at(&self, x: i32, y: i32, z: i32) -> bool {
        self.block(x, y, z).is_some_and(Block::is_solid)
    }

    /// Whether the block at chunk-local coordinates is part of the shell.
    pub fn is_shell(&self, x: i32, y: i32, z: i32) -> bool {
        local_index(x, y, z, self.height).is_some_and(|i| self.shell[i])
    }

    /// Iterates solid blocks in chunk order with their local positions.
    pub fn solid_blocks(&self) -> SolidBlockIterator<'_> {
        SolidBlockIterator::new(self)
    }

    pub fn solid_block_count(&self) -> usize {
        self.solid_blocks.len()
    }

    /// One past the highest solid block of a column, `None` for an empty or
    /// out-of-range column.
    pub fn column_top(&self, x: i32, z: i32) -> Option<usize> {
        let start = local_index(x, 0, z, self.height)?;
        self.blocks[start..start + self.height]
            .iter()
            .rposition(Block::is_solid)
            .map(|y| y + 1)
    }

    fn position_of(&self, index: usize) -> (i32, i32, i32) {
        let column = index / self.height;
        let y = index % self.height;
        let x = column / CHUNK_DIMENSION as usize;
        let z = column % CHUNK_DIMENSION as usize;
        (x as i32, y as i32, z as i32)
    }

    /// Decides whether `side` of the solid block at `(x, y, z)` is visible.
    fn face_visible(
        &self,
        (x, y, z): (i32, i32, i32),
        side: BlockSide,
        neighbours: &ChunkNeighbours<'_>,
    ) -> bool {
        let [dx, dy, dz] = side.offset();
        let (nx, ny, nz) = (x + dx, y + dy, z + dz);

        if ny < 0 || ny as usize >= self.height {
            return true;
        }
        let range = 0..CHUNK_DIMENSION;
        if range.contains(&nx) && range.contains(&nz) {
            return !self.is_solid_at(nx, ny, nz);
        }

        match neighbours.get(side) {
            None => false,
            Some(other) => !other.is_solid_at(
                nx.rem_euclid(CHUNK_DIMENSION),
                ny,
                nz.rem_euclid(CHUNK_DIMENSION),
            ),
        }
    }

    /// Recomputes all six faces of one block.
    ///
    /// # Returns
    /// Whether any face changed. Air blocks never change.
    pub fn cull_block(&mut self, x: i32, y: i32, z: i32, neighbours: &ChunkNeighbours<'_>) -> bool {
        let Some(index) = local_index(x, y, z, self.height) else {
            return false;
        };
        if !self.blocks[index].is_solid() {
            return false;
        }

        let mut changed = false;
        for side in BlockSide::all() {
            let visible = self.face_visible((x, y, z), side, neighbours);
            changed |= self.blocks[index].set_face_visible(side, visible);
        }
        if changed {
            self.needs_update = true;
        }
        changed
    }

    /// Culls every solid block.
    pub fn cull_all(&mut self, neighbours: &ChunkNeighbours<'_>) -> bool {
        let mut changed = false;
        for i in 0..self.solid_blocks.len() {
            let (x, y, z) = self.position_of(self.solid_blocks[i] as usize);
            changed |= self.cull_block(x, y, z, neighbours);
        }
        changed
    }

    /// Re-examines the faces on one horizontal edge against `neighbour`.
    ///
    /// Only shell blocks are visited; deeper blocks are enclosed by their own
    /// chunk on every neighbour's terrain.
    ///
    /// # Returns
    /// Whether any face changed.
    pub fn cull_edge(&mut self, side: BlockSide, neighbour: Option<&Chunk>) -> bool {
        let last = CHUNK_DIMENSION - 1;
        let fixed = match side {
            BlockSide::Right | BlockSide::Front => last,
            BlockSide::Left | BlockSide::Back => 0,
            BlockSide::Top | BlockSide::Bottom => return false,
        };
        let neighbours = ChunkNeighbours::none().with(side, neighbour);

        let mut changed = false;
        for along in 0..CHUNK_DIMENSION {
            let (x, z) = match side {
                BlockSide::Right | BlockSide::Left => (fixed, along),
                _ => (along, fixed),
            };
            for y in 0..self.height as i32 {
                let Some(index) = local_index(x, y, z, self.height) else {
                    continue;
                };
                if !self.shell[index] || !self.blocks[index].is_solid() {
                    continue;
                }
                let visible = self.face_visible((x, y, z), side, &neighbours);
                changed |= self.blocks[index].set_face_visible(side, visible);
            }
        }

        if changed {
            self.needs_update = true;
        }
        changed
    }

    /// Number of visible faces over all blocks.
    pub fn visible_face_count(&self) -> usize {
        self.solid_blocks
            .iter()
            .map(|&i| self.blocks[i as usize].visible_face_count() as usize)
            .sum()
    }

    /// Builds the mesh of every visible face, in chunk order.
    pub fn generate_mesh(&self, light: &Light) -> ChunkMesh {
        let origin = self.origin();
        let mut mesh = ChunkMesh::with_face_capacity(self.visible_face_count());

        for (position, block) in self.solid_blocks() {
            let Some(material) = block.material() else {
                continue;
            };
            let block_origin = Point3::new(
                origin.x + position.x as i32,
                position.y as i32,
                origin.z + position.z as i32,
            );
            for side in block.visible_sides() {
                let face = Face::new(block_origin, self.palette.texture(material, side), side);
                mesh.push_face(&face, light);
            }
        }
        mesh
    }

    /// Meshes the chunk and allocates its GPU buffers. Called once per chunk.
    pub fn initialize(&mut self, sink: &mut dyn GpuBufferSink, light: &Light) {
        if self.buffers.is_some() {
            self.update_buffers(sink, light);
            return;
        }
        self.mesh = self.generate_mesh(light);
        self.buffers = Some(sink.allocate(self.mesh.vertex_bytes(), self.mesh.index_bytes()));
        self.needs_update = false;
        log::debug!(
            "Chunk {} initialized with {} faces",
            self.position,
            self.mesh.face_count()
        );
    }

    /// Regenerates the mesh and re-uploads it.
    pub fn update_buffers(&mut self, sink: &mut dyn GpuBufferSink, light: &Light) {
        let Some(handle) = self.buffers else {
            self.initialize(sink, light);
            return;
        };
        self.mesh = self.generate_mesh(light);
        sink.upload(handle, self.mesh.vertex_bytes(), self.mesh.index_bytes());
        self.needs_update = false;
        log::debug!(
            "Chunk {} re-meshed with {} faces",
            self.position,
            self.mesh.face_count()
        );
    }

    /// Frees the GPU buffers. The chunk can be initialized again afterwards.
    pub fn release(&mut self, sink: &mut dyn GpuBufferSink) {
        if let Some(handle) = self.buffers.take() {
            sink.release(handle);
        }
    }

    /// Issues the chunk's draw call.
    ///
    /// # Returns
    /// Whether a draw was issued; chunks without buffers or faces are skipped.
    pub fn render(&self, sink: &mut dyn GpuBufferSink) -> bool {
        match self.buffers {
            Some(handle) if !self.mesh.is_empty() => {
                sink.draw_indexed(handle, self.mesh.index_count());
                true
            }
            _ => false,
        }
    }

    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    pub fn buffers(&self) -> Option<BufferHandle> {
        self.buffers
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Forces a re-mesh before the next draw.
    pub fn mark_dirty(&mut self) {
        self.needs_update = true;
    }
}
