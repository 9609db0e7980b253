//! # World Module
//!
//! This module provides the `World` struct which manages the chunks around a
//! moving observer. It serves as the central coordinator for chunk loading,
//! unloading, cross-chunk boundary culling and render submission.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach where only chunks inside the load
//! window are kept in memory. The window is the square of chunk coordinates
//! `[a.x - r, a.x + r) × [a.z - r, a.z + r)` around the active chunk `a`.
//!
//! ## Load Pass
//!
//! When the observer enters a new chunk:
//! 1. Missing window coordinates are generated concurrently, one scoped task
//!    per chunk. Finished chunks are inserted into the chunk map under a lock
//!    held only for the insert.
//! 2. After every task has joined, each new chunk culls its edges against the
//!    loaded neighbours and allocates its GPU buffers. Already loaded
//!    neighbours re-cull the edge they share with it and re-upload when a face
//!    changed.
//! 3. Chunks outside the window release their buffers and are dropped. The
//!    edges their removal exposes are re-culled against "no neighbour".
//!
//! A coordinate whose generation fails is logged and left out of the loaded
//! set; it is requested again by the next pass.
//!
//! ## Performance Considerations
//!
//! - Chunk lookup is O(1) using a hash map
//! - Boundary re-culls only visit the shell blocks of one edge
//! - GPU calls are confined to the calling thread after the join

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fmt,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use cgmath::{Point3, Vector3};
use log::{debug, info, warn};
use web_time::Instant;

use crate::{
    config::WorldConfig,
    engine_state::{
        buffer_state::GpuBufferSink,
        rendering::{
            frustum::Frustum,
            texture::{BlockPalette, TextureProvider},
        },
        task_management::run_scoped,
        voxels::{
            block::block_side::BlockSide,
            chunk::{Chunk, ChunkCoord, ChunkNeighbours, TerrainSettings},
            height_field::{height_field_from_config, HeightField},
            light::Light,
            tasks::chunk_generation_task::ChunkGenerationTask,
        },
    },
    error::Result,
};

/// Summary of one load or unload pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Coordinates generated and initialized by the pass, in request order
    pub loaded: Vec<ChunkCoord>,
    /// Coordinates released and dropped by the pass
    pub evicted: Vec<ChunkCoord>,
    /// Coordinates whose generation failed or panicked
    pub failed: Vec<ChunkCoord>,
    /// Already loaded chunks re-meshed because a bordering chunk came or went
    pub remeshed_neighbours: usize,
    pub elapsed: Duration,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} loaded, {} evicted, {} failed, {} neighbours re-meshed in {:?}",
            self.loaded.len(),
            self.evicted.len(),
            self.failed.len(),
            self.remeshed_neighbours,
            self.elapsed
        )
    }
}

/// Represents a voxel world composed of streamed chunks.
///
/// # Examples
///
/// ```no_run
/// use voxel_world::{
///     config::WorldConfig,
///     engine_state::{
///         buffer_state::RecordingBufferSink,
///         rendering::texture::TextureAtlas,
///         voxels::world::World,
///     },
/// };
///
/// let mut sink = RecordingBufferSink::new();
/// let mut world = World::new(&WorldConfig::default(), &TextureAtlas::flat_colors())?;
/// world.update(cgmath::Point3::new(8.0, 80.0, 8.0), &mut sink);
/// # Ok::<(), voxel_world::error::WorldError>(())
/// ```
pub struct World {
    /// Every generated chunk, keyed by chunk coordinate
    chunks: HashMap<ChunkCoord, Chunk>,
    /// Coordinates of the chunks currently part of the world
    loaded: HashSet<ChunkCoord>,
    /// The chunk containing the observer, `None` before the first update
    active_chunk: Option<ChunkCoord>,
    render_distance: i32,
    settings: TerrainSettings,
    max_concurrent_loads: usize,
    height_field: Arc<dyn HeightField>,
    palette: Arc<BlockPalette>,
    light: Light,
}

impl World {
    /// Creates a new, empty world using the height strategy named by `config`.
    ///
    /// # Errors
    /// Fails when the configuration is invalid or a material has no texture.
    pub fn new(config: &WorldConfig, textures: &dyn TextureProvider) -> Result<Self> {
        Self::with_height_field(config, textures, height_field_from_config(config))
    }

    /// Creates a new, empty world with an explicit terrain source.
    ///
    /// # Arguments
    /// * `config` - World dimensions, render distance and light
    /// * `textures` - Provider every material's textures are resolved from
    /// * `height_field` - Terrain height offsets from sea level
    ///
    /// # Errors
    /// Fails when the configuration is invalid or a material has no texture.
    pub fn with_height_field(
        config: &WorldConfig,
        textures: &dyn TextureProvider,
        height_field: Arc<dyn HeightField>,
    ) -> Result<Self> {
        config.validate()?;
        let palette = Arc::new(BlockPalette::resolve(textures)?);
        let [x, y, z] = config.light_direction;

        info!(
            "World created: height {}, sea level {}, render distance {}",
            config.world_height, config.sea_level, config.render_distance
        );

        Ok(World {
            chunks: HashMap::new(),
            loaded: HashSet::new(),
            active_chunk: None,
            render_distance: config.render_distance,
            settings: config.terrain_settings(),
            max_concurrent_loads: config.max_concurrent_loads,
            height_field,
            palette,
            light: Light::new(Vector3::new(x, y, z)),
        })
    }

    /// Creates a world holding only the chunk at the origin, with `footprint`
    /// filled columns along each horizontal axis.
    ///
    /// A footprint of 1 gives a single column of blocks. The chunk is
    /// initialized against `sink` and becomes the active chunk. Chunks
    /// streamed in later are generated at full size.
    pub fn single_chunk(
        config: &WorldConfig,
        textures: &dyn TextureProvider,
        footprint: usize,
        sink: &mut dyn GpuBufferSink,
    ) -> Result<Self> {
        let mut world = Self::new(config, textures)?;
        let settings = world.settings.with_footprint(footprint);

        let origin = ChunkCoord::default();
        let mut chunk = Chunk::generate(
            origin,
            &*world.height_field,
            &settings,
            Arc::clone(&world.palette),
        )?;
        chunk.initialize(sink, &world.light);

        world.chunks.insert(origin, chunk);
        world.loaded.insert(origin);
        world.active_chunk = Some(origin);
        Ok(world)
    }

    /// Recomputes the load window when the observer has entered a new chunk.
    ///
    /// # Arguments
    /// * `observer` - World-space observer position
    /// * `sink` - GPU buffer sink used for allocation, re-upload and release
    ///
    /// # Returns
    /// The report of the pass, or `None` when the active chunk did not change.
    pub fn update(
        &mut self,
        observer: Point3<f32>,
        sink: &mut dyn GpuBufferSink,
    ) -> Option<LoadReport> {
        let active = ChunkCoord::from_world_position(observer.x, observer.z);
        if self.active_chunk == Some(active) {
            return None;
        }

        let start = Instant::now();
        debug!("Active chunk changed from {:?} to {}", self.active_chunk, active);
        self.active_chunk = Some(active);

        let window = self.load_window(active);
        let mut report = self.load_pass(&window, sink);

        let inside: HashSet<ChunkCoord> = window.iter().copied().collect();
        let outside: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|coord| !inside.contains(*coord))
            .copied()
            .collect();
        let eviction = self.evict_pass(&outside, sink);
        report.evicted = eviction.evicted;
        report.remeshed_neighbours += eviction.remeshed_neighbours;

        self.loaded = window
            .into_iter()
            .filter(|coord| self.chunks.contains_key(coord))
            .collect();

        report.elapsed = start.elapsed();
        info!("Load pass around {}: {}", active, report);
        Some(report)
    }

    /// All coordinates of the load window around `center`, row by row.
    pub fn load_window(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        let r = self.render_distance;
        let xs = center.x.saturating_sub(r)..center.x.saturating_add(r);
        let mut window = Vec::with_capacity(xs.len() * xs.len());
        for x in xs {
            for z in center.z.saturating_sub(r)..center.z.saturating_add(r) {
                window.push(ChunkCoord::new(x, z));
            }
        }
        window
    }

    /// Generates, stitches and initializes the chunks at `coordinates` that
    /// are not loaded yet.
    pub fn load_coordinates(
        &mut self,
        coordinates: &[ChunkCoord],
        sink: &mut dyn GpuBufferSink,
    ) -> LoadReport {
        let start = Instant::now();
        let mut report = self.load_pass(coordinates, sink);
        report.elapsed = start.elapsed();
        info!("Loaded coordinates: {}", report);
        report
    }

    /// Releases and drops the chunks at `coordinates`, re-culling the edges
    /// their removal exposes.
    pub fn unload_coordinates(
        &mut self,
        coordinates: &[ChunkCoord],
        sink: &mut dyn GpuBufferSink,
    ) -> LoadReport {
        let start = Instant::now();
        let mut report = self.evict_pass(coordinates, sink);
        report.elapsed = start.elapsed();
        info!("Unloaded coordinates: {}", report);
        report
    }

    fn load_pass(&mut self, coordinates: &[ChunkCoord], sink: &mut dyn GpuBufferSink) -> LoadReport {
        let mut requested = HashSet::new();
        let missing: Vec<ChunkCoord> = coordinates
            .iter()
            .copied()
            .filter(|coord| !self.chunks.contains_key(coord) && requested.insert(*coord))
            .collect();
        if missing.is_empty() {
            return LoadReport::default();
        }

        let failed = self.generate_chunks(&missing);
        let loaded: Vec<ChunkCoord> = missing
            .into_iter()
            .filter(|coord| !failed.contains(coord))
            .collect();
        let remeshed_neighbours = self.stitch_new_chunks(&loaded, sink);
        self.loaded.extend(loaded.iter().copied());

        LoadReport {
            loaded,
            failed,
            remeshed_neighbours,
            ..LoadReport::default()
        }
    }

    /// Runs one generation task per coordinate and inserts the results.
    ///
    /// # Returns
    /// The coordinates whose generation failed.
    fn generate_chunks(&mut self, coordinates: &[ChunkCoord]) -> Vec<ChunkCoord> {
        let height_field: &dyn HeightField = &*self.height_field;
        let settings = &self.settings;
        let palette = &self.palette;
        let tasks: Vec<ChunkGenerationTask<'_>> = coordinates
            .iter()
            .map(|&coord| ChunkGenerationTask::new(coord, height_field, settings, palette))
            .collect();

        let chunks = Mutex::new(&mut self.chunks);
        let failures = run_scoped(tasks, self.max_concurrent_loads, |coord: ChunkCoord, chunk: Chunk| {
            let mut chunks = chunks.lock().unwrap_or_else(PoisonError::into_inner);
            chunks.insert(coord, chunk);
        });

        failures
            .into_iter()
            .map(|(coord, failure)| {
                warn!("Chunk {} skipped this pass: {}", coord, failure);
                coord
            })
            .collect()
    }

    /// Boundary-culls and initializes freshly generated chunks, then updates
    /// the already loaded chunks bordering them.
    ///
    /// # Returns
    /// The number of pre-existing neighbours that were re-meshed.
    fn stitch_new_chunks(&mut self, new_chunks: &[ChunkCoord], sink: &mut dyn GpuBufferSink) -> usize {
        let fresh: HashSet<ChunkCoord> = new_chunks.iter().copied().collect();

        for &coord in new_chunks {
            let Some(mut chunk) = self.chunks.remove(&coord) else {
                continue;
            };
            let neighbours = ChunkNeighbours::from_map(&self.chunks, coord);
            for side in BlockSide::horizontal() {
                if neighbours.get(side).is_some() {
                    chunk.cull_edge(side, neighbours.get(side));
                }
            }
            chunk.initialize(sink, &self.light);
            self.chunks.insert(coord, chunk);
        }

        let mut stale = BTreeSet::new();
        for &coord in new_chunks {
            for side in BlockSide::horizontal() {
                let neighbour_coord = coord.neighbour(side);
                if neighbour_coord == coord || fresh.contains(&neighbour_coord) {
                    continue;
                }
                let Some(mut neighbour) = self.chunks.remove(&neighbour_coord) else {
                    continue;
                };
                if neighbour.cull_edge(side.opposite(), self.chunks.get(&coord)) {
                    stale.insert(neighbour_coord);
                }
                self.chunks.insert(neighbour_coord, neighbour);
            }
        }

        self.refresh(&stale, sink)
    }

    fn evict_pass(&mut self, coordinates: &[ChunkCoord], sink: &mut dyn GpuBufferSink) -> LoadReport {
        let mut evicted = Vec::new();
        for &coord in coordinates {
            self.loaded.remove(&coord);
            if let Some(mut chunk) = self.chunks.remove(&coord) {
                chunk.release(sink);
                evicted.push(coord);
                debug!("Chunk {} evicted", coord);
            }
        }

        let mut stale = BTreeSet::new();
        for &coord in &evicted {
            for side in BlockSide::horizontal() {
                let neighbour_coord = coord.neighbour(side);
                if neighbour_coord == coord {
                    continue;
                }
                if let Some(neighbour) = self.chunks.get_mut(&neighbour_coord) {
                    if neighbour.cull_edge(side.opposite(), None) {
                        stale.insert(neighbour_coord);
                    }
                }
            }
        }

        let remeshed_neighbours = self.refresh(&stale, sink);
        LoadReport {
            evicted,
            remeshed_neighbours,
            ..LoadReport::default()
        }
    }

    /// Re-meshes and re-uploads the given chunks.
    fn refresh(&mut self, coordinates: &BTreeSet<ChunkCoord>, sink: &mut dyn GpuBufferSink) -> usize {
        let mut count = 0;
        for coord in coordinates {
            if let Some(chunk) = self.chunks.get_mut(coord) {
                chunk.update_buffers(sink, &self.light);
                count += 1;
            }
        }
        count
    }

    /// Issues one draw per loaded chunk that intersects `frustum`.
    ///
    /// Visible chunks whose mesh is stale are re-meshed first.
    ///
    /// # Returns
    /// The number of draws issued.
    pub fn render(&mut self, frustum: &Frustum, sink: &mut dyn GpuBufferSink) -> usize {
        let mut draws = 0;
        for chunk in self.chunks.values_mut() {
            if !frustum.is_chunk_visible(chunk.position(), self.settings.world_height) {
                continue;
            }
            if chunk.needs_update() {
                chunk.update_buffers(sink, &self.light);
            }
            if chunk.render(sink) {
                draws += 1;
            }
        }
        draws
    }

    /// Changes the light direction. Every chunk is re-meshed before its next draw.
    pub fn set_light_direction(&mut self, direction: Vector3<f32>) {
        self.light.set_direction(direction);
        for chunk in self.chunks.values_mut() {
            chunk.mark_dirty();
        }
    }

    /// Top of the highest solid block in the column containing `(x, z)`.
    ///
    /// # Returns
    /// `None` when the column's chunk is not loaded or the column is empty.
    pub fn ground_height(&self, x: f32, z: f32) -> Option<f32> {
        let chunk = self.chunks.get(&ChunkCoord::from_world_position(x, z))?;
        let origin = chunk.origin();
        let local_x = x.floor() as i32 - origin.x;
        let local_z = z.floor() as i32 - origin.z;
        chunk.column_top(local_x, local_z).map(|top| top as f32)
    }

    /// Lifts `position` so it stays `eye_height` above the ground.
    ///
    /// # Returns
    /// Whether the position was moved.
    pub fn snap_to_ground(&self, position: &mut Point3<f32>, eye_height: f32) -> bool {
        match self.ground_height(position.x, position.z) {
            Some(ground) if position.y < ground + eye_height => {
                position.y = ground + eye_height;
                true
            }
            _ => false,
        }
    }

    /// Releases every chunk's buffers and empties the world.
    pub fn release_all(&mut self, sink: &mut dyn GpuBufferSink) {
        for (_, mut chunk) in self.chunks.drain() {
            chunk.release(sink);
        }
        self.loaded.clear();
        self.active_chunk = None;
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn loaded_coordinates(&self) -> &HashSet<ChunkCoord> {
        &self.loaded
    }

    pub fn active_chunk(&self) -> Option<ChunkCoord> {
        self.active_chunk
    }

    pub fn render_distance(&self) -> i32 {
        self.render_distance
    }

    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    pub fn light(&self) -> &Light {
        &self.light
    }
}
