//! # Engine State Module
//!
//! The core engine module that drives the voxel world once per frame.
//!
//! ## Key Components
//!
//! * `EngineState` - The per-frame driver tying camera, world and GPU sink together
//! * `buffer_state` - The GPU buffer seam and an in-memory recording sink
//! * `camera_state` - Handles camera positioning, movement and matrices
//! * `rendering` - Vertex layout, meshing, textures and frustum culling
//! * `task_management` - Runs bounded bursts of scoped worker tasks
//! * `voxels` - Handles voxel data, chunks, and world streaming
//!
//! ## Architecture
//!
//! The `EngineState` struct owns the camera, the world and the buffer sink.
//! Each tick it:
//! 1. Keeps the camera above the ground
//! 2. Lets the world stream chunks around the camera
//! 3. Builds the view frustum from the camera matrices
//! 4. Draws every loaded chunk inside the frustum
//!
//! ## Performance Considerations
//!
//! * Chunk generation runs on scoped worker threads only when the observer
//!   crosses a chunk border
//! * Meshes are rebuilt only for chunks whose faces changed
//! * Chunks outside the frustum issue no draw call

use log::debug;

use buffer_state::GpuBufferSink;
use camera_state::CameraProvider;
use rendering::{frustum::Frustum, texture::TextureProvider};
use voxels::world::{LoadReport, World};

use crate::{config::WorldConfig, error::Result};

pub mod buffer_state;
pub mod camera_state;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickStats {
    /// Number of the tick, starting at 0
    pub frame: u64,
    /// The load pass run by this tick, if the observer changed chunk
    pub load: Option<LoadReport>,
    /// Draw calls issued
    pub draws: usize,
    /// Whether the camera was lifted onto the ground
    pub snapped: bool,
}

/// The main state container for the voxel engine.
///
/// # Examples
///
/// ```no_run
/// use cgmath::{Deg, Point3};
/// use voxel_world::{
///     config::WorldConfig,
///     engine_state::{
///         buffer_state::RecordingBufferSink,
///         camera_state::FirstPersonCamera,
///         rendering::texture::TextureAtlas,
///         EngineState,
///     },
/// };
///
/// let camera = FirstPersonCamera::new(Point3::new(8.0, 80.0, 8.0), Deg(0.0), 1280, 720);
/// let mut engine = EngineState::new(
///     &WorldConfig::default(),
///     &TextureAtlas::flat_colors(),
///     camera,
///     RecordingBufferSink::new(),
/// )?;
///
/// // Main game loop
/// loop {
///     let stats = engine.tick();
///     if stats.draws == 0 {
///         break;
///     }
/// }
/// # Ok::<(), voxel_world::error::WorldError>(())
/// ```
pub struct EngineState<C: CameraProvider, S: GpuBufferSink> {
    /// The observer
    pub camera: C,
    /// The voxel world containing all chunk data
    pub world: World,
    /// Receiver of every buffer upload and draw call
    pub sink: S,
    eye_height: f32,
    frame: u64,
}

impl<C: CameraProvider, S: GpuBufferSink> EngineState<C, S> {
    /// Creates a new engine state with an empty world.
    ///
    /// # Arguments
    ///
    /// * `config` - World configuration
    /// * `textures` - Texture provider every block material is resolved from
    /// * `camera` - The observer
    /// * `sink` - GPU buffer sink
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or a texture is missing.
    pub fn new(
        config: &WorldConfig,
        textures: &dyn TextureProvider,
        camera: C,
        sink: S,
    ) -> Result<Self> {
        Ok(Self::with_world(World::new(config, textures)?, config, camera, sink))
    }

    /// Creates an engine state around an existing world.
    pub fn with_world(world: World, config: &WorldConfig, camera: C, sink: S) -> Self {
        EngineState {
            camera,
            world,
            sink,
            eye_height: config.eye_height,
            frame: 0,
        }
    }

    /// Keeps the camera `eye_height` above the ground.
    fn snap_camera(&mut self) -> bool {
        let mut position = self.camera.position();
        let snapped = self.world.snap_to_ground(&mut position, self.eye_height);
        if snapped {
            self.camera.set_position(position);
        }
        snapped
    }

    /// Runs one frame: ground snapping, streaming, frustum culling and drawing.
    pub fn tick(&mut self) -> TickStats {
        let mut snapped = self.snap_camera();

        let load = self.world.update(self.camera.position(), &mut self.sink);
        if load.is_some() {
            // The ground under the camera may only just have been loaded
            snapped |= self.snap_camera();
        }

        let frustum = Frustum::from_view_projection(&self.camera.view_projection());
        let draws = self.world.render(&frustum, &mut self.sink);

        let stats = TickStats {
            frame: self.frame,
            load,
            draws,
            snapped,
        };
        debug!(
            "Frame {}: {} draws, {} chunks loaded",
            self.frame,
            draws,
            self.world.chunk_count()
        );
        self.frame += 1;
        stats
    }

    /// Number of ticks run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Releases every GPU buffer and hands the sink back.
    pub fn shutdown(mut self) -> S {
        self.world.release_all(&mut self.sink);
        self.sink
    }
}
