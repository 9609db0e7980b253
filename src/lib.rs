#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A voxel world streaming and mesh-generation engine.
//!
//! The crate keeps a square window of chunks loaded around a moving observer,
//! culls hidden block faces across chunk borders, turns the visible faces into
//! vertex and index buffers and submits one draw per chunk inside the camera
//! frustum. Graphics API calls go through the [`GpuBufferSink`] trait, so the
//! engine runs the same against a real renderer and against the in-memory
//! [`RecordingBufferSink`].
//!
//! ## Key Modules
//!
//! * `config` - World configuration loaded from JSON
//! * `engine_state` - The engine components including rendering, voxels, and task management
//! * `error` - The crate's error type
//!
//! ## Architecture
//!
//! The engine follows a modular architecture with clear separation between:
//! * Terrain generation (height fields)
//! * Voxel data, culling and streaming (chunks and the world)
//! * Mesh generation and frustum culling
//! * Task scheduling for chunk generation bursts
//!
//! ## Usage
//!
//! ```no_run
//! // Native application initialization
//! fn main() {
//!     if let Err(error) = voxel_world::run() {
//!         eprintln!("{error}");
//!     }
//! }
//! ```
//!
//! ## Performance Considerations
//!
//! The engine is designed with performance as a primary concern:
//! * Chunk-based voxel storage in dense arrays
//! * Culling and meshing proportional to the number of solid blocks
//! * Multi-threaded chunk generation when the observer changes chunk
//! * Buffers re-uploaded only for chunks whose faces changed
//!
//! [`GpuBufferSink`]: engine_state::buffer_state::GpuBufferSink
//! [`RecordingBufferSink`]: engine_state::buffer_state::RecordingBufferSink

use cgmath::{Deg, Point3};
use log::info;
use web_time::Duration;

use config::WorldConfig;
use engine_state::{
    buffer_state::RecordingBufferSink,
    camera_state::{camera::MovementInput, FirstPersonCamera},
    rendering::texture::TextureAtlas,
    EngineState,
};

pub mod config;
pub mod engine_state;
pub mod error;

/// Number of ticks the headless demo runs.
const DEMO_TICKS: u64 = 120;

/// Simulated duration of one demo tick.
const DEMO_TICK: Duration = Duration::from_millis(250);

/// Runs the headless demo.
///
/// Initializes logging, loads the configuration named by the first command
/// line argument (defaults otherwise) and walks a camera across several chunk
/// borders against a [`RecordingBufferSink`], logging what every tick did.
///
/// # Errors
///
/// Fails when the configuration cannot be loaded or is invalid.
pub fn run() -> error::Result<()> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG");
    if log_builder.try_init().is_ok() {
        info!("Logger initialized");
    }

    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };

    let start = Point3::new(8.0, (config.sea_level + 20) as f32, 8.0);
    let camera = FirstPersonCamera::new(start, Deg(0.0), 1280, 720);
    let mut engine = EngineState::new(
        &config,
        &TextureAtlas::flat_colors(),
        camera,
        RecordingBufferSink::new(),
    )?;

    for _ in 0..DEMO_TICKS {
        engine.camera.intake(MovementInput {
            forward: 1.0,
            ..MovementInput::default()
        });
        engine.camera.advance(DEMO_TICK);

        let stats = engine.tick();
        let draws = engine.sink.take_draws();
        let indices: u64 = draws.iter().map(|&(_, count)| count as u64).sum();
        if let Some(report) = &stats.load {
            info!(
                "Frame {}: entered chunk {:?}, {}",
                stats.frame,
                engine.world.active_chunk(),
                report
            );
        }
        log::debug!(
            "Frame {}: {} draws, {} indices, {} bytes of buffers",
            stats.frame,
            draws.len(),
            indices,
            engine.sink.total_used_memory()
        );
    }

    let frames = engine.frame();
    let sink = engine.shutdown();
    info!(
        "Demo finished after {} frames: {} buffers released",
        frames,
        sink.released_buffers()
    );
    Ok(())
}
