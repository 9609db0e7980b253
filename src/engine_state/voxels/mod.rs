//! # Voxel Engine Core
//!
//! This module contains the core voxel engine functionality, providing the foundation
//! for representing, manipulating, and rendering a voxel-based world.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Defines individual voxel types, properties, and behaviors
//! * **Chunk**: Manages fixed-size 3D arrays of blocks for efficient memory use and processing
//! * **World**: Coordinates chunks and provides a unified interface for the entire voxel space
//! * **Height Field**: Deterministic terrain height per column
//! * **Light**: The single directional light used for face shading
//! * **Tasks**: Chunk generation tasks run during a load pass
//!
//! ## Performance Considerations
//!
//! The voxel engine is designed with performance as a primary concern:
//!
//! * Chunks are loaded/unloaded dynamically based on observer position
//! * Chunk generation runs on scoped worker threads to avoid frame spikes
//! * Blocks are stored in dense arrays with an O(1) local index
//! * Culling and meshing only visit solid blocks
//!
//! ## Data Flow
//!
//! 1. World notices the observer entered a new chunk
//! 2. Missing chunks in the load window are generated from the height field
//! 3. New chunks and their loaded neighbours re-cull their shared edges
//! 4. Changed chunks are re-meshed and re-uploaded
//!
//! ## Thread Safety
//!
//! * Height fields are `Send + Sync` and sampled from many workers at once
//! * Workers only insert finished chunks into the chunk map, under a lock
//! * Culling against neighbours and all GPU work run on the owning thread

pub mod block;
pub mod chunk;
pub mod height_field;
pub mod light;
pub mod tasks;
pub mod world;
