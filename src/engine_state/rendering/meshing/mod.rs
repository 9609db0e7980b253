//! Mesh generation for voxel rendering.
//!
//! This module handles the conversion of culled voxel data into GPU-friendly
//! meshes. Each chunk owns exactly one mesh and one vertex/index buffer pair,
//! so a visible chunk costs one indexed draw call.
//!
//! # Architecture
//! - `mesh/`: Contains the face and mesh types and the per-face vertex generation
//!
//! # Performance Considerations
//! - Meshes are regenerated only when a chunk's face visibility or the light changed
//! - Buffers are re-uploaded in place rather than reallocated

pub mod mesh;

// Re-export the mesh module's public interface for external use
pub use mesh::{ChunkMesh, Face};
