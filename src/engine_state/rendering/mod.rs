//! Rendering system for the voxel engine.
//!
//! This module contains everything between culled voxel data and the GPU
//! buffer sink: the vertex layout, mesh generation, texture resolution and
//! frustum culling. It never talks to a graphics API itself.

pub mod frustum;
pub mod meshing;
pub mod texture;
pub mod vertex;

// Re-export commonly used types
pub use vertex::Vertex;
