//! Mesh generation for voxel rendering.
//!
//! This module converts culled voxel data into GPU-friendly vertex and index
//! buffers.
//!
//! # Architecture
//! - [`ChunkMesh`]: The vertex and index buffers of one chunk
//! - [`Face`]: A single world-space quad with its texture and side
//!
//! # Usage
//! ```no_run
//! use voxel_world::engine_state::rendering::meshing::mesh::{ChunkMesh, Face};
//! use voxel_world::engine_state::rendering::texture::TextureRef;
//! use voxel_world::engine_state::voxels::{block::block_side::BlockSide, light::Light};
//! use cgmath::Point3;
//!
//! let texture = TextureRef { handle: 0, slot: 0, tint: None };
//! let mut mesh = ChunkMesh::new();
//! mesh.push_face(&Face::new(Point3::new(0, 63, 0), texture, BlockSide::Top), &Light::default());
//! assert_eq!(mesh.face_count(), 1);
//! ```
//!
//! # Performance Considerations
//! - Faces are emitted without vertex sharing, so a mesh is 4 vertices and
//!   6 indices per visible face
//! - Buffers are reserved up front from the visible face count

mod face;
mod mesh;

pub use face::Face;
pub use mesh::*;
