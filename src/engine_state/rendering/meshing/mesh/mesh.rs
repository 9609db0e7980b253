//! Mesh data structures and operations for voxel rendering.
//!
//! This module converts visible block faces into the interleaved vertex and
//! index buffers uploaded through a
//! [`GpuBufferSink`](crate::engine_state::buffer_state::GpuBufferSink).

use super::face::Face;
use crate::engine_state::{rendering::Vertex, voxels::light::Light};

/// Vertex and index buffers of one chunk.
///
/// Every face contributes its own four vertices; vertices shared by adjacent
/// faces are not merged.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChunkMesh {
    /// The vertex data, four vertices per face
    pub vertices: Vec<Vertex>,
    /// The index data, six indices per face
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mesh with room for `faces` faces.
    pub fn with_face_capacity(faces: usize) -> Self {
        ChunkMesh {
            vertices: Vec::with_capacity(faces * 4),
            indices: Vec::with_capacity(faces * 6),
        }
    }

    /// Appends one shaded face.
    pub fn push_face(&mut self, face: &Face, light: &Light) {
        let faces_generated = self.face_count() as u32;
        self.vertices
            .extend_from_slice(&Self::generate_face_vertices(face, light));
        self.indices
            .extend_from_slice(&Self::generate_face_indices(faces_generated));
    }

    /// Generates vertex data for a single face of a block.
    ///
    /// # Arguments
    /// * `face` - The face to generate vertices for
    /// * `light` - The light shading the face
    ///
    /// # Returns
    /// The four corners of the face in ll, lr, ur, ul order, matching the
    /// triangles produced by [`ChunkMesh::generate_face_indices`].
    pub fn generate_face_vertices(face: &Face, light: &Light) -> [Vertex; 4] {
        let intensity = light.intensity(face.block_side.normal());
        let (tint, alpha) = match face.texture.tint {
            Some(tint) => (tint, 1.0),
            None => ([1.0; 3], 0.0),
        };
        let color = [
            tint[0] * intensity,
            tint[1] * intensity,
            tint[2] * intensity,
            alpha,
        ];
        let uvs = face.block_side.uvs();
        let corners = face.corners();

        std::array::from_fn(|i| Vertex::new(corners[i], color, uvs[i], face.texture.slot))
    }

    /// Generates index data for a face, adjusted by the number of previously generated faces.
    ///
    /// # Arguments
    /// * `num_faces_generated` - The number of faces that have been generated so far
    ///
    /// # Returns
    /// Two counter-clockwise triangles (0,1,2) and (0,2,3) offset by `4 * num_faces_generated`.
    pub fn generate_face_indices(num_faces_generated: u32) -> [u32; 6] {
        let offset = num_faces_generated * 4;
        [offset, offset + 1, offset + 2, offset, offset + 2, offset + 3]
    }

    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
