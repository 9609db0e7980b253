//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the vertex format produced by mesh generation and a
//! backend-neutral description of its layout that a renderer can translate
//! into its own vertex buffer descriptor.

use cgmath::Point3;

/// A vertex in the voxel rendering pipeline.
///
/// Represents a single corner of a block face with its shaded colour and
/// texture information. The vertex is `Pod`, so whole meshes are uploaded with
/// [`bytemuck::cast_slice`].
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Color: [f32; 4] (16 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Texture Index: f32 (4 bytes)
///
/// Total size: 40 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],
    /// Tint multiplied by the light intensity. Alpha is 1 when a tint override is present.
    pub color: [f32; 4],
    /// UV texture coordinates (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
    /// Atlas slot of the face texture
    pub texture_index: f32,
}

/// Scalar type of a vertex attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttributeFormat {
    Float32x2,
    Float32x3,
    Float32x4,
    Float32,
}

/// One attribute of the vertex layout as a shader sees it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub offset: usize,
    pub shader_location: u32,
    pub format: AttributeFormat,
}

impl Vertex {
    /// Distance in bytes between consecutive vertices.
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    /// Attribute layout matching the field order.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: color (vec4<f32>)
    /// - `location = 2`: tex_coords (vec2<f32>)
    /// - `location = 3`: texture_index (f32)
    pub const ATTRIBUTES: [VertexAttribute; 4] = [
        VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: AttributeFormat::Float32x3,
        },
        VertexAttribute {
            offset: std::mem::size_of::<[f32; 3]>(),
            shader_location: 1,
            format: AttributeFormat::Float32x4,
        },
        VertexAttribute {
            offset: std::mem::size_of::<[f32; 7]>(),
            shader_location: 2,
            format: AttributeFormat::Float32x2,
        },
        VertexAttribute {
            offset: std::mem::size_of::<[f32; 9]>(),
            shader_location: 3,
            format: AttributeFormat::Float32,
        },
    ];

    /// Creates a new vertex with the given parameters.
    ///
    /// # Arguments
    /// * `pos` - The 3D position of the vertex in world space
    /// * `color` - Shaded RGBA colour
    /// * `tex_coords` - UV coordinates of this corner
    /// * `texture_index` - Atlas slot of the texture
    pub fn new(pos: Point3<f32>, color: [f32; 4], tex_coords: [f32; 2], texture_index: u32) -> Self {
        Vertex {
            position: pos.into(),
            color,
            tex_coords,
            texture_index: texture_index as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 40);
        let last = Vertex::ATTRIBUTES[3];
        assert_eq!(last.offset + std::mem::size_of::<f32>(), Vertex::STRIDE);
    }

    #[test]
    fn vertices_cast_to_bytes() {
        let vertices = [Vertex::new(Point3::new(1.0, 2.0, 3.0), [1.0; 4], [0.0, 1.0], 7); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 2 * Vertex::STRIDE);
        let back: &[Vertex] = bytemuck::cast_slice(bytes);
        assert_eq!(back[1].texture_index, 7.0);
    }
}
