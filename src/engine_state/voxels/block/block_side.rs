//! # Block Side Module
//!
//! This module defines the six faces of a voxel block together with the
//! constant geometry attached to each of them: the neighbour offset used by
//! face culling, the outward normal, the quad corners and the texture
//! coordinates used by mesh generation.

use cgmath::Vector3;

use crate::engine_state::rendering::texture::TextureSide;

/// Represents the six possible faces of a voxel block.
///
/// The discriminant doubles as the index into the per-side lookup tables and
/// into a block's visibility mask.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, PartialOrd, Ord)]
pub enum BlockSide {
    /// The right face (facing positive X)
    Right = 0,

    /// The left face (facing negative X)
    Left = 1,

    /// The top face (facing positive Y)
    Top = 2,

    /// The bottom face (facing negative Y)
    Bottom = 3,

    /// The front face (facing positive Z)
    Front = 4,

    /// The back face (facing negative Z)
    Back = 5,
}

/// Unit offsets to the neighbouring cell, indexed by `BlockSide`.
const NEIGHBOUR_OFFSETS: [[i32; 3]; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

/// Outward unit normals, indexed by `BlockSide`.
const NORMALS: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

/// Unit-cube corners of every face in the order bottom-left, bottom-right,
/// top-right, top-left as seen from outside the block. Triangles (0,1,2) and
/// (0,2,3) built from these corners wind counter-clockwise.
const FACE_CORNERS: [[[u8; 3]; 4]; 6] = [
    // Right
    [[1, 0, 1], [1, 0, 0], [1, 1, 0], [1, 1, 1]],
    // Left
    [[0, 0, 0], [0, 0, 1], [0, 1, 1], [0, 1, 0]],
    // Top
    [[0, 1, 1], [1, 1, 1], [1, 1, 0], [0, 1, 0]],
    // Bottom
    [[0, 0, 0], [1, 0, 0], [1, 0, 1], [0, 0, 1]],
    // Front
    [[0, 0, 1], [1, 0, 1], [1, 1, 1], [0, 1, 1]],
    // Back
    [[1, 0, 0], [0, 0, 0], [0, 1, 0], [1, 1, 0]],
];

/// Texture coordinates matching `FACE_CORNERS`. V grows downwards in image space.
const FACE_UVS: [[[f32; 2]; 4]; 6] = [
    [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
    [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
    [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
    [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
    [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
    [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
];

impl BlockSide {
    /// Number of block sides.
    pub const COUNT: usize = 6;

    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [Right, Left, Top, Bottom, Front, Back]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::Right,
            BlockSide::Left,
            BlockSide::Top,
            BlockSide::Bottom,
            BlockSide::Front,
            BlockSide::Back,
        ]
    }

    /// The four sides that can face a neighbouring chunk.
    pub fn horizontal() -> [BlockSide; 4] {
        [
            BlockSide::Right,
            BlockSide::Left,
            BlockSide::Front,
            BlockSide::Back,
        ]
    }

    /// Index of this side into per-side tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The side facing the opposite direction.
    pub const fn opposite(self) -> BlockSide {
        match self {
            BlockSide::Right => BlockSide::Left,
            BlockSide::Left => BlockSide::Right,
            BlockSide::Top => BlockSide::Bottom,
            BlockSide::Bottom => BlockSide::Top,
            BlockSide::Front => BlockSide::Back,
            BlockSide::Back => BlockSide::Front,
        }
    }

    /// Offset from a block to the cell this side faces.
    #[inline]
    pub const fn offset(self) -> [i32; 3] {
        NEIGHBOUR_OFFSETS[self as usize]
    }

    /// Outward unit normal of this side. Shared by every block.
    #[inline]
    pub fn normal(self) -> Vector3<f32> {
        Vector3::from(NORMALS[self as usize])
    }

    /// Quad corners relative to the block's minimum corner.
    #[inline]
    pub const fn corners(self) -> [[u8; 3]; 4] {
        FACE_CORNERS[self as usize]
    }

    /// Texture coordinates for the corners returned by [`BlockSide::corners`].
    #[inline]
    pub const fn uvs(self) -> [[f32; 2]; 4] {
        FACE_UVS[self as usize]
    }

    /// Which texture of a material this side is drawn with.
    pub const fn texture_side(self) -> TextureSide {
        match self {
            BlockSide::Top => TextureSide::Top,
            BlockSide::Bottom => TextureSide::Bottom,
            _ => TextureSide::Side,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn offsets_point_along_normals() {
        for side in BlockSide::all() {
            let [x, y, z] = side.offset();
            assert_eq!(side.normal(), Vector3::new(x as f32, y as f32, z as f32));
            assert_eq!(side.opposite().opposite(), side);
            assert_eq!(side.opposite().normal(), -side.normal());
        }
    }

    #[test]
    fn corners_wind_counter_clockwise_around_the_normal() {
        for side in BlockSide::all() {
            let c = side.corners().map(|[x, y, z]| Vector3::new(x as f32, y as f32, z as f32));
            let first = (c[1] - c[0]).cross(c[2] - c[0]);
            let second = (c[2] - c[0]).cross(c[3] - c[0]);
            assert!(first.normalize().dot(side.normal()) > 0.99, "{side:?}");
            assert!(second.normalize().dot(side.normal()) > 0.99, "{side:?}");
        }
    }

    #[test]
    fn corners_lie_on_the_face_plane() {
        for side in BlockSide::all() {
            let [dx, dy, dz] = side.offset();
            for corner in side.corners() {
                for (axis, delta) in [dx, dy, dz].into_iter().enumerate() {
                    match delta {
                        1 => assert_eq!(corner[axis], 1),
                        -1 => assert_eq!(corner[axis], 0),
                        _ => {}
                    }
                }
            }
        }
    }
}
