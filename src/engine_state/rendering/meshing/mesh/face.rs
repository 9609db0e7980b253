use cgmath::{Point3, Vector3};

use crate::engine_state::{
    rendering::texture::TextureRef, voxels::block::block_side::BlockSide,
};

/// Represents a single quad face of a voxel in world space.
///
/// A face is defined by four corner points (lower-left, lower-right,
/// upper-right, upper-left as seen from outside the block) and carries the
/// texture and side it was built for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-left corner of the face in world coordinates
    pub ll: Point3<f32>,
    /// Lower-right corner of the face in world coordinates
    pub lr: Point3<f32>,
    /// Upper-right corner of the face in world coordinates
    pub ur: Point3<f32>,
    /// Upper-left corner of the face in world coordinates
    pub ul: Point3<f32>,
    /// Texture the face is drawn with
    pub texture: TextureRef,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face on `block_side` of the block whose minimum corner is at
    /// `block_origin`.
    ///
    /// # Arguments
    /// * `block_origin` - World-space minimum corner of the block
    /// * `texture` - The texture resolved for this side
    /// * `block_side` - Which side of the block this face represents
    pub fn new(block_origin: Point3<i32>, texture: TextureRef, block_side: BlockSide) -> Self {
        let corner = |[x, y, z]: [u8; 3]| {
            Point3::new(
                block_origin.x as f32,
                block_origin.y as f32,
                block_origin.z as f32,
            ) + Vector3::new(x as f32, y as f32, z as f32)
        };
        let [ll, lr, ur, ul] = block_side.corners();

        Face {
            ll: corner(ll),
            lr: corner(lr),
            ur: corner(ur),
            ul: corner(ul),
            texture,
            block_side,
        }
    }

    /// Corners in emission order: ll, lr, ur, ul.
    pub fn corners(&self) -> [Point3<f32>; 4] {
        [self.ll, self.lr, self.ur, self.ul]
    }
}
