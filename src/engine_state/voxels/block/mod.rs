//! # Block Module
//!
//! This module provides the block data model of the voxel world: whether a
//! cell is solid, which material it is made of, and which of its six faces
//! survived the last culling pass.

use cgmath::Vector3;

use block_side::BlockSide;
use block_type::Material;

use crate::engine_state::rendering::texture::{BlockPalette, TextureRef};

pub mod block_side;
pub mod block_type;

/// What occupies a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    /// Empty space. Never rendered.
    #[default]
    Air,
    /// A full cube of the given material.
    Solid(Material),
}

/// Represents a single voxel block in the world.
///
/// This is a lightweight structure: face visibility is packed into a 6-bit
/// mask indexed by [`BlockSide`], textures live in the shared
/// [`BlockPalette`] and normals are constants on `BlockSide`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Block {
    /// What this cell contains.
    pub kind: BlockKind,
    visible_faces: u8,
}

/// A read-only view of one face of a block.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlockFace {
    pub side: BlockSide,
    pub visible: bool,
    pub texture: TextureRef,
    pub normal: Vector3<f32>,
}

impl Block {
    /// An empty cell.
    pub const AIR: Block = Block {
        kind: BlockKind::Air,
        visible_faces: 0,
    };

    /// Creates a solid block with every face hidden until it is culled.
    pub fn solid(material: Material) -> Self {
        Block {
            kind: BlockKind::Solid(material),
            visible_faces: 0,
        }
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        matches!(self.kind, BlockKind::Solid(_))
    }

    /// The material of a solid block, `None` for air.
    #[inline]
    pub fn material(&self) -> Option<Material> {
        match self.kind {
            BlockKind::Solid(material) => Some(material),
            BlockKind::Air => None,
        }
    }

    #[inline]
    pub fn is_face_visible(&self, side: BlockSide) -> bool {
        self.visible_faces & (1 << side.index()) != 0
    }

    /// Sets the visibility of one face.
    ///
    /// Air blocks ignore the call, so an air face can never become visible.
    ///
    /// # Returns
    /// Whether the stored visibility changed.
    pub fn set_face_visible(&mut self, side: BlockSide, visible: bool) -> bool {
        if !self.is_solid() {
            return false;
        }
        let before = self.visible_faces;
        if visible {
            self.visible_faces |= 1 << side.index();
        } else {
            self.visible_faces &= !(1 << side.index());
        }
        before != self.visible_faces
    }

    pub fn visible_face_count(&self) -> u32 {
        self.visible_faces.count_ones()
    }

    /// Sides currently marked visible, in [`BlockSide::all`] order.
    pub fn visible_sides(&self) -> impl Iterator<Item = BlockSide> + '_ {
        BlockSide::all()
            .into_iter()
            .filter(move |side| self.is_face_visible(*side))
    }

    /// Resolves one face against the palette.
    ///
    /// # Returns
    /// `None` for air, which has no faces to draw.
    pub fn face(&self, side: BlockSide, palette: &BlockPalette) -> Option<BlockFace> {
        let material = self.material()?;
        Some(BlockFace {
            side,
            visible: self.is_face_visible(side),
            texture: palette.texture(material, side),
            normal: side.normal(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::texture::TextureAtlas;

    #[test]
    fn air_faces_never_become_visible() {
        let mut air = Block::AIR;
        for side in BlockSide::all() {
            assert!(!air.set_face_visible(side, true));
            assert!(!air.is_face_visible(side));
        }
        assert_eq!(air.visible_face_count(), 0);
    }

    #[test]
    fn solid_faces_toggle_independently() {
        let mut block = Block::solid(Material::Stone);
        assert!(block.set_face_visible(BlockSide::Top, true));
        assert!(!block.set_face_visible(BlockSide::Top, true));
        assert!(block.set_face_visible(BlockSide::Left, true));
        assert_eq!(block.visible_face_count(), 2);
        assert_eq!(
            block.visible_sides().collect::<Vec<_>>(),
            vec![BlockSide::Left, BlockSide::Top]
        );
        assert!(block.set_face_visible(BlockSide::Top, false));
        assert!(!block.is_face_visible(BlockSide::Top));
    }

    #[test]
    fn faces_resolve_through_the_palette() {
        let palette = BlockPalette::resolve(&TextureAtlas::flat_colors()).unwrap();
        let mut grass = Block::solid(Material::Grass);
        grass.set_face_visible(BlockSide::Top, true);

        let top = grass.face(BlockSide::Top, &palette).unwrap();
        assert!(top.visible);
        assert_eq!(top.normal, Vector3::new(0.0, 1.0, 0.0));
        assert_ne!(
            top.texture,
            grass.face(BlockSide::Front, &palette).unwrap().texture
        );
        assert!(Block::AIR.face(BlockSide::Top, &palette).is_none());
    }
}
