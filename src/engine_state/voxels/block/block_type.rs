//! # Block Type Module
//!
//! This module defines the materials a solid block can be made of and the
//! depth rule that decides which material fills a given cell of a column.

use std::fmt;

/// Number of dirt cells under the grass cap of a column.
pub const DIRT_DEPTH: i32 = 3;

/// Enumerates the materials of solid blocks.
///
/// Each material carries its own textures, resolved once through the
/// [`BlockPalette`](crate::engine_state::rendering::texture::BlockPalette).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Material {
    /// The top cell of every column. Green on top, grass-on-dirt on the sides.
    Grass,

    /// The few cells below the grass cap.
    Dirt,

    /// Everything deeper.
    Stone,
}

impl Material {
    /// Every material, in palette order.
    pub const ALL: [Material; 3] = [Material::Grass, Material::Dirt, Material::Stone];

    /// Picks the material of a cell `depth` blocks below the column top.
    ///
    /// # Arguments
    /// * `depth` - 0 for the topmost solid cell, increasing downwards
    ///
    /// # Returns
    /// `Grass` at depth 0, `Dirt` for the next [`DIRT_DEPTH`] cells, `Stone` below.
    pub fn for_depth(depth: i32) -> Self {
        match depth {
            d if d <= 0 => Material::Grass,
            d if d <= DIRT_DEPTH => Material::Dirt,
            _ => Material::Stone,
        }
    }

    /// The lowercase name used in texture manifests.
    pub const fn name(self) -> &'static str {
        match self {
            Material::Grass => "grass",
            Material::Dirt => "dirt",
            Material::Stone => "stone",
        }
    }

    /// Looks a material up by its manifest name.
    pub fn from_name(name: &str) -> Option<Self> {
        Material::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Index of this material into palette tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_layers() {
        assert_eq!(Material::for_depth(0), Material::Grass);
        assert_eq!(Material::for_depth(1), Material::Dirt);
        assert_eq!(Material::for_depth(DIRT_DEPTH), Material::Dirt);
        assert_eq!(Material::for_depth(DIRT_DEPTH + 1), Material::Stone);
        assert_eq!(Material::for_depth(100), Material::Stone);
    }

    #[test]
    fn names_round_trip() {
        for material in Material::ALL {
            assert_eq!(Material::from_name(material.name()), Some(material));
        }
        assert_eq!(Material::from_name("wood"), None);
    }
}
