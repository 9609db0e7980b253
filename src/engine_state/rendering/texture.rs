//! Texture references for block faces.
//!
//! Actual image decoding and GPU upload belong to the embedding renderer. This
//! module only tracks which texture handle and atlas slot every
//! (material, side) pair is drawn with, plus an optional colour tint.
//!
//! Textures are described by a JSON manifest:
//!
//! ```json
//! {
//!     "grass": {
//!         "top":  { "path": "grass_top.png", "color": "106,170,64" },
//!         "side": { "path": "grass_side.png" }
//!     }
//! }
//! ```

use std::{collections::BTreeMap, fmt::Display};

use serde::Deserialize;

use crate::{
    engine_state::voxels::block::{block_side::BlockSide, block_type::Material},
    error::{Result, WorldError},
};

/// Which texture of a material a face uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureSide {
    Top,
    Bottom,
    Side,
}

impl TextureSide {
    pub const ALL: [TextureSide; 3] = [TextureSide::Top, TextureSide::Bottom, TextureSide::Side];

    pub const fn name(self) -> &'static str {
        match self {
            TextureSide::Top => "top",
            TextureSide::Bottom => "bottom",
            TextureSide::Side => "side",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        TextureSide::ALL.into_iter().find(|s| s.name() == name)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A resolved texture: the renderer's handle, the atlas slot written into
/// vertices, and an optional tint multiplied into the vertex colour.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextureRef {
    pub handle: u32,
    pub slot: u32,
    pub tint: Option<[f32; 3]>,
}

/// Anything that can hand out a texture for a material side.
pub trait TextureProvider {
    fn texture(&self, material: Material, side: TextureSide) -> Option<TextureRef>;
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    path: String,
    #[serde(default)]
    color: Option<String>,
}

/// Every texture listed in a manifest, keyed by material and side.
#[derive(Debug, Clone, Default)]
pub struct TextureAtlas {
    textures: BTreeMap<(Material, TextureSide), TextureRef>,
}

impl TextureAtlas {
    /// Builds an atlas from a JSON manifest.
    ///
    /// Slots are assigned in sorted (material, side) order so the same manifest
    /// always produces the same layout.
    ///
    /// # Arguments
    /// * `json` - The manifest contents
    /// * `upload` - Loads the texture at a path and returns its renderer handle
    ///
    /// # Returns
    /// The atlas, or the first manifest, colour or loader error encountered.
    pub fn from_manifest<F, E>(json: &str, mut upload: F) -> Result<Self>
    where
        F: FnMut(&str) -> std::result::Result<u32, E>,
        E: Display,
    {
        let raw: BTreeMap<String, BTreeMap<String, ManifestEntry>> = serde_json::from_str(json)?;

        let mut entries = BTreeMap::new();
        for (material_name, sides) in raw {
            let material = Material::from_name(&material_name)
                .ok_or_else(|| WorldError::Manifest(format!("unknown material `{material_name}`")))?;
            for (side_name, entry) in sides {
                let side = TextureSide::from_name(&side_name).ok_or_else(|| {
                    WorldError::Manifest(format!(
                        "unknown texture side `{side_name}` for `{material_name}`"
                    ))
                })?;
                entries.insert((material, side), entry);
            }
        }

        let mut textures = BTreeMap::new();
        for (slot, (key, entry)) in entries.into_iter().enumerate() {
            let tint = entry.color.as_deref().map(parse_color).transpose()?;
            let handle = upload(&entry.path).map_err(|e| WorldError::Texture {
                path: entry.path.clone(),
                reason: e.to_string(),
            })?;
            log::debug!("Texture {} -> slot {}", entry.path, slot);
            textures.insert(
                key,
                TextureRef {
                    handle,
                    slot: slot as u32,
                    tint,
                },
            );
        }

        log::info!("Texture atlas built with {} textures", textures.len());
        Ok(Self { textures })
    }

    /// An untextured atlas where every face is a flat tinted colour.
    pub fn flat_colors() -> Self {
        const COLORS: [(Material, TextureSide, [u8; 3]); 7] = [
            (Material::Dirt, TextureSide::Side, [134, 96, 67]),
            (Material::Grass, TextureSide::Top, [106, 170, 64]),
            (Material::Grass, TextureSide::Bottom, [134, 96, 67]),
            (Material::Grass, TextureSide::Side, [120, 140, 70]),
            (Material::Stone, TextureSide::Side, [125, 125, 125]),
            (Material::Dirt, TextureSide::Top, [150, 108, 74]),
            (Material::Stone, TextureSide::Top, [140, 140, 140]),
        ];

        let mut sorted = COLORS;
        sorted.sort_by_key(|(material, side, _)| (*material, *side));

        let textures = sorted
            .into_iter()
            .enumerate()
            .map(|(slot, (material, side, [r, g, b]))| {
                let tint = [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0];
                (
                    (material, side),
                    TextureRef {
                        handle: 0,
                        slot: slot as u32,
                        tint: Some(tint),
                    },
                )
            })
            .collect();

        Self { textures }
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl TextureProvider for TextureAtlas {
    fn texture(&self, material: Material, side: TextureSide) -> Option<TextureRef> {
        self.textures.get(&(material, side)).copied().or_else(|| match side {
            TextureSide::Bottom => self.textures.get(&(material, TextureSide::Side)).copied(),
            _ => None,
        })
    }
}

/// Parses an `"r,g,b"` colour with 0..=255 channels into a normalized tint.
fn parse_color(raw: &str) -> Result<[f32; 3]> {
    let channels = raw
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| WorldError::Manifest(format!("invalid colour `{raw}`: {e}")))?;

    match channels.as_slice() {
        [r, g, b] => Ok([*r as f32 / 255.0, *g as f32 / 255.0, *b as f32 / 255.0]),
        _ => Err(WorldError::Manifest(format!(
            "colour `{raw}` must have exactly three channels"
        ))),
    }
}

/// Texture references for every material, resolved once and shared by all chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockPalette {
    entries: [[TextureRef; 3]; 3],
}

impl BlockPalette {
    /// Resolves the top, bottom and side texture of every material.
    ///
    /// A missing bottom texture falls back to the side texture.
    ///
    /// # Errors
    /// [`WorldError::MissingTexture`] when a material has no top or side texture.
    pub fn resolve<P: TextureProvider + ?Sized>(provider: &P) -> Result<Self> {
        let lookup = |material: Material, side: TextureSide| {
            provider
                .texture(material, side)
                .ok_or(WorldError::MissingTexture { material, side })
        };

        let mut entries = Vec::with_capacity(Material::ALL.len());
        for material in Material::ALL {
            let top = lookup(material, TextureSide::Top)?;
            let side = lookup(material, TextureSide::Side)?;
            let bottom = provider
                .texture(material, TextureSide::Bottom)
                .unwrap_or(side);
            entries.push([top, bottom, side]);
        }

        let entries = entries
            .try_into()
            .map_err(|_| WorldError::Manifest("palette size mismatch".to_string()))?;
        Ok(Self { entries })
    }

    /// The texture drawn on `side` of a `material` block.
    #[inline]
    pub fn texture(&self, material: Material, side: BlockSide) -> TextureRef {
        self.entries[material.index()][side.texture_side().index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "stone": { "side": { "path": "stone.png" }, "top": { "path": "stone.png" } },
        "grass": {
            "top": { "path": "grass_top.png", "color": "0, 255, 0" },
            "side": { "path": "grass_side.png" },
            "bottom": { "path": "dirt.png" }
        },
        "dirt": { "top": { "path": "dirt.png" }, "side": { "path": "dirt.png" } }
    }"#;

    #[test]
    fn manifest_slots_follow_sorted_order() {
        let mut uploaded = Vec::new();
        let atlas = TextureAtlas::from_manifest(MANIFEST, |path| {
            uploaded.push(path.to_string());
            Ok::<u32, String>(uploaded.len() as u32)
        })
        .unwrap();

        assert_eq!(atlas.len(), 7);
        assert_eq!(uploaded[0], "grass_top.png");
        let grass_top = atlas.texture(Material::Grass, TextureSide::Top).unwrap();
        assert_eq!(grass_top.slot, 0);
        assert_eq!(grass_top.tint, Some([0.0, 1.0, 0.0]));
        let stone_top = atlas.texture(Material::Stone, TextureSide::Top).unwrap();
        assert_eq!(stone_top.slot, 5);
        assert_eq!(stone_top.tint, None);
    }

    #[test]
    fn bottom_falls_back_to_side() {
        let atlas = TextureAtlas::from_manifest(MANIFEST, |_| Ok::<u32, String>(1)).unwrap();
        assert_eq!(
            atlas.texture(Material::Dirt, TextureSide::Bottom),
            atlas.texture(Material::Dirt, TextureSide::Side)
        );
    }

    #[test]
    fn manifest_errors() {
        let unknown = r#"{ "wood": { "side": { "path": "wood.png" } } }"#;
        assert!(matches!(
            TextureAtlas::from_manifest(unknown, |_| Ok::<u32, String>(1)),
            Err(WorldError::Manifest(_))
        ));

        let bad_color = r#"{ "dirt": { "side": { "path": "d.png", "color": "1,2" } } }"#;
        assert!(matches!(
            TextureAtlas::from_manifest(bad_color, |_| Ok::<u32, String>(1)),
            Err(WorldError::Manifest(_))
        ));

        let failing = TextureAtlas::from_manifest(MANIFEST, |path| {
            Err::<u32, _>(format!("cannot open {path}"))
        });
        assert!(matches!(failing, Err(WorldError::Texture { .. })));
    }

    #[test]
    fn palette_requires_top_and_side() {
        let partial = r#"{
            "grass": { "top": { "path": "g.png" }, "side": { "path": "g.png" } },
            "dirt": { "side": { "path": "d.png" } },
            "stone": { "top": { "path": "s.png" }, "side": { "path": "s.png" } }
        }"#;
        let atlas = TextureAtlas::from_manifest(partial, |_| Ok::<u32, String>(1)).unwrap();
        assert!(matches!(
            BlockPalette::resolve(&atlas),
            Err(WorldError::MissingTexture {
                material: Material::Dirt,
                side: TextureSide::Top
            })
        ));
    }

    #[test]
    fn palette_maps_block_sides() {
        let palette = BlockPalette::resolve(&TextureAtlas::flat_colors()).unwrap();
        let side = palette.texture(Material::Grass, BlockSide::Left);
        assert_eq!(side, palette.texture(Material::Grass, BlockSide::Front));
        assert_ne!(side, palette.texture(Material::Grass, BlockSide::Top));
        assert_eq!(
            palette.texture(Material::Stone, BlockSide::Bottom),
            palette.texture(Material::Stone, BlockSide::Right)
        );
    }
}
