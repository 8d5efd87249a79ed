//! Blueprint container parsing.
//!
//! A `.blueprint` file is a (usually gzip-compressed) NBT compound written
//! by the Structurize mod. The NBT grammar itself is handled by `fastnbt`;
//! this module only defines the typed view of the fields the decoder needs
//! and leaves everything else in the container untouched.

mod hut_blocks;
mod volume;

pub use hut_blocks::extract_hut_blocks;
pub use volume::{BlockVolume, BuildingSize};

use fastnbt::IntArray;
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::io::Read;

use crate::error::Result;

/// Typed view of a Structurize blueprint container.
///
/// Unknown fields (block entity payloads, required mods, etc.) are ignored
/// by the deserializer; only what the decode pipeline consumes is kept.
#[derive(Debug, Deserialize)]
pub struct Blueprint {
    pub size_x: i32,
    pub size_y: i32,
    pub size_z: i32,
    pub palette: Vec<PaletteEntry>,
    /// Packed block-index stream; two 16-bit palette indices per element.
    pub blocks: IntArray,
    #[serde(default)]
    pub tile_entities: Vec<TileEntity>,
    pub optional_data: Option<OptionalData>,
}

/// One material palette entry; `Name` is a namespaced block id.
#[derive(Debug, Deserialize)]
pub struct PaletteEntry {
    #[serde(rename = "Name")]
    pub name: String,
}

/// A tile entity record. Older blueprints carry `id`, newer ones `type`.
#[derive(Debug, Deserialize)]
pub struct TileEntity {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptionalData {
    pub structurize: Option<Structurize>,
}

#[derive(Debug, Deserialize)]
pub struct Structurize {
    pub primary_offset: Option<PrimaryOffset>,
}

/// The voxel coordinate of the building's anchor ("front door") block.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PrimaryOffset {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Blueprint {
    /// The anchor coordinate, if the container carries one.
    pub fn primary_anchor(&self) -> Option<PrimaryOffset> {
        self.optional_data
            .as_ref()
            .and_then(|d| d.structurize.as_ref())
            .and_then(|s| s.primary_offset)
    }
}

/// Parse a blueprint from raw file bytes, decompressing gzip if present.
pub fn parse_blueprint(data: &[u8]) -> Result<Blueprint> {
    if data.starts_with(&[0x1f, 0x8b]) {
        let mut decoder = GzDecoder::new(data);
        let mut raw = Vec::new();
        decoder.read_to_end(&mut raw)?;
        Ok(fastnbt::from_bytes(&raw)?)
    } else {
        Ok(fastnbt::from_bytes(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastnbt::nbt;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn sample_nbt() -> Vec<u8> {
        let value = nbt!({
            "size_x": 1,
            "size_y": 1,
            "size_z": 2,
            "palette": [{"Name": "minecraft:air"}, {"Name": "minecraft:oak_planks"}],
            "blocks": [I; 0x0000_0001],
            "tile_entities": [{"id": "minecolonies:colonybuilding"}],
            "optional_data": {
                "structurize": {
                    "primary_offset": {"x": 0, "y": 0, "z": 1}
                }
            }
        });
        fastnbt::to_bytes(&value).unwrap()
    }

    #[test]
    fn parses_raw_nbt() {
        let bp = parse_blueprint(&sample_nbt()).unwrap();
        assert_eq!((bp.size_x, bp.size_y, bp.size_z), (1, 1, 2));
        assert_eq!(bp.palette.len(), 2);
        assert_eq!(bp.palette[1].name, "minecraft:oak_planks");
        assert_eq!(bp.blocks.len(), 1);
        let anchor = bp.primary_anchor().unwrap();
        assert_eq!((anchor.x, anchor.y, anchor.z), (0, 0, 1));
    }

    #[test]
    fn parses_gzipped_nbt() {
        let raw = sample_nbt();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw).unwrap();
        let gzipped = encoder.finish().unwrap();

        let bp = parse_blueprint(&gzipped).unwrap();
        assert_eq!(bp.size_z, 2);
    }

    #[test]
    fn missing_optional_data_is_fine() {
        let value = nbt!({
            "size_x": 1,
            "size_y": 1,
            "size_z": 1,
            "palette": [{"Name": "minecraft:stone"}],
            "blocks": [I; 0]
        });
        let bytes = fastnbt::to_bytes(&value).unwrap();
        let bp = parse_blueprint(&bytes).unwrap();
        assert!(bp.primary_anchor().is_none());
        assert!(bp.tile_entities.is_empty());
    }
}
