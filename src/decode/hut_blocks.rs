//! Functional ("hut") block extraction.
//!
//! A building's role is discovered from its material palette: every hut
//! block placed in the structure appears there. The block directly under
//! the primary anchor is the building's own hut and always leads the
//! output; the rest follow in sorted order.

use std::collections::BTreeSet;

use crate::config::DecoderConfig;
use crate::decode::{BlockVolume, PaletteEntry, PrimaryOffset};

/// Ordered, duplicate-free hut roles present in the palette.
///
/// The anchor voxel is resolved in `(y, z, x)` order to match the volume
/// layout. An anchor that is out of bounds, not a hut block, or not a
/// recognized role promotes nothing; the result is then just the sorted
/// candidate set.
pub fn extract_hut_blocks(
    palette: &[PaletteEntry],
    volume: &BlockVolume,
    anchor: Option<PrimaryOffset>,
    config: &DecoderConfig,
) -> Vec<String> {
    let mut roles: BTreeSet<String> = palette
        .iter()
        .filter_map(|entry| config.hut_role(&entry.name))
        .filter(|role| config.hut_roles.contains(*role))
        .map(str::to_string)
        .collect();

    let primary = anchor.and_then(|offset| {
        let (y, z, x) = (
            usize::try_from(offset.y).ok()?,
            usize::try_from(offset.z).ok()?,
            usize::try_from(offset.x).ok()?,
        );
        let index = volume.get(y, z, x)?;
        let entry = palette.get(index as usize)?;
        let role = config.hut_role(&entry.name)?;
        config.hut_roles.contains(role).then(|| role.to_string())
    });

    match primary {
        Some(primary) => {
            roles.remove(&primary);
            std::iter::once(primary).chain(roles).collect()
        }
        None => roles.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    fn entry(name: &str) -> PaletteEntry {
        PaletteEntry {
            name: name.to_string(),
        }
    }

    /// 1x1xN volume whose voxels are palette indices 0..N along x.
    fn line_volume(len: u16) -> Result<BlockVolume> {
        let mut halves: Vec<u16> = (0..len).collect();
        if halves.len() % 2 != 0 {
            halves.push(0);
        }
        let packed: Vec<i32> = halves
            .chunks(2)
            .map(|pair| (((pair[0] as u32) << 16) | pair[1] as u32) as i32)
            .collect();
        BlockVolume::unpack(&packed, len as i32, 1, 1)
    }

    fn anchor_at(x: i32) -> Option<PrimaryOffset> {
        Some(PrimaryOffset { x, y: 0, z: 0 })
    }

    #[test]
    fn anchor_role_is_always_first() {
        let palette = vec![
            entry("minecolonies:blockhutfarmer"),
            entry("minecolonies:blockhuttownhall"),
            entry("minecraft:stone"),
        ];
        let volume = line_volume(3).unwrap();
        let config = DecoderConfig::default();

        // Anchor sits on index 1 = townhall; farmer sorts before townhall
        // but must not displace the primary.
        let huts = extract_hut_blocks(&palette, &volume, anchor_at(1), &config);
        assert_eq!(huts, vec!["townhall", "farmer"]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let palette = vec![
            entry("minecolonies:blockhutbaker"),
            entry("minecolonies:blockhutminer"),
        ];
        let volume = line_volume(2).unwrap();
        let config = DecoderConfig::default();

        let first = extract_hut_blocks(&palette, &volume, anchor_at(0), &config);
        let second = extract_hut_blocks(&palette, &volume, anchor_at(0), &config);
        assert_eq!(first, second);
        assert_eq!(first[0], "baker");
    }

    #[test]
    fn non_hut_anchor_promotes_nothing() {
        let palette = vec![
            entry("minecraft:stone"),
            entry("minecolonies:blockhutlibrary"),
            entry("minecolonies:blockhutbuilder"),
        ];
        let volume = line_volume(3).unwrap();
        let config = DecoderConfig::default();

        let huts = extract_hut_blocks(&palette, &volume, anchor_at(0), &config);
        assert_eq!(huts, vec!["builder", "library"]);
    }

    #[test]
    fn unrecognized_hut_role_is_dropped() {
        let palette = vec![
            entry("minecolonies:blockhutnotarealjob"),
            entry("minecolonies:blockhuttavern"),
        ];
        let volume = line_volume(2).unwrap();
        let config = DecoderConfig::default();

        // Anchor resolves to the unrecognized role: no promotion either.
        let huts = extract_hut_blocks(&palette, &volume, anchor_at(0), &config);
        assert_eq!(huts, vec!["tavern"]);
    }

    #[test]
    fn missing_anchor_yields_sorted_set() {
        let palette = vec![
            entry("minecolonies:blockhutwarehouse"),
            entry("minecolonies:blockhutcitizen"),
        ];
        let volume = line_volume(2).unwrap();
        let config = DecoderConfig::default();

        let huts = extract_hut_blocks(&palette, &volume, None, &config);
        assert_eq!(huts, vec!["citizen", "warehouse"]);
    }

    #[test]
    fn out_of_bounds_anchor_is_ignored() {
        let palette = vec![entry("minecolonies:blockhutsawmill")];
        let volume = line_volume(1).unwrap();
        let config = DecoderConfig::default();

        let huts = extract_hut_blocks(&palette, &volume, anchor_at(10), &config);
        assert_eq!(huts, vec!["sawmill"]);

        let negative = Some(PrimaryOffset { x: -1, y: 0, z: 0 });
        let huts = extract_hut_blocks(&palette, &volume, negative, &config);
        assert_eq!(huts, vec!["sawmill"]);
    }

    #[test]
    fn duplicate_palette_entries_collapse() {
        let palette = vec![
            entry("minecolonies:blockhutfield"),
            entry("minecolonies:blockhutfield"),
        ];
        let volume = line_volume(2).unwrap();
        let config = DecoderConfig::default();

        let huts = extract_hut_blocks(&palette, &volume, None, &config);
        assert_eq!(huts, vec!["field"]);
    }
}
