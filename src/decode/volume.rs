//! Packed block-index volume decoding and the solid bounding box.
//!
//! Structurize stores the block indices as a flat array of 32-bit integers,
//! each packing two 16-bit palette indices (high half first) to halve the
//! file size. The unpacked sequence reshapes into a `(y, z, x)` volume:
//! height outermost, then depth, then width.

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, Result};

/// Bounding-box size of a building in blocks: `x` width, `y` height, `z` depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingSize {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

/// A dense 3-D array of palette indices in `(y, z, x)` axis order.
#[derive(Debug, Clone)]
pub struct BlockVolume {
    size_x: usize,
    size_y: usize,
    size_z: usize,
    indices: Vec<u16>,
}

impl BlockVolume {
    /// Unpack the raw 32-bit stream into a volume of the declared dimensions.
    ///
    /// Each element splits into its high and low 16-bit halves, in stream
    /// order. When `x*y*z` is odd the final half is padding and is dropped;
    /// it is never interpreted as data. Fails with [`DecodeError::Format`]
    /// if the unpacked length doesn't match the declared voxel count.
    pub fn unpack(packed: &[i32], size_x: i32, size_y: i32, size_z: i32) -> Result<Self> {
        if size_x < 0 || size_y < 0 || size_z < 0 {
            return Err(DecodeError::Format(format!(
                "negative dimensions ({size_x}, {size_y}, {size_z})"
            )));
        }
        let (x, y, z) = (size_x as usize, size_y as usize, size_z as usize);
        let voxels = x
            .checked_mul(y)
            .and_then(|v| v.checked_mul(z))
            .ok_or_else(|| {
                DecodeError::Format(format!("dimensions overflow ({x}, {y}, {z})"))
            })?;

        let mut indices = Vec::with_capacity(packed.len() * 2);
        for &word in packed {
            let word = word as u32;
            indices.push((word >> 16) as u16);
            indices.push((word & 0xFFFF) as u16);
        }

        // Odd voxel count: the stream carries one trailing padding half.
        if voxels % 2 != 0 {
            indices.pop();
        }

        if indices.len() != voxels {
            return Err(DecodeError::Format(format!(
                "unpacked {} indices for declared volume {}x{}x{} = {}",
                indices.len(),
                x,
                y,
                z,
                voxels
            )));
        }

        Ok(Self {
            size_x: x,
            size_y: y,
            size_z: z,
            indices,
        })
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_y(&self) -> usize {
        self.size_y
    }

    pub fn size_z(&self) -> usize {
        self.size_z
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Palette index at `(y, z, x)`, or `None` when out of bounds.
    pub fn get(&self, y: usize, z: usize, x: usize) -> Option<u16> {
        if y >= self.size_y || z >= self.size_z || x >= self.size_x {
            return None;
        }
        Some(self.indices[(y * self.size_z + z) * self.size_x + x])
    }

    /// Minimal axis-aligned box enclosing all solid voxels.
    ///
    /// `solid` classifies each palette index; indices beyond the table are
    /// treated as solid (an unknown block is material, not filler). The
    /// result is invariant under padding the volume with all-ignorable
    /// layers on any face.
    pub fn solid_bounds(&self, solid: &[bool]) -> Result<BuildingSize> {
        if self.is_empty() {
            return Err(DecodeError::EmptyVolume);
        }

        let mut min = [usize::MAX; 3];
        let mut max = [0usize; 3];
        let mut any_solid = false;

        let mut i = 0;
        for y in 0..self.size_y {
            for z in 0..self.size_z {
                for x in 0..self.size_x {
                    let idx = self.indices[i] as usize;
                    i += 1;
                    if !solid.get(idx).copied().unwrap_or(true) {
                        continue;
                    }
                    any_solid = true;
                    let pos = [x, y, z];
                    for axis in 0..3 {
                        min[axis] = min[axis].min(pos[axis]);
                        max[axis] = max[axis].max(pos[axis]);
                    }
                }
            }
        }

        if !any_solid {
            return Err(DecodeError::NoSolidVoxels);
        }

        Ok(BuildingSize {
            x: (max[0] - min[0] + 1) as u32,
            y: (max[1] - min[1] + 1) as u32,
            z: (max[2] - min[2] + 1) as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pack pairs of 16-bit indices into the 32-bit stream format.
    fn pack(indices: &[u16]) -> Vec<i32> {
        indices
            .chunks(2)
            .map(|pair| {
                let high = pair[0] as u32;
                let low = *pair.get(1).unwrap_or(&0) as u32;
                ((high << 16) | low) as i32
            })
            .collect()
    }

    #[test]
    fn unpacks_even_volume() {
        // 2x1x2 = 4 voxels, palette indices 0..=3
        let packed = pack(&[0, 1, 2, 3]);
        let volume = BlockVolume::unpack(&packed, 2, 1, 2).unwrap();
        assert_eq!(volume.get(0, 0, 0), Some(0));
        assert_eq!(volume.get(0, 0, 1), Some(1));
        assert_eq!(volume.get(0, 1, 0), Some(2));
        assert_eq!(volume.get(0, 1, 1), Some(3));
    }

    #[test]
    fn unpacks_high_half_first() {
        // One word packing indices (5, 9): high half comes first in order.
        let packed = vec![((5u32 << 16) | 9) as i32];
        let volume = BlockVolume::unpack(&packed, 2, 1, 1).unwrap();
        assert_eq!(volume.get(0, 0, 0), Some(5));
        assert_eq!(volume.get(0, 0, 1), Some(9));
    }

    #[test]
    fn odd_volume_drops_trailing_padding() {
        // 3x1x1 = 3 voxels from 2 words (4 halves); last half is padding.
        let packed = pack(&[7, 8, 9, 0xFFFF]);
        let volume = BlockVolume::unpack(&packed, 3, 1, 1).unwrap();
        assert_eq!(volume.get(0, 0, 0), Some(7));
        assert_eq!(volume.get(0, 0, 1), Some(8));
        assert_eq!(volume.get(0, 0, 2), Some(9));
        assert_eq!(volume.get(0, 0, 3), None);
    }

    #[test]
    fn length_mismatch_is_format_error() {
        let packed = pack(&[0, 1]);
        let err = BlockVolume::unpack(&packed, 2, 2, 2).unwrap_err();
        assert!(matches!(err, DecodeError::Format(_)));
    }

    #[test]
    fn zero_dimension_volume_is_valid_and_empty() {
        let volume = BlockVolume::unpack(&[], 0, 4, 4).unwrap();
        assert!(volume.is_empty());
    }

    #[test]
    fn empty_volume_has_no_bounds() {
        let volume = BlockVolume::unpack(&[], 0, 0, 0).unwrap();
        let err = volume.solid_bounds(&[true]).unwrap_err();
        assert!(matches!(err, DecodeError::EmptyVolume));
    }

    #[test]
    fn single_solid_voxel_is_unit_box() {
        let packed = pack(&[0, 0]);
        let volume = BlockVolume::unpack(&packed, 1, 1, 1).unwrap();
        let size = volume.solid_bounds(&[true]).unwrap();
        assert_eq!(size, BuildingSize { x: 1, y: 1, z: 1 });
    }

    #[test]
    fn all_ignorable_volume_errors() {
        let packed = pack(&[0, 0, 0, 0]);
        let volume = BlockVolume::unpack(&packed, 2, 2, 1).unwrap();
        let err = volume.solid_bounds(&[false]).unwrap_err();
        assert!(matches!(err, DecodeError::NoSolidVoxels));
    }

    #[test]
    fn bounds_ignore_filler_padding() {
        // A 1x1x1 solid block (index 1) centered in a 3x3x3 shell of
        // ignorable index 0. Padding must not affect the box.
        let mut indices = vec![0u16; 27];
        indices[(1 * 3 + 1) * 3 + 1] = 1; // (y=1, z=1, x=1)
        // 27 voxels is odd: append one padding half.
        let mut halves = indices.clone();
        halves.push(0);
        let packed = pack(&halves);
        let volume = BlockVolume::unpack(&packed, 3, 3, 3).unwrap();
        let size = volume.solid_bounds(&[false, true]).unwrap();
        assert_eq!(size, BuildingSize { x: 1, y: 1, z: 1 });
    }

    #[test]
    fn bounds_span_extremes_per_axis() {
        // 4x2x3, solid at (y,z,x) = (0,0,1) and (1,2,3):
        // width 3 (x 1..=3), height 2, depth 3.
        let (sx, sy, sz) = (4usize, 2usize, 3usize);
        let mut indices = vec![0u16; sx * sy * sz];
        indices[(0 * sz + 0) * sx + 1] = 1;
        indices[(1 * sz + 2) * sx + 3] = 1;
        let packed = pack(&indices);
        let volume = BlockVolume::unpack(&packed, sx as i32, sy as i32, sz as i32).unwrap();
        let size = volume.solid_bounds(&[false, true]).unwrap();
        assert_eq!(size, BuildingSize { x: 3, y: 2, z: 3 });
    }

    #[test]
    fn out_of_table_indices_count_as_solid() {
        let packed = pack(&[41, 41]);
        let volume = BlockVolume::unpack(&packed, 2, 1, 1).unwrap();
        // Solidity table only covers index 0.
        let size = volume.solid_bounds(&[false]).unwrap();
        assert_eq!(size, BuildingSize { x: 2, y: 1, z: 1 });
    }
}
