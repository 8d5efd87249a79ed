//! A single blueprint file on disk.
//!
//! `BlueprintFile` pairs a path with the SHA-256 hash of its bytes. The hash
//! is computed eagerly (it is the cache key), but the NBT container is only
//! parsed on first demand: a cache hit never touches the decoder at all.

use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::DecoderConfig;
use crate::decode::{self, extract_hut_blocks, BlockVolume, Blueprint, BuildingSize};
use crate::error::{DecodeError, Result};
use crate::name::{is_tracked_building, parse_name_and_level, Level};

/// Handle to one blueprint source file.
pub struct BlueprintFile {
    path: PathBuf,
    content_hash: String,
    nbt: OnceCell<Blueprint>,
}

impl BlueprintFile {
    /// Open a blueprint file, hashing its contents. Nothing is parsed yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content_hash = hash_file(&path)?;
        Ok(Self {
            path,
            content_hash,
            nbt: OnceCell::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stable digest of the file bytes; the cache key.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// The file name, or a `NameFormat` error for paths without one.
    pub fn file_name(&self) -> Result<&str> {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DecodeError::NameFormat(self.path.display().to_string()))
    }

    fn nbt(&self) -> Result<&Blueprint> {
        self.nbt.get_or_try_init(|| {
            let data = std::fs::read(&self.path)?;
            decode::parse_blueprint(&data)
        })
    }

    /// Canonical name and level, derived from the file name and the
    /// namespace classification of the container's tile entities.
    pub fn name_and_level(&self, config: &DecoderConfig) -> Result<(String, Level)> {
        let tracked = is_tracked_building(self.nbt()?, config);
        parse_name_and_level(self.file_name()?, tracked)
    }

    /// Solid bounding-box size of the building.
    pub fn size(&self, config: &DecoderConfig) -> Result<BuildingSize> {
        let blueprint = self.nbt()?;
        let volume = self.volume(blueprint)?;
        let solid: Vec<bool> = blueprint
            .palette
            .iter()
            .map(|entry| config.is_solid(&entry.name))
            .collect();
        volume.solid_bounds(&solid)
    }

    /// Ordered hut roles present in the building, primary first.
    pub fn hut_blocks(&self, config: &DecoderConfig) -> Result<Vec<String>> {
        let blueprint = self.nbt()?;
        let volume = self.volume(blueprint)?;
        Ok(extract_hut_blocks(
            &blueprint.palette,
            &volume,
            blueprint.primary_anchor(),
            config,
        ))
    }

    fn volume(&self, blueprint: &Blueprint) -> Result<BlockVolume> {
        BlockVolume::unpack(
            &blueprint.blocks,
            blueprint.size_x,
            blueprint.size_y,
            blueprint.size_z,
        )
    }
}

/// SHA-256 of a file's bytes as lowercase hex, streamed in 8 KiB chunks.
pub fn hash_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
