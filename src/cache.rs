//! Content-addressed metadata cache.
//!
//! Decoding a blueprint means gunzipping, NBT-parsing, and materializing the
//! whole block volume, so results are cached per style in a JSON document
//! keyed by the file's SHA-256 content hash. Renaming or moving a file keeps
//! its entry; changing a single byte invalidates it.
//!
//! Each derived field is cached independently behind an `"unknown"` sentinel,
//! so documents written by older tool versions (which only captured name and
//! level) upgrade in place instead of being recomputed wholesale.

use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use crate::decode::BuildingSize;
use crate::error::Result;
use crate::name::Level;

/// A lazily computed cache field.
///
/// `Unknown` serializes as the string `"unknown"`; `Known(v)` serializes as
/// `v` itself. `Known` of an empty list is a real result, not `Unknown`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CachedField<T> {
    #[default]
    Unknown,
    Known(T),
}

impl<T> CachedField<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            CachedField::Unknown => None,
            CachedField::Known(v) => Some(v),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, CachedField::Unknown)
    }
}

impl<T: Serialize> Serialize for CachedField<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CachedField::Unknown => serializer.serialize_str("unknown"),
            CachedField::Known(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: serde::de::DeserializeOwned> Deserialize<'de> for CachedField<T> {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        // The cache is a JSON document; going through Value keeps this
        // generic over the field type.
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.as_str() == Some("unknown") {
            return Ok(CachedField::Unknown);
        }
        T::deserialize(value)
            .map(CachedField::Known)
            .map_err(serde::de::Error::custom)
    }
}

/// Derived metadata for one blueprint, keyed by content hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingMetadata {
    pub name: String,
    pub level: Level,
    #[serde(default)]
    pub size: CachedField<BuildingSize>,
    #[serde(default, rename = "hutBlocks")]
    pub hut_blocks: CachedField<Vec<String>>,
}

impl BuildingMetadata {
    pub fn new(name: String, level: Level) -> Self {
        Self {
            name,
            level,
            size: CachedField::Unknown,
            hut_blocks: CachedField::Unknown,
        }
    }
}

/// Per-style cache document: building metadata plus image blur hashes,
/// both keyed by content hash.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StyleCache {
    #[serde(default)]
    pub buildings: HashMap<String, BuildingMetadata>,
    #[serde(default, rename = "blurHashes")]
    pub blur_hashes: HashMap<String, String>,
}

impl StyleCache {
    /// Load a cache document. A missing or unparseable file is an empty
    /// cache (full recompute), never a fatal error.
    pub fn load(path: &Path) -> Self {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&data) {
            Ok(cache) => cache,
            Err(e) => {
                warn!("discarding corrupt cache {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Overwrite the cache document wholesale.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    /// Existing entry for a content hash, or the factory's fresh one.
    pub fn get_or_create(
        &mut self,
        content_hash: &str,
        factory: impl FnOnce() -> Result<BuildingMetadata>,
    ) -> Result<&mut BuildingMetadata> {
        match self.buildings.entry(content_hash.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(factory()?)),
        }
    }
}
