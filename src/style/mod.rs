//! Per-style processing pass.
//!
//! A style is a self-contained collection of blueprints (one directory with
//! a `pack.json`) plus its own image tree and cache document, so styles can
//! be processed fully in parallel with no shared state. Within a style,
//! processing order never affects the output: the only mutable resource is
//! the style's own cache, written back once at the end of the pass.

mod images;

pub use images::{blur_hash, find_building_images, BuildingImages};

use log::warn;
use regex::RegexSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::blueprint::{hash_file, BlueprintFile};
use crate::cache::{BuildingMetadata, CachedField, StyleCache};
use crate::config::DecoderConfig;
use crate::decode::BuildingSize;
use crate::error::Result;

/// Nested category tree; leaves are buildings.
///
/// `BTreeMap` keeps the emitted JSON sorted and deterministic.
#[derive(Debug, Default, Serialize)]
pub struct Category {
    pub blueprints: BTreeMap<String, BuildingObject>,
    pub categories: BTreeMap<String, Category>,
}

/// One building as published in `style.json`.
#[derive(Debug, Serialize)]
pub struct BuildingObject {
    pub size: BuildingSize,
    /// Blurhash placeholders for the existing screenshots, front first.
    pub blur: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<bool>,
    #[serde(rename = "hutBlocks", skip_serializing_if = "Option::is_none")]
    pub hut_blocks: Option<Vec<String>>,
}

/// The `style.json` document written into the style's image directory.
#[derive(Debug, Serialize)]
pub struct StyleJson<'a> {
    #[serde(rename = "displayName")]
    pub display_name: &'a str,
    pub authors: &'a [String],
    pub blueprints: &'a BTreeMap<String, BuildingObject>,
    pub categories: &'a BTreeMap<String, Category>,
}

/// Summary record for the aggregated `styles.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleInfo {
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "type")]
    pub style_type: String,
    pub authors: Vec<String>,
    #[serde(rename = "addedAt", skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
    #[serde(default)]
    pub wip: bool,
}

/// `pack.json` metadata shipped inside every blueprint pack.
#[derive(Debug, Deserialize)]
struct PackMeta {
    name: String,
    authors: Vec<String>,
}

/// Result of one style's processing pass.
pub struct StyleRun {
    pub info: StyleInfo,
    /// Names of the style's root-level categories, for the aggregated list.
    pub root_categories: Vec<String>,
}

/// One building-style collection on disk.
pub struct Style {
    dir_name: String,
    style_type: String,
    path: PathBuf,
    img_dir: PathBuf,
    cache_path: PathBuf,
    meta: PackMeta,
}

impl Style {
    /// Open a style directory.
    ///
    /// `style_type` is the collection group (e.g. `minecolonies`, `other`);
    /// the blueprint dir is `<blueprints_root>/<style_type>/<dir_name>` and
    /// must carry a `pack.json`.
    pub fn open(
        blueprints_root: &Path,
        images_root: &Path,
        cache_dir: &Path,
        style_type: &str,
        dir_name: &str,
    ) -> Result<Self> {
        let path = blueprints_root.join(style_type).join(dir_name);
        let meta_path = path.join("pack.json");
        let meta: PackMeta = serde_json::from_str(&std::fs::read_to_string(&meta_path)?)?;
        Ok(Self {
            dir_name: dir_name.to_string(),
            style_type: style_type.to_string(),
            path,
            img_dir: images_root.join(dir_name),
            cache_path: cache_dir.join(format!("{dir_name}.json")),
            meta,
        })
    }

    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }

    /// Process every blueprint in the style and write `style.json` and the
    /// cache document back to disk.
    ///
    /// Per-file decode failures are logged and skipped; they never abort
    /// the rest of the style.
    pub fn run(&self, config: &DecoderConfig, ignore: Option<&RegexSet>) -> Result<StyleRun> {
        let mut cache = StyleCache::load(&self.cache_path);
        let mut root = Category::default();

        self.process_directory(&self.path, Path::new(""), &mut root, &mut cache, config, ignore)?;

        cache.save(&self.cache_path)?;
        self.write_style_json(&root)?;

        Ok(StyleRun {
            info: StyleInfo {
                name: self.dir_name.clone(),
                display_name: self.meta.name.clone(),
                style_type: self.style_type.clone(),
                authors: {
                    let mut authors = self.meta.authors.clone();
                    authors.sort();
                    authors
                },
                added_at: None,
                wip: false,
            },
            root_categories: root.categories.keys().cloned().collect(),
        })
    }

    fn process_directory(
        &self,
        dir: &Path,
        rel: &Path,
        parent: &mut Category,
        cache: &mut StyleCache,
        config: &DecoderConfig,
        ignore: Option<&RegexSet>,
    ) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                let name = entry.file_name().to_string_lossy().into_owned();
                let category = parent.categories.entry(name.clone()).or_default();
                self.process_directory(&path, &rel.join(&name), category, cache, config, ignore)?;
            } else if let Err(e) = self.process_building(&path, rel, parent, cache, config, ignore)
            {
                warn!("skipping {}: {}", path.display(), e);
            }
        }
        Ok(())
    }

    fn process_building(
        &self,
        path: &Path,
        rel: &Path,
        parent: &mut Category,
        cache: &mut StyleCache,
        config: &DecoderConfig,
        ignore: Option<&RegexSet>,
    ) -> Result<()> {
        if path.extension().and_then(|e| e.to_str()) != Some("blueprint") {
            return Ok(());
        }

        let file = BlueprintFile::open(path)?;
        let (name, level) = {
            let meta = cache.get_or_create(file.content_hash(), || {
                let (name, level) = file.name_and_level(config)?;
                Ok(BuildingMetadata::new(name, level))
            })?;
            (meta.name.trim().to_string(), meta.level)
        };

        if let Some(ignore) = ignore {
            let ignore_path = format!("{}/{}", self.dir_name, rel.join(&name).display());
            if ignore.is_match(&ignore_path) {
                return Ok(());
            }
        }

        // A higher-level variant supersedes this file entirely.
        let next_level = format!("{}{}.blueprint", name, level.next());
        if path.with_file_name(next_level).exists() {
            return Ok(());
        }

        let size = self.cached_size(&file, cache, config)?;
        let hut_blocks = self.cached_hut_blocks(&file, cache, config)?;

        let image_dir = self.img_dir.join(rel).join(&name);
        let BuildingImages { front, back } = find_building_images(&image_dir);
        if !front.exists() {
            warn!("[missing front]: {}", front.display());
            return Ok(());
        }

        let mut blur = vec![self.blur_image(&front, cache)?];
        let has_back = back.exists();
        if has_back {
            blur.push(self.blur_image(&back, cache)?);
        }

        parent.blueprints.insert(
            name,
            BuildingObject {
                size,
                blur,
                back: Some(has_back),
                hut_blocks: if hut_blocks.is_empty() {
                    None
                } else {
                    Some(hut_blocks)
                },
            },
        );
        Ok(())
    }

    fn cached_size(
        &self,
        file: &BlueprintFile,
        cache: &mut StyleCache,
        config: &DecoderConfig,
    ) -> Result<BuildingSize> {
        let meta = cache.get_or_create(file.content_hash(), || {
            let (name, level) = file.name_and_level(config)?;
            Ok(BuildingMetadata::new(name, level))
        })?;
        if let Some(size) = meta.size.known() {
            return Ok(*size);
        }
        let size = file.size(config)?;
        meta.size = CachedField::Known(size);
        Ok(size)
    }

    fn cached_hut_blocks(
        &self,
        file: &BlueprintFile,
        cache: &mut StyleCache,
        config: &DecoderConfig,
    ) -> Result<Vec<String>> {
        let meta = cache.get_or_create(file.content_hash(), || {
            let (name, level) = file.name_and_level(config)?;
            Ok(BuildingMetadata::new(name, level))
        })?;
        if let Some(huts) = meta.hut_blocks.known() {
            return Ok(huts.clone());
        }
        let huts = file.hut_blocks(config)?;
        meta.hut_blocks = CachedField::Known(huts.clone());
        Ok(huts)
    }

    /// Blurhash for a screenshot, cached by the image's content hash.
    fn blur_image(&self, path: &Path, cache: &mut StyleCache) -> Result<String> {
        let hash = hash_file(path)?;
        if let Some(known) = cache.blur_hashes.get(&hash) {
            return Ok(known.clone());
        }
        let encoded = blur_hash(path)?;
        cache.blur_hashes.insert(hash, encoded.clone());
        Ok(encoded)
    }

    fn write_style_json(&self, root: &Category) -> Result<()> {
        let doc = StyleJson {
            display_name: &self.meta.name,
            authors: &self.meta.authors,
            blueprints: &root.blueprints,
            categories: &root.categories,
        };
        std::fs::create_dir_all(&self.img_dir)?;
        std::fs::write(self.img_dir.join("style.json"), serde_json::to_string(&doc)?)?;
        Ok(())
    }
}

/// Compile the ignore list: one anchored pattern per non-comment line.
pub fn load_ignore_patterns(path: &Path) -> Result<Option<RegexSet>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let patterns: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| format!("^{line}$"))
        .collect();
    if patterns.is_empty() {
        return Ok(None);
    }
    RegexSet::new(&patterns)
        .map(Some)
        .map_err(|e| crate::error::DecodeError::Format(format!("bad ignore pattern: {e}")))
}
