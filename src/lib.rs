//! # Blueprint Decoder
//!
//! A Rust library for extracting building metadata from MineColonies
//! blueprint files.
//!
//! ## Overview
//!
//! A `.blueprint` file is a gzip-compressed NBT container written by the
//! Structurize mod. This library decodes the packed block-index volume
//! inside it, computes the building's real footprint (excluding terrain
//! filler), discovers its hut-block roles, and derives its canonical name
//! and level — caching everything per style, keyed by content hash.
//!
//! ## Quick Start
//!
//! ```ignore
//! use blueprint_decoder::{BlueprintFile, DecoderConfig};
//!
//! let config = DecoderConfig::default();
//! let file = BlueprintFile::open("blueprints/nordic/townhall3.blueprint")?;
//!
//! let (name, level) = file.name_and_level(&config)?;
//! let size = file.size(&config)?;
//! let huts = file.hut_blocks(&config)?;
//! ```
//!
//! ## Style processing
//!
//! For batch runs over whole style collections (with caching, screenshots,
//! and `style.json` output) use [`Style`]:
//!
//! ```ignore
//! use blueprint_decoder::{DecoderConfig, Style};
//!
//! let style = Style::open(blueprints, images, cache_dir, "minecolonies", "nordic")?;
//! let run = style.run(&DecoderConfig::default(), None)?;
//! ```

pub mod blueprint;
pub mod cache;
pub mod config;
pub mod decode;
pub mod error;
pub mod name;
pub mod style;

// Re-export main types for convenience
pub use blueprint::{hash_file, BlueprintFile};
pub use cache::{BuildingMetadata, CachedField, StyleCache};
pub use config::DecoderConfig;
pub use decode::{extract_hut_blocks, parse_blueprint, BlockVolume, Blueprint, BuildingSize};
pub use error::{DecodeError, Result};
pub use name::{is_tracked_building, parse_name_and_level, Level};
pub use style::{load_ignore_patterns, Style, StyleInfo, StyleRun};
