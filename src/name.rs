//! Canonical name and level derivation from blueprint file names.
//!
//! MineColonies buildings level up: `townhall2.blueprint` is level 2 of
//! `townhall`. Buildings outside the tracked namespace never level, so a
//! trailing digit stays part of their name (`tower2.blueprint` really is
//! named "tower2").

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::config::DecoderConfig;
use crate::decode::Blueprint;
use crate::error::{DecodeError, Result};

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)(\d*)\.blueprint$").expect("valid pattern"));

/// A building's level: a positive number, or no levels at all.
///
/// `Level::None` is distinct from level 0 and serializes as JSON `false`,
/// matching the cache and style.json documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    None,
    At(u32),
}

impl Level {
    /// The level a hypothetical next upgrade of this building would carry.
    pub fn next(self) -> u32 {
        match self {
            Level::None => 1,
            Level::At(n) => n + 1,
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Level::None => serializer.serialize_bool(false),
            Level::At(n) => serializer.serialize_u32(*n),
        }
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct LevelVisitor;

        impl<'de> Visitor<'de> for LevelVisitor {
            type Value = Level;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a level number or false")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Level, E> {
                if v {
                    Err(E::custom("level cannot be true"))
                } else {
                    Ok(Level::None)
                }
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Level, E> {
                u32::try_from(v)
                    .map(Level::At)
                    .map_err(|_| E::custom("level out of range"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Level, E> {
                u32::try_from(v)
                    .map(Level::At)
                    .map_err(|_| E::custom("level out of range"))
            }
        }

        deserializer.deserialize_any(LevelVisitor)
    }
}

/// Derive the canonical name and level from a blueprint file name.
///
/// Tracked buildings strip their trailing digits into the level; untracked
/// buildings keep the whole stem as their name and never carry a level.
pub fn parse_name_and_level(file_name: &str, tracked: bool) -> Result<(String, Level)> {
    let captures = NAME_PATTERN
        .captures(file_name)
        .ok_or_else(|| DecodeError::NameFormat(file_name.to_string()))?;

    if !tracked {
        let stem = file_name
            .strip_suffix(".blueprint")
            .unwrap_or(file_name)
            .to_string();
        return Ok((stem, Level::None));
    }

    let name = captures[1].to_string();
    let digits = &captures[2];
    let level = if digits.is_empty() {
        Level::None
    } else {
        Level::At(
            digits
                .parse()
                .map_err(|_| DecodeError::NameFormat(file_name.to_string()))?,
        )
    };
    Ok((name, level))
}

/// Whether the blueprint belongs to the tracked mod namespace.
///
/// Any tile entity whose `id` or `type` carries the tracked prefix
/// qualifies, except the colony flag marker: decorative flags appear in
/// plenty of non-colony builds and must not count on their own.
pub fn is_tracked_building(blueprint: &Blueprint, config: &DecoderConfig) -> bool {
    for tile_entity in &blueprint.tile_entities {
        if let Some(id) = &tile_entity.id {
            if *id == config.flag_id {
                continue;
            }
            if id.starts_with(&config.tracked_namespace) {
                return true;
            }
        }
        if let Some(kind) = &tile_entity.kind {
            if kind.starts_with(&config.tracked_namespace) {
                return true;
            }
        }
    }
    false
}
