//! Decoder configuration.
//!
//! The ignore-set, recognized hut roles, and namespace prefixes are fixed
//! constants of the MineColonies/Structurize ecosystem, but they are carried
//! in an explicit config value threaded through the pipeline so the core
//! stays testable without ambient state.

use std::collections::HashSet;

/// Block names that never count as building material.
///
/// Air, common terrain fillers, and the Structurize substitution
/// placeholder. Anything else in a palette is solid.
pub const IGNORED_BLOCKS: &[&str] = &[
    "minecraft:air",
    "minecraft:grass_block",
    "minecraft:dirt",
    "minecraft:sand",
    "minecraft:stone",
    "minecraft:water",
    "structurize:blocksubstitution",
    "minecraft:grass",
    "minecraft:fern",
];

/// Recognized hut-block role identifiers (the part after the hut prefix).
pub const HUT_BLOCKS: &[&str] = &[
    "field",
    "plantationfield",
    "alchemist",
    "kitchen",
    "graveyard",
    "netherworker",
    "archery",
    "baker",
    "barracks",
    "beekeeper",
    "blacksmith",
    "builder",
    "chickenherder",
    "citizen",
    "combatacademy",
    "composter",
    "concretemixer",
    "cook",
    "cowboy",
    "crusher",
    "deliveryman",
    "dyer",
    "enchanter",
    "farmer",
    "fisherman",
    "fletcher",
    "florist",
    "glassblower",
    "guardtower",
    "hospital",
    "library",
    "lumberjack",
    "mechanic",
    "miner",
    "plantation",
    "rabbithutch",
    "sawmill",
    "school",
    "shepherd",
    "sifter",
    "smeltery",
    "stonemason",
    "stonesmeltery",
    "swineherder",
    "tavern",
    "townhall",
    "university",
    "warehouse",
    "mysticalsite",
];

/// Configuration for the blueprint decode pipeline.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Block names excluded from the solid bounding box.
    pub ignored_blocks: HashSet<String>,
    /// Recognized hut-block roles (prefix already stripped).
    pub hut_roles: HashSet<String>,
    /// Namespaced prefix marking a hut block, e.g. `minecolonies:blockhut`.
    pub hut_prefix: String,
    /// Mod namespace whose tile entities mark a tracked (leveling) building.
    pub tracked_namespace: String,
    /// Tile entity id that must not by itself qualify a building as tracked.
    pub flag_id: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            ignored_blocks: IGNORED_BLOCKS.iter().map(|s| s.to_string()).collect(),
            hut_roles: HUT_BLOCKS.iter().map(|s| s.to_string()).collect(),
            hut_prefix: "minecolonies:blockhut".to_string(),
            tracked_namespace: "minecolonies".to_string(),
            flag_id: "minecolonies:colony_flag".to_string(),
        }
    }
}

impl DecoderConfig {
    /// Whether a palette block name counts as solid building material.
    pub fn is_solid(&self, block_name: &str) -> bool {
        !self.ignored_blocks.contains(block_name)
    }

    /// Strip the hut prefix from a block name, if present.
    pub fn hut_role<'a>(&self, block_name: &'a str) -> Option<&'a str> {
        block_name.strip_prefix(self.hut_prefix.as_str())
    }
}
