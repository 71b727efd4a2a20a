//! Tree Tapper game state definitions.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{Species, DEFAULT_SPECIES_ID};

/// Starting height of a freshly unlocked tree.
pub const INITIAL_TREE_HEIGHT: f64 = 50.0;

/// Trees stop levelling here.
pub const MAX_TREE_LEVEL: u32 = 20;

/// Spendable currencies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Energy,
    Coins,
    Seeds,
    /// Gambling currency.
    Gems,
}

/// Per-species progress. Each species keeps its own, even when inactive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeStats {
    pub level: u32,
    pub xp: u64,
    pub total_energy: f64,
    pub height: f64,
}

impl Default for TreeStats {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            total_energy: 0.0,
            height: INITIAL_TREE_HEIGHT,
        }
    }
}

/// Everything that survives a prestige reset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrestigeState {
    /// Spendable shards.
    pub shards: u64,
    /// Shards earned over every run. Never decreases.
    pub total_shards: u64,
    pub prestige_count: u32,
    pub upgrade_levels: BTreeMap<String, u32>,
}

/// Full state of a Tree Tapper game.
///
/// Mutated only through [`crate::logic`]; derived rates live in
/// [`crate::rates`] and are recomputed on every read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub energy: f64,
    pub coins: f64,
    pub seeds: f64,
    #[serde(alias = "grow")]
    pub gems: f64,

    pub total_taps: u64,
    /// Energy earned this run. Drives prestige; only prestige lowers it.
    pub total_energy_earned: f64,
    pub total_spins: u64,
    pub total_upgrades_purchased: u64,
    pub total_lab_trees_created: u64,

    pub current_tree_id: String,
    pub unlocked_trees: BTreeSet<String>,
    pub tree_stats: BTreeMap<String, TreeStats>,
    pub upgrade_levels: BTreeMap<String, u32>,
    pub completed_quests: BTreeSet<String>,
    pub prestige: PrestigeState,
    /// Player-synthesized species keyed by their generated id.
    pub custom_trees: BTreeMap<String, Species>,
    /// Unix milliseconds of the last snapshot.
    pub last_save_time: u64,
}

impl GameState {
    pub fn new() -> Self {
        let mut unlocked_trees = BTreeSet::new();
        unlocked_trees.insert(DEFAULT_SPECIES_ID.to_string());
        let mut tree_stats = BTreeMap::new();
        tree_stats.insert(DEFAULT_SPECIES_ID.to_string(), TreeStats::default());

        Self {
            energy: 0.0,
            coins: 0.0,
            seeds: 0.0,
            gems: 0.0,
            total_taps: 0,
            total_energy_earned: 0.0,
            total_spins: 0,
            total_upgrades_purchased: 0,
            total_lab_trees_created: 0,
            current_tree_id: DEFAULT_SPECIES_ID.to_string(),
            unlocked_trees,
            tree_stats,
            upgrade_levels: BTreeMap::new(),
            completed_quests: BTreeSet::new(),
            prestige: PrestigeState::default(),
            custom_trees: BTreeMap::new(),
            last_save_time: 0,
        }
    }

    pub fn upgrade_level(&self, id: &str) -> u32 {
        self.upgrade_levels.get(id).copied().unwrap_or(0)
    }

    pub fn prestige_upgrade_level(&self, id: &str) -> u32 {
        self.prestige.upgrade_levels.get(id).copied().unwrap_or(0)
    }

    /// Active species, falling back to the default if the id is dangling.
    pub fn current_species(&self) -> &Species {
        crate::catalog::find_species(&self.custom_trees, &self.current_tree_id)
            .or_else(|| crate::catalog::find_species(&self.custom_trees, DEFAULT_SPECIES_ID))
            .unwrap_or(&crate::catalog::builtin_species()[0])
    }

    pub fn current_stats(&self) -> TreeStats {
        self.tree_stats
            .get(&self.current_tree_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn balance(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Energy => self.energy,
            Currency::Coins => self.coins,
            Currency::Seeds => self.seeds,
            Currency::Gems => self.gems,
        }
    }

    pub(crate) fn balance_mut(&mut self, currency: Currency) -> &mut f64 {
        match currency {
            Currency::Energy => &mut self.energy,
            Currency::Coins => &mut self.coins,
            Currency::Seeds => &mut self.seeds,
            Currency::Gems => &mut self.gems,
        }
    }

    pub fn is_unlocked(&self, tree_id: &str) -> bool {
        self.unlocked_trees.contains(tree_id)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
