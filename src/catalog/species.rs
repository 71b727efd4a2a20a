//! Tree species: built-in archetypes plus player-synthesized ones.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Species every fresh game starts with.
pub const DEFAULT_SPECIES_ID: &str = "oak";

/// Rarity tier of a species. Ordered from least to most rare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn all() -> &'static [Rarity] {
        &[
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
        ]
    }

    /// Next tier up, saturating at Legendary.
    pub fn promoted(self) -> Rarity {
        match self {
            Rarity::Common => Rarity::Uncommon,
            Rarity::Uncommon => Rarity::Rare,
            Rarity::Rare => Rarity::Epic,
            Rarity::Epic | Rarity::Legendary => Rarity::Legendary,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }
}

/// A tree archetype with its own multiplier set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    /// Seeds needed to unlock from the shop.
    pub unlock_cost: f64,
    /// Height multiplier per tap and per growth tick.
    pub growth_rate: f64,
    /// Energy multiplier per tap and per auto-energy tick.
    pub energy_per_tap: f64,
    pub coin_multiplier: f64,
    /// Speeds up auto-energy and auto-growth ticks (2.0 = twice as often).
    pub time_multiplier: f64,
    /// Quest that must be completed before the species is offered.
    #[serde(default)]
    pub required_quest: Option<String>,
}

#[allow(clippy::too_many_arguments)]
fn builtin(
    id: &str,
    name: &str,
    rarity: Rarity,
    unlock_cost: f64,
    growth_rate: f64,
    energy_per_tap: f64,
    coin_multiplier: f64,
    time_multiplier: f64,
    required_quest: Option<&str>,
) -> Species {
    Species {
        id: id.into(),
        name: name.into(),
        rarity,
        unlock_cost,
        growth_rate,
        energy_per_tap,
        coin_multiplier,
        time_multiplier,
        required_quest: required_quest.map(Into::into),
    }
}

/// Built-in species in shop order.
pub fn builtin_species() -> &'static [Species] {
    static SPECIES: OnceLock<Vec<Species>> = OnceLock::new();
    SPECIES.get_or_init(|| {
        vec![
            builtin("oak", "Oak", Rarity::Common, 0.0, 1.0, 1.0, 1.0, 1.0, None),
            builtin("birch", "Birch", Rarity::Common, 25.0, 1.2, 1.1, 1.0, 1.0, None),
            builtin("pine", "Pine", Rarity::Uncommon, 75.0, 0.8, 1.3, 1.1, 1.1, None),
            builtin(
                "willow",
                "Weeping Willow",
                Rarity::Uncommon,
                150.0,
                1.5,
                1.0,
                1.3,
                0.9,
                Some("grow_tall"),
            ),
            builtin(
                "cherry",
                "Cherry Blossom",
                Rarity::Rare,
                300.0,
                1.1,
                1.5,
                1.5,
                1.2,
                Some("roulette_regular"),
            ),
            builtin(
                "baobab",
                "Baobab",
                Rarity::Epic,
                750.0,
                0.6,
                2.2,
                1.8,
                1.3,
                Some("upgrade_hoarder"),
            ),
            builtin(
                "sequoia",
                "Giant Sequoia",
                Rarity::Legendary,
                2_000.0,
                2.0,
                3.0,
                2.5,
                1.5,
                Some("energy_tycoon"),
            ),
        ]
    })
}

/// Look a species up among built-ins first, then the player's custom trees.
pub fn find_species<'a>(
    custom: &'a BTreeMap<String, Species>,
    id: &str,
) -> Option<&'a Species> {
    if let Some(species) = builtin_species().iter().find(|s| s.id == id) {
        return Some(species);
    }
    custom.get(id)
}
