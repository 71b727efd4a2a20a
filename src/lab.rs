//! Species lab: blend two owned species into a new custom one.

use serde::{Deserialize, Serialize};

use crate::catalog::{Rarity, Species};

/// Multiplier bonus a blend gets on top of the parents' average.
const BLEND_SYNERGY: f64 = 1.1;

/// Bounds for every custom species multiplier.
pub const MIN_MULTIPLIER: f64 = 0.1;
pub const MAX_MULTIPLIER: f64 = 10.0;

/// Keep a multiplier finite and inside the allowed range; garbage becomes 1.
pub fn clamp_multiplier(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)
    } else {
        1.0
    }
}

/// Clamp every multiplier of a stored custom species.
pub fn sanitize_species(species: &mut Species) {
    for value in [
        &mut species.growth_rate,
        &mut species.energy_per_tap,
        &mut species.coin_multiplier,
        &mut species.time_multiplier,
    ] {
        *value = clamp_multiplier(*value);
    }
}

/// Player-authored species before an id is assigned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomTreeDef {
    pub name: String,
    pub rarity: Rarity,
    pub growth_rate: f64,
    pub energy_per_tap: f64,
    pub coin_multiplier: f64,
    pub time_multiplier: f64,
}

impl CustomTreeDef {
    /// Full species entry under `id`. Custom species have no unlock price or gate.
    pub fn into_species(self, id: String) -> Species {
        Species {
            id,
            name: self.name,
            rarity: self.rarity,
            unlock_cost: 0.0,
            growth_rate: clamp_multiplier(self.growth_rate),
            energy_per_tap: clamp_multiplier(self.energy_per_tap),
            coin_multiplier: clamp_multiplier(self.coin_multiplier),
            time_multiplier: clamp_multiplier(self.time_multiplier),
            required_quest: None,
        }
    }
}

/// Seeds needed to synthesize a species of `rarity`.
pub fn synthesis_cost(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Common => 50.0,
        Rarity::Uncommon => 100.0,
        Rarity::Rare => 250.0,
        Rarity::Epic => 500.0,
        Rarity::Legendary => 1_000.0,
    }
}

fn blend(a: f64, b: f64) -> f64 {
    (a + b) / 2.0 * BLEND_SYNERGY
}

/// Average two parents into a new definition.
///
/// The child takes the rarer parent's tier, promoted one step when both
/// parents share a tier.
pub fn blend_species(a: &Species, b: &Species, name: &str) -> CustomTreeDef {
    let rarity = if a.rarity == b.rarity {
        a.rarity.promoted()
    } else {
        a.rarity.max(b.rarity)
    };
    CustomTreeDef {
        name: name.to_string(),
        rarity,
        growth_rate: blend(a.growth_rate, b.growth_rate),
        energy_per_tap: blend(a.energy_per_tap, b.energy_per_tap),
        coin_multiplier: blend(a.coin_multiplier, b.coin_multiplier),
        time_multiplier: blend(a.time_multiplier, b.time_multiplier),
    }
}
