//! Pure balance formulas. No state, no side effects.

use std::collections::BTreeMap;

use crate::catalog::{BonusKind, PrestigeUpgradeDef, UpgradeDef, PRESTIGE_UPGRADES};

/// Lifetime energy needed before a prestige pays any shards.
pub const MIN_ENERGY_THRESHOLD: f64 = 5_000.0;

/// Energy per unit fed into the shard curve.
const SHARD_ENERGY_DIVISOR: f64 = 500.0;
const SHARD_EXPONENT: f64 = 0.6;

/// Coin cost of the next level, or `None` when the upgrade is maxed out.
pub fn upgrade_cost(upgrade: &UpgradeDef, level: u32) -> Option<f64> {
    if level >= upgrade.max_level {
        return None;
    }
    Some(upgrade.base_cost * upgrade.cost_multiplier.powi(level as i32))
}

/// Effect value with `level` levels owned.
pub fn upgrade_effect(upgrade: &UpgradeDef, level: u32) -> f64 {
    upgrade.base_value + upgrade.value_per_level * level as f64
}

/// Shard cost of the next prestige upgrade level. Linear in `level`.
pub fn prestige_upgrade_cost(upgrade: &PrestigeUpgradeDef, level: u32) -> u64 {
    upgrade.base_cost + upgrade.cost_increase * level as u64
}

/// Shards a prestige would pay for `lifetime_energy`.
///
/// `floor((energy / 500) ^ 0.6)` above [`MIN_ENERGY_THRESHOLD`], else 0.
/// Only the final value is floored.
pub fn prestige_shard_yield(lifetime_energy: f64) -> u64 {
    if lifetime_energy.is_nan() || lifetime_energy < MIN_ENERGY_THRESHOLD {
        return 0;
    }
    (lifetime_energy / SHARD_ENERGY_DIVISOR)
        .powf(SHARD_EXPONENT)
        .floor() as u64
}

/// Sum of `value_per_level * level` over owned prestige upgrades of `kind`.
pub fn aggregate_prestige_bonus(levels: &BTreeMap<String, u32>, kind: BonusKind) -> f64 {
    PRESTIGE_UPGRADES
        .iter()
        .filter(|u| u.bonus == kind)
        .map(|u| u.value_per_level * levels.get(u.id).copied().unwrap_or(0) as f64)
        .sum()
}

/// XP needed to leave `level`: `floor(50 * 1.5^(level - 1))`.
pub fn xp_threshold(level: u32) -> u64 {
    let exponent = level.saturating_sub(1) as i32;
    (50.0 * 1.5_f64.powi(exponent)).floor() as u64
}
