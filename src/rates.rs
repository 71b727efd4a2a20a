//! Derived rates and bonuses, recomputed from state on every read.
//!
//! Nothing here is cached, so there is nothing to invalidate when an
//! upgrade, prestige level or active species changes.

use crate::catalog::{upgrade_by_kind, BonusKind, UpgradeKind};
use crate::formula::{aggregate_prestige_bonus, upgrade_effect, xp_threshold};
use crate::state::GameState;

/// Base coins per tap at level 1, plus this much per tree level.
const COINS_PER_TAP_BASE: f64 = 0.1;
const COINS_PER_TAP_PER_LEVEL: f64 = 0.025;

/// Effect of the owned shop upgrade of `kind`.
pub fn upgrade_value(state: &GameState, kind: UpgradeKind) -> f64 {
    let def = upgrade_by_kind(kind);
    upgrade_effect(def, state.upgrade_level(def.id))
}

pub fn prestige_bonus(state: &GameState, kind: BonusKind) -> f64 {
    aggregate_prestige_bonus(&state.prestige.upgrade_levels, kind)
}

/// `(1 + energy prestige bonus)`, applied to every energy gain.
pub fn energy_bonus(state: &GameState) -> f64 {
    1.0 + prestige_bonus(state, BonusKind::Energy)
}

pub fn tap_power(state: &GameState) -> f64 {
    upgrade_value(state, UpgradeKind::TapPower) * (1.0 + prestige_bonus(state, BonusKind::Tap))
}

pub fn growth_speed(state: &GameState) -> f64 {
    upgrade_value(state, UpgradeKind::GrowthSpeed)
        * (1.0 + prestige_bonus(state, BonusKind::Growth))
}

/// Global coin multiplier (species multiplier not included).
pub fn coin_multiplier(state: &GameState) -> f64 {
    upgrade_value(state, UpgradeKind::CoinMultiplier)
        * (1.0 + prestige_bonus(state, BonusKind::Coin))
}

/// Energy a single tap yields on the active species.
pub fn energy_per_tap(state: &GameState) -> f64 {
    tap_power(state) * state.current_species().energy_per_tap * energy_bonus(state)
}

/// Height a single tap adds to the active species.
pub fn height_per_tap(state: &GameState) -> f64 {
    0.5 * growth_speed(state) * state.current_species().growth_rate
}

/// Coins a tap yields at the active tree's current level, before level-up bonuses.
pub fn coins_per_tap(state: &GameState) -> f64 {
    let level = state.current_stats().level as f64;
    (COINS_PER_TAP_BASE + level * COINS_PER_TAP_PER_LEVEL)
        * coin_multiplier(state)
        * state.current_species().coin_multiplier
}

/// Coin bonus for reaching `new_level` on the active species.
pub fn level_up_bonus(state: &GameState, new_level: u32) -> f64 {
    new_level as f64 * 10.0 * coin_multiplier(state) * state.current_species().coin_multiplier
}

/// XP still needed for the active tree's next level.
pub fn xp_to_next_level(state: &GameState) -> u64 {
    let stats = state.current_stats();
    xp_threshold(stats.level).saturating_sub(stats.xp)
}

/// Raw auto-energy per tick, before species and energy bonus.
pub fn auto_energy_rate(state: &GameState) -> f64 {
    upgrade_value(state, UpgradeKind::AutoEnergy) + prestige_bonus(state, BonusKind::AutoEnergy)
}

pub fn auto_growth_rate(state: &GameState) -> f64 {
    upgrade_value(state, UpgradeKind::AutoGrowth) + prestige_bonus(state, BonusKind::AutoGrowth)
}

/// Raw auto-coins per tick, before the coin multiplier.
pub fn auto_coin_rate(state: &GameState) -> f64 {
    upgrade_value(state, UpgradeKind::AutoCoin) + prestige_bonus(state, BonusKind::AutoCoin)
}

/// Energy one auto-energy tick adds.
pub fn auto_energy_per_tick(state: &GameState) -> f64 {
    auto_energy_rate(state) * state.current_species().energy_per_tap * energy_bonus(state)
}

/// Coins one auto-coin tick adds.
pub fn auto_coins_per_tick(state: &GameState) -> f64 {
    auto_coin_rate(state) * coin_multiplier(state)
}

/// Species speed-up for auto-energy and auto-growth ticks.
pub fn time_multiplier(state: &GameState) -> f64 {
    let m = state.current_species().time_multiplier;
    if m.is_finite() && m > 0.0 {
        m
    } else {
        1.0
    }
}
