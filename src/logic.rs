//! Tree Tapper game logic: pure functions over [`GameState`], fully testable.
//!
//! Every purchase/claim/unlock returns `bool` (or `Option`) and validates
//! everything before touching state, so a rejected call never leaves a
//! partial mutation behind.

use crate::catalog::{find_species, prestige_upgrade, upgrade, QuestRegistry, DEFAULT_SPECIES_ID};
use crate::formula::{
    prestige_shard_yield, prestige_upgrade_cost, upgrade_cost, xp_threshold, MIN_ENERGY_THRESHOLD,
};
use crate::gambling::PrizeKind;
use crate::lab::CustomTreeDef;
use crate::quests;
use crate::rates;
use crate::state::{Currency, GameState, TreeStats, MAX_TREE_LEVEL};

/// Gems granted on top of every quest reward.
pub const QUEST_GEM_BONUS: f64 = 5.0;

/// What a single tap produced, for floating-text feedback.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TapResult {
    pub energy: f64,
    pub coins: f64,
    pub height: f64,
    pub levels_gained: u32,
}

/// Manual tap on the active tree.
pub fn tap(state: &mut GameState) -> TapResult {
    let energy = rates::energy_per_tap(state);
    let height = rates::height_per_tap(state);
    let mut coins = rates::coins_per_tap(state);

    let tree_id = state.current_tree_id.clone();
    let mut stats = state.tree_stats.get(&tree_id).cloned().unwrap_or_default();

    stats.xp += 1;
    let mut levels_gained = 0;
    while stats.level < MAX_TREE_LEVEL && stats.xp >= xp_threshold(stats.level) {
        stats.xp -= xp_threshold(stats.level);
        stats.level += 1;
        levels_gained += 1;
        coins += rates::level_up_bonus(state, stats.level);
    }
    stats.total_energy += energy;
    stats.height += height;

    state.energy += energy;
    state.total_energy_earned += energy;
    state.coins += coins;
    state.total_taps += 1;
    state.tree_stats.insert(tree_id, stats);

    if levels_gained > 0 {
        tracing::debug!(
            tree = %state.current_tree_id,
            level = state.current_stats().level,
            "tree levelled up"
        );
    }

    TapResult {
        energy,
        coins,
        height,
        levels_gained,
    }
}

// ── Auto income ───────────────────────────────────────────────────────

/// One auto-energy tick on the active species.
pub fn auto_energy_tick(state: &mut GameState) {
    let gain = rates::auto_energy_per_tick(state);
    if gain <= 0.0 {
        return;
    }
    state.energy += gain;
    state.total_energy_earned += gain;
    let tree_id = state.current_tree_id.clone();
    state.tree_stats.entry(tree_id).or_default().total_energy += gain;
}

/// One auto-growth tick on the active species.
pub fn auto_growth_tick(state: &mut GameState) {
    let gain = rates::auto_growth_rate(state);
    if gain <= 0.0 {
        return;
    }
    let tree_id = state.current_tree_id.clone();
    state.tree_stats.entry(tree_id).or_default().height += gain;
}

/// One auto-coin tick.
pub fn auto_coin_tick(state: &mut GameState) {
    let gain = rates::auto_coins_per_tick(state);
    if gain <= 0.0 {
        return;
    }
    state.coins += gain;
}

// ── Shop ──────────────────────────────────────────────────────────────

/// Buy one level of a shop upgrade. Returns true if successful.
pub fn buy_upgrade(state: &mut GameState, upgrade_id: &str) -> bool {
    let def = match upgrade(upgrade_id) {
        Some(d) => d,
        None => {
            tracing::debug!(upgrade_id, "unknown upgrade");
            return false;
        }
    };
    let level = state.upgrade_level(def.id);
    let cost = match upgrade_cost(def, level) {
        Some(c) => c,
        None => return false,
    };
    if state.coins < cost {
        return false;
    }

    state.coins -= cost;
    state.upgrade_levels.insert(def.id.to_string(), level + 1);
    state.total_upgrades_purchased += 1;
    tracing::debug!(upgrade_id, level = level + 1, cost, "upgrade bought");
    true
}

// ── Species ───────────────────────────────────────────────────────────

/// Make an owned species the active one. Per-species progress is kept.
pub fn switch_tree(state: &mut GameState, tree_id: &str) -> bool {
    if !state.is_unlocked(tree_id) {
        return false;
    }
    state.current_tree_id = tree_id.to_string();
    true
}

/// Buy a species with seeds.
///
/// Only ownership and price are checked here. The quest gate is the
/// caller's job (see [`can_unlock_tree`]).
pub fn unlock_tree(state: &mut GameState, tree_id: &str) -> bool {
    let cost = match find_species(&state.custom_trees, tree_id) {
        Some(s) => s.unlock_cost,
        None => return false,
    };
    if state.is_unlocked(tree_id) || state.seeds < cost {
        return false;
    }

    state.seeds -= cost;
    state.unlocked_trees.insert(tree_id.to_string());
    state
        .tree_stats
        .insert(tree_id.to_string(), TreeStats::default());
    tracing::info!(tree_id, cost, "species unlocked");
    true
}

/// Full unlock gate: known, not owned, affordable, quest prerequisite met.
pub fn can_unlock_tree(state: &GameState, tree_id: &str) -> bool {
    let species = match find_species(&state.custom_trees, tree_id) {
        Some(s) => s,
        None => return false,
    };
    let gate_open = species
        .required_quest
        .as_ref()
        .map_or(true, |q| state.completed_quests.contains(q));
    gate_open && !state.is_unlocked(tree_id) && state.seeds >= species.unlock_cost
}

fn custom_tree_id(state: &GameState, now_ms: u64) -> String {
    let base = format!("custom_{now_ms}");
    let taken = |id: &str| find_species(&state.custom_trees, id).is_some();
    if !taken(&base) {
        return base;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{base}_{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Store a synthesized species, unlock it and make it active.
///
/// Always succeeds; the caller checks `seeds >= cost` first. Registers the
/// species' level-5 and level-10 quests. Returns the new species id.
pub fn create_custom_tree(
    state: &mut GameState,
    registry: &mut QuestRegistry,
    def: CustomTreeDef,
    cost: f64,
    now_ms: u64,
) -> String {
    let id = custom_tree_id(state, now_ms);
    let species = def.into_species(id.clone());

    state.seeds -= cost;
    registry.register_species_quests(&species);
    state.custom_trees.insert(id.clone(), species);
    state.unlocked_trees.insert(id.clone());
    state.tree_stats.insert(id.clone(), TreeStats::default());
    state.current_tree_id = id.clone();
    state.total_lab_trees_created += 1;

    tracing::info!(species_id = %id, cost, "custom species synthesized");
    id
}

// ── Quests ────────────────────────────────────────────────────────────

/// Claim a finished quest. Returns true if successful.
pub fn claim_quest_reward(state: &mut GameState, registry: &QuestRegistry, quest_id: &str) -> bool {
    let quest = match registry.get(quest_id) {
        Some(q) => q,
        None => return false,
    };
    if !quests::is_claimable(state, quest) {
        return false;
    }

    state.coins += quest.reward.coins;
    state.seeds += quest.reward.seeds;
    state.gems += QUEST_GEM_BONUS;
    state.completed_quests.insert(quest.id.clone());
    tracing::info!(
        quest_id,
        coins = quest.reward.coins,
        seeds = quest.reward.seeds,
        "quest claimed"
    );
    true
}

// ── Prestige ──────────────────────────────────────────────────────────

/// Shards a prestige right now would pay.
pub fn pending_shards(state: &GameState) -> u64 {
    prestige_shard_yield(state.total_energy_earned)
}

pub fn can_prestige(state: &GameState) -> bool {
    state.total_energy_earned >= MIN_ENERGY_THRESHOLD
}

/// Hard reset for shards. Returns the shards earned, or `None` if not eligible.
///
/// Everything except the prestige record returns to a fresh game; the
/// save timestamp is kept so offline accrual still measures real time.
pub fn perform_prestige(state: &mut GameState) -> Option<u64> {
    if !can_prestige(state) {
        return None;
    }
    let shards = pending_shards(state);

    let mut prestige = std::mem::take(&mut state.prestige);
    prestige.shards += shards;
    prestige.total_shards += shards;
    prestige.prestige_count += 1;

    let last_save_time = state.last_save_time;
    *state = GameState::new();
    state.prestige = prestige;
    state.last_save_time = last_save_time;

    tracing::info!(
        shards,
        total_shards = state.prestige.total_shards,
        prestige_count = state.prestige.prestige_count,
        "prestige performed"
    );
    Some(shards)
}

/// Buy one level of a prestige upgrade with shards. Returns true if successful.
pub fn buy_prestige_upgrade(state: &mut GameState, upgrade_id: &str) -> bool {
    let def = match prestige_upgrade(upgrade_id) {
        Some(d) => d,
        None => return false,
    };
    let level = state.prestige_upgrade_level(def.id);
    if level >= def.max_level {
        return false;
    }
    let cost = prestige_upgrade_cost(def, level);
    if state.prestige.shards < cost {
        return false;
    }

    state.prestige.shards -= cost;
    state
        .prestige
        .upgrade_levels
        .insert(def.id.to_string(), level + 1);
    tracing::info!(upgrade_id, level = level + 1, cost, "prestige upgrade bought");
    true
}

// ── Currency & gambling ───────────────────────────────────────────────

/// Deduct `amount` if affordable. Negative or NaN amounts are rejected.
pub fn spend_currency(state: &mut GameState, currency: Currency, amount: f64) -> bool {
    if amount.is_nan() || amount < 0.0 || state.balance(currency) < amount {
        return false;
    }
    *state.balance_mut(currency) -= amount;
    true
}

pub fn spend_gems(state: &mut GameState, amount: f64) -> bool {
    spend_currency(state, Currency::Gems, amount)
}

pub fn spend_seeds(state: &mut GameState, amount: f64) -> bool {
    spend_currency(state, Currency::Seeds, amount)
}

/// Count a resolved spin.
pub fn record_spin(state: &mut GameState) {
    state.total_spins += 1;
}

/// Pay a gambling prize straight into its resource and count the spin.
pub fn award_gambling_prize(state: &mut GameState, kind: PrizeKind, value: f64) {
    let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
    match kind {
        PrizeKind::Coins => state.coins += value,
        PrizeKind::Energy => state.energy += value,
        PrizeKind::Seeds => state.seeds += value,
        PrizeKind::Gems => state.gems += value,
        PrizeKind::Shards => {
            let shards = value.floor() as u64;
            state.prestige.shards += shards;
            state.prestige.total_shards += shards;
        }
    }
    record_spin(state);
}

/// Replace the state with a brand-new game, prestige included.
pub fn reset_to_defaults(state: &mut GameState) {
    *state = GameState::new();
    tracing::info!(species = DEFAULT_SPECIES_ID, "game reset to defaults");
}
