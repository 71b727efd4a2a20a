//! The facade a presentation layer drives.
//!
//! `Engine` owns the game state together with everything that has to stay in
//! step with it: the quest registry, the idle-income timers, both gambling
//! sessions, the RNG and the pending offline reward. UI code calls these
//! methods and re-reads [`Engine::state`]; it never mutates state directly.

use crate::catalog::QuestRegistry;
use crate::error::{GambleError, SaveError};
use crate::gambling::{
    GambleGame, GambleSession, Lcg, PrizeKind, RouletteWheel, SlotMachine, SpinOutcome,
};
use crate::income::IncomeScheduler;
use crate::lab::{blend_species, synthesis_cost, CustomTreeDef};
use crate::logic::{self, TapResult};
use crate::offline::{self, OfflineReward, OFFLINE_CAP_SECONDS, OFFLINE_MIN_SECONDS};
use crate::quests::{self, QuestView};
use crate::save::{self, KeyValueStore, AUTOSAVE_INTERVAL_MS, STORAGE_KEY};
use crate::state::{Currency, GameState};
use crate::time::{Clock, RepeatingTimer};

/// Runtime knobs a host may override.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub storage_key: String,
    pub autosave_interval_ms: u64,
    pub offline_min_seconds: u64,
    pub offline_cap_seconds: u64,
    /// Longest slice of time a single `advance` call may simulate.
    pub max_step_ms: f64,
    pub rng_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            autosave_interval_ms: AUTOSAVE_INTERVAL_MS,
            offline_min_seconds: OFFLINE_MIN_SECONDS,
            offline_cap_seconds: OFFLINE_CAP_SECONDS,
            max_step_ms: 10_000.0,
            rng_seed: 0x7472_6565_7461_7070,
        }
    }
}

pub struct Engine<S: KeyValueStore, C: Clock> {
    config: EngineConfig,
    store: S,
    clock: C,
    state: GameState,
    registry: QuestRegistry,
    income: IncomeScheduler,
    autosave: RepeatingTimer,
    roulette: RouletteWheel,
    slots: SlotMachine,
    roulette_session: GambleSession,
    slots_session: GambleSession,
    rng: Lcg,
    offline_reward: Option<OfflineReward>,
}

impl<S: KeyValueStore, C: Clock> Engine<S, C> {
    pub fn new(store: S, clock: C) -> Result<Self, GambleError> {
        Self::with_config(store, clock, EngineConfig::default())
    }

    /// Load the saved game (or start fresh), replay custom-species quests and
    /// compute the offline reward for the time since the last save.
    pub fn with_config(mut store: S, clock: C, config: EngineConfig) -> Result<Self, GambleError> {
        let roulette = RouletteWheel::standard()?;
        let slots = SlotMachine::standard()?;

        let state = save::load_or_default(&mut store, &config.storage_key);
        let now = clock.now_ms();
        let offline_reward = offline::compute_offline(
            &state,
            now,
            config.offline_min_seconds,
            config.offline_cap_seconds,
        );
        if let Some(reward) = &offline_reward {
            tracing::info!(
                seconds = reward.elapsed_seconds,
                coins = reward.coins,
                energy = reward.energy,
                "offline reward available"
            );
        }

        Ok(Self {
            registry: quests::registry_for(&state),
            income: IncomeScheduler::for_state(&state),
            autosave: RepeatingTimer::new(config.autosave_interval_ms as f64),
            roulette,
            slots,
            roulette_session: GambleSession::new(GambleGame::Roulette),
            slots_session: GambleSession::new(GambleGame::Slots),
            rng: Lcg::new(config.rng_seed),
            offline_reward,
            state,
            config,
            store,
            clock,
        })
    }

    // ── Accessors ──

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &QuestRegistry {
        &self.registry
    }

    pub fn income(&self) -> &IncomeScheduler {
        &self.income
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn roulette(&self) -> &RouletteWheel {
        &self.roulette
    }

    pub fn slots(&self) -> &SlotMachine {
        &self.slots
    }

    /// Offline reward waiting to be claimed, if any.
    pub fn offline_reward(&self) -> Option<&OfflineReward> {
        self.offline_reward.as_ref()
    }

    pub fn available_quests(&self) -> Vec<QuestView<'_>> {
        quests::available_quests(&self.state, &self.registry)
    }

    pub fn can_unlock_tree(&self, tree_id: &str) -> bool {
        logic::can_unlock_tree(&self.state, tree_id)
    }

    pub fn pending_shards(&self) -> u64 {
        logic::pending_shards(&self.state)
    }

    // ── Time ──

    /// Run idle income and autosave for `delta_ms` of elapsed time.
    /// Returns the number of income ticks applied.
    pub fn advance(&mut self, delta_ms: f64) -> u32 {
        let step = if delta_ms.is_finite() {
            delta_ms.clamp(0.0, self.config.max_step_ms)
        } else {
            0.0
        };
        let ticks = self.income.advance(&mut self.state, step);
        if self.autosave.update(step) > 0 {
            self.autosave_now();
        }
        ticks
    }

    // ── Player actions ──

    pub fn tap(&mut self) -> TapResult {
        logic::tap(&mut self.state)
    }

    pub fn buy_upgrade(&mut self, upgrade_id: &str) -> bool {
        let bought = logic::buy_upgrade(&mut self.state, upgrade_id);
        if bought {
            self.income.sync(&self.state);
        }
        bought
    }

    pub fn switch_tree(&mut self, tree_id: &str) -> bool {
        let switched = logic::switch_tree(&mut self.state, tree_id);
        if switched {
            self.income.sync(&self.state);
        }
        switched
    }

    /// Buy a species. Unlike the bare store operation this also requires the
    /// species' quest prerequisite.
    pub fn unlock_tree(&mut self, tree_id: &str) -> bool {
        if !self.can_unlock_tree(tree_id) {
            tracing::debug!(tree_id, "unlock rejected");
            return false;
        }
        let unlocked = logic::unlock_tree(&mut self.state, tree_id);
        if unlocked {
            self.autosave_now();
        }
        unlocked
    }

    /// Store a custom species for `cost` seeds. `None` if the player cannot pay.
    pub fn create_custom_tree(&mut self, def: CustomTreeDef, cost: f64) -> Option<String> {
        if cost.is_nan() || cost < 0.0 || self.state.seeds < cost {
            tracing::debug!(cost, seeds = self.state.seeds, "synthesis rejected");
            return None;
        }
        let now = self.clock.now_ms();
        let id = logic::create_custom_tree(&mut self.state, &mut self.registry, def, cost, now);
        self.income.sync(&self.state);
        self.autosave_now();
        Some(id)
    }

    /// Blend two owned species and pay the synthesis price for the result.
    pub fn synthesize(&mut self, parent_a: &str, parent_b: &str, name: &str) -> Option<String> {
        if !self.state.is_unlocked(parent_a) || !self.state.is_unlocked(parent_b) {
            return None;
        }
        let custom = &self.state.custom_trees;
        let a = crate::catalog::find_species(custom, parent_a)?;
        let b = crate::catalog::find_species(custom, parent_b)?;
        let def = blend_species(a, b, name);
        let cost = synthesis_cost(def.rarity);
        self.create_custom_tree(def, cost)
    }

    pub fn claim_quest_reward(&mut self, quest_id: &str) -> bool {
        let claimed = logic::claim_quest_reward(&mut self.state, &self.registry, quest_id);
        if claimed {
            self.autosave_now();
        }
        claimed
    }

    /// Reset the run for shards. Pending gambling payouts are applied first.
    pub fn perform_prestige(&mut self) -> bool {
        if !logic::can_prestige(&self.state) {
            tracing::debug!(
                total_energy_earned = self.state.total_energy_earned,
                "prestige rejected"
            );
            return false;
        }
        self.close_gambling();
        if logic::perform_prestige(&mut self.state).is_none() {
            return false;
        }
        // Offline earnings belong to the wiped run.
        self.offline_reward = None;
        self.registry = quests::registry_for(&self.state);
        self.income.clear();
        self.income.sync(&self.state);
        self.autosave_now();
        true
    }

    pub fn buy_prestige_upgrade(&mut self, upgrade_id: &str) -> bool {
        let bought = logic::buy_prestige_upgrade(&mut self.state, upgrade_id);
        if bought {
            self.income.sync(&self.state);
            self.autosave_now();
        }
        bought
    }

    pub fn spend_currency(&mut self, currency: Currency, amount: f64) -> bool {
        logic::spend_currency(&mut self.state, currency, amount)
    }

    pub fn award_gambling_prize(&mut self, kind: PrizeKind, value: f64) {
        logic::award_gambling_prize(&mut self.state, kind, value);
    }

    // ── Gambling ──

    /// Charge and spin the wheel. The prize is held until [`Engine::finish_spin`]
    /// or [`Engine::close_gambling`].
    pub fn spin_roulette(&mut self) -> Option<SpinOutcome> {
        let payout = self.roulette.spin(&mut self.state, &mut self.rng)?;
        Some(self.roulette_session.begin(&mut self.state, payout))
    }

    pub fn spin_slots(&mut self) -> Option<SpinOutcome> {
        let payout = self.slots.spin(&mut self.state, &mut self.rng)?;
        Some(self.slots_session.begin(&mut self.state, payout))
    }

    /// Spin animation for `game` finished. Returns whether a payout was applied.
    pub fn finish_spin(&mut self, game: GambleGame) -> bool {
        match game {
            GambleGame::Roulette => self.roulette_session.complete(&mut self.state),
            GambleGame::Slots => self.slots_session.complete(&mut self.state),
        }
    }

    pub fn is_spin_pending(&self, game: GambleGame) -> bool {
        match game {
            GambleGame::Roulette => self.roulette_session.is_pending(),
            GambleGame::Slots => self.slots_session.is_pending(),
        }
    }

    /// Apply every held payout (player left the mini-game, app closing).
    pub fn close_gambling(&mut self) {
        self.roulette_session.flush(&mut self.state);
        self.slots_session.flush(&mut self.state);
    }

    // ── Lifecycle ──

    /// Credit the offline reward computed at load. Claimable once.
    pub fn claim_offline_reward(&mut self) -> Option<OfflineReward> {
        let reward = self.offline_reward.take()?;
        offline::claim_offline(&mut self.state, &reward);
        self.autosave_now();
        Some(reward)
    }

    /// Snapshot to the store with a fresh timestamp.
    pub fn save(&mut self) -> Result<(), SaveError> {
        self.close_gambling();
        let now = self.clock.now_ms();
        save::save_game(&mut self.store, &self.config.storage_key, &mut self.state, now)
    }

    /// Wipe everything, prestige included, and overwrite the save.
    pub fn reset_to_defaults(&mut self) {
        self.close_gambling();
        logic::reset_to_defaults(&mut self.state);
        self.registry = QuestRegistry::new();
        self.income.clear();
        self.income.sync(&self.state);
        self.offline_reward = None;
        self.autosave_now();
    }

    fn autosave_now(&mut self) {
        if let Err(e) = self.save() {
            tracing::warn!(error = %e, "autosave failed");
        }
    }
}

impl<S: KeyValueStore, C: Clock> Drop for Engine<S, C> {
    fn drop(&mut self) {
        let pending = self.roulette_session.is_pending() || self.slots_session.is_pending();
        if pending {
            self.autosave_now();
        }
    }
}
