//! Gambling mini-games: weighted prize tables, RNG and payout sessions.
//!
//! Both games follow the same shape. The stake is charged first, then the
//! result is drawn, then a [`PendingPayout`] waits for the UI animation. The
//! payout is applied exactly once, either when the animation completes or
//! when the session is flushed on teardown.

pub mod roulette;
pub mod slots;

pub use roulette::RouletteWheel;
pub use slots::SlotMachine;

use serde::{Deserialize, Serialize};

use crate::error::GambleError;
use crate::logic;
use crate::state::GameState;

use slots::Symbol;

/// Resource a prize pays into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrizeKind {
    Coins,
    Energy,
    Seeds,
    Gems,
    Shards,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prize {
    pub kind: PrizeKind,
    pub value: f64,
}

impl Prize {
    pub const fn new(kind: PrizeKind, value: f64) -> Self {
        Self { kind, value }
    }
}

/// Which mini-game a session belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GambleGame {
    Roulette,
    Slots,
}

// ── RNG ───────────────────────────────────────────────────────────────

/// Source of uniform values in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

fn next_rng(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

/// 64-bit LCG. Deterministic for a given seed.
#[derive(Clone, Debug)]
pub struct Lcg {
    seed: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl RandomSource for Lcg {
    fn next_f64(&mut self) -> f64 {
        self.seed = next_rng(self.seed);
        // Top 53 bits give every representable double in [0, 1).
        (self.seed >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of rolls, cycling when exhausted.
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    rolls: Vec<f64>,
    next: usize,
}

impl ScriptedRandom {
    pub fn new(rolls: Vec<f64>) -> Self {
        Self { rolls, next: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.rolls.is_empty() {
            return 0.0;
        }
        let roll = self.rolls[self.next % self.rolls.len()];
        self.next += 1;
        roll
    }
}

// ── Weighted selection ────────────────────────────────────────────────

/// Discrete table drawn by cumulative weight. Ties go to the earlier entry.
#[derive(Clone, Debug)]
pub struct WeightedTable<T> {
    entries: Vec<(f64, T)>,
    total: f64,
    /// Last entry with positive weight; the fallback when rounding overshoots.
    last_live: usize,
}

impl<T> WeightedTable<T> {
    /// Validate weights: finite, non-negative, and summing above zero.
    pub fn new(entries: Vec<(f64, T)>) -> Result<Self, GambleError> {
        if entries.is_empty() {
            return Err(GambleError::EmptyTable);
        }
        let mut total = 0.0;
        let mut last_live = None;
        for (index, (weight, _)) in entries.iter().enumerate() {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(GambleError::InvalidWeight {
                    index,
                    weight: *weight,
                });
            }
            if *weight > 0.0 {
                last_live = Some(index);
            }
            total += weight;
        }
        match last_live {
            Some(last_live) if total > 0.0 => Ok(Self {
                entries,
                total,
                last_live,
            }),
            _ => Err(GambleError::ZeroTotalWeight),
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|(_, item)| item)
    }

    pub fn weight(&self, index: usize) -> Option<f64> {
        self.entries.get(index).map(|(w, _)| *w)
    }

    /// Index selected by `roll` in `[0, 1)`. Always in range.
    pub fn select_index(&self, roll: f64) -> usize {
        let mut remaining = roll.clamp(0.0, 1.0) * self.total;
        for (index, (weight, _)) in self.entries.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            remaining -= weight;
            if remaining <= 0.0 {
                return index;
            }
        }
        self.last_live
    }

    pub fn draw(&self, rng: &mut impl RandomSource) -> (usize, &T) {
        let index = self.select_index(rng.next_f64());
        (index, &self.entries[index].1)
    }
}

// ── Payout session ────────────────────────────────────────────────────

/// What the UI animates while the payout waits.
#[derive(Clone, Debug, PartialEq)]
pub enum SpinOutcome {
    Roulette { segment: usize },
    Slots { reels: [Symbol; 3] },
}

/// A drawn but not yet applied result. Consumed by [`PendingPayout::apply`].
#[derive(Debug)]
#[must_use = "a pending payout must be applied or handed to a GambleSession"]
pub struct PendingPayout {
    outcome: SpinOutcome,
    prize: Option<Prize>,
}

impl PendingPayout {
    pub(crate) fn new(outcome: SpinOutcome, prize: Option<Prize>) -> Self {
        Self { outcome, prize }
    }

    pub fn outcome(&self) -> &SpinOutcome {
        &self.outcome
    }

    /// `None` for a losing slots spin.
    pub fn prize(&self) -> Option<Prize> {
        self.prize
    }

    /// Apply the prize and count the spin.
    pub fn apply(self, state: &mut GameState) -> Option<Prize> {
        match self.prize {
            Some(prize) => logic::award_gambling_prize(state, prize.kind, prize.value),
            None => logic::record_spin(state),
        }
        self.prize
    }
}

/// Holds at most one pending payout for one mini-game.
#[derive(Debug)]
pub struct GambleSession {
    game: GambleGame,
    pending: Option<PendingPayout>,
}

impl GambleSession {
    pub fn new(game: GambleGame) -> Self {
        Self {
            game,
            pending: None,
        }
    }

    pub fn game(&self) -> GambleGame {
        self.game
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_outcome(&self) -> Option<&SpinOutcome> {
        self.pending.as_ref().map(PendingPayout::outcome)
    }

    /// Hold a freshly drawn payout. A payout still waiting from an earlier
    /// spin is applied first so rapid re-spins never drop one.
    pub fn begin(&mut self, state: &mut GameState, payout: PendingPayout) -> SpinOutcome {
        self.flush(state);
        let outcome = payout.outcome.clone();
        self.pending = Some(payout);
        outcome
    }

    /// Animation finished. Returns whether a payout was applied.
    pub fn complete(&mut self, state: &mut GameState) -> bool {
        self.resolve(state)
    }

    /// Teardown path (player navigated away, app closing, saving).
    pub fn flush(&mut self, state: &mut GameState) -> bool {
        self.resolve(state)
    }

    fn resolve(&mut self, state: &mut GameState) -> bool {
        match self.pending.take() {
            Some(payout) => {
                let prize = payout.apply(state);
                tracing::debug!(game = ?self.game, ?prize, "gambling payout applied");
                true
            }
            None => false,
        }
    }
}

impl Drop for GambleSession {
    fn drop(&mut self) {
        if let Some(payout) = &self.pending {
            tracing::warn!(
                game = ?self.game,
                prize = ?payout.prize,
                "gambling session dropped with an unflushed payout"
            );
        }
    }
}
