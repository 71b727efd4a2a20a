//! One-shot catch-up reward for time spent away.
//!
//! Computed once at load from `now - last_save_time`. Only the idle
//! energy and coin streams pay out; offline growth is not credited.

use serde::{Deserialize, Serialize};

use crate::rates;
use crate::state::GameState;

/// Absences shorter than this pay nothing.
pub const OFFLINE_MIN_SECONDS: u64 = 60;

/// Absences longer than this pay as if they were this long (8 hours).
pub const OFFLINE_CAP_SECONDS: u64 = 28_800;

/// Claimable result of an absence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfflineReward {
    /// Seconds actually credited, after the cap.
    pub elapsed_seconds: u64,
    pub coins: f64,
    pub energy: f64,
}

impl OfflineReward {
    pub fn is_empty(&self) -> bool {
        self.coins <= 0.0 && self.energy <= 0.0
    }
}

/// Reward for the time between `state.last_save_time` and `now_ms`.
///
/// `None` when there is no previous save, the clock went backwards, the
/// absence is shorter than `min_seconds`, or no idle income is owned.
pub fn compute_offline(
    state: &GameState,
    now_ms: u64,
    min_seconds: u64,
    cap_seconds: u64,
) -> Option<OfflineReward> {
    if state.last_save_time == 0 {
        return None;
    }
    let elapsed_seconds = now_ms.checked_sub(state.last_save_time)? / 1000;
    if elapsed_seconds < min_seconds {
        return None;
    }
    let credited = elapsed_seconds.min(cap_seconds);
    let secs = credited as f64;

    let reward = OfflineReward {
        elapsed_seconds: credited,
        coins: rates::auto_coin_rate(state) * secs,
        energy: rates::auto_energy_rate(state)
            * secs
            * state.current_species().energy_per_tap
            * rates::energy_bonus(state),
    };
    if reward.is_empty() {
        return None;
    }
    Some(reward)
}

/// Credit a reward. Offline energy counts as earned energy.
pub fn claim_offline(state: &mut GameState, reward: &OfflineReward) {
    state.coins += reward.coins;
    state.energy += reward.energy;
    state.total_energy_earned += reward.energy;
    let tree_id = state.current_tree_id.clone();
    state.tree_stats.entry(tree_id).or_default().total_energy += reward.energy;
    tracing::info!(
        seconds = reward.elapsed_seconds,
        coins = reward.coins,
        energy = reward.energy,
        "offline reward claimed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAVED_AT: u64 = 1_700_000_000_000;

    fn idle_state() -> GameState {
        let mut state = GameState::new();
        state.upgrade_levels.insert("auto_energy".into(), 2); // 1.0/s
        state.upgrade_levels.insert("auto_coin".into(), 5); // 0.5/s
        state.last_save_time = SAVED_AT;
        state
    }

    fn compute(state: &GameState, away_secs: u64) -> Option<OfflineReward> {
        compute_offline(
            state,
            SAVED_AT + away_secs * 1000,
            OFFLINE_MIN_SECONDS,
            OFFLINE_CAP_SECONDS,
        )
    }

    #[test]
    fn below_threshold_pays_nothing() {
        assert_eq!(compute(&idle_state(), 59), None);
        assert_eq!(compute(&idle_state(), 0), None);
    }

    #[test]
    fn at_threshold_pays() {
        let reward = compute(&idle_state(), 60).unwrap();
        assert_eq!(reward.elapsed_seconds, 60);
        assert!((reward.coins - 30.0).abs() < 1e-9);
        assert!((reward.energy - 60.0).abs() < 1e-9);
    }

    #[test]
    fn long_absence_is_capped() {
        let reward = compute(&idle_state(), OFFLINE_CAP_SECONDS * 3).unwrap();
        assert_eq!(reward.elapsed_seconds, OFFLINE_CAP_SECONDS);
        assert!((reward.coins - 0.5 * OFFLINE_CAP_SECONDS as f64).abs() < 1e-6);
    }

    #[test]
    fn species_and_prestige_scale_energy() {
        let mut state = idle_state();
        state.unlocked_trees.insert("pine".into());
        state.current_tree_id = "pine".into(); // energy x1.3
        state.prestige.upgrade_levels.insert("ancient_sap".into(), 10); // +100%
        let reward = compute(&state, 100).unwrap();
        assert!((reward.energy - 100.0 * 1.3 * 2.0).abs() < 1e-9);
        // Coins ignore species and the coin multiplier.
        assert!((reward.coins - 50.0).abs() < 1e-9);
    }

    #[test]
    fn no_idle_income_no_reward() {
        let mut state = GameState::new();
        state.last_save_time = SAVED_AT;
        assert_eq!(compute(&state, 3600), None);
    }

    #[test]
    fn never_saved_or_clock_skew_pays_nothing() {
        let mut state = idle_state();
        assert_eq!(
            compute_offline(&state, SAVED_AT - 5_000, OFFLINE_MIN_SECONDS, OFFLINE_CAP_SECONDS),
            None
        );
        state.last_save_time = 0;
        assert_eq!(compute(&state, 3600), None);
    }

    #[test]
    fn claim_credits_lifetime_energy() {
        let mut state = idle_state();
        let reward = compute(&state, 120).unwrap();
        claim_offline(&mut state, &reward);
        assert!((state.coins - 60.0).abs() < 1e-9);
        assert!((state.energy - 120.0).abs() < 1e-9);
        assert!((state.total_energy_earned - 120.0).abs() < 1e-9);
        assert!((state.tree_stats["oak"].total_energy - 120.0).abs() < 1e-9);
    }
}
