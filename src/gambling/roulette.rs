//! Leaf roulette: one weighted wheel, one prize per spin.

use super::{PendingPayout, Prize, PrizeKind, RandomSource, SpinOutcome, WeightedTable};
use crate::error::GambleError;
use crate::logic;
use crate::state::{Currency, GameState};

/// Gems charged per spin.
pub const ROULETTE_SPIN_COST: f64 = 5.0;

/// A slice of the wheel.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub label: &'static str,
    pub prize: Prize,
}

/// Default wheel as `(weight, segment)` in clockwise order.
pub fn standard_segments() -> Vec<(f64, Segment)> {
    let seg = |label, kind, value| Segment {
        label,
        prize: Prize::new(kind, value),
    };
    vec![
        (30.0, seg("50 Coins", PrizeKind::Coins, 50.0)),
        (20.0, seg("100 Energy", PrizeKind::Energy, 100.0)),
        (15.0, seg("200 Coins", PrizeKind::Coins, 200.0)),
        (15.0, seg("10 Seeds", PrizeKind::Seeds, 10.0)),
        (8.0, seg("10 Gems", PrizeKind::Gems, 10.0)),
        (5.0, seg("50 Seeds", PrizeKind::Seeds, 50.0)),
        (4.0, seg("25 Gems", PrizeKind::Gems, 25.0)),
        (3.0, seg("1 Shard", PrizeKind::Shards, 1.0)),
    ]
}

#[derive(Clone, Debug)]
pub struct RouletteWheel {
    table: WeightedTable<Segment>,
    cost: f64,
}

impl RouletteWheel {
    pub fn new(segments: Vec<(f64, Segment)>, cost: f64) -> Result<Self, GambleError> {
        Ok(Self {
            table: WeightedTable::new(segments)?,
            cost,
        })
    }

    pub fn standard() -> Result<Self, GambleError> {
        Self::new(standard_segments(), ROULETTE_SPIN_COST)
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.table.get(index)
    }

    pub fn segment_count(&self) -> usize {
        self.table.len()
    }

    /// Charge the stake and draw a segment. `None` (and no draw) if the
    /// player cannot pay.
    pub fn spin(
        &self,
        state: &mut GameState,
        rng: &mut impl RandomSource,
    ) -> Option<PendingPayout> {
        if !logic::spend_currency(state, Currency::Gems, self.cost) {
            return None;
        }
        let (segment, picked) = self.table.draw(rng);
        tracing::debug!(segment, label = picked.label, "roulette landed");
        Some(PendingPayout::new(
            SpinOutcome::Roulette { segment },
            Some(picked.prize),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gambling::ScriptedRandom;

    #[test]
    fn standard_wheel_is_valid() {
        let wheel = RouletteWheel::standard().unwrap();
        assert_eq!(wheel.segment_count(), 8);
        assert!((wheel.cost() - ROULETTE_SPIN_COST).abs() < f64::EPSILON);
    }

    #[test]
    fn spin_without_gems_never_draws() {
        let wheel = RouletteWheel::standard().unwrap();
        let mut state = GameState::new();
        state.gems = ROULETTE_SPIN_COST - 1.0;
        let mut rng = ScriptedRandom::new(vec![0.0]);
        assert!(wheel.spin(&mut state, &mut rng).is_none());
        assert!((state.gems - (ROULETTE_SPIN_COST - 1.0)).abs() < f64::EPSILON);
        assert_eq!(state.total_spins, 0);
    }

    #[test]
    fn spin_charges_before_payout() {
        let wheel = RouletteWheel::standard().unwrap();
        let mut state = GameState::new();
        state.gems = 20.0;
        let mut rng = ScriptedRandom::new(vec![0.0]);
        let payout = wheel.spin(&mut state, &mut rng).unwrap();
        assert!((state.gems - 15.0).abs() < f64::EPSILON);
        assert_eq!(state.coins, 0.0);
        assert_eq!(payout.outcome(), &SpinOutcome::Roulette { segment: 0 });

        payout.apply(&mut state);
        assert!((state.coins - 50.0).abs() < f64::EPSILON);
        assert_eq!(state.total_spins, 1);
    }

    #[test]
    fn last_segment_reachable() {
        let wheel = RouletteWheel::standard().unwrap();
        let mut state = GameState::new();
        state.gems = 5.0;
        let mut rng = ScriptedRandom::new(vec![0.999]);
        let payout = wheel.spin(&mut state, &mut rng).unwrap();
        assert_eq!(payout.prize().unwrap().kind, PrizeKind::Shards);
        payout.apply(&mut state);
        assert_eq!(state.prestige.shards, 1);
    }

    #[test]
    fn custom_wheel_rejects_zero_weights() {
        let segs = vec![(
            0.0,
            Segment {
                label: "nothing",
                prize: Prize::new(PrizeKind::Coins, 1.0),
            },
        )];
        assert_eq!(
            RouletteWheel::new(segs, 1.0).unwrap_err(),
            GambleError::ZeroTotalWeight
        );
    }
}
