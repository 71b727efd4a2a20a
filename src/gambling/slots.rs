//! Three-reel slots. Each reel draws a weighted symbol; the prize comes from
//! a fixed lookup on how many symbols match.

use serde::{Deserialize, Serialize};

use super::{PendingPayout, Prize, PrizeKind, RandomSource, SpinOutcome, WeightedTable};
use crate::error::GambleError;
use crate::logic;
use crate::state::{Currency, GameState};

/// Gems charged per pull.
pub const SLOTS_SPIN_COST: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Leaf,
    Acorn,
    Drop,
    Gem,
    Star,
}

impl Symbol {
    pub fn all() -> &'static [Symbol] {
        &[
            Symbol::Leaf,
            Symbol::Acorn,
            Symbol::Drop,
            Symbol::Gem,
            Symbol::Star,
        ]
    }

    /// Reel weight; rarer symbols pay more.
    pub fn weight(&self) -> f64 {
        match self {
            Symbol::Leaf => 35.0,
            Symbol::Acorn => 25.0,
            Symbol::Drop => 20.0,
            Symbol::Gem => 12.0,
            Symbol::Star => 8.0,
        }
    }

    pub fn payout_kind(&self) -> PrizeKind {
        match self {
            Symbol::Leaf => PrizeKind::Coins,
            Symbol::Acorn => PrizeKind::Seeds,
            Symbol::Drop => PrizeKind::Energy,
            Symbol::Gem => PrizeKind::Gems,
            Symbol::Star => PrizeKind::Shards,
        }
    }

    /// Three of a kind.
    pub fn jackpot(&self) -> f64 {
        match self {
            Symbol::Leaf => 500.0,
            Symbol::Acorn => 60.0,
            Symbol::Drop => 800.0,
            Symbol::Gem => 40.0,
            Symbol::Star => 3.0,
        }
    }

    /// Exactly two of a kind.
    pub fn pair(&self) -> f64 {
        match self {
            Symbol::Leaf => 50.0,
            Symbol::Acorn => 8.0,
            Symbol::Drop => 80.0,
            Symbol::Gem => 6.0,
            Symbol::Star => 1.0,
        }
    }
}

/// Prize for three landed symbols: jackpot, pair, or nothing.
pub fn evaluate(reels: [Symbol; 3]) -> Option<Prize> {
    let [a, b, c] = reels;
    if a == b && b == c {
        return Some(Prize::new(a.payout_kind(), a.jackpot()));
    }
    let paired = if a == b || a == c {
        Some(a)
    } else if b == c {
        Some(b)
    } else {
        None
    };
    paired.map(|s| Prize::new(s.payout_kind(), s.pair()))
}

#[derive(Clone, Debug)]
pub struct SlotMachine {
    reel: WeightedTable<Symbol>,
    cost: f64,
}

impl SlotMachine {
    pub fn new(reel: Vec<(f64, Symbol)>, cost: f64) -> Result<Self, GambleError> {
        Ok(Self {
            reel: WeightedTable::new(reel)?,
            cost,
        })
    }

    pub fn standard() -> Result<Self, GambleError> {
        let reel = Symbol::all().iter().map(|s| (s.weight(), *s)).collect();
        Self::new(reel, SLOTS_SPIN_COST)
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Charge the stake, then draw each reel independently.
    pub fn spin(
        &self,
        state: &mut GameState,
        rng: &mut impl RandomSource,
    ) -> Option<PendingPayout> {
        if !logic::spend_currency(state, Currency::Gems, self.cost) {
            return None;
        }
        let reels = [
            *self.reel.draw(rng).1,
            *self.reel.draw(rng).1,
            *self.reel.draw(rng).1,
        ];
        let prize = evaluate(reels);
        tracing::debug!(?reels, ?prize, "slots stopped");
        Some(PendingPayout::new(SpinOutcome::Slots { reels }, prize))
    }
}
