//! Idle income: three independent repeating timers.
//!
//! A stream only runs while its rate is positive. Each timer remembers the
//! rate, per-tick gain and period it was built for; when an upgrade, prestige level or
//! species switch changes that signature the timer is rebuilt from zero.

use crate::logic;
use crate::rates;
use crate::state::GameState;
use crate::time::RepeatingTimer;

/// Real-time period of the auto-coin stream. Species never change it.
pub const COIN_PERIOD_MS: f64 = 1000.0;

/// Period of the species-scaled streams at `time_multiplier == 1`.
pub const BASE_PERIOD_MS: f64 = 1000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncomeStream {
    Energy,
    Growth,
    Coin,
}

impl IncomeStream {
    pub fn all() -> &'static [IncomeStream] {
        &[IncomeStream::Energy, IncomeStream::Growth, IncomeStream::Coin]
    }

    fn index(self) -> usize {
        match self {
            IncomeStream::Energy => 0,
            IncomeStream::Growth => 1,
            IncomeStream::Coin => 2,
        }
    }

    /// Raw per-tick rate; the stream is off when this is not positive.
    pub fn rate(self, state: &GameState) -> f64 {
        match self {
            IncomeStream::Energy => rates::auto_energy_rate(state),
            IncomeStream::Growth => rates::auto_growth_rate(state),
            IncomeStream::Coin => rates::auto_coin_rate(state),
        }
    }

    /// Tick period in milliseconds for the current species.
    pub fn period_ms(self, state: &GameState) -> f64 {
        match self {
            IncomeStream::Energy | IncomeStream::Growth => {
                BASE_PERIOD_MS / rates::time_multiplier(state)
            }
            IncomeStream::Coin => COIN_PERIOD_MS,
        }
    }

    fn tick(self, state: &mut GameState) {
        match self {
            IncomeStream::Energy => logic::auto_energy_tick(state),
            IncomeStream::Growth => logic::auto_growth_tick(state),
            IncomeStream::Coin => logic::auto_coin_tick(state),
        }
    }
}

/// What a running timer was built from. Every value that feeds a tick's
/// gain is part of it, so a change to any of them resets the timer.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Signature {
    rate: f64,
    gain: f64,
    period_ms: f64,
}

impl Signature {
    fn of(stream: IncomeStream, state: &GameState) -> Self {
        let gain = match stream {
            IncomeStream::Energy => rates::auto_energy_per_tick(state),
            IncomeStream::Growth => rates::auto_growth_rate(state),
            IncomeStream::Coin => rates::auto_coins_per_tick(state),
        };
        Self {
            rate: stream.rate(state),
            gain,
            period_ms: stream.period_ms(state),
        }
    }
}

#[derive(Clone, Debug)]
struct RunningTimer {
    signature: Signature,
    timer: RepeatingTimer,
}

/// Owns the three income timers.
#[derive(Clone, Debug, Default)]
pub struct IncomeScheduler {
    timers: [Option<RunningTimer>; 3],
}

impl IncomeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scheduler already synced to `state`.
    pub fn for_state(state: &GameState) -> Self {
        let mut scheduler = Self::new();
        scheduler.sync(state);
        scheduler
    }

    pub fn is_running(&self, stream: IncomeStream) -> bool {
        self.timers[stream.index()].is_some()
    }

    /// Period of a running stream.
    pub fn period_ms(&self, stream: IncomeStream) -> Option<f64> {
        self.timers[stream.index()]
            .as_ref()
            .map(|t| t.timer.period_ms())
    }

    /// Tear down and rebuild every timer whose inputs changed.
    pub fn sync(&mut self, state: &GameState) {
        for &stream in IncomeStream::all() {
            let slot = &mut self.timers[stream.index()];
            let signature = Signature::of(stream, state);
            if signature.rate <= 0.0 {
                if slot.take().is_some() {
                    tracing::debug!(?stream, "income stream stopped");
                }
                continue;
            }
            let stale = slot.as_ref().map_or(true, |t| t.signature != signature);
            if stale {
                tracing::debug!(
                    ?stream,
                    rate = signature.rate,
                    period_ms = signature.period_ms,
                    "income stream (re)started"
                );
                *slot = Some(RunningTimer {
                    signature,
                    timer: RepeatingTimer::new(signature.period_ms),
                });
            }
        }
    }

    /// Drop every timer, e.g. after a reset.
    pub fn clear(&mut self) {
        self.timers = Default::default();
    }

    /// Feed elapsed time and apply every tick that came due.
    /// Returns the number of ticks applied across all streams.
    pub fn advance(&mut self, state: &mut GameState, delta_ms: f64) -> u32 {
        self.sync(state);
        let mut applied: u32 = 0;
        for &stream in IncomeStream::all() {
            if let Some(running) = self.timers[stream.index()].as_mut() {
                let fires = running.timer.update(delta_ms);
                for _ in 0..fires {
                    stream.tick(state);
                }
                applied = applied.saturating_add(fires);
            }
        }
        applied
    }
}
