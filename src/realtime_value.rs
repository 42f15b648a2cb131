// Copyright (C) 2020-2026 Andy Kurnia.

use super::{
    clock::{self, Clock, MonotonicClock},
    float::{self, Observable, StatFloat},
    moving_average::MovingAverage,
};

pub const DEFAULT_HALF_LIFE_SECONDS: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RealtimeSnapshot {
    pub value: f64,
    pub mean: f64,
    pub std: f64,
    pub weight: f64,
}

impl std::fmt::Display for RealtimeSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.3} (mean {:.3} \u{b1} {:.3}, weight {:.3})",
            self.value, self.mean, self.std, self.weight
        )
    }
}

// Sequence of values for realtime display. Keeps the latest value and a
// weighted average where each sample weighs 2^((t_i - t_now) / half_life).
// T is the displayed type, F is used for collecting statistics.
#[derive(Clone, Debug)]
pub struct RealtimeValue<
    T: Observable,
    F: StatFloat = <T as Observable>::Stat,
    C: Clock = MonotonicClock,
> {
    half_life: F,
    value: T,
    timestamp: u64,
    moving_average: MovingAverage<F>,
    clock: C,
}

impl<T: Observable, F: StatFloat> RealtimeValue<T, F, MonotonicClock> {
    pub fn new(half_life: F) -> Self {
        Self::with_clock(half_life, MonotonicClock)
    }
}

impl<T: Observable, F: StatFloat> Default for RealtimeValue<T, F, MonotonicClock> {
    fn default() -> Self {
        Self::new(F::from_f64(DEFAULT_HALF_LIFE_SECONDS))
    }
}

impl<T: Observable, F: StatFloat, C: Clock> RealtimeValue<T, F, C> {
    // half_life must be positive.
    pub fn with_clock(half_life: F, clock: C) -> Self {
        Self {
            half_life,
            value: T::default(),
            timestamp: 0,
            moving_average: MovingAverage::new(),
            clock,
        }
    }

    // a failed clock read leaves everything as it was.
    pub fn update(&mut self, value: T) {
        match self.clock.timestamp() {
            Ok(timestamp) => self.update_at(value, timestamp),
            Err(err) => {
                tracing::info!(%err, "failed to get timestamp");
            }
        }
    }

    // the first update measures from timestamp 0, which decays an empty history.
    pub fn update_at(&mut self, value: T, timestamp: u64) {
        let elapsed_nanos = timestamp.saturating_sub(self.timestamp);
        let elapsed =
            F::from_f64(elapsed_nanos as f64) * F::from_f64(clock::NANOS_TO_SECONDS);
        let elapsed_half_lives = elapsed / self.half_life;

        self.moving_average.decay((-elapsed_half_lives).exp2());
        self.moving_average.push(float::observe(value));

        self.value = value;
        self.timestamp = self.timestamp.max(timestamp);
    }

    #[inline(always)]
    pub fn value(&self) -> T {
        self.value
    }

    #[inline(always)]
    pub fn mean(&self) -> F {
        self.moving_average.mean()
    }

    #[inline(always)]
    pub fn std(&self) -> F {
        self.moving_average.variance().max(F::zero()).sqrt()
    }

    #[inline(always)]
    pub fn weight(&self) -> F {
        self.moving_average.weight()
    }

    #[inline(always)]
    pub fn half_life(&self) -> F {
        self.half_life
    }

    #[inline(always)]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    #[inline(always)]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clear_history(&mut self) {
        self.moving_average.decay(F::zero());
    }

    pub fn snapshot(&self) -> RealtimeSnapshot {
        RealtimeSnapshot {
            value: self.value.as_f64(),
            mean: self.mean().as_f64(),
            std: self.std().as_f64(),
            weight: self.weight().as_f64(),
        }
    }
}
