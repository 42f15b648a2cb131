// Copyright (C) 2020-2026 Andy Kurnia.

use super::{float::StatFloat, stats::ParallelVariance};

// Weighted moving average whose history can be decayed.
// The variance is cached on append and not recomputed on decay,
// so after a bare decay it still reflects the last appended state.
#[derive(Clone, Debug)]
pub struct MovingAverage<F> {
    data: ParallelVariance<F>,
    variance: F,
}

impl<F: StatFloat> Default for MovingAverage<F> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<F: StatFloat> MovingAverage<F> {
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            data: ParallelVariance::new(),
            variance: F::zero(),
        }
    }

    #[inline(always)]
    pub fn mean(&self) -> F {
        self.data.mean()
    }

    #[inline(always)]
    pub fn variance(&self) -> F {
        self.variance
    }

    #[inline(always)]
    pub fn weight(&self) -> F {
        self.data.weight()
    }

    #[inline(always)]
    pub fn data(&self) -> &ParallelVariance<F> {
        &self.data
    }

    // multiplier 0 forgets all weight but keeps the mean.
    #[inline(always)]
    pub fn decay(&mut self, multiplier: F) {
        self.data = self.data.scaled(multiplier);
    }

    #[inline(always)]
    pub fn append(&mut self, value: F, weight: F) {
        self.data =
            ParallelVariance::combine(&self.data, &ParallelVariance::singleton(value, weight));
        self.variance = self.data.population_variance();
    }

    #[inline(always)]
    pub fn push(&mut self, value: F) {
        self.append(value, F::one());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn starts_empty() {
        let ma = MovingAverage::<f64>::new();
        assert_eq!(ma.weight(), 0.0);
        assert_eq!(ma.mean(), 0.0);
        assert_eq!(ma.variance(), 0.0);
    }

    #[test]
    fn textbook_dataset_without_decay() {
        let mut ma = MovingAverage::<f64>::new();
        for v in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            ma.push(v);
        }
        assert_relative_eq!(ma.mean(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(ma.variance(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn decay_halves_weight() {
        let mut ma = MovingAverage::<f64>::new();
        for v in [1.0, 3.0, 8.0] {
            ma.push(v);
        }
        let before = *ma.data();
        ma.decay(0.5);
        assert_eq!(ma.weight(), before.weight() / 2.0);
        assert_eq!(ma.mean(), before.mean());
        assert_eq!(ma.data().acc_var(), before.acc_var() * 0.5);
    }

    #[test]
    fn variance_is_stale_after_decay() {
        let mut ma = MovingAverage::<f64>::new();
        ma.push(0.0);
        ma.push(10.0);
        assert_relative_eq!(ma.variance(), 25.0);
        ma.decay(0.0);
        assert_eq!(ma.weight(), 0.0);
        assert_relative_eq!(ma.variance(), 25.0);
        ma.push(10.0);
        // the old history carries no weight any more.
        assert_eq!(ma.variance(), 0.0);
        assert_eq!(ma.mean(), 10.0);
    }

    #[test]
    fn decay_to_zero_keeps_mean() {
        let mut ma = MovingAverage::<f32>::new();
        ma.push(4.0);
        ma.push(6.0);
        ma.decay(0.0);
        assert_eq!(ma.weight(), 0.0);
        assert_eq!(ma.data().acc_var(), 0.0);
        assert_eq!(ma.mean(), 5.0);
    }

    #[test]
    fn zero_weight_append_changes_nothing() {
        let mut ma = MovingAverage::<f64>::new();
        ma.append(7.0, 0.0);
        assert_eq!(ma.weight(), 0.0);
        assert_eq!(ma.mean(), 0.0);
        assert_eq!(ma.variance(), 0.0);

        ma.push(1.0);
        ma.push(3.0);
        let before = *ma.data();
        ma.append(100.0, 0.0);
        assert_eq!(*ma.data(), before);
        assert_relative_eq!(ma.variance(), 1.0);
    }

    #[test]
    fn heavier_samples_pull_harder() {
        let mut ma = MovingAverage::<f64>::new();
        ma.append(0.0, 1.0);
        ma.append(10.0, 3.0);
        assert_relative_eq!(ma.mean(), 7.5);
        // (1 * 7.5^2 + 3 * 2.5^2) / 4
        assert_relative_eq!(ma.variance(), 18.75);
    }
}
